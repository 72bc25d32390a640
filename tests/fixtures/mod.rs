//! Test fixtures for day-route-planner.
//!
//! Provides:
//! - Real Paris-area locations (approximate, from OpenStreetMap)
//! - Builders for orders and requests, and a table-backed resolver

#![allow(dead_code)]

pub mod builders;
pub mod paris_locations;

pub use builders::*;
pub use paris_locations::*;
