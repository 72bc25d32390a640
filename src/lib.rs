//! day-route-planner
//!
//! Slots a field technician's pending visits around the day's committed
//! appointments, zone by zone, and reports the travel saved.

pub mod clock;
pub mod config;
pub mod error;
pub mod geocode;
pub mod haversine;
pub mod nominatim;
pub mod optimizer;
pub mod point;
pub mod slots;
pub mod solver;
pub mod traits;
pub mod zone;

pub use config::PlannerConfig;
pub use error::{PlannerError, ResolveError};
pub use haversine::Coordinates;
pub use optimizer::{DailyRouteOptimizer, OptimizationReport};
pub use point::{PointKind, ServicePoint};
pub use zone::Zone;
