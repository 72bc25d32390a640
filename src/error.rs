//! Error taxonomy for the planner.

use thiserror::Error;

/// Errors raised by the planner core.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A longitude/latitude pair was NaN or outside the valid range.
    #[error("invalid coordinate (lng {longitude}, lat {latitude})")]
    InvalidCoordinate { longitude: f64, latitude: f64 },

    /// A fixed or movable input could not be turned into a service point.
    #[error("invalid {kind} input at index {index}: {reason}")]
    InvalidInput {
        kind: &'static str,
        index: usize,
        reason: String,
    },

    /// A configuration value makes planning meaningless.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),
}

/// Failures at the geocoding boundary.
///
/// None of these abort a run: the optimizer logs them and falls back to the
/// reference center.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("address not found")]
    NotFound,

    #[error("geocoding request failed")]
    Request(#[from] reqwest::Error),

    #[error("unusable geocoding response: {0}")]
    InvalidResponse(String),

    #[error("geocoding timed out")]
    TimedOut,
}
