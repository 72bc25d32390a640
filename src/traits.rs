//! Boundary interfaces.
//!
//! These are intentionally minimal. Host applications implement the feed
//! traits for their own order/request records and supply a resolver backed by
//! whatever geocoding service they use.

use async_trait::async_trait;
use chrono::NaiveTime;

use crate::error::ResolveError;
use crate::haversine::Coordinates;
use crate::zone::Zone;

/// A committed service order for the day. Becomes a fixed point.
pub trait ServiceOrder {
    fn id(&self) -> &str;

    fn client_name(&self) -> &str;

    fn address(&self) -> &str;

    /// Committed start time. Never changed by the optimizer.
    fn scheduled_time(&self) -> NaiveTime;

    /// Service duration in minutes, if it differs from the configured default.
    fn service_duration_minutes(&self) -> Option<u32> {
        None
    }

    /// Coordinates already known upstream. Skips geocoding.
    fn coordinates(&self) -> Option<Coordinates> {
        None
    }

    /// Zone assigned upstream. Skips classification.
    fn zone_tag(&self) -> Option<Zone> {
        None
    }
}

/// A pending pre-scheduling request. Becomes a movable point.
pub trait PendingRequest {
    fn id(&self) -> &str;

    fn client_name(&self) -> &str;

    fn address(&self) -> &str;

    /// Time tentatively given to the request, used only for the baseline.
    fn provisional_time(&self) -> Option<NaiveTime> {
        None
    }

    fn service_duration_minutes(&self) -> Option<u32> {
        None
    }

    fn coordinates(&self) -> Option<Coordinates> {
        None
    }

    fn zone_tag(&self) -> Option<Zone> {
        None
    }
}

/// Resolves free-text addresses to coordinates.
///
/// Implementations must be idempotent: the same address always resolves to
/// the same place.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Coordinates, ResolveError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Address → coordinates cache shared across runs.
pub trait GeoCache: Send + Sync {
    fn get(&self, address: &str) -> Option<Coordinates>;

    fn put(&self, address: &str, coordinates: Coordinates);
}
