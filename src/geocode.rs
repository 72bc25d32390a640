//! Coordinate resolution stage.
//!
//! Lookups are independent and idempotent, so the batch runs them
//! concurrently (bounded), deduplicated by address, under an optional shared
//! deadline. Failures never escape: an address that cannot be resolved simply
//! has no entry in the result.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parking_lot::RwLock;

use crate::error::ResolveError;
use crate::haversine::Coordinates;
use crate::traits::{GeoCache, GeoResolver};

/// Process-local cache.
#[derive(Debug, Default)]
pub struct InMemoryGeoCache {
    entries: RwLock<HashMap<String, Coordinates>>,
}

impl InMemoryGeoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl GeoCache for InMemoryGeoCache {
    fn get(&self, address: &str) -> Option<Coordinates> {
        self.entries.read().get(&cache_key(address)).copied()
    }

    fn put(&self, address: &str, coordinates: Coordinates) {
        self.entries.write().insert(cache_key(address), coordinates);
    }
}

fn cache_key(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Resolver that consults a cache first and stores successful lookups.
///
/// Misses and errors are not cached, so a transient failure is retried on
/// the next run.
pub struct CachedResolver<R> {
    inner: R,
    cache: Arc<dyn GeoCache>,
}

impl<R: GeoResolver> CachedResolver<R> {
    pub fn new(inner: R, cache: Arc<dyn GeoCache>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<R: GeoResolver> GeoResolver for CachedResolver<R> {
    async fn resolve(&self, address: &str) -> Result<Coordinates, ResolveError> {
        if let Some(coordinates) = self.cache.get(address) {
            tracing::debug!(address, "geocode cache hit");
            return Ok(coordinates);
        }
        let coordinates = self.inner.resolve(address).await?;
        self.cache.put(address, coordinates);
        Ok(coordinates)
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

/// Outcome of one resolution batch.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Resolved {
    pub coordinates: HashMap<String, Coordinates>,
    /// Addresses that could not be resolved, sorted.
    pub failed: Vec<String>,
}

/// Resolve every distinct non-blank address.
///
/// At most `max_concurrent` lookups are in flight. When `timeout` is set, any
/// lookup still pending when it elapses counts as failed; finished lookups
/// are kept.
pub async fn resolve_all<R>(
    resolver: &R,
    addresses: impl IntoIterator<Item = &str>,
    max_concurrent: usize,
    timeout: Option<Duration>,
) -> Resolved
where
    R: GeoResolver + ?Sized,
{
    let mut seen = HashSet::new();
    let unique: Vec<&str> = addresses
        .into_iter()
        .filter(|address| !address.trim().is_empty())
        .filter(|address| seen.insert(*address))
        .collect();

    if unique.is_empty() {
        return Resolved::default();
    }

    let deadline = timeout.map(|limit| tokio::time::Instant::now() + limit);

    let outcomes: Vec<(&str, Result<Coordinates, ResolveError>)> = stream::iter(unique)
        .map(|address| async move {
            let lookup = resolver.resolve(address);
            let outcome = match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, lookup)
                    .await
                    .unwrap_or(Err(ResolveError::TimedOut)),
                None => lookup.await,
            };
            (address, outcome)
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    let mut resolved = Resolved::default();
    for (address, outcome) in outcomes {
        match outcome {
            Ok(coordinates) => {
                resolved.coordinates.insert(address.to_string(), coordinates);
            }
            Err(error) => {
                tracing::warn!(
                    address,
                    resolver = resolver.name(),
                    error = %error,
                    "address not resolved, using reference center"
                );
                resolved.failed.push(address.to_string());
            }
        }
    }
    resolved.failed.sort();
    resolved
}
