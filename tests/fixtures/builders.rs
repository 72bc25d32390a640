//! Builders for feed records and a table-backed resolver.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use day_route_planner::traits::{GeoResolver, PendingRequest, ServiceOrder};
use day_route_planner::{Coordinates, ResolveError, Zone};

use super::paris_locations::Location;

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

/// Committed order with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestOrder {
    id: String,
    client: String,
    address: String,
    time: NaiveTime,
    duration: Option<u32>,
    coordinates: Option<Coordinates>,
    zone: Option<Zone>,
}

impl TestOrder {
    pub fn new(id: &str, hour: u32, minute: u32) -> Self {
        Self {
            id: id.to_string(),
            client: format!("client {id}"),
            address: String::new(),
            time: at(hour, minute),
            duration: None,
            coordinates: None,
            zone: None,
        }
    }

    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn at_location(mut self, location: &Location) -> Self {
        self.address = location.address.to_string();
        self.coordinates = Some(location.coords());
        self
    }

    pub fn coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = Some(Zone::new(zone));
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }
}

impl ServiceOrder for TestOrder {
    fn id(&self) -> &str {
        &self.id
    }

    fn client_name(&self) -> &str {
        &self.client
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn scheduled_time(&self) -> NaiveTime {
        self.time
    }

    fn service_duration_minutes(&self) -> Option<u32> {
        self.duration
    }

    fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    fn zone_tag(&self) -> Option<Zone> {
        self.zone.clone()
    }
}

/// Pending request with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestRequest {
    id: String,
    client: String,
    address: String,
    provisional: Option<NaiveTime>,
    coordinates: Option<Coordinates>,
    zone: Option<Zone>,
}

impl TestRequest {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            client: format!("client {id}"),
            address: String::new(),
            provisional: None,
            coordinates: None,
            zone: None,
        }
    }

    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    pub fn at_location(mut self, location: &Location) -> Self {
        self.address = location.address.to_string();
        self.coordinates = Some(location.coords());
        self
    }

    pub fn coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn provisional(mut self, hour: u32, minute: u32) -> Self {
        self.provisional = Some(at(hour, minute));
        self
    }

    pub fn zone(mut self, zone: &str) -> Self {
        self.zone = Some(Zone::new(zone));
        self
    }
}

impl PendingRequest for TestRequest {
    fn id(&self) -> &str {
        &self.id
    }

    fn client_name(&self) -> &str {
        &self.client
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn provisional_time(&self) -> Option<NaiveTime> {
        self.provisional
    }

    fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    fn zone_tag(&self) -> Option<Zone> {
        self.zone.clone()
    }
}

/// Resolver backed by a fixed address table. Unknown addresses are not found.
#[derive(Default)]
pub struct TableResolver {
    table: HashMap<String, Coordinates>,
    calls: Arc<AtomicUsize>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, coordinates: Coordinates) -> Self {
        self.table.insert(address.to_string(), coordinates);
        self
    }

    pub fn with_location(self, location: &Location) -> Self {
        self.with(location.address, location.coords())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared call counter, still readable once the resolver is wrapped.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl GeoResolver for TableResolver {
    async fn resolve(&self, address: &str) -> Result<Coordinates, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table.get(address).copied().ok_or(ResolveError::NotFound)
    }

    fn name(&self) -> &'static str {
        "table"
    }
}
