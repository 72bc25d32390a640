//! Service points: the visits being scheduled.

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock;
use crate::haversine::Coordinates;
use crate::zone::Zone;

/// Whether the optimizer may re-slot a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PointKind {
    /// Committed service order. Its time is never changed.
    Fixed,
    /// Pending request that may be placed into any open slot.
    Movable,
}

/// One visit to be scheduled.
///
/// Built fresh for every run. The only way to change a slot is
/// [`ServicePoint::slotted`], which yields a new value and refuses fixed points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePoint {
    id: String,
    kind: PointKind,
    client_name: String,
    address: String,
    coordinates: Option<Coordinates>,
    zone_tag: Option<Zone>,
    #[serde(with = "clock::hhmm::option")]
    scheduled_time: Option<NaiveTime>,
    service_duration_minutes: u32,
}

impl ServicePoint {
    /// A committed visit at a known time.
    pub fn fixed(
        id: impl Into<String>,
        client_name: impl Into<String>,
        address: impl Into<String>,
        scheduled_time: NaiveTime,
        service_duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind: PointKind::Fixed,
            client_name: client_name.into(),
            address: address.into(),
            coordinates: None,
            zone_tag: None,
            scheduled_time: Some(scheduled_time),
            service_duration_minutes,
        }
    }

    /// A candidate visit, optionally holding a provisional time.
    pub fn movable(
        id: impl Into<String>,
        client_name: impl Into<String>,
        address: impl Into<String>,
        provisional_time: Option<NaiveTime>,
        service_duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            kind: PointKind::Movable,
            client_name: client_name.into(),
            address: address.into(),
            coordinates: None,
            zone_tag: None,
            scheduled_time: provisional_time,
            service_duration_minutes,
        }
    }

    pub fn with_coordinates(mut self, coordinates: Option<Coordinates>) -> Self {
        self.coordinates = coordinates;
        self
    }

    pub fn with_zone_tag(mut self, zone: Option<Zone>) -> Self {
        self.zone_tag = zone;
        self
    }

    /// Copy of a movable point placed at `time`. Fixed points yield `None`.
    pub fn slotted(&self, time: NaiveTime) -> Option<Self> {
        match self.kind {
            PointKind::Fixed => None,
            PointKind::Movable => Some(Self {
                scheduled_time: Some(time),
                ..self.clone()
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> PointKind {
        self.kind
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == PointKind::Fixed
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn zone_tag(&self) -> Option<&Zone> {
        self.zone_tag.as_ref()
    }

    pub fn scheduled_time(&self) -> Option<NaiveTime> {
        self.scheduled_time
    }

    pub fn service_duration_minutes(&self) -> u32 {
        self.service_duration_minutes
    }
}

/// Sort points chronologically. Untimed points go last, keeping input order.
pub fn sort_chronologically(points: &mut [ServicePoint]) {
    points.sort_by_key(|point| (point.scheduled_time.is_none(), point.scheduled_time));
}
