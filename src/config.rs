//! Planner configuration.
//!
//! Everything tunable lives here and is handed to the optimizer at
//! construction. Hosts typically deserialize it from their own settings file.

use std::time::Duration;

use serde::Deserialize;

use crate::error::PlannerError;
use crate::haversine::{Coordinates, DEFAULT_SPEED_KMH};
use crate::zone::Zone;

/// Default service time per visit in minutes.
pub const DEFAULT_SERVICE_DURATION_MINUTES: u32 = 60;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Depot / dispatch center. Zone bands are measured from here and
    /// unresolved points are placed here.
    pub reference_center: Coordinates,
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    /// Service time for inputs that do not specify their own.
    pub service_duration_minutes: u32,
    pub calendar: CalendarConfig,
    pub zones: ZoneConfig,
    pub resolution: ResolutionConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            reference_center: default_reference_center(),
            speed_kmh: DEFAULT_SPEED_KMH,
            service_duration_minutes: DEFAULT_SERVICE_DURATION_MINUTES,
            calendar: CalendarConfig::default(),
            zones: ZoneConfig::default(),
            resolution: ResolutionConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if !(self.speed_kmh.is_finite() && self.speed_kmh > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "speed_kmh must be positive, got {}",
                self.speed_kmh
            )));
        }
        self.calendar.validate()?;
        self.zones.validate()?;
        if self.resolution.max_concurrent_lookups == 0 {
            return Err(PlannerError::InvalidConfig(
                "max_concurrent_lookups must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_reference_center() -> Coordinates {
    // Paris, Hôtel de Ville
    Coordinates::new_unchecked(2.3522, 48.8566)
}

/// Working-day shape used to generate bookable slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub lunch_start_hour: u32,
    pub lunch_end_hour: u32,
    pub step_minutes: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            work_start_hour: 8,
            work_end_hour: 17,
            lunch_start_hour: 12,
            lunch_end_hour: 13,
            step_minutes: 60,
        }
    }
}

impl CalendarConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.step_minutes == 0 {
            return Err(PlannerError::InvalidConfig("step_minutes must be positive".to_string()));
        }
        if self.work_end_hour > 24 || self.work_start_hour >= self.work_end_hour {
            return Err(PlannerError::InvalidConfig(format!(
                "working hours {}..{} are not a valid day",
                self.work_start_hour, self.work_end_hour
            )));
        }
        if self.lunch_end_hour > 24 || self.lunch_start_hour > self.lunch_end_hour {
            return Err(PlannerError::InvalidConfig(format!(
                "lunch {}..{} is not a valid break",
                self.lunch_start_hour, self.lunch_end_hour
            )));
        }
        let working_minutes = (self.work_end_hour - self.work_start_hour) * 60;
        if self.step_minutes > working_minutes {
            return Err(PlannerError::InvalidConfig(format!(
                "step_minutes {} exceeds the {working_minutes} minute working day",
                self.step_minutes
            )));
        }
        Ok(())
    }
}

/// Upper distance bound (inclusive) for a zone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneBand {
    pub max_km: f64,
    pub zone: Zone,
}

impl ZoneBand {
    pub fn new(max_km: f64, zone: impl Into<String>) -> Self {
        Self {
            max_km,
            zone: Zone::new(zone),
        }
    }
}

/// Postal-code prefix mapped to a zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostalPrefix {
    pub prefix: String,
    pub zone: Zone,
}

impl PostalPrefix {
    pub fn new(prefix: impl Into<String>, zone: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            zone: Zone::new(zone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Ascending by `max_km`; the first band containing the point wins.
    pub bands: Vec<ZoneBand>,
    /// Zone for resolved points beyond the last band.
    pub beyond_bands: Zone,
    pub postal_prefixes: Vec<PostalPrefix>,
    /// Zone for points with neither coordinates nor a known postal code.
    pub default_zone: Zone,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            bands: vec![ZoneBand::new(10.0, "near"), ZoneBand::new(25.0, "mid")],
            beyond_bands: Zone::new("far"),
            postal_prefixes: Vec::new(),
            default_zone: Zone::new("unclassified"),
        }
    }
}

impl ZoneConfig {
    pub fn validate(&self) -> Result<(), PlannerError> {
        let ascending = self
            .bands
            .windows(2)
            .all(|pair| pair[0].max_km < pair[1].max_km);
        let finite = self.bands.iter().all(|band| band.max_km.is_finite() && band.max_km >= 0.0);
        if !(ascending && finite) {
            return Err(PlannerError::InvalidConfig(
                "zone bands must be finite and strictly ascending".to_string(),
            ));
        }
        Ok(())
    }
}

/// Bounds on the coordinate-resolution stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub max_concurrent_lookups: usize,
    /// Deadline for the whole resolution stage. Lookups still pending when it
    /// passes are treated as unresolved.
    pub timeout_secs: Option<u64>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: 8,
            timeout_secs: None,
        }
    }
}

impl ResolutionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
