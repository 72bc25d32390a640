//! Logistic zones and the classifier that assigns points to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ZoneConfig;
use crate::haversine::{Coordinates, distance_km};
use crate::point::ServicePoint;

/// A logistic partition of the day's visits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Zone {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Which rule decided a point's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRule {
    Tagged,
    DistanceBand,
    PostalPrefix,
    Default,
}

/// Assigns each point to exactly one zone.
///
/// Rules in priority order: upstream tag, distance band from the reference
/// center, postal-code prefix, default zone. Never fails.
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    reference_center: Coordinates,
    config: ZoneConfig,
}

impl ZoneClassifier {
    pub fn new(reference_center: Coordinates, config: ZoneConfig) -> Self {
        Self {
            reference_center,
            config,
        }
    }

    pub fn classify(&self, point: &ServicePoint) -> Zone {
        let (zone, rule) = self.classify_with_rule(point);
        tracing::debug!(point_id = point.id(), zone = %zone, rule = ?rule, "classified point");
        zone
    }

    pub fn classify_with_rule(&self, point: &ServicePoint) -> (Zone, ZoneRule) {
        if let Some(zone) = point.zone_tag() {
            return (zone.clone(), ZoneRule::Tagged);
        }

        if let Some(coordinates) = point.coordinates() {
            return (self.zone_for_distance(coordinates), ZoneRule::DistanceBand);
        }

        let by_postal_code = extract_postal_code(point.address())
            .and_then(|code| self.zone_for_postal_code(&code));
        if let Some(zone) = by_postal_code {
            return (zone, ZoneRule::PostalPrefix);
        }

        (self.config.default_zone.clone(), ZoneRule::Default)
    }

    fn zone_for_distance(&self, coordinates: Coordinates) -> Zone {
        let km = distance_km(self.reference_center, coordinates);
        self.config
            .bands
            .iter()
            .find(|band| km <= band.max_km)
            .map(|band| band.zone.clone())
            .unwrap_or_else(|| self.config.beyond_bands.clone())
    }

    /// Longest matching prefix wins; among equal lengths, the first configured.
    fn zone_for_postal_code(&self, code: &str) -> Option<Zone> {
        let mut best: Option<(usize, &Zone)> = None;
        for entry in &self.config.postal_prefixes {
            if entry.prefix.is_empty() || !code.starts_with(entry.prefix.as_str()) {
                continue;
            }
            if best.is_none_or(|(len, _)| entry.prefix.len() > len) {
                best = Some((entry.prefix.len(), &entry.zone));
            }
        }
        best.map(|(_, zone)| zone.clone())
    }
}

/// First five-digit postal code in free address text.
///
/// Accepts the contiguous form (`75011`) and the spaced form (`110 00`).
pub fn extract_postal_code(address: &str) -> Option<String> {
    let chars: Vec<char> = address.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let run: String = chars[start..i].iter().collect();
        if run.len() == 5 {
            return Some(run);
        }
        if run.len() == 3 {
            let tail = &chars[i..];
            let spaced = tail.len() >= 3
                && tail[0] == ' '
                && tail[1].is_ascii_digit()
                && tail[2].is_ascii_digit()
                && tail.get(3).is_none_or(|c| !c.is_ascii_digit());
            if spaced {
                return Some(format!("{run}{}{}", tail[1], tail[2]));
            }
        }
    }
    None
}
