//! Great-circle distance and linear travel-time model.
//!
//! Straight-line distance with an assumed average speed. Less accurate than a
//! road network (ignores roads entirely) but deterministic and always available.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::point::ServicePoint;

/// Average driving speed assumption for time estimation.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A validated (longitude, latitude) pair in degrees.
///
/// Only constructible through [`Coordinates::new`], so every value in
/// circulation is finite and in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    longitude: f64,
    latitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    longitude: f64,
    latitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = PlannerError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.longitude, raw.latitude)
    }
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, PlannerError> {
        let valid = longitude.is_finite()
            && latitude.is_finite()
            && (-180.0..=180.0).contains(&longitude)
            && (-90.0..=90.0).contains(&latitude);
        if !valid {
            return Err(PlannerError::InvalidCoordinate {
                longitude,
                latitude,
            });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// For compile-time constants known to be in range.
    pub(crate) const fn new_unchecked(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

/// Haversine distance between two points in kilometers.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based travel model.
///
/// Points without resolved coordinates are measured from the reference
/// center instead, so an unresolved address never poisons a total.
#[derive(Debug, Clone, Copy)]
pub struct TravelModel {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    /// Fallback location for unresolved points.
    pub reference_center: Coordinates,
}

impl TravelModel {
    pub fn new(speed_kmh: f64, reference_center: Coordinates) -> Self {
        Self {
            speed_kmh,
            reference_center,
        }
    }

    /// Where the model considers a point to be.
    pub fn location_of(&self, point: &ServicePoint) -> Coordinates {
        point.coordinates().unwrap_or(self.reference_center)
    }

    pub fn point_distance_km(&self, from: &ServicePoint, to: &ServicePoint) -> f64 {
        distance_km(self.location_of(from), self.location_of(to))
    }

    /// Convert distance in km to whole travel minutes, rounded up.
    pub fn travel_minutes(&self, km: f64) -> u32 {
        let minutes = (km * 60.0 / self.speed_kmh).ceil();
        if minutes.is_finite() && minutes > 0.0 {
            minutes as u32
        } else {
            0
        }
    }

    /// Sum of leg distances over a time-ordered sequence.
    pub fn route_distance_km(&self, points: &[ServicePoint]) -> f64 {
        points
            .windows(2)
            .map(|leg| self.point_distance_km(&leg[0], &leg[1]))
            .fold(0.0, |total, km| total + km)
    }

    /// Service time plus leg travel time over a time-ordered sequence.
    ///
    /// A single point is not a route: one- and zero-element sequences cost nothing.
    pub fn route_minutes(&self, points: &[ServicePoint]) -> u32 {
        if points.len() < 2 {
            return 0;
        }
        let service: u32 = points.iter().map(ServicePoint::service_duration_minutes).sum();
        let travel: u32 = points
            .windows(2)
            .map(|leg| self.travel_minutes(self.point_distance_km(&leg[0], &leg[1])))
            .sum();
        service + travel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(lng: f64, lat: f64) -> Coordinates {
        Coordinates::new(lng, lat).unwrap()
    }

    #[test]
    fn test_haversine_same_point() {
        let point = coords(2.35, 48.85);
        assert_eq!(distance_km(point, point), 0.0);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Paris to Lyon, roughly 392 km as the crow flies
        let paris = coords(2.3522, 48.8566);
        let lyon = coords(4.8357, 45.7640);
        let dist = distance_km(paris, lyon);
        assert!(dist > 380.0 && dist < 400.0, "Paris to Lyon should be ~392km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = coords(2.29, 48.86);
        let b = coords(2.41, 48.79);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            Coordinates::new(181.0, 0.0),
            Err(PlannerError::InvalidCoordinate { .. })
        ));
        assert!(Coordinates::new(0.0, -90.5).is_err());
        assert!(Coordinates::new(f64::NAN, 10.0).is_err());
        assert!(Coordinates::new(10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Coordinates, _> =
            serde_json::from_str(r#"{"longitude": 2.35, "latitude": 48.85}"#);
        assert!(ok.is_ok());
        let bad: Result<Coordinates, _> =
            serde_json::from_str(r#"{"longitude": 2.35, "latitude": 98.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_travel_minutes_rounds_up() {
        let model = TravelModel::new(30.0, coords(0.0, 0.0));
        // 10 km at 30 km/h = 20 minutes exactly
        assert_eq!(model.travel_minutes(10.0), 20);
        // 10.1 km at 30 km/h = 20.2 minutes, ceil to 21
        assert_eq!(model.travel_minutes(10.1), 21);
        assert_eq!(model.travel_minutes(0.0), 0);
    }

    #[test]
    fn test_route_totals_fall_back_to_center() {
        let center = coords(2.3522, 48.8566);
        let model = TravelModel::new(30.0, center);
        let north = coords(2.3522, 48.9566);
        let resolved = ServicePoint::movable("a", "", "", None, 60).with_coordinates(Some(north));
        let unresolved = ServicePoint::movable("b", "", "", None, 30);

        let single = [resolved.clone()];
        assert_eq!(model.route_distance_km(&single), 0.0);
        assert_eq!(model.route_minutes(&single), 0);

        let leg = distance_km(north, center);
        let route = [resolved, unresolved];
        assert_eq!(model.route_distance_km(&route), leg);
        assert_eq!(model.route_minutes(&route), 90 + model.travel_minutes(leg));
    }
}
