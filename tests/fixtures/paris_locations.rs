//! Paris-area locations for realistic fixtures.
//!
//! Coordinates are approximate landmark positions. The default reference
//! center (Hôtel de Ville) is `CENTER`.

use day_route_planner::Coordinates;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, address, lat, lng }
    }

    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lng, self.lat).unwrap()
    }
}

pub const CENTER: Location = Location::new("Hôtel de Ville", "Place de l'Hôtel de Ville, 75004 Paris", 48.8566, 2.3522);

// ============================================================================
// Inside Paris (well within 10 km of the center)
// ============================================================================

pub const CENTRAL: &[Location] = &[
    Location::new("Louvre", "Rue de Rivoli, 75001 Paris", 48.8606, 2.3376),
    Location::new("Notre-Dame", "6 Parvis Notre-Dame, 75004 Paris", 48.8530, 2.3499),
    Location::new("Bastille", "Place de la Bastille, 75011 Paris", 48.8532, 2.3692),
    Location::new("République", "Place de la République, 75003 Paris", 48.8674, 2.3636),
    Location::new("Gare de Lyon", "Place Louis-Armand, 75012 Paris", 48.8443, 2.3744),
    Location::new("Sacré-Cœur", "35 Rue du Chevalier de la Barre, 75018 Paris", 48.8867, 2.3431),
    Location::new("Tour Eiffel", "Champ de Mars, 75007 Paris", 48.8584, 2.2945),
    Location::new("Arc de Triomphe", "Place Charles de Gaulle, 75008 Paris", 48.8738, 2.2950),
];

// ============================================================================
// Suburbs (10–25 km)
// ============================================================================

pub const SUBURBS: &[Location] = &[
    Location::new("Château de Versailles", "Place d'Armes, 78000 Versailles", 48.8049, 2.1204),
    Location::new("Orly Airport", "Orly, 94390 Paray-Vieille-Poste", 48.7262, 2.3652),
    Location::new("Saint-Germain-en-Laye", "Place Charles de Gaulle, 78100 Saint-Germain-en-Laye", 48.8988, 2.0938),
];

// ============================================================================
// Far (beyond 25 km)
// ============================================================================

pub const FAR: &[Location] = &[
    Location::new("Château de Fontainebleau", "Place du Général de Gaulle, 77300 Fontainebleau", 48.4022, 2.7002),
    Location::new("Meaux Cathedral", "Rue Saint-Étienne, 77100 Meaux", 48.9601, 2.8788),
    Location::new("Chartres Cathedral", "16 Cloître Notre-Dame, 28000 Chartres", 48.4477, 1.4879),
];

/// Four points on the center's meridian, 5 km apart, starting 1 km north.
pub fn meridian_line() -> Vec<Coordinates> {
    // 5 km of latitude in degrees: 5 / 6371 rad
    let step = (5.0_f64 / 6371.0).to_degrees();
    let first = (1.0_f64 / 6371.0).to_degrees();
    (0..4)
        .map(|i| Coordinates::new(CENTER.lng, CENTER.lat + first + step * f64::from(i)).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use day_route_planner::haversine::distance_km;

    #[test]
    fn test_bands_hold_for_fixtures() {
        for loc in CENTRAL {
            assert!(distance_km(CENTER.coords(), loc.coords()) <= 10.0, "{} should be near", loc.name);
        }
        for loc in SUBURBS {
            let km = distance_km(CENTER.coords(), loc.coords());
            assert!(km > 10.0 && km <= 25.0, "{} should be mid-range, got {}", loc.name, km);
        }
        for loc in FAR {
            assert!(distance_km(CENTER.coords(), loc.coords()) > 25.0, "{} should be far", loc.name);
        }
    }
}
