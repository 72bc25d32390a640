//! Nominatim HTTP adapter for address resolution.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ResolveError;
use crate::haversine::Coordinates;
use crate::traits::GeoResolver;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// ISO 3166-1 alpha-2 codes, comma separated. Empty searches worldwide.
    pub country_codes: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("day-route-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            country_codes: String::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GeoResolver for NominatimClient {
    async fn resolve(&self, address: &str) -> Result<Coordinates, ResolveError> {
        let mut query = vec![("q", address), ("format", "jsonv2"), ("limit", "1")];
        if !self.config.country_codes.is_empty() {
            query.push(("countrycodes", self.config.country_codes.as_str()));
        }

        let places: Vec<NominatimPlace> = self
            .client
            .get(self.search_url())
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let place = places.into_iter().next().ok_or(ResolveError::NotFound)?;
        place.coordinates()
    }

    fn name(&self) -> &'static str {
        "nominatim"
    }
}

/// One search hit. Nominatim reports coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<Coordinates, ResolveError> {
        let latitude: f64 = self
            .lat
            .parse()
            .map_err(|_| ResolveError::InvalidResponse(format!("latitude {:?}", self.lat)))?;
        let longitude: f64 = self
            .lon
            .parse()
            .map_err(|_| ResolveError::InvalidResponse(format!("longitude {:?}", self.lon)))?;
        Coordinates::new(longitude, latitude)
            .map_err(|error| ResolveError::InvalidResponse(error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_hit() {
        let places: Vec<NominatimPlace> = serde_json::from_str(
            r#"[{"place_id": 1, "lat": "48.8566", "lon": "2.3522", "display_name": "Paris"}]"#,
        )
        .unwrap();
        let coordinates = places[0].coordinates().unwrap();
        assert_eq!(coordinates.latitude(), 48.8566);
        assert_eq!(coordinates.longitude(), 2.3522);
    }

    #[test]
    fn rejects_garbage_coordinates() {
        let place = NominatimPlace {
            lat: "north".to_string(),
            lon: "2.0".to_string(),
        };
        assert!(matches!(place.coordinates(), Err(ResolveError::InvalidResponse(_))));

        let place = NominatimPlace {
            lat: "123.0".to_string(),
            lon: "2.0".to_string(),
        };
        assert!(matches!(place.coordinates(), Err(ResolveError::InvalidResponse(_))));
    }

    #[test]
    fn search_url_tolerates_trailing_slash() {
        let client = NominatimClient::new(NominatimConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..NominatimConfig::default()
        })
        .unwrap();
        assert_eq!(client.search_url(), "http://localhost:8080/search");
        assert_eq!(client.name(), "nominatim");
    }
}
