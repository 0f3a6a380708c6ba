// src/services/geocoding.rs
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{GeocodeResult, Outcome};
use crate::services::{cache_key, AdapterError, CacheStore};

/// Coordinates for a name don't move; keep them a day.
pub const GEOCODE_TTL_MINUTES: i64 = 24 * 60;

/// Outbound geocoding call. Implementations return every hit they got,
/// best first.
pub trait GeocodeProvider: Send + Sync {
    fn search(&self, location_name: &str) -> Result<Vec<GeocodeResult>, AdapterError>;
}

pub struct NominatimClient {
    client: Client,
    url: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimClient {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
            user_agent: user_agent.into(),
        })
    }
}

impl GeocodeProvider for NominatimClient {
    fn search(&self, location_name: &str) -> Result<Vec<GeocodeResult>, AdapterError> {
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("q", location_name), ("format", "json"), ("limit", "1")])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let places: Vec<NominatimPlace> = resp
            .json()
            .map_err(|e| AdapterError::Parse(e.to_string()))?;

        places
            .into_iter()
            .map(|p| {
                let lat = p.lat.parse::<f64>();
                let lng = p.lon.parse::<f64>();
                match (lat, lng) {
                    (Ok(lat), Ok(lng)) => Ok(GeocodeResult {
                        lat,
                        lng,
                        formatted_address: p.display_name,
                    }),
                    _ => Err(AdapterError::Parse(format!(
                        "non-numeric coordinates: {} {}",
                        p.lat, p.lon
                    ))),
                }
            })
            .collect()
    }
}

/// Cache-aside geocoding. Only hits are cached; "no results" and failures
/// are asked again next time.
pub struct GeocodingService {
    cache: CacheStore,
    provider: Box<dyn GeocodeProvider>,
}

impl GeocodingService {
    pub fn new(cache: CacheStore, provider: Box<dyn GeocodeProvider>) -> Self {
        Self { cache, provider }
    }

    pub fn cache_key(location_name: &str) -> String {
        cache_key("geocode_osm", location_name)
    }

    pub fn geocode(&self, location_name: &str) -> Outcome<Option<GeocodeResult>> {
        if location_name.trim().is_empty() {
            return Outcome::Success(None);
        }

        let key = Self::cache_key(location_name);
        if let Some(hit) = self.cache.get_json::<GeocodeResult>(&key) {
            return Outcome::Success(Some(hit));
        }

        match self.provider.search(location_name) {
            Ok(results) => match results.into_iter().next() {
                Some(first) => {
                    self.cache.set_json(&key, &first, GEOCODE_TTL_MINUTES);
                    Outcome::Success(Some(first))
                }
                None => {
                    tracing::debug!(location_name, "geocoder found nothing");
                    Outcome::Success(None)
                }
            },
            Err(e) => {
                tracing::warn!(location_name, error = %e, "geocoding failed");
                Outcome::degraded(None, e.to_string())
            }
        }
    }
}
