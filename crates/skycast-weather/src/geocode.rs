//! Forward and reverse geocoding against the upstream geo endpoints.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::types::{location_id, parse_location_id, Location, LocationSuggestion, WeatherError};

pub const DEFAULT_GEO_BASE_URL: &str = "https://api.openweathermap.org/geo/1.0";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Forward lookups are capped; the upstream order is kept as-is.
pub const SUGGESTION_LIMIT: usize = 5;
/// Queries shorter than this never hit the network.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    state: Option<String>,
    country: Option<String>,
    lat: f64,
    lon: f64,
}

/// HTTP client for the upstream geocoding endpoints.
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeoClient {
    /// # Errors
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_GEO_BASE_URL)
    }

    /// Client with a custom base URL (used by tests against a mock server).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Search locations by free text.
    ///
    /// A trimmed query shorter than [`MIN_QUERY_CHARS`] returns an empty
    /// list without a network call. Results keep the upstream order, capped
    /// at [`SUGGESTION_LIMIT`].
    ///
    /// # Errors
    /// Transport, status, and parse failures; callers present them all as
    /// one generic search failure.
    pub async fn search(&self, query: &str) -> Result<Vec<LocationSuggestion>, WeatherError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/direct?q={}&limit={}&appid={}",
            self.base_url,
            urlencoding::encode(query),
            SUGGESTION_LIMIT,
            self.api_key
        );
        let entries: Vec<GeoEntry> = self.get_json(&url).await?;

        Ok(entries
            .into_iter()
            .map(|entry| LocationSuggestion {
                id: location_id(entry.lat, entry.lon),
                name: entry.name,
                state: entry.state,
                country: entry.country.unwrap_or_default(),
                lat: entry.lat,
                lon: entry.lon,
            })
            .collect())
    }

    /// Resolve coordinates to a named location.
    ///
    /// # Errors
    /// `LocationNotFound` when upstream has no entry for the coordinates,
    /// plus the usual transport/status/parse failures.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Location, WeatherError> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&limit=1&appid={}",
            self.base_url, lat, lon, self.api_key
        );
        let entries: Vec<GeoEntry> = self.get_json(&url).await?;

        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(location_id(lat, lon)))?;

        Ok(Location {
            id: location_id(lat, lon),
            name: entry.name,
            state: entry.state,
            country: entry.country.unwrap_or_default(),
            lat,
            lon,
        })
    }

    /// Resolve a `"<lat>_<lon>"` id back to a location.
    ///
    /// # Errors
    /// `LocationNotFound` for malformed ids or unknown coordinates.
    pub async fn resolve_location_id(&self, id: &str) -> Result<Location, WeatherError> {
        let coords = parse_location_id(id)
            .ok_or_else(|| WeatherError::LocationNotFound(id.to_string()))?;
        self.reverse(coords.lat, coords.lon).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Geocoding request failed with status {}", status);
            return Err(WeatherError::Status(status));
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}
