//! Weather retrieval orchestrator.
//!
//! Resolves a request to coordinates (explicit, by location id, or via the
//! device-location port), fetches current conditions and the forecast
//! concurrently, and normalizes the pair. Tracks a per-service fetch state
//! the UI renders from.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use skycast_store::{LocalStore, RecentLocation};

use crate::api::WeatherApiClient;
use crate::geocode::GeoClient;
use crate::location::LocationSource;
use crate::normalize::{normalize, LocationHint};
use crate::types::{Coordinates, GeolocationError, Location, Units, WeatherData, WeatherError};

/// How long the device-location port may take before the request is
/// treated as timed out.
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// What to fetch weather for, in priority order: explicit coordinates win
/// over a location id, which wins over the device location (unless
/// suppressed).
#[derive(Debug, Clone, Default)]
pub struct WeatherRequest {
    pub coordinates: Option<Coordinates>,
    pub location_id: Option<String>,
    /// Skip the device-location fallback when neither coordinates nor an
    /// id are given.
    pub skip_device_location: bool,
}

impl WeatherRequest {
    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Self {
            coordinates: Some(Coordinates { lat, lon }),
            ..Self::default()
        }
    }

    pub fn location_id(id: impl Into<String>) -> Self {
        Self {
            location_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn device_location() -> Self {
        Self::default()
    }
}

/// Lifecycle of the most recent fetch.
#[derive(Debug, Clone, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(WeatherData),
    Error {
        message: String,
        /// Set when the failure came from the device-location port
        geolocation: Option<GeolocationError>,
    },
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn weather_data(&self) -> Option<&WeatherData> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }
}

/// Orchestrates location resolution, the paired upstream fetches, and
/// normalization.
pub struct WeatherService {
    api: WeatherApiClient,
    geo: GeoClient,
    device_location: Option<Arc<dyn LocationSource>>,
    store: Option<LocalStore>,
    state: Mutex<FetchState>,
}

impl WeatherService {
    pub fn new(api: WeatherApiClient, geo: GeoClient) -> Self {
        Self {
            api,
            geo,
            device_location: None,
            store: None,
            state: Mutex::new(FetchState::Idle),
        }
    }

    /// Inject the device-location port.
    pub fn with_device_location(mut self, source: Arc<dyn LocationSource>) -> Self {
        self.device_location = Some(source);
        self
    }

    /// Inject the store: units come from stored preferences and successful
    /// fetches write through to the recent-locations list.
    pub fn with_store(mut self, store: LocalStore) -> Self {
        self.store = Some(store);
        self
    }

    /// The state of the most recent fetch.
    pub fn state(&self) -> FetchState {
        self.state.lock().clone()
    }

    /// Run a fetch, driving the state through Loading into Success or
    /// Error. A failure overwrites earlier success state.
    ///
    /// # Errors
    /// `Geolocation` for device-location failures, `LocationNotFound` for
    /// unresolvable ids, and the transport/status/parse kinds for upstream
    /// failures.
    pub async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherData, WeatherError> {
        *self.state.lock() = FetchState::Loading;

        let result = self.resolve_and_fetch(request).await;
        match &result {
            Ok(data) => {
                *self.state.lock() = FetchState::Success(data.clone());
            }
            Err(e) => {
                tracing::warn!("Weather fetch failed: {}", e);
                let geolocation = match e {
                    WeatherError::Geolocation(g) => Some(g.clone()),
                    _ => None,
                };
                *self.state.lock() = FetchState::Error {
                    message: e.user_message().to_string(),
                    geolocation,
                };
            }
        }
        result
    }

    /// Re-run the last selection by its location id. Loading state is
    /// re-entered and a new failure replaces any prior success.
    ///
    /// # Errors
    /// Same taxonomy as [`Self::fetch`].
    pub async fn refresh(&self, location_id: &str) -> Result<WeatherData, WeatherError> {
        self.fetch(&WeatherRequest::location_id(location_id)).await
    }

    async fn resolve_and_fetch(
        &self,
        request: &WeatherRequest,
    ) -> Result<WeatherData, WeatherError> {
        let units = self.units();

        if let Some(coords) = request.coordinates {
            return self.fetch_at(coords, None, units).await;
        }

        if let Some(id) = &request.location_id {
            // The id itself encodes the coordinates; the reverse lookup
            // supplies the display name and validates the id exists.
            let location = self.geo.resolve_location_id(id).await?;
            let coords = Coordinates {
                lat: location.lat,
                lon: location.lon,
            };
            return self.fetch_at(coords, Some(location), units).await;
        }

        if request.skip_device_location {
            return Err(WeatherError::LocationNotFound(
                "no location requested".to_string(),
            ));
        }

        let source = self
            .device_location
            .as_ref()
            .ok_or(GeolocationError::Unavailable)?;
        let coords = tokio::time::timeout(GEOLOCATION_TIMEOUT, source.current_position())
            .await
            .map_err(|_| GeolocationError::Timeout)??;
        tracing::info!("Device location resolved to {}, {}", coords.lat, coords.lon);
        self.fetch_at(coords, None, units).await
    }

    async fn fetch_at(
        &self,
        coords: Coordinates,
        known_location: Option<Location>,
        units: Units,
    ) -> Result<WeatherData, WeatherError> {
        let (current, forecast) = tokio::join!(
            self.api.current(coords.lat, coords.lon, units),
            self.api.forecast(coords.lat, coords.lon, units),
        );
        let current = current?;
        let forecast = forecast?;

        let hint = match &known_location {
            Some(location) => LocationHint::from(location),
            // Fall back to what the current-conditions response reports
            None => LocationHint {
                lat: coords.lat,
                lon: coords.lon,
                name: current.name.clone(),
                country: current.sys.country.clone(),
                state: None,
            },
        };

        let data = normalize(&current, &forecast, &hint);
        self.record_recent(&data.location);
        Ok(data)
    }

    fn units(&self) -> Units {
        self.store
            .as_ref()
            .map(|store| Units::from(store.preferences().temperature_unit))
            .unwrap_or(Units::Metric)
    }

    /// Write-through: every successful navigation refreshes the recents
    /// list. Failures here must not fail the fetch.
    fn record_recent(&self, location: &Location) {
        let Some(store) = &self.store else {
            return;
        };
        let entry = RecentLocation {
            id: location.id.clone(),
            name: location.name.clone(),
            state: location.state.clone(),
            country: location.country.clone(),
            last_viewed: Utc::now(),
        };
        if let Err(e) = store.add_recent(entry) {
            tracing::warn!("Failed to record recent location: {}", e);
        }
    }
}
