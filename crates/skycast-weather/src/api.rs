//! Upstream weather API client: current conditions and the 5-day,
//! 3-hour-interval forecast feed.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::types::{Units, WeatherError};

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Raw current-conditions response
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentResponse {
    pub weather: Vec<ConditionItem>,
    pub main: MainReadings,
    pub wind: Wind,
    pub visibility: Option<i32>,
    /// UV index; not always present, treated as 0 when absent
    pub uvi: Option<f64>,
    /// Observation time, seconds since epoch
    pub dt: i64,
    pub sys: Sys,
    /// Place name as reported upstream
    pub name: Option<String>,
}

/// Raw forecast response: chronological 3-hour sample points
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSample {
    /// Sample time, seconds since epoch
    pub dt: i64,
    pub main: MainReadings,
    pub weather: Vec<ConditionItem>,
    /// Probability of precipitation as a 0.0-1.0 fraction
    pub pop: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionItem {
    pub id: i64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: i32,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sys {
    /// Seconds since epoch
    pub sunrise: i64,
    pub sunset: i64,
    pub country: Option<String>,
}

/// HTTP client for the upstream weather endpoints.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    /// # Errors
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_WEATHER_BASE_URL)
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

    /// Fetch current conditions for coordinates.
    ///
    /// # Errors
    /// `Network` for transport failures, `Status` for non-2xx responses,
    /// `Parse` for undecodable payloads.
    pub async fn current(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<CurrentResponse, WeatherError> {
        let url = format!(
            "{}/weather?lat={}&lon={}&units={}&appid={}",
            self.base_url,
            lat,
            lon,
            units.as_str(),
            self.api_key
        );
        self.get_json(&url).await
    }

    /// Fetch the 3-hour-interval forecast for coordinates.
    ///
    /// # Errors
    /// Same taxonomy as [`Self::current`].
    pub async fn forecast(
        &self,
        lat: f64,
        lon: f64,
        units: Units,
    ) -> Result<ForecastResponse, WeatherError> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&units={}&appid={}",
            self.base_url,
            lat,
            lon,
            units.as_str(),
            self.api_key
        );
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Weather request failed with status {}", status);
            return Err(WeatherError::Status(status));
        }

        response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))
    }
}
