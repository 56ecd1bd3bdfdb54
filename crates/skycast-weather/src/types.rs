use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use skycast_store::TemperatureUnit;

/// A latitude/longitude pair, the unit of location identity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Derive the canonical location id from coordinates.
///
/// The `"<lat>_<lon>"` format is a compatibility contract: ids round-trip
/// back into coordinates via [`parse_location_id`], with no external id
/// authority involved.
pub fn location_id(lat: f64, lon: f64) -> String {
    format!("{}_{}", lat, lon)
}

/// Recover coordinates from a location id. Malformed ids (wrong shape,
/// non-numeric parts) yield `None` rather than failing.
pub fn parse_location_id(id: &str) -> Option<Coordinates> {
    let (lat, lon) = id.split_once('_')?;
    Some(Coordinates {
        lat: lat.parse().ok()?,
        lon: lon.parse().ok()?,
    })
}

/// A resolved geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// A transient search result; produced per query, never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Upstream weather condition, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WeatherCondition {
    /// Upstream numeric condition code
    pub id: i64,
    /// Category, e.g. "Clear", "Rain"
    pub main: String,
    pub description: String,
    /// Icon code; the trailing character encodes day (`d`) vs night (`n`)
    pub icon: String,
}

impl WeatherCondition {
    pub fn is_day(&self) -> bool {
        self.icon.ends_with('d')
    }
}

/// Point-in-time conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temp: f64,
    pub feels_like: f64,
    /// Relative humidity, percent
    pub humidity: u8,
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: i32,
    /// Pressure in hPa
    pub pressure: i32,
    pub uv_index: f64,
    /// Visibility in meters
    pub visibility: i32,
    pub condition: WeatherCondition,
    pub observed_at: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// One row per calendar date, aggregated from the 3-hour forecast feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    /// Representative condition: the date's first sample
    pub condition: WeatherCondition,
    /// Probability of precipitation, 0-100
    pub precipitation_probability: u8,
    /// Copied from the current-conditions response, not per-day accurate
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub summary: String,
}

/// Severe-weather alert passthrough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub sender: String,
    pub event: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
}

/// The aggregate weather view for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub current: CurrentWeather,
    /// Ascending by date, one entry per distinct UTC calendar date
    pub daily: Vec<DailyForecast>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alerts: Vec<WeatherAlert>,
    pub location: Location,
}

/// Request units understood by the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl From<TemperatureUnit> for Units {
    fn from(unit: TemperatureUnit) -> Self {
        match unit {
            TemperatureUnit::Celsius => Self::Metric,
            TemperatureUnit::Fahrenheit => Self::Imperial,
        }
    }
}

/// Device geolocation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    Denied,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location services unavailable")]
    Unavailable,
    #[error("Location error: {0}")]
    Unknown(String),
}

impl GeolocationError {
    /// Stable code for callers that branch on the kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::Denied => "DENIED",
            Self::Timeout => "TIMEOUT",
            Self::Unavailable => "UNAVAILABLE",
            Self::Unknown(_) => "UNKNOWN",
        }
    }

    /// A user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Denied => {
                "Location access denied. Please enable location services or search for a specific city."
            }
            Self::Timeout => {
                "Location request timed out. Please try again or search for a specific city."
            }
            Self::Unavailable => {
                "Location services are not available. Please search for a specific city."
            }
            Self::Unknown(_) => "An unexpected error occurred while getting your location.",
        }
    }
}

/// Weather retrieval errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Upstream returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl WeatherError {
    /// A user-friendly message suitable for display in the UI.
    ///
    /// Upstream failures deliberately collapse to one generic sentence;
    /// only geolocation failures keep their distinct wording.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Geolocation(e) => e.user_message(),
            _ => "Failed to fetch weather data. Please try again later.",
        }
    }
}
