//! Forecast normalization: reshape the raw current-conditions and
//! 3-hour-interval forecast responses into the canonical [`WeatherData`]
//! form, one daily row per distinct UTC calendar date.

use chrono::{DateTime, Utc};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::api::{ConditionItem, CurrentResponse, ForecastResponse};
use crate::types::{
    location_id, CurrentWeather, DailyForecast, Location, WeatherCondition, WeatherData,
};

const DEFAULT_VISIBILITY_METERS: i32 = 10_000;

/// What the caller already knows about the location being fetched.
/// Coordinates are required (they define the location id); the names fall
/// back to what the current-conditions response reports.
#[derive(Debug, Clone, Default)]
pub struct LocationHint {
    pub lat: f64,
    pub lon: f64,
    pub name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl From<&Location> for LocationHint {
    fn from(location: &Location) -> Self {
        Self {
            lat: location.lat,
            lon: location.lon,
            name: Some(location.name.clone()),
            country: Some(location.country.clone()),
            state: location.state.clone(),
        }
    }
}

/// Build [`WeatherData`] from the two raw responses.
///
/// Daily rows are keyed by the UTC calendar date of each forecast sample.
/// The first sample of a date seeds the row (condition, precipitation
/// probability, summary); later samples only widen the temperature range.
/// Sunrise/sunset come from the current response and are copied into every
/// row; the forecast feed carries no per-day sun times.
///
/// Deterministic for identical inputs; samples with an unrepresentable
/// timestamp are skipped rather than failing the whole response.
pub fn normalize(
    current: &CurrentResponse,
    forecast: &ForecastResponse,
    hint: &LocationHint,
) -> WeatherData {
    let sunrise = epoch_to_utc(current.sys.sunrise);
    let sunset = epoch_to_utc(current.sys.sunset);

    let mut days: BTreeMap<chrono::NaiveDate, DailyForecast> = BTreeMap::new();
    for sample in &forecast.list {
        let Some(timestamp) = DateTime::from_timestamp(sample.dt, 0) else {
            tracing::warn!("Skipping forecast sample with invalid timestamp {}", sample.dt);
            continue;
        };
        let date = timestamp.date_naive();

        match days.entry(date) {
            Entry::Vacant(slot) => {
                let condition = condition_from(sample.weather.first());
                let summary = format!("Expect {} conditions.", condition.description);
                slot.insert(DailyForecast {
                    date,
                    temp_max: sample.main.temp_max,
                    temp_min: sample.main.temp_min,
                    condition,
                    precipitation_probability: pop_percent(sample.pop),
                    sunrise,
                    sunset,
                    summary,
                });
            }
            Entry::Occupied(mut row) => {
                let row = row.get_mut();
                row.temp_max = row.temp_max.max(sample.main.temp_max);
                row.temp_min = row.temp_min.min(sample.main.temp_min);
            }
        }
    }

    WeatherData {
        current: CurrentWeather {
            temp: current.main.temp,
            feels_like: current.main.feels_like,
            humidity: current.main.humidity,
            wind_speed: current.wind.speed,
            wind_direction: current.wind.deg.unwrap_or(0),
            pressure: current.main.pressure,
            uv_index: current.uvi.unwrap_or(0.0),
            visibility: current.visibility.unwrap_or(DEFAULT_VISIBILITY_METERS),
            condition: condition_from(current.weather.first()),
            observed_at: epoch_to_utc(current.dt),
            sunrise,
            sunset,
        },
        daily: days.into_values().collect(),
        alerts: Vec::new(),
        location: Location {
            id: location_id(hint.lat, hint.lon),
            name: hint.name.clone().unwrap_or_else(|| "Unknown".to_string()),
            country: hint.country.clone().unwrap_or_default(),
            state: hint.state.clone(),
            lat: hint.lat,
            lon: hint.lon,
        },
    }
}

fn epoch_to_utc(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn condition_from(item: Option<&ConditionItem>) -> WeatherCondition {
    item.map(|c| WeatherCondition {
        id: c.id,
        main: c.main.clone(),
        description: c.description.clone(),
        icon: c.icon.clone(),
    })
    .unwrap_or_default()
}

/// Fraction (0.0-1.0) to whole percent, clamped.
fn pop_percent(pop: Option<f64>) -> u8 {
    (pop.unwrap_or(0.0).clamp(0.0, 1.0) * 100.0).round() as u8
}
