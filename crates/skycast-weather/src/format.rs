//! Display formatting helpers shared by the binary and the UI layer.

use skycast_store::TemperatureUnit;

/// Rounded temperature with the unit symbol, e.g. `18°C`.
pub fn format_temperature(value: f64, unit: TemperatureUnit) -> String {
    format!("{}{}", value.round() as i64, unit.symbol())
}

/// Degrees to an 8-point compass direction.
pub fn wind_direction(degrees: i32) -> &'static str {
    const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let normalized = degrees.rem_euclid(360) as f64;
    let index = (normalized / 45.0).round() as usize % DIRECTIONS.len();
    DIRECTIONS[index]
}

/// `name, state, country` with absent parts left out.
pub fn format_location_name(name: &str, state: Option<&str>, country: Option<&str>) -> String {
    let mut formatted = name.to_string();
    if let Some(state) = state.filter(|s| !s.is_empty()) {
        formatted.push_str(", ");
        formatted.push_str(state);
    }
    if let Some(country) = country.filter(|c| !c.is_empty()) {
        formatted.push_str(", ");
        formatted.push_str(country);
    }
    formatted
}
