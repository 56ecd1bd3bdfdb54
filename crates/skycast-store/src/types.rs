use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Unit symbol for display
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    /// Resolve the preference to an effective dark-mode flag.
    /// `system_prefers_dark` is the host's reported preference and only
    /// matters for `System`.
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self {
            Self::Light => false,
            Self::Dark => true,
            Self::System => system_prefers_dark,
        }
    }

    /// The theme a dark-mode toggle switches to.
    ///
    /// From `System` the toggle pins an explicit theme opposite to the
    /// current effective mode; afterwards it flips between the two.
    pub fn toggled(&self, system_prefers_dark: bool) -> Self {
        if self.is_dark(system_prefers_dark) {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

/// Per-user settings, persisted inside the user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Location id (`"<lat>_<lon>"`) shown on the home view when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_location: Option<String>,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            default_location: None,
            temperature_unit: TemperatureUnit::Celsius,
            theme: Theme::System,
        }
    }
}

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: UserPreferences,
}

/// A recently viewed location.
///
/// Carries no coordinates; the id (`"<lat>_<lon>"`) encodes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentLocation {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub last_viewed: DateTime<Utc>,
}

/// A location the user explicitly favorited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteLocation {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub added_at: DateTime<Utc>,
}
