use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use skycast_weather::parse_location_id;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Override for the persisted-records directory; defaults to a
    /// `data` directory next to the config file
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Upstream API endpoints and credentials
    #[serde(default)]
    pub api: ApiConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for current-conditions and forecast requests
    pub weather_base_url: String,

    /// Base URL for forward/reverse geocoding requests
    pub geo_base_url: String,

    /// API key; can also be supplied via the SKYCAST_API_KEY environment
    /// variable, which takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            weather_base_url: skycast_weather::api::DEFAULT_WEATHER_BASE_URL.to_string(),
            geo_base_url: skycast_weather::geocode::DEFAULT_GEO_BASE_URL.to_string(),
            api_key: std::env::var("SKYCAST_API_KEY").ok(),
        }
    }
}

impl ApiConfig {
    /// The key to use: environment variable first, then the config file.
    pub fn effective_api_key(&self) -> Option<String> {
        std::env::var("SKYCAST_API_KEY")
            .ok()
            .or_else(|| self.api_key.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherConfig {
    /// Location id (`"<lat>_<lon>"`) to show when no signed-in user has a
    /// default location preference
    #[serde(default)]
    pub default_location: Option<String>,

    /// Fixed coordinates used as the device location
    #[serde(default)]
    pub home_latitude: Option<f64>,
    #[serde(default)]
    pub home_longitude: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycast");

        Self {
            config_dir,
            data_dir: None,
            api: ApiConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    ///
    /// # Errors
    /// Fails when the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Warnings are logged; validation errors fail the load.
    ///
    /// # Errors
    /// As [`Self::load`], plus validation failures.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration, accumulating errors and warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.api.weather_base_url, "api.weather_base_url", &mut result);
        self.validate_url(&self.api.geo_base_url, "api.geo_base_url", &mut result);

        if self.api.effective_api_key().is_none() {
            result.add_warning(
                "api.api_key",
                "No API key configured - weather lookups will be unavailable",
            );
        }

        if let Some(id) = &self.weather.default_location {
            if parse_location_id(id).is_none() {
                result.add_error(
                    "weather.default_location",
                    format!("Not a \"<lat>_<lon>\" location id: {}", id),
                );
            }
        }

        match (self.weather.home_latitude, self.weather.home_longitude) {
            (Some(_), None) | (None, Some(_)) => {
                result.add_error(
                    "weather.home_latitude",
                    "home_latitude and home_longitude must be set together",
                );
            }
            _ => {}
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Fails when the directory cannot be created or the file written.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Directory holding the persisted records.
    pub fn effective_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| self.config_dir.join("data"))
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
