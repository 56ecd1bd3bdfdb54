use std::sync::Arc;

use crate::error::{AppError, ConfigError};
use crate::Config;

use skycast_auth::{AuthSession, InMemoryUserRepository, UserRepository};
use skycast_store::LocalStore;
use skycast_weather::{
    ConfiguredLocation, GeoClient, WeatherApiClient, WeatherData, WeatherRequest, WeatherService,
};

/// Composition root: builds the store, session, and weather service from
/// the configuration and hands them out. All wiring is explicit; there
/// are no ambient singletons to reach for.
pub struct App {
    config: Arc<Config>,
    store: LocalStore,
    session: AuthSession,
    weather: WeatherService,
}

impl App {
    /// Build the application from a loaded configuration, with the mock
    /// user repository.
    ///
    /// # Errors
    /// `Config` when the API key is missing, `Weather` when an HTTP client
    /// cannot be constructed.
    pub fn new(config: Config) -> Result<Self, AppError> {
        Self::with_repository(config, Arc::new(InMemoryUserRepository::with_demo_user()))
    }

    /// Build the application with an injected user repository.
    ///
    /// # Errors
    /// As [`Self::new`].
    pub fn with_repository(
        config: Config,
        repository: Arc<dyn UserRepository>,
    ) -> Result<Self, AppError> {
        let api_key = config
            .api
            .effective_api_key()
            .ok_or_else(|| ConfigError::MissingSetting("api.api_key".to_string()))?;

        let store = LocalStore::new(config.effective_data_dir());
        let session = AuthSession::new(repository, store.clone());

        let api = WeatherApiClient::with_base_url(&api_key, &config.api.weather_base_url)?;
        let geo = GeoClient::with_base_url(&api_key, &config.api.geo_base_url)?;

        let device_location = match (config.weather.home_latitude, config.weather.home_longitude) {
            (Some(lat), Some(lon)) => ConfiguredLocation::new(lat, lon),
            _ => ConfiguredLocation::unavailable(),
        };

        let weather = WeatherService::new(api, geo)
            .with_store(store.clone())
            .with_device_location(Arc::new(device_location));

        Ok(Self {
            config: Arc::new(config),
            store,
            session,
            weather,
        })
    }

    /// Restore persisted session state.
    pub fn initialize(&self) {
        self.session.initialize();
        tracing::info!("Application initialized");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub fn weather(&self) -> &WeatherService {
        &self.weather
    }

    /// The location to show by default: the signed-in user's preference
    /// first, then the configured fallback.
    pub fn default_location_id(&self) -> Option<String> {
        self.store
            .preferences()
            .default_location
            .or_else(|| self.config.weather.default_location.clone())
    }

    /// Fetch weather for the default location, or via the device location
    /// when none is set.
    ///
    /// # Errors
    /// The weather service's taxonomy, wrapped in [`AppError`].
    pub async fn fetch_default_weather(&self) -> Result<WeatherData, AppError> {
        let request = match self.default_location_id() {
            Some(id) => WeatherRequest::location_id(id),
            None => WeatherRequest::device_location(),
        };
        Ok(self.weather.fetch(&request).await?)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use skycast_store::UserPreferences;

    fn test_config(dir: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.api.api_key = Some("test-key".to_string());
        config.data_dir = Some(dir.to_path_buf());
        config
    }

    #[test]
    fn missing_api_key_fails_construction() {
        // Only meaningful when the environment doesn't provide a key
        if std::env::var("SKYCAST_API_KEY").is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.api.api_key = None;

        let result = App::new(config);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn builds_and_restores_session() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(test_config(dir.path())).unwrap();
        app.initialize();

        assert_eq!(
            app.session().status(),
            skycast_auth::AuthStatus::Unauthenticated
        );
        assert!(app.default_location_id().is_none());
    }

    #[test]
    fn default_location_prefers_user_preference() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.weather.default_location = Some("0_0".to_string());

        let app = App::new(config).unwrap();
        app.initialize();
        assert_eq!(app.default_location_id().as_deref(), Some("0_0"));

        // A signed-in user's preference wins over the configured fallback
        app.session()
            .login("demo@example.com", "Password123")
            .unwrap();
        app.session()
            .update_preferences(UserPreferences {
                default_location: Some("51.5074_-0.1278".to_string()),
                ..UserPreferences::default()
            })
            .unwrap();
        assert_eq!(
            app.default_location_id().as_deref(),
            Some("51.5074_-0.1278")
        );
    }
}
