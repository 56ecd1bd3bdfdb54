//! Device-location port.
//!
//! The actual geolocation mechanism (browser API, GeoClue, CoreLocation)
//! lives outside this crate; callers inject an implementation. The
//! orchestrator owns only the timeout and the error taxonomy.

use async_trait::async_trait;

use crate::types::{Coordinates, GeolocationError};

/// Source of the device's current position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Resolve the device's current coordinates.
    ///
    /// # Errors
    /// One of the four [`GeolocationError`] kinds; `Denied` and
    /// `Unavailable` are expected to come from the platform, `Timeout` is
    /// usually applied by the caller.
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A location source backed by fixed coordinates, e.g. a configured home
/// location. Reports `Unavailable` when none are set.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    coordinates: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            coordinates: Some(Coordinates { lat, lon }),
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocationSource for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.coordinates.ok_or(GeolocationError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[tokio::test]
    async fn configured_location_returns_coordinates() {
        let source = ConfiguredLocation::new(59.9139, 10.7522);
        let coords = source.current_position().await.unwrap();
        assert_eq!(coords.lat, 59.9139);
        assert_eq!(coords.lon, 10.7522);
    }

    #[tokio::test]
    async fn unset_configured_location_is_unavailable() {
        let source = ConfiguredLocation::unavailable();
        let err = source.current_position().await.unwrap_err();
        assert!(matches!(err, GeolocationError::Unavailable));
    }
}
