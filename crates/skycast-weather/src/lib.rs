//! Weather retrieval for SkyCast
//!
//! Location search with debounced autocomplete, an upstream weather client,
//! normalization of the 3-hour forecast feed into per-day rows, and the
//! retrieval orchestrator that ties them together.

pub mod api;
pub mod format;
pub mod geocode;
pub mod location;
pub mod normalize;
pub mod provider;
pub mod search;
pub mod types;

pub use api::WeatherApiClient;
pub use geocode::GeoClient;
pub use location::{ConfiguredLocation, LocationSource};
pub use normalize::{normalize, LocationHint};
pub use provider::{FetchState, WeatherRequest, WeatherService};
pub use search::{Debouncer, SearchController};
pub use types::*;
