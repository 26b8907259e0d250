//! # partnermap
//!
//! The interactive partner map behind the "find a reward partner" page.
//!
//! One long-lived map viewport is bound to three independent asynchronous
//! inputs (free-text place search, device geolocation and partner filter
//! selection) while everything that moves the map is kept inside one fixed
//! service region. Rendering is delegated to a [`MapWidget`](map::MapWidget);
//! the crate owns the state, the ordering and the invariants.

pub mod catalog;
pub mod core;
pub mod events;
pub mod geolocation;
pub mod map;
pub mod prelude;
pub mod runtime;
pub mod search;
pub mod view;

pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::PartnerMapConfig,
    geo::{LatLng, LatLngBounds, Point},
    region::RegionBounds,
    viewport::Viewport,
};

pub use catalog::{FilterSelection, PartnerCatalog, PartnerRecord, StoreLocation};

pub use events::{EventManager, MapEvent};

pub use geolocation::{GeolocationService, LocationStatus, PositionProvider, UserLocationState};

pub use map::{HeadlessMapFactory, MapContainer, MapViewportController, MapViewportHandle, MapWidget};

pub use search::{GeoSearchClient, Geocoder, NominatimGeocoder, SearchResult, SearchState, SearchStatus};

pub use view::{PartnerMapView, PartnerMapViewBuilder};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Search failed ({0})")]
    HttpStatus(u16),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Widget error: {0}")]
    Widget(String),

    #[error("Config error: {0}")]
    Config(String),
}
