//! Prelude module for common partnermap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use partnermap::prelude::*;`

pub use crate::core::{
    config::{GeolocationConfig, MapViewConfig, PartnerMapConfig, SearchConfig},
    geo::{LatLng, LatLngBounds, Point},
    region::RegionBounds,
    viewport::Viewport,
};

pub use crate::catalog::{FilterSelection, FilteredView, PartnerCatalog, PartnerRecord, StoreLocation};

pub use crate::events::{EventManager, MapEvent};

pub use crate::geolocation::{
    FixedPositionProvider, GeolocationService, LocationStatus, PermissionState, Position,
    PositionError, PositionOptions, PositionProvider, UserLocationState,
};

pub use crate::map::{
    HeadlessMapFactory, MapContainer, MapViewportController, MapViewportHandle, MapWidget,
    MapWidgetFactory, MarkerSpec, MountOptions,
};

pub use crate::runtime::{runtime, spawn, AsyncHandle, AsyncSpawner};

pub use crate::search::{
    GeoSearchClient, GeocodeHit, GeocodeQuery, Geocoder, NominatimGeocoder, SearchResult,
    SearchState, SearchStatus,
};

pub use crate::view::{PartnerMapView, PartnerMapViewBuilder};

pub use crate::{MapError, Result};

// Common std and fast hash collections
pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
pub use std::sync::Arc;
pub use std::time::Duration;
