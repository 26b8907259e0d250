//! The seam between the controller and whatever actually draws the map
//! (a Leaflet instance behind wasm-bindgen, a native widget, or the headless one).

use crate::core::config::MapViewConfig;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::core::region::RegionBounds;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The element the widget is mounted into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapContainer {
    pub id: String,
    pub size: Point,
}

impl MapContainer {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            size: Point::new(width, height),
        }
    }
}

/// Stable widget configuration; set once at mount and never changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MountOptions {
    pub center: LatLng,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Hard pan/zoom constraint applied by the widget itself
    pub max_bounds: LatLngBounds,
    pub max_bounds_viscosity: f64,
    pub tile_url: String,
    pub attribution: String,
}

impl MountOptions {
    pub fn for_region(region: &RegionBounds, config: &MapViewConfig) -> Self {
        Self {
            center: region.center(),
            zoom: config.initial_zoom.max(config.min_zoom).min(config.max_zoom),
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            max_bounds: *region.bounds(),
            max_bounds_viscosity: config.max_bounds_viscosity,
            tile_url: config.tile_url.clone(),
            attribution: config.attribution.clone(),
        }
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

/// A store marker as handed to the widget, keyed by store id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub id: u32,
    pub position: LatLng,
    pub popup: Option<String>,
}

/// Operations the controller performs on a live widget
pub trait MapWidget: Send {
    /// Animated recentre/zoom
    fn fly_to(&mut self, center: LatLng, zoom: f64, duration: Duration) -> Result<()>;

    /// Immediate recentre, used to snap the view back inside the region
    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()>;

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()>;

    fn remove_marker(&mut self, id: u32) -> Result<()>;

    /// Blue dot plus optional accuracy ring
    fn show_user_location(&mut self, center: LatLng, accuracy_radius_px: Option<f64>) -> Result<()>;

    /// Release everything the widget holds
    fn destroy(&mut self);
}

/// Creates widgets; called at most once per page mount
pub trait MapWidgetFactory: Send + Sync {
    fn create(&self, container: &MapContainer, options: &MountOptions) -> Result<Box<dyn MapWidget>>;
}
