use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

const EARTH_RADIUS: f64 = 6378137.0;
const EARTH_CIRCUMFERENCE: f64 = 2.0 * std::f64::consts::PI * EARTH_RADIUS;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    /// Maximum bounds for the map center
    max_bounds: Option<LatLngBounds>,
    /// Viscosity for bounds enforcement (0.0 = loose, 1.0 = solid)
    max_bounds_viscosity: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
            max_bounds: None,
            max_bounds_viscosity: 0.0,
        }
    }

    /// Sets the maximum bounds for the map and re-clamps the current center
    pub fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>, viscosity: Option<f64>) {
        self.max_bounds = bounds;
        self.max_bounds_viscosity = viscosity.unwrap_or(0.0).clamp(0.0, 1.0);
        self.center = self.clamp_center(self.center);
    }

    /// Sets the center of the viewport with bounds checking
    pub fn set_center(&mut self, center: LatLng) {
        self.center = self.clamp_center(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets center and zoom in one step
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.set_zoom(zoom);
        self.set_center(center);
    }

    /// Sets the zoom limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.zoom = self.zoom.clamp(min_zoom, max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        2_f64.powf(self.zoom)
    }

    /// Projects a LatLng to world pixel coordinates (Web Mercator, EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let mercator = lat_lng.to_mercator();
        let half = EARTH_CIRCUMFERENCE / 2.0;
        let pixel_x = (mercator.x + half) / EARTH_CIRCUMFERENCE * scale;
        let pixel_y = (half - mercator.y) / EARTH_CIRCUMFERENCE * scale;

        Point::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let scale = TILE_SIZE as f64 * 2_f64.powf(z);

        let half = EARTH_CIRCUMFERENCE / 2.0;
        let x = (pixel.x / scale) * EARTH_CIRCUMFERENCE - half;
        let y = half - (pixel.y / scale) * EARTH_CIRCUMFERENCE;

        LatLng::from_mercator(Point::new(x, y))
    }

    /// Pans the viewport by the given pixel offset and returns the delta that was applied.
    ///
    /// With solid bounds (viscosity 1.0) the center stops at the region edge.
    pub fn pan(&mut self, delta: Point) -> Point {
        let before = self.project(&self.center, None);
        let target = self.unproject(&before.add(&delta), None);

        let next = match &self.max_bounds {
            Some(bounds) if self.max_bounds_viscosity > 0.0 => {
                let clamped = bounds.clamp(&target);
                let v = self.max_bounds_viscosity;
                LatLng::new(
                    target.lat - (target.lat - clamped.lat) * v,
                    target.lng - (target.lng - clamped.lng) * v,
                )
            }
            _ => target,
        };
        self.set_center(next);

        self.project(&self.center, None).subtract(&before)
    }

    /// Gets the resolution in meters per pixel at the current zoom level
    pub fn resolution(&self) -> f64 {
        EARTH_CIRCUMFERENCE / (TILE_SIZE as f64 * self.scale())
    }

    /// Clamps center to world bounds or max_bounds if set
    fn clamp_center(&self, center: LatLng) -> LatLng {
        if let Some(bounds) = &self.max_bounds {
            bounds.clamp(&center)
        } else {
            LatLng::new(LatLng::clamp_lat(center.lat), center.lng.clamp(-180.0, 180.0))
        }
    }

    /// Get the maximum bounds for the map if set
    pub fn max_bounds(&self) -> Option<&LatLngBounds> {
        self.max_bounds.as_ref()
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn germany() -> LatLngBounds {
        LatLngBounds::from_coords(47.2701, 5.8663, 55.0581, 15.0419)
    }

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(51.1657, 10.4515), 6.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, 6.0);
        assert_eq!(viewport.center.lat, 51.1657);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(5.0, 17.0);

        viewport.set_zoom(1.0);
        assert_eq!(viewport.zoom, 5.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 17.0);
    }

    #[test]
    fn test_set_center_respects_max_bounds() {
        let mut viewport = Viewport::new(LatLng::new(51.0, 10.0), 6.0, Point::new(800.0, 600.0));
        viewport.set_max_bounds(Some(germany()), Some(1.0));

        viewport.set_center(LatLng::new(60.0, 13.0));
        assert_eq!(viewport.center, LatLng::new(55.0581, 13.0));
    }

    #[test]
    fn test_pan_stops_at_solid_bounds() {
        let mut viewport = Viewport::new(LatLng::new(54.9, 10.0), 8.0, Point::new(800.0, 600.0));
        viewport.set_max_bounds(Some(germany()), Some(1.0));

        // Drag far to the north
        for _ in 0..20 {
            viewport.pan(Point::new(0.0, -500.0));
        }
        assert!(germany().contains(&viewport.center));
        assert!((viewport.center.lat - 55.0581).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut viewport = Viewport::new(LatLng::new(51.0, 10.0), 6.0, Point::new(512.0, 512.0));

        let start = viewport.center;
        let applied = viewport.pan(Point::new(10.0, 10.0));

        assert_ne!(viewport.center, start);
        assert!((applied.x - 10.0).abs() < 1e-6);
    }
}
