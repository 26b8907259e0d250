use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Parses the string pair geocoders put on the wire (`"52.52"`, `"13.40"`)
    pub fn parse(lat: &str, lng: &str) -> Option<Self> {
        let lat = lat.trim().parse::<f64>().ok()?;
        let lng = lng.trim().parse::<f64>().ok()?;
        let coord = Self::new(lat, lng);
        coord.is_valid().then_some(coord)
    }

    /// Validates that the coordinates are finite and within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat >= -90.0
            && self.lat <= 90.0
            && self.lng >= -180.0
            && self.lng <= 180.0
    }

    /// Clamps latitude to the range Web Mercator can project
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + Self::clamp_lat(self.lat).to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Checks if the bounds contain a point (edges included)
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if the bounds are well formed (south-west is not north or east of north-east)
    pub fn is_valid(&self) -> bool {
        self.south_west.is_valid()
            && self.north_east.is_valid()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }

    /// Clamps latitude and longitude independently into the box.
    ///
    /// This is an axis-aligned clamp, not a geodesic nearest-point projection.
    /// A NaN axis lands on the middle of the box on that axis, so the result is
    /// always inside.
    pub fn clamp(&self, point: &LatLng) -> LatLng {
        let center = self.center();
        let axis = |value: f64, min: f64, max: f64, fallback: f64| {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(min, max)
            }
        };
        LatLng::new(
            axis(point.lat, self.south_west.lat, self.north_east.lat, center.lat),
            axis(point.lng, self.south_west.lng, self.north_east.lng, center.lng),
        )
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(52.52, 13.405);
        assert_eq!(coord.lat, 52.52);
        assert_eq!(coord.lng, 13.405);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_lat_lng_parse() {
        assert_eq!(
            LatLng::parse("52.5200", " 13.4050"),
            Some(LatLng::new(52.52, 13.405))
        );
        assert_eq!(LatLng::parse("north", "13.4"), None);
        assert_eq!(LatLng::parse("91.0", "13.4"), None);
        assert_eq!(LatLng::parse("NaN", "13.4"), None);
    }

    #[test]
    fn test_mercator_round_trip() {
        let hamburg = LatLng::new(53.5511, 9.9937);
        let back = LatLng::from_mercator(hamburg.to_mercator());
        assert!((back.lat - hamburg.lat).abs() < 1e-9);
        assert!((back.lng - hamburg.lng).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(47.0, 5.0, 55.0, 15.0);
        assert!(bounds.contains(&LatLng::new(50.0, 10.0)));
        assert!(bounds.contains(&LatLng::new(55.0, 15.0)));
        assert!(!bounds.contains(&LatLng::new(56.0, 10.0)));
    }

    #[test]
    fn test_bounds_clamp_is_per_axis() {
        let bounds = LatLngBounds::from_coords(47.0, 5.0, 55.0, 15.0);
        // Outside the north-east corner: each axis snaps to its own edge
        assert_eq!(
            bounds.clamp(&LatLng::new(60.0, 20.0)),
            LatLng::new(55.0, 15.0)
        );
        assert_eq!(
            bounds.clamp(&LatLng::new(40.0, 10.0)),
            LatLng::new(47.0, 10.0)
        );
    }

    #[test]
    fn test_bounds_clamp_non_finite() {
        let bounds = LatLngBounds::from_coords(47.0, 5.0, 55.0, 15.0);

        assert_eq!(bounds.clamp(&LatLng::new(f64::NAN, 13.0)), LatLng::new(51.0, 13.0));
        assert_eq!(
            bounds.clamp(&LatLng::new(f64::NAN, f64::NAN)),
            LatLng::new(51.0, 10.0)
        );
        // Infinities are ordered, so they snap to the nearest edge
        assert_eq!(
            bounds.clamp(&LatLng::new(f64::NEG_INFINITY, f64::INFINITY)),
            LatLng::new(47.0, 15.0)
        );
    }

    #[test]
    fn test_bounds_validity() {
        assert!(LatLngBounds::from_coords(47.0, 5.0, 55.0, 15.0).is_valid());
        assert!(!LatLngBounds::from_coords(55.0, 5.0, 47.0, 15.0).is_valid());
    }
}
