//! Core constants taken from the reward partners page and common web-map conventions.
//! Keeping them in a single place makes it easier to tweak the page-wide magic numbers.

/// South-west corner of the supported region (Germany), `(lat, lng)`.
pub const DE_SOUTH_WEST: (f64, f64) = (47.2701, 5.8663);

/// North-east corner of the supported region (Germany), `(lat, lng)`.
pub const DE_NORTH_EAST: (f64, f64) = (55.0581, 15.0419);

/// Geographic center the map opens on.
pub const DE_CENTER: (f64, f64) = (51.1657, 10.4515);

/// ISO 3166-1 alpha-2 code the geocoder is restricted to.
pub const DE_COUNTRY_CODE: &str = "de";

/// Zoom the map mounts at (whole country visible).
pub const INITIAL_ZOOM: f64 = 6.0;

/// Widget zoom limits.
pub const MIN_ZOOM: f64 = 5.0;
pub const MAX_ZOOM: f64 = 17.0;

/// Solid bounds: pan gestures cannot drag past the region edge at all.
pub const MAX_BOUNDS_VISCOSITY: f64 = 1.0;

/// "Show on map" for a partner.
pub const PARTNER_ZOOM: f64 = 12.0;
pub const PARTNER_FLY_DURATION_MS: u64 = 1200;

/// Selecting a geocoder result.
pub const SEARCH_RESULT_ZOOM: f64 = 12.0;
pub const SEARCH_RESULT_FLY_DURATION_MS: u64 = 1000;

/// Centering on the device position ("local" zoom).
pub const LOCATE_ZOOM: f64 = 13.0;
pub const LOCATE_FLY_DURATION_MS: u64 = 1000;

/// Quiet period before a typed query hits the geocoder.
pub const SEARCH_DEBOUNCE_MS: u64 = 350;

/// Maximum number of geocoder results shown.
pub const SEARCH_RESULT_LIMIT: usize = 5;

/// Device location request timeout and cached-position tolerance.
pub const GEOLOCATION_TIMEOUT_MS: u64 = 10_000;
pub const GEOLOCATION_MAXIMUM_AGE_MS: u64 = 30_000;

/// Accuracy ring radius limits in pixels (radius = accuracy / 3).
pub const ACCURACY_RING_MIN_PX: f64 = 20.0;
pub const ACCURACY_RING_MAX_PX: f64 = 120.0;

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org";
