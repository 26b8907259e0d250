//! Configuration for the partner map
//!
//! The configuration is hierarchical: the map widget and fly-to tuning, the
//! geocoder client, and the device location request each have their own
//! section. Every section has page defaults, so a JSON document only needs to
//! name the fields it overrides.

use crate::core::constants::*;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerMapConfig {
    pub map: MapViewConfig,
    pub search: SearchConfig,
    pub geolocation: GeolocationConfig,
}

impl PartnerMapConfig {
    /// Parses a (possibly partial) JSON configuration and validates it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Short timings so tests do not wait on page-scale delays
    pub fn for_testing() -> Self {
        Self {
            search: SearchConfig {
                debounce_ms: 20,
                request_timeout_ms: 2_000,
                ..SearchConfig::default()
            },
            geolocation: GeolocationConfig {
                timeout_ms: 500,
                ..GeolocationConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.map.validate()?;
        self.search.validate()
    }
}

/// Fly-to targets and widget constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapViewConfig {
    pub initial_zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_bounds_viscosity: f64,
    pub partner_zoom: f64,
    pub partner_fly_duration_ms: u64,
    pub search_result_zoom: f64,
    pub search_result_fly_duration_ms: u64,
    pub locate_zoom: f64,
    pub locate_fly_duration_ms: u64,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            initial_zoom: INITIAL_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            max_bounds_viscosity: MAX_BOUNDS_VISCOSITY,
            partner_zoom: PARTNER_ZOOM,
            partner_fly_duration_ms: PARTNER_FLY_DURATION_MS,
            search_result_zoom: SEARCH_RESULT_ZOOM,
            search_result_fly_duration_ms: SEARCH_RESULT_FLY_DURATION_MS,
            locate_zoom: LOCATE_ZOOM,
            locate_fly_duration_ms: LOCATE_FLY_DURATION_MS,
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

impl MapViewConfig {
    pub fn partner_fly_duration(&self) -> Duration {
        Duration::from_millis(self.partner_fly_duration_ms)
    }

    pub fn search_result_fly_duration(&self) -> Duration {
        Duration::from_millis(self.search_result_fly_duration_ms)
    }

    pub fn locate_fly_duration(&self) -> Duration {
        Duration::from_millis(self.locate_fly_duration_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(0.0..=1.0).contains(&self.max_bounds_viscosity) {
            return Err(MapError::Config(format!(
                "max_bounds_viscosity {} must be within [0, 1]",
                self.max_bounds_viscosity
            )));
        }
        Ok(())
    }
}

/// Geocoder client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub endpoint: String,
    pub result_limit: usize,
    pub debounce_ms: u64,
    pub request_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: NOMINATIM_ENDPOINT.to_string(),
            result_limit: SEARCH_RESULT_LIMIT,
            debounce_ms: SEARCH_DEBOUNCE_MS,
            request_timeout_ms: 10_000,
            user_agent: concat!("partnermap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=SEARCH_RESULT_LIMIT).contains(&self.result_limit) {
            return Err(MapError::Config(format!(
                "result_limit {} must be within 1..={}",
                self.result_limit, SEARCH_RESULT_LIMIT
            )));
        }
        if self.endpoint.trim().is_empty() {
            return Err(MapError::Config("search endpoint is empty".into()));
        }
        Ok(())
    }
}

/// Options passed to the device location request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,
    pub maximum_age_ms: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: GEOLOCATION_TIMEOUT_MS,
            maximum_age_ms: GEOLOCATION_MAXIMUM_AGE_MS,
        }
    }
}

impl GeolocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn maximum_age(&self) -> Duration {
        Duration::from_millis(self.maximum_age_ms)
    }
}
