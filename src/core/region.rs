use crate::core::constants::{DE_CENTER, DE_COUNTRY_CODE, DE_NORTH_EAST, DE_SOUTH_WEST};
use crate::core::geo::{LatLng, LatLngBounds};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// The fixed geographic area the partner map is allowed to show.
///
/// Every coordinate that comes from outside the crate (geocoder hits, device
/// positions, catalog entries) goes through [`RegionBounds::clamp`] before it
/// reaches the viewport controller, so the visible center never leaves the region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    bounds: LatLngBounds,
    center: LatLng,
    country_code: String,
}

impl RegionBounds {
    /// Creates a region, rejecting inverted boxes and centers outside the box
    pub fn new(
        south_west: LatLng,
        north_east: LatLng,
        center: LatLng,
        country_code: impl Into<String>,
    ) -> Result<Self> {
        let bounds = LatLngBounds::new(south_west, north_east);
        if !bounds.is_valid() {
            return Err(MapError::InvalidRegion(format!(
                "south-west {} must lie south-west of north-east {}",
                south_west, north_east
            )));
        }
        if !bounds.contains(&center) {
            return Err(MapError::InvalidRegion(format!(
                "center {} lies outside the region",
                center
            )));
        }

        Ok(Self {
            bounds,
            center,
            country_code: country_code.into(),
        })
    }

    /// Germany, the region the reward partner page serves
    pub fn germany() -> Self {
        Self {
            bounds: LatLngBounds::from_coords(
                DE_SOUTH_WEST.0,
                DE_SOUTH_WEST.1,
                DE_NORTH_EAST.0,
                DE_NORTH_EAST.1,
            ),
            center: LatLng::new(DE_CENTER.0, DE_CENTER.1),
            country_code: DE_COUNTRY_CODE.to_string(),
        }
    }

    /// Returns `coord` if it is inside, else the point obtained by clamping
    /// latitude and longitude independently to the region edges. A NaN axis
    /// takes the region center's value.
    pub fn clamp(&self, coord: LatLng) -> LatLng {
        let coord = LatLng::new(
            if coord.lat.is_nan() { self.center.lat } else { coord.lat },
            if coord.lng.is_nan() { self.center.lng } else { coord.lng },
        );
        self.bounds.clamp(&coord)
    }

    pub fn contains(&self, coord: &LatLng) -> bool {
        self.bounds.contains(coord)
    }

    pub fn bounds(&self) -> &LatLngBounds {
        &self.bounds
    }

    pub fn south_west(&self) -> LatLng {
        self.bounds.south_west
    }

    pub fn north_east(&self) -> LatLng {
        self.bounds.north_east
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self::germany()
    }
}
