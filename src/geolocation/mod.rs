//! Device position, permission-aware and region-clamped

pub mod provider;
pub mod service;

pub use provider::{
    FixedPositionProvider, PermissionState, Position, PositionError, PositionOptions, PositionProvider,
};
pub use service::{accuracy_ring_radius_px, GeolocationService, LocationStatus, UserLocationState};
