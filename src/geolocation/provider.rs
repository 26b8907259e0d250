//! The device location collaborator

use crate::core::config::GeolocationConfig;
use crate::core::geo::LatLng;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Answer of the permission query capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionState {
    Granted,
    Prompt,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Accept a cached fix up to this old
    pub maximum_age: Duration,
}

impl From<&GeolocationConfig> for PositionOptions {
    fn from(config: &GeolocationConfig) -> Self {
        Self {
            enable_high_accuracy: config.enable_high_accuracy,
            timeout: config.timeout(),
            maximum_age: config.maximum_age(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coordinate: LatLng,
    pub accuracy_meters: Option<f64>,
}

impl Position {
    pub fn new(lat: f64, lng: f64, accuracy_meters: Option<f64>) -> Self {
        Self {
            coordinate: LatLng::new(lat, lng),
            accuracy_meters,
        }
    }
}

/// Error codes of the device location API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("timed out waiting for a position")]
    Timeout,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("geolocation is not supported")]
    Unsupported,
}

#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// `None` when the host cannot answer permission queries
    async fn permission_state(&self) -> Option<PermissionState> {
        None
    }

    async fn current_position(&self, options: &PositionOptions) -> Result<Position, PositionError>;
}

/// Always answers with the same fix (or error); useful for kiosks with a known
/// location and for the demo binary's `--at` flag.
#[derive(Debug, Clone)]
pub struct FixedPositionProvider {
    answer: Result<Position, PositionError>,
    permission: Option<PermissionState>,
}

impl FixedPositionProvider {
    pub fn new(position: Position) -> Self {
        Self {
            answer: Ok(position),
            permission: Some(PermissionState::Granted),
        }
    }

    pub fn failing(error: PositionError) -> Self {
        let permission = match error {
            PositionError::PermissionDenied => Some(PermissionState::Denied),
            _ => None,
        };
        Self {
            answer: Err(error),
            permission,
        }
    }

    pub fn with_permission(mut self, permission: Option<PermissionState>) -> Self {
        self.permission = permission;
        self
    }
}

#[async_trait]
impl PositionProvider for FixedPositionProvider {
    async fn permission_state(&self) -> Option<PermissionState> {
        self.permission
    }

    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, PositionError> {
        self.answer.clone()
    }
}
