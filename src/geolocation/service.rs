use crate::core::config::{GeolocationConfig, MapViewConfig};
use crate::core::constants::{ACCURACY_RING_MAX_PX, ACCURACY_RING_MIN_PX};
use crate::core::geo::LatLng;
use crate::geolocation::provider::{PermissionState, Position, PositionError, PositionOptions, PositionProvider};
use crate::map::controller::MapViewportController;
use crate::prelude::Arc;
use crate::runtime::async_utils::with_timeout;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const PERMISSION_BLOCKED_MESSAGE: &str =
    "Location permission is blocked. Please enable location access in your browser settings.";
pub const LOCATE_FAILED_MESSAGE: &str =
    "Unable to fetch your location. Please allow permission and try again.";
pub const UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported on this device.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocationStatus {
    #[default]
    Idle,
    Locating,
    Granted,
    /// Terminal for the session until the user changes browser settings
    Denied,
    /// Transient; the user may retry
    Error,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserLocationState {
    /// Region-clamped device position
    pub coordinate: Option<LatLng>,
    pub accuracy_meters: Option<f64>,
    pub status: LocationStatus,
    pub message: Option<String>,
}

impl UserLocationState {
    pub fn accuracy_ring_radius_px(&self) -> Option<f64> {
        self.accuracy_meters.map(accuracy_ring_radius_px)
    }
}

/// Pixel radius of the ring drawn around the user's dot
pub fn accuracy_ring_radius_px(accuracy_meters: f64) -> f64 {
    (accuracy_meters / 3.0).clamp(ACCURACY_RING_MIN_PX, ACCURACY_RING_MAX_PX)
}

/// "Locate me" backend
pub struct GeolocationService {
    provider: Option<Arc<dyn PositionProvider>>,
    controller: Arc<MapViewportController>,
    options: PositionOptions,
    locate_zoom: f64,
    locate_fly_duration: Duration,
    /// Bumped by `reset`; a locate started under an older value is discarded
    generation: AtomicU64,
    state: Mutex<UserLocationState>,
}

impl GeolocationService {
    /// `provider` is `None` on hosts without a location API
    pub fn new(
        provider: Option<Arc<dyn PositionProvider>>,
        controller: Arc<MapViewportController>,
        config: &GeolocationConfig,
        map_config: &MapViewConfig,
    ) -> Self {
        Self {
            provider,
            controller,
            options: PositionOptions::from(config),
            locate_zoom: map_config.locate_zoom,
            locate_fly_duration: map_config.locate_fly_duration(),
            generation: AtomicU64::new(0),
            state: Mutex::new(UserLocationState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UserLocationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> UserLocationState {
        self.lock().clone()
    }

    pub fn is_locating(&self) -> bool {
        self.lock().status == LocationStatus::Locating
    }

    /// Forgets the last fix, as on a fresh page. A locate still in flight
    /// will neither write its answer nor move the map.
    pub fn reset(&self) {
        let mut state = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = UserLocationState::default();
    }

    /// Asks the device for its position and, on success, recentres the map on
    /// it. A call made while another is still locating returns the current
    /// state without doing anything.
    pub async fn locate(&self) -> UserLocationState {
        let generation = {
            let mut state = self.lock();
            if state.status == LocationStatus::Locating {
                log::debug!("locate ignored: already locating");
                return state.clone();
            }
            state.status = LocationStatus::Locating;
            state.message = None;
            self.generation.load(Ordering::SeqCst)
        };
        let started_on = self.controller.handle();

        let outcome = self.resolve().await;

        let mut state = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("discarding locate result: the page was reset meanwhile");
            return state.clone();
        }
        match outcome {
            Ok(position) => {
                let clamped = self.controller.region().clamp(position.coordinate);
                let accuracy = position
                    .accuracy_meters
                    .filter(|a| a.is_finite() && *a >= 0.0);
                state.coordinate = Some(clamped);
                state.accuracy_meters = accuracy;
                state.status = LocationStatus::Granted;
                state.message = None;

                // Mounted during the request counts; a remount after reset never gets here
                if let Some(handle) = started_on.or_else(|| self.controller.handle()) {
                    self.controller
                        .fly_to(handle, clamped, self.locate_zoom, self.locate_fly_duration);
                    self.controller
                        .show_user_location(handle, clamped, accuracy.map(accuracy_ring_radius_px));
                }
            }
            Err((status, message)) => {
                state.status = status;
                state.message = Some(message.to_string());
            }
        }
        state.clone()
    }

    async fn resolve(&self) -> std::result::Result<Position, (LocationStatus, &'static str)> {
        let Some(provider) = &self.provider else {
            log::warn!("locate failed: {}", PositionError::Unsupported);
            return Err((LocationStatus::Error, UNSUPPORTED_MESSAGE));
        };

        if provider.permission_state().await == Some(PermissionState::Denied) {
            log::debug!("locate skipped: permission already denied");
            return Err((LocationStatus::Denied, PERMISSION_BLOCKED_MESSAGE));
        }

        let answer = with_timeout(self.options.timeout, provider.current_position(&self.options))
            .await
            .unwrap_or(Err(PositionError::Timeout))
            .and_then(|position| {
                if position.coordinate.lat.is_finite() && position.coordinate.lng.is_finite() {
                    Ok(position)
                } else {
                    log::debug!("device reported a non-finite position {:?}", position.coordinate);
                    Err(PositionError::PositionUnavailable)
                }
            });

        answer.map_err(|e| {
            log::warn!("geolocation error: {}", e);
            match e {
                PositionError::PermissionDenied => (LocationStatus::Denied, LOCATE_FAILED_MESSAGE),
                PositionError::Unsupported => (LocationStatus::Error, UNSUPPORTED_MESSAGE),
                PositionError::Timeout | PositionError::PositionUnavailable => {
                    (LocationStatus::Error, LOCATE_FAILED_MESSAGE)
                }
            }
        })
    }
}
