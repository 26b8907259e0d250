//! The single owner of the live map widget
//!
//! Every viewport change (partner fly-to, search result, device position, gesture
//! correction) goes through [`MapViewportController`]. The widget is created once
//! per page mount; repeated `mount` calls hand back the existing handle and
//! operations addressed to a handle that is not (or no longer) mounted are
//! silently dropped.

use crate::catalog::StoreLocation;
use crate::core::config::MapViewConfig;
use crate::core::geo::LatLng;
use crate::core::region::RegionBounds;
use crate::events::{EventManager, MapEvent};
use crate::map::markers::{MarkerDiff, MarkerLayer};
use crate::map::widget::{MapContainer, MapWidget, MapWidgetFactory, MountOptions};
use crate::Result;
use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Opaque reference to the mounted widget; compare with `==`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapViewportHandle(u64);

impl std::fmt::Display for MapViewportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "map#{}", self.0)
    }
}

struct MountedMap {
    handle: MapViewportHandle,
    widget: Box<dyn MapWidget>,
    markers: MarkerLayer,
    center: LatLng,
    zoom: f64,
}

struct ControllerState {
    mounted: Option<MountedMap>,
    next_handle: u64,
    events: EventManager,
}

impl ControllerState {
    fn mounted_as(&mut self, handle: MapViewportHandle) -> Option<&mut MountedMap> {
        self.mounted.as_mut().filter(|m| m.handle == handle)
    }
}

pub struct MapViewportController {
    factory: Box<dyn MapWidgetFactory>,
    region: RegionBounds,
    options: MountOptions,
    state: Mutex<ControllerState>,
}

impl MapViewportController {
    pub fn new(factory: Box<dyn MapWidgetFactory>, region: RegionBounds, config: &MapViewConfig) -> Self {
        let options = MountOptions::for_region(&region, config);
        Self {
            factory,
            region,
            options,
            state: Mutex::new(ControllerState {
                mounted: None,
                next_handle: 1,
                events: EventManager::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the widget on first call; later calls return the same handle.
    ///
    /// A factory failure leaves the controller unmounted so the caller can retry.
    pub fn mount(&self, container: &MapContainer) -> Result<MapViewportHandle> {
        let mut state = self.lock();
        if let Some(mounted) = &state.mounted {
            log::debug!("{} already mounted, reusing it", mounted.handle);
            return Ok(mounted.handle);
        }

        let widget = self.factory.create(container, &self.options)?;
        let handle = MapViewportHandle(state.next_handle);
        state.next_handle += 1;
        state.mounted = Some(MountedMap {
            handle,
            widget,
            markers: MarkerLayer::new(),
            center: self.options.center,
            zoom: self.options.zoom,
        });
        state.events.emit(MapEvent::Mounted { handle });
        log::info!("mounted {} into container {:?}", handle, container.id);

        Ok(handle)
    }

    /// The live handle, if a widget is mounted
    pub fn handle(&self) -> Option<MapViewportHandle> {
        self.lock().mounted.as_ref().map(|m| m.handle)
    }

    pub fn is_mounted(&self, handle: MapViewportHandle) -> bool {
        self.lock().mounted.as_ref().is_some_and(|m| m.handle == handle)
    }

    /// Animates the view to `center`. Returns whether the fly-to reached the widget;
    /// an unknown or unmounted handle is a no-op.
    pub fn fly_to(&self, handle: MapViewportHandle, center: LatLng, zoom: f64, duration: Duration) -> bool {
        let center = self.region.clamp(center);
        let zoom = self.options.clamp_zoom(zoom);

        let mut state = self.lock();
        let Some(mounted) = state.mounted_as(handle) else {
            log::debug!("fly-to {} dropped: {} is not mounted", center, handle);
            return false;
        };

        if let Err(e) = mounted.widget.fly_to(center, zoom, duration) {
            log::warn!("widget rejected fly-to {}: {}", center, e);
            return false;
        }
        mounted.center = center;
        mounted.zoom = zoom;
        state.events.emit(MapEvent::FlyTo {
            center,
            zoom,
            duration,
        });
        true
    }

    /// [`fly_to`](Self::fly_to) on whatever is currently mounted
    pub fn fly_to_active(&self, center: LatLng, zoom: f64, duration: Duration) -> bool {
        match self.handle() {
            Some(handle) => self.fly_to(handle, center, zoom, duration),
            None => {
                log::debug!("fly-to {} dropped: nothing mounted", center);
                false
            }
        }
    }

    /// Reconciles the marker set with `stores`. `None` when `handle` is not mounted.
    pub fn render_markers(&self, handle: MapViewportHandle, stores: &[StoreLocation]) -> Result<Option<MarkerDiff>> {
        let mut state = self.lock();
        let Some(mounted) = state.mounted_as(handle) else {
            return Ok(None);
        };

        let diff = mounted.markers.reconcile(mounted.widget.as_mut(), stores)?;
        if !diff.is_empty() {
            state.events.emit(MapEvent::MarkersChanged {
                added: diff.added,
                removed: diff.removed,
            });
        }
        Ok(Some(diff))
    }

    /// Ids of the markers currently on the widget
    pub fn marker_ids(&self) -> Vec<u32> {
        self.lock()
            .mounted
            .as_ref()
            .map(|m| m.markers.ids())
            .unwrap_or_default()
    }

    /// Draws the device position overlay at the (region-clamped) `center`
    pub fn show_user_location(&self, handle: MapViewportHandle, center: LatLng, accuracy_radius_px: Option<f64>) -> bool {
        let center = self.region.clamp(center);

        let mut state = self.lock();
        let Some(mounted) = state.mounted_as(handle) else {
            return false;
        };

        if let Err(e) = mounted.widget.show_user_location(center, accuracy_radius_px) {
            log::warn!("widget rejected user location {}: {}", center, e);
            return false;
        }
        state.events.emit(MapEvent::UserLocationShown {
            center,
            accuracy_radius_px,
        });
        true
    }

    /// Records a view change the user made with a gesture. The view is clamped
    /// to the region and zoom limits; if the widget let it escape, the widget is
    /// snapped back. Returns the accepted center.
    pub fn report_view(&self, handle: MapViewportHandle, center: LatLng, zoom: f64) -> Option<LatLng> {
        let accepted = self.region.clamp(center);
        let accepted_zoom = self.options.clamp_zoom(zoom);

        let mut state = self.lock();
        let mounted = state.mounted_as(handle)?;

        if accepted != center || accepted_zoom != zoom {
            log::debug!("gesture view {} escaped the region, snapping to {}", center, accepted);
            if let Err(e) = mounted.widget.set_view(accepted, accepted_zoom) {
                log::warn!("widget rejected snap-back to {}: {}", accepted, e);
            }
        }
        mounted.center = accepted;
        mounted.zoom = accepted_zoom;
        state.events.emit(MapEvent::ViewChanged {
            center: accepted,
            zoom: accepted_zoom,
        });
        Some(accepted)
    }

    /// Last known center and zoom of the mounted widget
    pub fn current_view(&self) -> Option<(LatLng, f64)> {
        self.lock().mounted.as_ref().map(|m| (m.center, m.zoom))
    }

    /// Tears the widget down. Afterwards every operation on `handle` is a no-op.
    pub fn unmount(&self, handle: MapViewportHandle) -> bool {
        let mut state = self.lock();
        if state.mounted.as_ref().map(|m| m.handle) != Some(handle) {
            log::debug!("unmount of {} ignored: not mounted", handle);
            return false;
        }

        if let Some(mut mounted) = state.mounted.take() {
            mounted.widget.destroy();
        }
        state.events.emit(MapEvent::Unmounted { handle });
        log::info!("unmounted {}", handle);
        true
    }

    pub fn region(&self) -> &RegionBounds {
        &self.region
    }

    pub fn mount_options(&self) -> &MountOptions {
        &self.options
    }

    pub fn on<F>(&self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.lock().events.on(event_type, callback);
    }

    pub fn subscribe(&self) -> Receiver<MapEvent> {
        self.lock().events.subscribe()
    }

    /// Drains the event queue and runs the listeners registered with
    /// [`on`](Self::on). Listeners run after the controller is unlocked and may
    /// call back into it.
    pub fn process_events(&self) -> Vec<MapEvent> {
        let pending = self.lock().events.drain();
        pending.dispatch()
    }
}
