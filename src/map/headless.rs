//! A map widget that draws nothing.
//!
//! Each widget keeps a [`Viewport`] configured from the mount options, so the
//! region bounds and zoom limits apply to it exactly as they would to a real
//! widget, and records what the controller asked of it. The factory is cheap to
//! clone; every clone observes the same state.

use crate::core::geo::{LatLng, Point};
use crate::core::viewport::Viewport;
use crate::map::widget::{MapContainer, MapWidget, MapWidgetFactory, MarkerSpec, MountOptions};
use crate::prelude::Arc;
use crate::{MapError, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// One fly-to as the widget received it
#[derive(Debug, Clone, PartialEq)]
pub struct FlyToRecord {
    pub center: LatLng,
    pub zoom: f64,
    pub duration: Duration,
}

#[derive(Debug, Default)]
struct HeadlessState {
    widgets_created: usize,
    widgets_destroyed: usize,
    fail_next_mount: bool,
    live: Option<u64>,
    viewport: Option<Viewport>,
    fly_tos: Vec<FlyToRecord>,
    markers: BTreeMap<u32, MarkerSpec>,
    marker_adds: usize,
    user_location: Option<(LatLng, Option<f64>)>,
}

#[derive(Clone, Default)]
pub struct HeadlessMapFactory {
    state: Arc<Mutex<HeadlessState>>,
}

fn lock(state: &Mutex<HeadlessState>) -> MutexGuard<'_, HeadlessState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HeadlessMapFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `create` fail, as a widget whose container is not in the DOM yet would
    pub fn fail_next_mount(&self) {
        lock(&self.state).fail_next_mount = true;
    }

    pub fn widgets_created(&self) -> usize {
        lock(&self.state).widgets_created
    }

    pub fn widgets_destroyed(&self) -> usize {
        lock(&self.state).widgets_destroyed
    }

    /// View of the live widget
    pub fn view(&self) -> Option<Viewport> {
        lock(&self.state).viewport.clone()
    }

    pub fn fly_tos(&self) -> Vec<FlyToRecord> {
        lock(&self.state).fly_tos.clone()
    }

    pub fn marker_ids(&self) -> Vec<u32> {
        lock(&self.state).markers.keys().copied().collect()
    }

    pub fn marker(&self, id: u32) -> Option<MarkerSpec> {
        lock(&self.state).markers.get(&id).cloned()
    }

    /// Total `add_marker` calls across the factory's lifetime
    pub fn marker_adds(&self) -> usize {
        lock(&self.state).marker_adds
    }

    pub fn user_location(&self) -> Option<(LatLng, Option<f64>)> {
        lock(&self.state).user_location
    }

    /// Simulates a user drag on the live widget; returns the resulting view.
    /// The widget's own max-bounds stop the drag at the region edge.
    pub fn drag(&self, delta: Point) -> Option<(LatLng, f64)> {
        let mut state = lock(&self.state);
        let viewport = state.viewport.as_mut()?;
        viewport.pan(delta);
        Some((viewport.center, viewport.zoom))
    }
}

impl MapWidgetFactory for HeadlessMapFactory {
    fn create(&self, container: &MapContainer, options: &MountOptions) -> Result<Box<dyn MapWidget>> {
        let mut state = lock(&self.state);
        if std::mem::take(&mut state.fail_next_mount) {
            return Err(MapError::Widget(format!(
                "container {:?} is not attached",
                container.id
            )));
        }

        let mut viewport = Viewport::new(options.center, options.zoom, container.size);
        viewport.set_zoom_limits(options.min_zoom, options.max_zoom);
        viewport.set_max_bounds(Some(options.max_bounds), Some(options.max_bounds_viscosity));

        state.widgets_created += 1;
        let id = state.widgets_created as u64;
        state.live = Some(id);
        state.viewport = Some(viewport);
        state.markers.clear();
        state.user_location = None;

        Ok(Box::new(HeadlessWidget {
            id,
            state: self.state.clone(),
        }))
    }
}

struct HeadlessWidget {
    id: u64,
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessWidget {
    fn live_state(&self) -> Result<MutexGuard<'_, HeadlessState>> {
        let state = lock(&self.state);
        if state.live != Some(self.id) {
            return Err(MapError::Widget("widget has been destroyed".into()));
        }
        Ok(state)
    }
}

impl MapWidget for HeadlessWidget {
    fn fly_to(&mut self, center: LatLng, zoom: f64, duration: Duration) -> Result<()> {
        let mut state = self.live_state()?;
        if let Some(viewport) = state.viewport.as_mut() {
            viewport.set_view(center, zoom);
        }
        state.fly_tos.push(FlyToRecord {
            center,
            zoom,
            duration,
        });
        Ok(())
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        let mut state = self.live_state()?;
        if let Some(viewport) = state.viewport.as_mut() {
            viewport.set_view(center, zoom);
        }
        Ok(())
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()> {
        let mut state = self.live_state()?;
        if state.markers.contains_key(&marker.id) {
            return Err(MapError::Widget(format!("marker {} already on the map", marker.id)));
        }
        state.markers.insert(marker.id, marker.clone());
        state.marker_adds += 1;
        Ok(())
    }

    fn remove_marker(&mut self, id: u32) -> Result<()> {
        let mut state = self.live_state()?;
        state.markers.remove(&id);
        Ok(())
    }

    fn show_user_location(&mut self, center: LatLng, accuracy_radius_px: Option<f64>) -> Result<()> {
        let mut state = self.live_state()?;
        state.user_location = Some((center, accuracy_radius_px));
        Ok(())
    }

    fn destroy(&mut self) {
        let mut state = lock(&self.state);
        if state.live == Some(self.id) {
            state.live = None;
            state.viewport = None;
            state.markers.clear();
            state.user_location = None;
            state.widgets_destroyed += 1;
        }
    }
}
