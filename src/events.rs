//! Events emitted by the viewport controller
//!
//! Consumers can either register named listeners, drain the queue once per UI
//! tick with [`EventManager::process_events`], or subscribe to a channel that
//! receives every event as it is emitted. The queue keeps at most
//! [`MAX_PENDING_EVENTS`]; older events are dropped from the front when nobody
//! drains it.

use crate::core::geo::LatLng;
use crate::map::controller::MapViewportHandle;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::prelude::HashMap;

/// Queue bound for consumers that never call `process_events`
pub const MAX_PENDING_EVENTS: usize = 256;

/// Something observable happened to the live map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapEvent {
    /// A widget was created for the page
    Mounted { handle: MapViewportHandle },
    /// A programmatic fly-to was handed to the widget
    FlyTo {
        center: LatLng,
        zoom: f64,
        duration: Duration,
    },
    /// A user gesture moved the view (after region clamping)
    ViewChanged { center: LatLng, zoom: f64 },
    /// The marker set was reconciled against the current filter
    MarkersChanged { added: usize, removed: usize },
    /// The device position overlay was drawn
    UserLocationShown {
        center: LatLng,
        accuracy_radius_px: Option<f64>,
    },
    /// The widget was torn down
    Unmounted { handle: MapViewportHandle },
}

impl MapEvent {
    /// Listener key for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::Mounted { .. } => "mounted",
            MapEvent::FlyTo { .. } => "flyto",
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::MarkersChanged { .. } => "markerschanged",
            MapEvent::UserLocationShown { .. } => "userlocation",
            MapEvent::Unmounted { .. } => "unmounted",
        }
    }
}

type EventCallback = Arc<dyn Fn(&MapEvent) + Send + Sync>;

/// Events taken off the queue together with the listeners they are due to.
/// Dispatching does not borrow the manager, so a listener may call back into
/// whatever owns it.
#[must_use]
pub struct PendingEvents {
    batch: Vec<(MapEvent, Vec<EventCallback>)>,
}

impl PendingEvents {
    /// Invokes the listeners in emission order and hands the events back
    pub fn dispatch(self) -> Vec<MapEvent> {
        self.batch
            .into_iter()
            .map(|(event, callbacks)| {
                for callback in &callbacks {
                    callback(&event);
                }
                event
            })
            .collect()
    }
}

#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
    /// Channel subscribers, pruned when their receiver is dropped
    subscribers: Vec<Sender<MapEvent>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Arc::new(callback));
    }

    /// Returns a receiver that gets a copy of every event emitted from now on
    pub fn subscribe(&mut self) -> Receiver<MapEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Emit an event to the queue and to channel subscribers
    pub fn emit(&mut self, event: MapEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        if self.event_queue.len() == MAX_PENDING_EVENTS {
            if let Some(dropped) = self.event_queue.pop_front() {
                log::trace!("event queue full, dropping {}", dropped.event_type());
            }
        }
        self.event_queue.push_back(event);
    }

    /// Empties the queue without running anything yet
    pub fn drain(&mut self) -> PendingEvents {
        let batch = self
            .event_queue
            .drain(..)
            .map(|event| {
                let callbacks = self
                    .listeners
                    .get(event.event_type())
                    .cloned()
                    .unwrap_or_default();
                (event, callbacks)
            })
            .collect();
        PendingEvents { batch }
    }

    /// Process all queued events, invoking listeners in emission order
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.drain().dispatch()
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.len())
            .field("pending", &self.event_queue.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
