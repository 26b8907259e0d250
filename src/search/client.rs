//! Debounced, sequence-stamped place search
//!
//! Typing goes through [`GeoSearchClient::set_query`]: each call cancels the
//! pending debounce timer and restarts the quiet period. When the timer fires the
//! request starts with a fresh sequence number. Requests already in flight are
//! never aborted; a response is applied only if no newer request has started
//! since, so results land in request-start order whatever order they arrive in.

use crate::core::config::{MapViewConfig, SearchConfig};
use crate::core::geo::LatLng;
use crate::map::controller::MapViewportController;
use crate::prelude::Arc;
use crate::runtime::{self, async_utils::async_delay, AsyncHandle};
use crate::search::geocoder::{GeocodeQuery, Geocoder};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// A place the user can pick from the result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub label: String,
    pub coordinate: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Error,
}

/// What the search box renders
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub status: SearchStatus,
    pub error_message: Option<String>,
}

struct SearchInner {
    geocoder: Arc<dyn Geocoder>,
    controller: Arc<MapViewportController>,
    config: SearchConfig,
    result_zoom: f64,
    result_fly_duration: Duration,
    /// Sequence number of the most recently started request
    seq: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl SearchInner {
    /// Stamps a new request and marks the state as searching
    fn begin(&self) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.status = SearchStatus::Searching;
            state.error_message = None;
        });
        seq
    }

    /// Invalidates anything in flight and empties the result list
    fn clear(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.results.clear();
            state.status = SearchStatus::Idle;
            state.error_message = None;
        });
    }

    async fn search(&self, term: &str) -> Result<Vec<SearchResult>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let query = GeocodeQuery {
            term: term.to_string(),
            country_code: self.controller.region().country_code().to_string(),
            limit: self.config.result_limit,
        };
        let hits = self.geocoder.search(&query).await?;

        Ok(hits
            .into_iter()
            .filter_map(|hit| match hit.coordinate() {
                Some(coordinate) => Some(SearchResult {
                    label: hit.display_name,
                    coordinate,
                }),
                None => {
                    log::warn!(
                        "skipping geocoder hit {:?} with unparseable coordinates ({}, {})",
                        hit.display_name,
                        hit.lat,
                        hit.lon
                    );
                    None
                }
            })
            .take(self.config.result_limit)
            .collect())
    }

    async fn run(self: Arc<Self>, seq: u64, term: String) {
        let outcome = self.search(&term).await;
        self.apply(seq, outcome);
    }

    /// Writes a response into the state unless a newer request has started.
    ///
    /// The stamp is compared while the state is locked; `begin` bumps the stamp
    /// before it takes that lock, so a newer request's `Searching` is never
    /// overwritten by an older answer.
    fn apply(&self, seq: u64, outcome: Result<Vec<SearchResult>>) -> bool {
        self.state.send_if_modified(|state| {
            let latest = self.seq.load(Ordering::SeqCst);
            if seq != latest {
                log::debug!("dropping stale search response #{} (latest #{})", seq, latest);
                return false;
            }

            match outcome {
                Ok(results) => {
                    state.results = results;
                    state.status = SearchStatus::Idle;
                    state.error_message = None;
                }
                Err(e) => {
                    log::warn!("search for {:?} failed: {}", state.query, e);
                    state.results.clear();
                    state.status = SearchStatus::Error;
                    state.error_message = Some(e.to_string());
                }
            }
            true
        })
    }

    /// Stamps and starts a request. The request runs as its own task so that
    /// cancelling a debounce timer never aborts it.
    fn start(self: &Arc<Self>, term: String) {
        let seq = self.begin();
        log::debug!("search #{} for {:?}", seq, term);
        let inner = self.clone();
        // Detached: dropping the handle leaves the request running
        let _ = runtime::spawn(inner.run(seq, term));
    }
}

/// Search box backend. Methods that start timers or requests must be called
/// from within a tokio runtime.
pub struct GeoSearchClient {
    inner: Arc<SearchInner>,
    pending: Mutex<Option<Box<dyn AsyncHandle>>>,
}

impl GeoSearchClient {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        controller: Arc<MapViewportController>,
        config: SearchConfig,
        map_config: &MapViewConfig,
    ) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            inner: Arc::new(SearchInner {
                geocoder,
                controller,
                config,
                result_zoom: map_config.search_result_zoom,
                result_fly_duration: map_config.search_result_fly_duration(),
                seq: AtomicU64::new(0),
                state,
            }),
            pending: Mutex::new(None),
        }
    }

    /// Single, undebounced, unstamped search. A blank term resolves to no
    /// results without touching the network.
    pub async fn search(&self, term: &str) -> Result<Vec<SearchResult>> {
        self.inner.search(term).await
    }

    /// The debounced entry point, called on every keystroke.
    ///
    /// A blank term clears the results immediately and invalidates any
    /// request in flight.
    pub fn set_query(&self, term: &str) {
        self.cancel_pending();
        self.inner
            .state
            .send_modify(|state| state.query = term.to_string());

        if term.trim().is_empty() {
            self.inner.clear();
            return;
        }

        let inner = self.inner.clone();
        let term = term.to_string();
        let quiet = self.inner.config.debounce();
        let timer = runtime::spawn(async move {
            async_delay(quiet).await;
            inner.start(term);
        });
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(timer);
    }

    /// Searches for the current query right away (the search button)
    pub fn submit(&self) {
        self.cancel_pending();
        let term = self.inner.state.borrow().query.clone();
        if term.trim().is_empty() {
            self.inner.clear();
        } else {
            self.inner.start(term);
        }
    }

    /// Stops the debounce timer, if one is pending. Returns whether one was.
    pub fn cancel_pending(&self) -> bool {
        let timer = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match timer {
            Some(timer) if !timer.is_finished() => {
                timer.cancel();
                true
            }
            _ => false,
        }
    }

    /// Flies the map to a picked result (clamped to the region). Does not
    /// touch the partner filter.
    pub fn select_result(&self, result: &SearchResult) -> bool {
        let controller = &self.inner.controller;
        let target = controller.region().clamp(result.coordinate);
        controller.fly_to_active(target, self.inner.result_zoom, self.inner.result_fly_duration)
    }

    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receives every state change; `changed().await` wakes on the next one
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Sequence number of the most recently started request
    pub fn latest_sequence(&self) -> u64 {
        self.inner.seq.load(Ordering::SeqCst)
    }
}

impl Drop for GeoSearchClient {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
