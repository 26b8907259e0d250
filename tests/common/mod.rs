//! Fakes shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use partnermap::geolocation::{Position, PositionError, PositionOptions, PositionProvider};
use partnermap::search::{GeocodeHit, GeocodeQuery, Geocoder};
use partnermap::{HeadlessMapFactory, PartnerMapConfig, PartnerMapView, PartnerMapViewBuilder, SearchState, SearchStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Geocoder answering from a script of `term -> (delay, hits)`; unknown terms
/// answer immediately with no hits
#[derive(Default)]
pub struct ScriptedGeocoder {
    script: Mutex<HashMap<String, (Duration, Vec<GeocodeHit>)>>,
    calls: AtomicUsize,
    queries: Mutex<Vec<GeocodeQuery>>,
}

impl ScriptedGeocoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn answer(&self, term: &str, delay_ms: u64, hits: Vec<GeocodeHit>) {
        self.script
            .lock()
            .unwrap()
            .insert(term.to_string(), (Duration::from_millis(delay_ms), hits));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<GeocodeQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Geocoder for ScriptedGeocoder {
    async fn search(&self, query: &GeocodeQuery) -> partnermap::Result<Vec<GeocodeHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        let entry = self.script.lock().unwrap().get(&query.term).cloned();
        match entry {
            Some((delay, hits)) => {
                tokio::time::sleep(delay).await;
                Ok(hits)
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Answers after a fixed delay
pub struct DelayedPositionProvider {
    pub delay: Duration,
    pub answer: Result<Position, PositionError>,
}

#[async_trait]
impl PositionProvider for DelayedPositionProvider {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, PositionError> {
        tokio::time::sleep(self.delay).await;
        self.answer.clone()
    }
}

pub fn view_with(
    geocoder: Arc<dyn Geocoder>,
    provider: Option<Arc<dyn PositionProvider>>,
) -> (PartnerMapView, HeadlessMapFactory) {
    init_logging();
    let factory = HeadlessMapFactory::new();
    let mut builder = PartnerMapViewBuilder::new()
        .with_config(PartnerMapConfig::for_testing())
        .with_widget_factory(Box::new(factory.clone()))
        .with_geocoder(geocoder);
    if let Some(provider) = provider {
        builder = builder.with_position_provider(provider);
    }
    (builder.build().unwrap(), factory)
}

/// Waits until request `seq` (or a later one) has been answered
pub async fn wait_for_search(view: &PartnerMapView, seq: u64) -> SearchState {
    let mut rx = view.subscribe_search();
    let wait = async {
        loop {
            {
                let state = rx.borrow_and_update();
                if view.search().latest_sequence() >= seq && state.status != SearchStatus::Searching {
                    return state.clone();
                }
            }
            rx.changed().await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("search did not settle")
}
