//! The reward partners page: filter buttons, partner cards, search box, "locate
//! me" button and the map, wired together.
//!
//! Three tracks move the viewport (filter, search, locate) and they are fully
//! independent: none waits on another and whichever finishes last wins the
//! viewport. The marker set always follows the current filter, never the track
//! that moved the map.

use crate::catalog::{FilterSelection, FilteredView, FilteredViews, PartnerCatalog};
use crate::core::config::PartnerMapConfig;
use crate::geolocation::{GeolocationService, UserLocationState};
use crate::map::controller::{MapViewportController, MapViewportHandle};
use crate::map::widget::MapContainer;
use crate::prelude::Arc;
use crate::search::{GeoSearchClient, SearchResult, SearchState};
use crate::Result;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

struct Session {
    filter: FilterSelection,
    views: FilteredViews,
}

pub struct PartnerMapView {
    catalog: Arc<PartnerCatalog>,
    controller: Arc<MapViewportController>,
    search: GeoSearchClient,
    geolocation: GeolocationService,
    config: PartnerMapConfig,
    session: Mutex<Session>,
}

impl PartnerMapView {
    pub(crate) fn from_parts(
        catalog: Arc<PartnerCatalog>,
        controller: Arc<MapViewportController>,
        search: GeoSearchClient,
        geolocation: GeolocationService,
        config: PartnerMapConfig,
    ) -> Self {
        let views = FilteredViews::new(catalog.clone());
        Self {
            catalog,
            controller,
            search,
            geolocation,
            config,
            session: Mutex::new(Session {
                filter: FilterSelection::All,
                views,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mounts the map (once) and draws the markers for the current filter.
    /// Safe to call on every render.
    pub fn mount(&self, container: &MapContainer) -> Result<MapViewportHandle> {
        let handle = self.controller.mount(container)?;
        let mut session = self.lock();
        let filter = session.filter.clone();
        let view = session.views.view(&filter);
        self.controller.render_markers(handle, &view.stores)?;
        Ok(handle)
    }

    /// Leaves the page: drops the widget and the per-page state
    pub fn unmount(&self) -> bool {
        self.search.set_query("");
        self.geolocation.reset();
        self.lock().filter = FilterSelection::All;

        match self.controller.handle() {
            Some(handle) => self.controller.unmount(handle),
            None => false,
        }
    }

    /// Applies a filter button. A partner filter also flies to that partner's
    /// first store; `All` leaves the viewport where it is. Returns whether the
    /// map was asked to move.
    pub fn select_filter(&self, filter: FilterSelection) -> bool {
        {
            // Markers are drawn under the session lock so they always match the
            // filter that was set last
            let mut session = self.lock();
            session.filter = filter.clone();
            let view = session.views.view(&filter);
            self.render(&view);
        }

        let Some(name) = filter.partner_name() else {
            return false;
        };
        let Some(store) = self.catalog.first_store_for(name) else {
            log::debug!("no stores for partner {:?}, viewport unchanged", name);
            return false;
        };

        let target = self.controller.region().clamp(store.coordinate);
        self.controller.fly_to_active(
            target,
            self.config.map.partner_zoom,
            self.config.map.partner_fly_duration(),
        )
    }

    /// The partner card's "Show on map" button
    pub fn show_partner_on_map(&self, partner_name: &str) -> bool {
        self.select_filter(FilterSelection::Partner(partner_name.to_string()))
    }

    fn render(&self, view: &FilteredView) {
        let Some(handle) = self.controller.handle() else {
            return;
        };
        if let Err(e) = self.controller.render_markers(handle, &view.stores) {
            log::warn!("rendering markers for {} failed: {}", view.filter, e);
        }
    }

    pub fn filter(&self) -> FilterSelection {
        self.lock().filter.clone()
    }

    /// Stores and partner cards for the current filter (memoized per filter)
    pub fn visible(&self) -> Arc<FilteredView> {
        let mut session = self.lock();
        let filter = session.filter.clone();
        session.views.view(&filter)
    }

    pub fn filter_options(&self) -> Vec<FilterSelection> {
        self.catalog.filter_options()
    }

    /// Search box keystroke
    pub fn set_query(&self, term: &str) {
        self.search.set_query(term);
    }

    /// Search button
    pub fn submit_search(&self) {
        self.search.submit();
    }

    /// Picks a search result; the filter is left alone
    pub fn choose_result(&self, result: &SearchResult) -> bool {
        self.search.select_result(result)
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    pub fn subscribe_search(&self) -> watch::Receiver<SearchState> {
        self.search.subscribe()
    }

    /// "Locate me" button
    pub async fn locate_me(&self) -> UserLocationState {
        self.geolocation.locate().await
    }

    pub fn location_state(&self) -> UserLocationState {
        self.geolocation.state()
    }

    pub fn search(&self) -> &GeoSearchClient {
        &self.search
    }

    pub fn controller(&self) -> &Arc<MapViewportController> {
        &self.controller
    }

    pub fn catalog(&self) -> &Arc<PartnerCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &PartnerMapConfig {
        &self.config
    }
}
