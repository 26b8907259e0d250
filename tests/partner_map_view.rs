mod common;

/// End-to-end scenarios for the reward partners page, run against a headless
/// widget, a scripted geocoder and fake device positions on a paused clock
#[cfg(test)]
mod partner_map_view_tests {
    use super::common::{view_with, wait_for_search, DelayedPositionProvider, ScriptedGeocoder};
    use partnermap::geolocation::{FixedPositionProvider, Position, PositionError, PositionProvider};
    use partnermap::search::GeocodeHit;
    use partnermap::{
        FilterSelection, LatLng, LocationStatus, MapContainer, MapEvent, PartnerCatalog,
        RegionBounds, SearchStatus,
    };
    use std::sync::Arc;
    use std::time::Duration;

    fn container() -> MapContainer {
        MapContainer::new("reward-partners-map", 1024.0, 640.0)
    }

    fn hit(name: &str, lat: f64, lng: f64) -> GeocodeHit {
        GeocodeHit::new(name, lat.to_string(), lng.to_string())
    }

    async fn sleep(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[test]
    fn test_clamp_keeps_every_point_in_region() {
        let region = RegionBounds::germany();

        for lat in (-90..=90).step_by(5) {
            for lng in (-180..=180).step_by(5) {
                let point = LatLng::new(lat as f64, lng as f64);
                let clamped = region.clamp(point);
                assert!(region.contains(&clamped), "{} clamped to {}", point, clamped);
                // Idempotent once inside
                assert_eq!(region.clamp(clamped), clamped);
            }
        }

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, f64::MAX, f64::MIN] {
            for point in [LatLng::new(value, 10.0), LatLng::new(51.0, value), LatLng::new(value, value)] {
                let clamped = region.clamp(point);
                assert!(region.contains(&clamped), "{:?} clamped to {:?}", point, clamped);
            }
        }
    }

    #[test]
    fn test_stores_for_is_a_subset_of_all_stores() {
        let catalog = PartnerCatalog::builtin();
        let all = catalog.all_stores();

        for filter in catalog.filter_options() {
            let stores = catalog.stores_for(&filter);
            assert!(stores.iter().all(|s| all.contains(s)), "{} leaked a store", filter);
        }
        assert_eq!(catalog.stores_for(&FilterSelection::All), all.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn test_starbucks_filter_flies_to_first_store() {
        let (view, factory) = view_with(ScriptedGeocoder::new(), None);
        view.mount(&container()).unwrap();

        let first = view.catalog().first_store_for("Starbucks").unwrap().clone();
        assert_eq!(first.id, 1);

        assert!(view.select_filter(FilterSelection::Partner("Starbucks".into())));
        let fly = factory.fly_tos().pop().unwrap();
        assert_eq!(fly.center, view.controller().region().clamp(first.coordinate));
        assert_eq!(fly.zoom, 12.0);
        assert!(view.visible().stores.iter().all(|s| s.partner_name == "Starbucks"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_outside_region_recentres_on_clamped_point() {
        let provider: Arc<dyn PositionProvider> =
            Arc::new(FixedPositionProvider::new(Position::new(60.0, 13.0, Some(25.0))));
        let (view, factory) = view_with(ScriptedGeocoder::new(), Some(provider));
        view.mount(&container()).unwrap();

        let state = view.locate_me().await;

        assert_eq!(state.status, LocationStatus::Granted);
        let clamped = state.coordinate.unwrap();
        assert!((clamped.lat - 55.06).abs() < 0.01);
        assert_eq!(clamped.lng, 13.0);
        assert_eq!(view.controller().current_view(), Some((clamped, 13.0)));
        assert_eq!(factory.user_location(), Some((clamped, Some(20.0))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_never_hits_geocoder() {
        let geocoder = ScriptedGeocoder::new();
        geocoder.answer("Leipzig", 10, vec![hit("Leipzig", 51.3397, 12.3731)]);
        let (view, _) = view_with(geocoder.clone(), None);
        view.mount(&container()).unwrap();

        view.set_query("Leipzig");
        let state = wait_for_search(&view, 1).await;
        assert_eq!(state.results.len(), 1);

        view.set_query("");
        assert!(view.search_state().results.is_empty());
        view.submit_search();
        sleep(1_000).await;

        assert_eq!(geocoder.calls(), 1);
        assert!(view.search_state().results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_response_never_clobbers_later_one() {
        let geocoder = ScriptedGeocoder::new();
        geocoder.answer("Hamburg", 500, vec![hit("Hamburg", 53.5511, 9.9937)]);
        geocoder.answer("Bremen", 50, vec![hit("Bremen", 53.0793, 8.8017)]);
        let (view, _) = view_with(geocoder.clone(), None);
        view.mount(&container()).unwrap();

        view.set_query("Hamburg");
        sleep(30).await;
        view.set_query("Bremen");

        let state = wait_for_search(&view, 2).await;
        assert_eq!(state.results[0].label, "Bremen");

        // Hamburg arrives last and is dropped
        sleep(1_000).await;
        assert_eq!(geocoder.calls(), 2);
        assert_eq!(view.search_state().results[0].label, "Bremen");
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_response_arriving_first_is_still_dropped() {
        let geocoder = ScriptedGeocoder::new();
        geocoder.answer("Hamburg", 100, vec![hit("Hamburg", 53.5511, 9.9937)]);
        geocoder.answer("Bremen", 300, vec![hit("Bremen", 53.0793, 8.8017)]);
        let (view, _) = view_with(geocoder.clone(), None);
        view.mount(&container()).unwrap();

        view.set_query("Hamburg");
        sleep(30).await;
        view.set_query("Bremen");

        // Hamburg has answered by now but a newer request is in flight
        sleep(170).await;
        let state = view.search_state();
        assert!(state.results.is_empty());
        assert_eq!(state.status, SearchStatus::Searching);

        let state = wait_for_search(&view, 2).await;
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.results[0].label, "Bremen");
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_is_restricted_to_region_country() {
        let geocoder = ScriptedGeocoder::new();
        let (view, _) = view_with(geocoder.clone(), None);
        view.mount(&container()).unwrap();

        view.set_query("  Hauptbahnhof ");
        wait_for_search(&view, 1).await;

        let query = geocoder.queries().pop().unwrap();
        assert_eq!(query.term, "Hauptbahnhof");
        assert_eq!(query.country_code, "de");
        assert_eq!(query.limit, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_twice_yields_one_handle_and_one_marker_set() {
        let (view, factory) = view_with(ScriptedGeocoder::new(), None);

        let first = view.mount(&container()).unwrap();
        view.select_filter(FilterSelection::Partner("McDonald's".into()));
        let second = view.mount(&container()).unwrap();

        assert_eq!(first, second);
        assert_eq!(factory.widgets_created(), 1);
        let visible: Vec<u32> = view.visible().stores.iter().map(|s| s.id).collect();
        assert_eq!(factory.marker_ids(), visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fly_to_before_mount_is_silently_dropped() {
        let geocoder = ScriptedGeocoder::new();
        let provider: Arc<dyn PositionProvider> =
            Arc::new(FixedPositionProvider::new(Position::new(50.1109, 8.6821, None)));
        let (view, factory) = view_with(geocoder, Some(provider));

        assert!(!view.show_partner_on_map("Target"));
        let state = view.locate_me().await;
        assert_eq!(state.status, LocationStatus::Granted);

        assert!(factory.fly_tos().is_empty());
        assert!(view.controller().process_events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracks_interleave_without_blocking() {
        let geocoder = ScriptedGeocoder::new();
        geocoder.answer("Köln", 200, vec![hit("Köln", 50.9375, 6.9603)]);
        let provider: Arc<dyn PositionProvider> = Arc::new(DelayedPositionProvider {
            delay: Duration::from_millis(100),
            answer: Ok(Position::new(48.7758, 9.1829, Some(600.0))),
        });
        let (view, factory) = view_with(geocoder, Some(provider));
        view.mount(&container()).unwrap();
        let events = view.controller().subscribe();

        view.set_query("Köln");
        let (located, searched) = tokio::join!(view.locate_me(), async {
            // Filter changes while both other tracks are pending
            view.show_partner_on_map("Walmart");
            wait_for_search(&view, 1).await
        });

        assert_eq!(located.status, LocationStatus::Granted);
        assert_eq!(searched.results[0].label, "Köln");
        assert_eq!(view.filter(), FilterSelection::Partner("Walmart".into()));

        // Markers follow the filter, not whichever track moved the map
        let walmart: Vec<u32> = view.visible().stores.iter().map(|s| s.id).collect();
        assert_eq!(factory.marker_ids(), walmart);

        assert!(view.choose_result(&searched.results[0]));
        let zooms: Vec<f64> = events
            .try_iter()
            .filter_map(|e| match e {
                MapEvent::FlyTo { zoom, .. } => Some(zoom),
                _ => None,
            })
            .collect();
        assert_eq!(zooms, vec![12.0, 13.0, 12.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_location_failures_are_distinct() {
        let timeout: Arc<dyn PositionProvider> = Arc::new(DelayedPositionProvider {
            delay: Duration::from_secs(60),
            answer: Ok(Position::new(52.0, 13.0, None)),
        });
        let (view, factory) = view_with(ScriptedGeocoder::new(), Some(timeout));
        view.mount(&container()).unwrap();
        assert_eq!(view.locate_me().await.status, LocationStatus::Error);

        let denied: Arc<dyn PositionProvider> =
            Arc::new(FixedPositionProvider::failing(PositionError::PermissionDenied));
        let (view, _) = view_with(ScriptedGeocoder::new(), Some(denied));
        view.mount(&container()).unwrap();
        assert_eq!(view.locate_me().await.status, LocationStatus::Denied);

        assert!(factory.fly_tos().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_finite_device_position_never_reaches_map() {
        let provider: Arc<dyn PositionProvider> =
            Arc::new(FixedPositionProvider::new(Position::new(f64::NAN, 13.0, None)));
        let (view, factory) = view_with(ScriptedGeocoder::new(), Some(provider));
        view.mount(&container()).unwrap();
        let start = view.controller().current_view();

        let state = view.locate_me().await;

        assert_eq!(state.status, LocationStatus::Error);
        assert_eq!(state.coordinate, None);
        assert!(factory.fly_tos().is_empty());
        assert_eq!(view.controller().current_view(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn test_locate_pending_across_remount_is_discarded() {
        let provider: Arc<dyn PositionProvider> = Arc::new(DelayedPositionProvider {
            delay: Duration::from_millis(200),
            answer: Ok(Position::new(48.0, 11.0, Some(40.0))),
        });
        let (view, factory) = view_with(ScriptedGeocoder::new(), Some(provider));
        let old_page = view.mount(&container()).unwrap();

        let (stale, new_page) = tokio::join!(view.locate_me(), async {
            sleep(50).await;
            assert!(view.unmount());
            view.mount(&container()).unwrap()
        });

        assert_ne!(old_page, new_page);
        assert_ne!(stale.status, LocationStatus::Granted);
        assert_eq!(view.location_state().status, LocationStatus::Idle);
        assert_eq!(view.location_state().coordinate, None);
        assert!(factory.fly_tos().is_empty());
        assert_eq!(factory.user_location(), None);

        // The new page can locate normally
        assert_eq!(view.locate_me().await.status, LocationStatus::Granted);
        assert_eq!(factory.fly_tos().len(), 1);
    }

    #[test]
    fn test_listener_reading_the_map_does_not_block() {
        let (view, _) = view_with(ScriptedGeocoder::new(), None);
        let view = Arc::new(view);

        let reader = view.clone();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = seen.clone();
        view.controller().on("flyto", move |_| {
            log.lock().unwrap().push(reader.controller().current_view());
        });
        view.mount(&container()).unwrap();
        view.show_partner_on_map("Starbucks");

        let (tx, rx) = std::sync::mpsc::channel();
        let worker = view.clone();
        std::thread::spawn(move || {
            let _ = tx.send(worker.controller().process_events().len());
        });
        let processed = rx.recv_timeout(Duration::from_secs(5)).unwrap();

        assert!(processed >= 2);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].map(|(_, zoom)| zoom), Some(12.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_then_operations_are_no_ops() {
        let geocoder = ScriptedGeocoder::new();
        geocoder.answer("Berlin", 10, vec![hit("Berlin", 52.52, 13.405)]);
        let (view, factory) = view_with(geocoder, None);
        view.mount(&container()).unwrap();
        view.set_query("Berlin");
        let state = wait_for_search(&view, 1).await;

        assert!(view.unmount());
        assert!(!view.choose_result(&state.results[0]));
        assert!(!view.show_partner_on_map("Starbucks"));
        assert!(factory.fly_tos().is_empty());
        assert!(view.search_state().results.is_empty());
    }
}
