//! Fluent construction of a [`PartnerMapView`]

use crate::catalog::PartnerCatalog;
use crate::core::config::PartnerMapConfig;
use crate::core::region::RegionBounds;
use crate::geolocation::{GeolocationService, PositionProvider};
use crate::map::controller::MapViewportController;
use crate::map::headless::HeadlessMapFactory;
use crate::map::widget::MapWidgetFactory;
use crate::prelude::Arc;
use crate::search::{GeoSearchClient, Geocoder, NominatimGeocoder};
use crate::view::PartnerMapView;
use crate::Result;

/// Every collaborator has a default: the built-in catalog, Germany, a headless
/// widget, Nominatim, and no device location.
#[derive(Default)]
pub struct PartnerMapViewBuilder {
    config: PartnerMapConfig,
    catalog: Option<Arc<PartnerCatalog>>,
    region: Option<RegionBounds>,
    widget_factory: Option<Box<dyn MapWidgetFactory>>,
    geocoder: Option<Arc<dyn Geocoder>>,
    position_provider: Option<Arc<dyn PositionProvider>>,
}

impl PartnerMapViewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: PartnerMapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<PartnerCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_region(mut self, region: RegionBounds) -> Self {
        self.region = Some(region);
        self
    }

    /// What actually draws the map
    pub fn with_widget_factory(mut self, factory: Box<dyn MapWidgetFactory>) -> Self {
        self.widget_factory = Some(factory);
        self
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_position_provider(mut self, provider: Arc<dyn PositionProvider>) -> Self {
        self.position_provider = Some(provider);
        self
    }

    pub fn build(self) -> Result<PartnerMapView> {
        self.config.validate()?;
        let config = self.config;

        let geocoder: Arc<dyn Geocoder> = match self.geocoder {
            Some(geocoder) => geocoder,
            None => Arc::new(NominatimGeocoder::new(&config.search)?),
        };
        let factory: Box<dyn MapWidgetFactory> = match self.widget_factory {
            Some(factory) => factory,
            None => Box::new(HeadlessMapFactory::new()),
        };
        let region = self.region.unwrap_or_default();

        let controller = Arc::new(MapViewportController::new(factory, region, &config.map));
        let search = GeoSearchClient::new(geocoder, controller.clone(), config.search.clone(), &config.map);
        let geolocation = GeolocationService::new(
            self.position_provider,
            controller.clone(),
            &config.geolocation,
            &config.map,
        );

        Ok(PartnerMapView::from_parts(
            self.catalog.unwrap_or_else(PartnerCatalog::builtin),
            controller,
            search,
            geolocation,
            config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;

    #[test]
    fn test_build_with_defaults() {
        let view = PartnerMapViewBuilder::new().build().unwrap();

        assert_eq!(view.catalog().all_stores().len(), 22);
        assert_eq!(view.controller().region().country_code(), "de");
        assert_eq!(view.filter_options().len(), 7);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let mut config = PartnerMapConfig::default();
        config.map.min_zoom = 18.0;

        let result = PartnerMapViewBuilder::new().with_config(config).build();
        assert!(matches!(result, Err(MapError::Config(_))));
    }
}
