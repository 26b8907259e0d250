//! Place-search collaborator: the [`Geocoder`] seam and its Nominatim client

use crate::core::config::SearchConfig;
use crate::core::geo::LatLng;
use crate::{MapError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

/// A free-text place search restricted to one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub term: String,
    /// ISO 3166-1 alpha-2, lower case
    pub country_code: String,
    pub limit: usize,
}

/// One hit as the geocoder returns it; coordinates arrive as strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeHit {
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

impl GeocodeHit {
    pub fn new(display_name: impl Into<String>, lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            lat: lat.into(),
            lon: lon.into(),
        }
    }

    pub fn coordinate(&self) -> Option<LatLng> {
        LatLng::parse(&self.lat, &self.lon)
    }
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Hits in the service's ranking order
    async fn search(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeHit>>;
}

/// OpenStreetMap Nominatim `/search`
pub struct NominatimGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self::with_client(client, &config.endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.endpoint)
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeHit>> {
        let limit = query.limit.to_string();
        let response = self
            .client
            .get(self.search_url())
            .header(ACCEPT, "application/json")
            .query(&[
                ("format", "jsonv2"),
                ("q", query.term.as_str()),
                ("countrycodes", query.country_code.as_str()),
                ("addressdetails", "1"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MapError::HttpStatus(status.as_u16()));
        }

        let hits: Vec<GeocodeHit> = response.json().await?;
        log::debug!("geocoder returned {} hits for {:?}", hits.len(), query.term);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn query(term: &str) -> GeocodeQuery {
        GeocodeQuery {
            term: term.to_string(),
            country_code: "de".to_string(),
            limit: 5,
        }
    }

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        let config = SearchConfig {
            endpoint: server.uri(),
            ..SearchConfig::default()
        };
        NominatimGeocoder::new(&config).unwrap()
    }

    #[test]
    fn test_hit_coordinate_parsing() {
        let hit = GeocodeHit::new("Berlin, Deutschland", "52.5170365", "13.3888599");
        assert_eq!(hit.coordinate(), Some(LatLng::new(52.5170365, 13.3888599)));

        let broken = GeocodeHit::new("Nowhere", "north", "13.0");
        assert_eq!(broken.coordinate(), None);
    }

    #[tokio::test]
    async fn test_nominatim_request_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("format", "jsonv2"))
            .and(query_param("q", "Köln Dom"))
            .and(query_param("countrycodes", "de"))
            .and(query_param("addressdetails", "1"))
            .and(query_param("limit", "5"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"display_name": "Kölner Dom, Köln", "lat": "50.9412784", "lon": "6.9582814", "importance": 0.7},
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let hits = geocoder(&server).search(&query("Köln Dom")).await.unwrap();
        assert_eq!(hits, vec![GeocodeHit::new("Kölner Dom, Köln", "50.9412784", "6.9582814")]);
    }

    #[tokio::test]
    async fn test_nominatim_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = geocoder(&server).search(&query("Berlin")).await.unwrap_err();
        assert!(matches!(err, MapError::HttpStatus(503)));
        assert_eq!(err.to_string(), "Search failed (503)");
    }

    #[tokio::test]
    async fn test_nominatim_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
            .mount(&server)
            .await;

        let err = geocoder(&server).search(&query("Berlin")).await.unwrap_err();
        assert!(matches!(err, MapError::Network(_)));
    }
}
