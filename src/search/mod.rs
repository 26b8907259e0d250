pub mod client;
pub mod geocoder;

pub use client::{GeoSearchClient, SearchResult, SearchState, SearchStatus};
pub use geocoder::{GeocodeHit, GeocodeQuery, Geocoder, NominatimGeocoder};
