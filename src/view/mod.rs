pub mod builder;
pub mod partner_map;

pub use builder::PartnerMapViewBuilder;
pub use partner_map::PartnerMapView;
