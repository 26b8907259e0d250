pub mod controller;
pub mod headless;
pub mod markers;
pub mod widget;

pub use controller::{MapViewportController, MapViewportHandle};
pub use headless::{FlyToRecord, HeadlessMapFactory};
pub use markers::{Marker, MarkerDiff, MarkerLayer};
pub use widget::{MapContainer, MapWidget, MapWidgetFactory, MarkerSpec, MountOptions};
