use crate::catalog::StoreLocation;
use crate::core::geo::LatLng;
use crate::map::widget::{MapWidget, MarkerSpec};
use crate::Result;
use std::collections::BTreeMap;

pub struct Marker {
    id: u32,
    position: LatLng,
    popup_text: Option<String>,
}

impl Marker {
    pub fn new(id: u32, position: LatLng) -> Self {
        Self {
            id,
            position,
            popup_text: None,
        }
    }

    pub fn with_popup(mut self, text: String) -> Self {
        self.popup_text = Some(text);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn position(&self) -> LatLng {
        self.position
    }

    pub fn spec(&self) -> MarkerSpec {
        MarkerSpec {
            id: self.id,
            position: self.position,
            popup: self.popup_text.clone(),
        }
    }
}

impl From<&StoreLocation> for Marker {
    fn from(store: &StoreLocation) -> Self {
        Marker::new(store.id, store.coordinate).with_popup(store.popup_text())
    }
}

/// Added/removed counts from one reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerDiff {
    pub added: usize,
    pub removed: usize,
}

impl MarkerDiff {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// The store markers currently on the widget, keyed by store id
#[derive(Default)]
pub struct MarkerLayer {
    markers: BTreeMap<u32, Marker>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the widget's markers in line with `stores`: vanished ids are
    /// removed, missing ids are added, ids already shown are left alone.
    pub fn reconcile(&mut self, widget: &mut dyn MapWidget, stores: &[StoreLocation]) -> Result<MarkerDiff> {
        let mut diff = MarkerDiff::default();

        let stale: Vec<u32> = self
            .markers
            .keys()
            .copied()
            .filter(|id| !stores.iter().any(|s| s.id == *id))
            .collect();
        for id in stale {
            widget.remove_marker(id)?;
            self.markers.remove(&id);
            diff.removed += 1;
        }

        for store in stores {
            if self.markers.contains_key(&store.id) {
                continue;
            }
            let marker = Marker::from(store);
            widget.add_marker(&marker.spec())?;
            self.markers.insert(store.id, marker);
            diff.added += 1;
        }

        Ok(diff)
    }

    pub fn ids(&self) -> Vec<u32> {
        self.markers.keys().copied().collect()
    }

    pub fn get(&self, id: u32) -> Option<&Marker> {
        self.markers.get(&id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FilterSelection, PartnerCatalog};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingWidget {
        adds: Vec<u32>,
        removes: Vec<u32>,
    }

    impl MapWidget for CountingWidget {
        fn fly_to(&mut self, _: LatLng, _: f64, _: Duration) -> Result<()> {
            Ok(())
        }
        fn set_view(&mut self, _: LatLng, _: f64) -> Result<()> {
            Ok(())
        }
        fn add_marker(&mut self, marker: &MarkerSpec) -> Result<()> {
            self.adds.push(marker.id);
            Ok(())
        }
        fn remove_marker(&mut self, id: u32) -> Result<()> {
            self.removes.push(id);
            Ok(())
        }
        fn show_user_location(&mut self, _: LatLng, _: Option<f64>) -> Result<()> {
            Ok(())
        }
        fn destroy(&mut self) {}
    }

    #[test]
    fn test_reconcile_only_touches_changes() {
        let catalog = PartnerCatalog::builtin();
        let mut widget = CountingWidget::default();
        let mut layer = MarkerLayer::new();

        let all = catalog.stores_for(&FilterSelection::All);
        let diff = layer.reconcile(&mut widget, &all).unwrap();
        assert_eq!(diff, MarkerDiff { added: 22, removed: 0 });

        // Same set again: nothing to do
        let diff = layer.reconcile(&mut widget, &all).unwrap();
        assert!(diff.is_empty());
        assert_eq!(widget.adds.len(), 22);

        let starbucks = catalog.stores_for(&FilterSelection::Partner("Starbucks".into()));
        let diff = layer.reconcile(&mut widget, &starbucks).unwrap();
        assert_eq!(diff, MarkerDiff { added: 0, removed: 16 });
        assert_eq!(layer.len(), 6);
        assert_eq!(layer.ids(), vec![1, 4, 6, 12, 16, 20]);
    }

    #[test]
    fn test_marker_from_store_carries_popup() {
        let catalog = PartnerCatalog::builtin();
        let marker = Marker::from(&catalog.all_stores()[0]);
        assert_eq!(marker.id(), 1);
        let spec = marker.spec();
        assert_eq!(spec.position, LatLng::new(52.52, 13.405));
        assert!(spec.popup.unwrap_or_default().contains("Alexanderplatz"));
    }
}
