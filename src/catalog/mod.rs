//! Static lookup of reward partners and their store locations

mod data;
pub mod filter;

pub use filter::{FilterSelection, FilteredView, FilteredViews};

use crate::core::geo::LatLng;
use crate::prelude::{Arc, HashMap, HashSet};
use crate::{MapError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static BUILTIN: Lazy<Arc<PartnerCatalog>> = Lazy::new(|| {
    Arc::new(PartnerCatalog::from_parts_unchecked(
        data::partners(),
        data::stores(),
    ))
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnerRecord {
    pub name: String,
    pub category: String,
    pub store_count: u32,
}

impl PartnerRecord {
    pub fn new(name: impl Into<String>, category: impl Into<String>, store_count: u32) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            store_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreLocation {
    pub id: u32,
    pub coordinate: LatLng,
    pub display_name: String,
    pub city: String,
    /// References [`PartnerRecord::name`]
    pub partner_name: String,
    pub address: String,
}

impl StoreLocation {
    /// Text shown in the marker popup
    pub fn popup_text(&self) -> String {
        format!("{}\n{}\n{}", self.partner_name, self.display_name, self.address)
    }
}

/// Immutable partner and store data, loaded once
#[derive(Debug)]
pub struct PartnerCatalog {
    partners: Vec<PartnerRecord>,
    stores: Vec<StoreLocation>,
    /// Partner name -> indices into `stores`, in catalog order
    stores_by_partner: HashMap<String, Vec<usize>>,
}

impl PartnerCatalog {
    /// Builds a catalog, checking name/id uniqueness and that every store
    /// belongs to a known partner
    pub fn new(partners: Vec<PartnerRecord>, stores: Vec<StoreLocation>) -> Result<Self> {
        let mut names = HashSet::default();
        for partner in &partners {
            if !names.insert(partner.name.as_str()) {
                return Err(MapError::Catalog(format!(
                    "duplicate partner name {:?}",
                    partner.name
                )));
            }
        }

        let mut ids = HashSet::default();
        for store in &stores {
            if !ids.insert(store.id) {
                return Err(MapError::Catalog(format!("duplicate store id {}", store.id)));
            }
            if !names.contains(store.partner_name.as_str()) {
                return Err(MapError::Catalog(format!(
                    "store {} references unknown partner {:?}",
                    store.id, store.partner_name
                )));
            }
            if !store.coordinate.is_valid() {
                return Err(MapError::InvalidCoordinates(format!(
                    "store {} at {}",
                    store.id, store.coordinate
                )));
            }
        }

        Ok(Self::from_parts_unchecked(partners, stores))
    }

    fn from_parts_unchecked(partners: Vec<PartnerRecord>, stores: Vec<StoreLocation>) -> Self {
        let mut stores_by_partner: HashMap<String, Vec<usize>> = HashMap::default();
        for (index, store) in stores.iter().enumerate() {
            stores_by_partner
                .entry(store.partner_name.clone())
                .or_default()
                .push(index);
        }

        Self {
            partners,
            stores,
            stores_by_partner,
        }
    }

    /// The catalog shipped with the page
    pub fn builtin() -> Arc<PartnerCatalog> {
        BUILTIN.clone()
    }

    pub fn all_partners(&self) -> &[PartnerRecord] {
        &self.partners
    }

    pub fn all_stores(&self) -> &[StoreLocation] {
        &self.stores
    }

    pub fn partner(&self, name: &str) -> Option<&PartnerRecord> {
        self.partners.iter().find(|p| p.name == name)
    }

    /// `All` returns every store; a partner filter returns that partner's stores
    /// in catalog order
    pub fn stores_for(&self, filter: &FilterSelection) -> Vec<StoreLocation> {
        match filter {
            FilterSelection::All => self.stores.clone(),
            FilterSelection::Partner(name) => self
                .stores_by_partner
                .get(name)
                .map(|indices| indices.iter().map(|&i| self.stores[i].clone()).collect())
                .unwrap_or_default(),
        }
    }

    /// Partner cards shown next to the map for the current filter
    pub fn partners_for(&self, filter: &FilterSelection) -> Vec<PartnerRecord> {
        match filter {
            FilterSelection::All => self.partners.clone(),
            FilterSelection::Partner(name) => self
                .partners
                .iter()
                .filter(|p| &p.name == name)
                .cloned()
                .collect(),
        }
    }

    /// First store of `partner_name` in catalog order
    pub fn first_store_for(&self, partner_name: &str) -> Option<&StoreLocation> {
        self.stores_by_partner
            .get(partner_name)
            .and_then(|indices| indices.first())
            .map(|&i| &self.stores[i])
    }

    /// `All` followed by every partner name, in catalog order
    pub fn filter_options(&self) -> Vec<FilterSelection> {
        std::iter::once(FilterSelection::All)
            .chain(
                self.partners
                    .iter()
                    .map(|p| FilterSelection::Partner(p.name.clone())),
            )
            .collect()
    }
}
