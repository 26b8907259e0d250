use super::{PartnerCatalog, PartnerRecord, StoreLocation};
use crate::prelude::Arc;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

const ALL_LABEL: &str = "All";

/// Which partner's stores the map shows
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterSelection {
    #[default]
    All,
    Partner(String),
}

impl FilterSelection {
    /// Maps a filter button label back to a selection (`"All"` is the identity filter)
    pub fn from_label(label: &str) -> Self {
        if label == ALL_LABEL {
            Self::All
        } else {
            Self::Partner(label.to_string())
        }
    }

    pub fn partner_name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Partner(name) => Some(name),
        }
    }
}

impl std::fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(ALL_LABEL),
            Self::Partner(name) => f.write_str(name),
        }
    }
}

/// Stores and partner cards for one filter
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    pub filter: FilterSelection,
    pub stores: Vec<StoreLocation>,
    pub partners: Vec<PartnerRecord>,
}

/// Filter-keyed memo of [`FilteredView`]s.
///
/// A view is built once per filter key and then served from the cache, so
/// re-renders caused by unrelated state (search keystrokes, locate status)
/// never rebuild the lists.
pub struct FilteredViews {
    catalog: Arc<PartnerCatalog>,
    cache: LruCache<FilterSelection, Arc<FilteredView>>,
    computations: usize,
}

impl FilteredViews {
    pub fn new(catalog: Arc<PartnerCatalog>) -> Self {
        // One slot per filter button
        let capacity = NonZeroUsize::new(catalog.all_partners().len() + 1).unwrap_or(NonZeroUsize::MIN);
        Self {
            catalog,
            cache: LruCache::new(capacity),
            computations: 0,
        }
    }

    pub fn view(&mut self, filter: &FilterSelection) -> Arc<FilteredView> {
        if let Some(view) = self.cache.get(filter) {
            return view.clone();
        }

        self.computations += 1;
        let view = Arc::new(FilteredView {
            filter: filter.clone(),
            stores: self.catalog.stores_for(filter),
            partners: self.catalog.partners_for(filter),
        });
        self.cache.put(filter.clone(), view.clone());
        view
    }

    /// How many views have been built (cache misses)
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn catalog(&self) -> &Arc<PartnerCatalog> {
        &self.catalog
    }
}
