//! Region catalog: the one list every region control offers.
//!
//! Loaded once at startup from the transaction facts. Staleness within a
//! session is acceptable; the facts are append-only.

use crate::{
    error::{InsightsError, InsightsResult},
    store::InsightsStore,
    types::{RegionName, RegionScope, ALL_REGIONS},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCatalog {
    regions: Vec<RegionName>,
}

impl RegionCatalog {
    pub fn load(store: &InsightsStore) -> InsightsResult<Self> {
        let catalog = Self::from_names(store.distinct_regions()?);
        log::info!("region catalog loaded: {} regions", catalog.regions.len());
        Ok(catalog)
    }

    /// Sort lexically and drop duplicates. The sentinel is never stored.
    pub fn from_names<I>(names: I) -> Self
    where
        I: IntoIterator<Item = RegionName>,
    {
        let mut regions: Vec<RegionName> = names
            .into_iter()
            .filter(|n| n != ALL_REGIONS)
            .collect();
        regions.sort();
        regions.dedup();
        Self { regions }
    }

    /// Regions on record, without the sentinel.
    pub fn regions(&self) -> &[RegionName] {
        &self.regions
    }

    /// What every filter control offers: the sentinel first, then regions.
    pub fn options(&self) -> Vec<String> {
        std::iter::once(ALL_REGIONS.to_string())
            .chain(self.regions.iter().cloned())
            .collect()
    }

    pub fn contains(&self, region: &str) -> bool {
        self.regions.binary_search_by(|r| r.as_str().cmp(region)).is_ok()
    }

    /// Map a control value onto a scope. Unknown names are rejected.
    pub fn resolve(&self, value: &str) -> InsightsResult<RegionScope> {
        if value == ALL_REGIONS {
            Ok(RegionScope::All)
        } else if self.contains(value) {
            Ok(RegionScope::Named(value.to_string()))
        } else {
            Err(InsightsError::UnknownRegion {
                region: value.to_string(),
            })
        }
    }
}
