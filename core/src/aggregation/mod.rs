//! Aggregation layer.
//!
//! Every view-level table is one AggregateSpec run through the store (and
//! the memo cache), followed by a pure projection into a derived table.
//!
//! Policies shared by all operations:
//!   - period views always constrain year and quarter;
//!   - a named region adds a region constraint, "All Regions" does not;
//!   - rankings sort descending by measure, ties by group key ascending;
//!   - counts stay integral, amounts stay f64.

pub mod insurance;
pub mod spec;
pub mod transactions;
pub mod users;

use crate::{
    cache::DerivedCache,
    error::InsightsResult,
    store::InsightsStore,
};
use spec::{AggregateRow, AggregateSpec};
use std::sync::Arc;

/// Borrowed handle the views query through.
#[derive(Clone, Copy)]
pub struct Aggregator<'a> {
    store: &'a InsightsStore,
    cache: Option<&'a DerivedCache>,
}

impl<'a> Aggregator<'a> {
    /// Memoizing aggregator.
    pub fn new(store: &'a InsightsStore, cache: &'a DerivedCache) -> Self {
        Self { store, cache: Some(cache) }
    }

    /// Always hits the store.
    pub fn uncached(store: &'a InsightsStore) -> Self {
        Self { store, cache: None }
    }

    pub(crate) fn rows(&self, spec: &AggregateSpec) -> InsightsResult<Arc<Vec<AggregateRow>>> {
        match self.cache {
            Some(cache) => cache.get_or_compute(spec, || self.store.aggregate(spec)),
            None => self.store.aggregate(spec).map(Arc::new),
        }
    }
}
