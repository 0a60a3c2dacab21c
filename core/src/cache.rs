//! Process-lifetime memo of aggregate results.
//!
//! Keyed by the exact AggregateSpec (shape + filters). An entry is written
//! at most once and never mutated, so readers only ever see complete rows.

use crate::{
    aggregation::spec::{AggregateRow, AggregateSpec},
    error::InsightsResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Default)]
pub struct DerivedCache {
    entries: RwLock<HashMap<AggregateSpec, Arc<Vec<AggregateRow>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl DerivedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the memoized rows for `spec`, running `compute` on a miss.
    /// If two callers race on the same key the first insert wins.
    pub fn get_or_compute<F>(
        &self,
        spec: &AggregateSpec,
        compute: F,
    ) -> InsightsResult<Arc<Vec<AggregateRow>>>
    where
        F: FnOnce() -> InsightsResult<Vec<AggregateRow>>,
    {
        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(rows) = entries.get(spec) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("cache hit: {}", spec.shape());
                return Ok(Arc::clone(rows));
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let rows = Arc::new(compute()?);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let stored = entries.entry(spec.clone()).or_insert(rows);
        Ok(Arc::clone(stored))
    }

    /// Drop every entry. Call only when the underlying facts were reloaded.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.read().unwrap_or_else(|e| e.into_inner()).len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
