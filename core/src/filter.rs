//! Filter selections: the inputs that drive every query of a view.

use crate::{
    aggregation::spec::FactFilter,
    catalog::RegionCatalog,
    config::DashboardConfig,
    error::{InsightsError, InsightsResult},
    types::{MetricFamily, Period, Quarter, RegionScope, Year},
};
use serde::{Deserialize, Serialize};

/// The (year, quarter, region) triple each view is parameterized by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeFilter {
    pub period: Period,
    pub region: RegionScope,
}

impl ScopeFilter {
    pub fn new(period: Period, region: RegionScope) -> Self {
        Self { period, region }
    }

    /// Same period, region constraint dropped.
    pub fn all_regions(&self) -> Self {
        Self {
            period: self.period,
            region: RegionScope::All,
        }
    }

    pub fn fact_filter(&self) -> FactFilter {
        FactFilter::period(self.period, self.region.clone())
    }
}

/// Home page selection: metric family plus scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    pub metric: MetricFamily,
    pub scope: ScopeFilter,
}

/// Raw control values as a client submits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterInput {
    pub year: Year,
    pub quarter: u8,
    #[serde(default = "all_regions_label")]
    pub region: String,
}

fn all_regions_label() -> String {
    crate::types::ALL_REGIONS.to_string()
}

impl FilterInput {
    /// Validate against the configured year range and the region catalog.
    pub fn resolve(
        &self,
        config: &DashboardConfig,
        catalog: &RegionCatalog,
    ) -> InsightsResult<ScopeFilter> {
        if !config.years().contains(&self.year) {
            return Err(InsightsError::InvalidFilter {
                field: "year",
                reason: format!(
                    "{} is outside {}..={}",
                    self.year, config.year_min, config.year_max
                ),
            });
        }
        let quarter = Quarter::new(self.quarter)?;
        let region = catalog.resolve(&self.region)?;
        Ok(ScopeFilter::new(Period::new(self.year, quarter), region))
    }
}
