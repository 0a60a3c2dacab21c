//! Insurance aggregations over `map_insurance`, `top_insurance` and
//! `aggregated_insurance`.

use super::{
    spec::{AggregateSpec, Dimension, FactFilter, FactTable, Measure, RowOrder},
    transactions::named_value,
    Aggregator,
};
use crate::{
    derived::{join_insurance_users, CountAmount, InsuranceVsUsers, NamedValue, QuarterValue},
    error::InsightsResult,
    filter::ScopeFilter,
    types::{Period, Quarter, RegionScope, Year},
};

impl Aggregator<'_> {
    /// Insurance count and amount per region.
    pub fn insurance_by_region(&self, period: Period) -> InsightsResult<Vec<CountAmount>> {
        let spec = AggregateSpec::new(
            FactTable::MapInsurance,
            FactFilter::period(period, RegionScope::All),
        )
        .group_by(&[Dimension::Region])
        .sum(Measure::InsuranceCount)
        .sum(Measure::InsuranceAmount)
        .order(RowOrder::GroupAscending);
        Ok(self
            .rows(&spec)?
            .iter()
            .map(|r| CountAmount {
                name: r.text(0),
                count: r.count(0),
                amount: r.measure(1),
            })
            .collect())
    }

    /// Top-`n` regions by insurance count, from the pincode leaderboard.
    pub fn insurance_leaders(&self, period: Period, n: usize) -> InsightsResult<Vec<NamedValue>> {
        let spec = AggregateSpec::new(
            FactTable::TopInsurance,
            FactFilter::period(period, RegionScope::All),
        )
        .group_by(&[Dimension::Region])
        .sum(Measure::InsuranceCount)
        .order(RowOrder::MeasureDescending(0))
        .limit(n);
        Ok(self.rows(&spec)?.iter().map(named_value).collect())
    }

    /// Insurance count per quarter of one year, ascending by quarter.
    pub fn insurance_quarterly(
        &self,
        year: Year,
        region: &RegionScope,
    ) -> InsightsResult<Vec<QuarterValue>> {
        let filter = FactFilter {
            region: region.clone(),
            ..FactFilter::year(year)
        };
        let spec = AggregateSpec::new(FactTable::AggregatedInsurance, filter)
            .group_by(&[Dimension::Quarter])
            .sum(Measure::InsuranceCount)
            .order(RowOrder::GroupAscending);
        Ok(self
            .rows(&spec)?
            .iter()
            .filter_map(|r| {
                let q = u8::try_from(r.int(0)).ok()?;
                Quarter::new(q).ok().map(|quarter| QuarterValue {
                    quarter,
                    value: r.measure(0),
                })
            })
            .collect())
    }

    /// Registered users against insurance count, regions present in both.
    pub fn insurance_vs_users(&self, period: Period) -> InsightsResult<Vec<InsuranceVsUsers>> {
        let users = self.user_totals(&ScopeFilter::new(period, RegionScope::All))?;
        let insurance = self.insurance_by_region(period)?;
        Ok(join_insurance_users(&users, &insurance))
    }
}
