//! Transaction aggregations over `aggregated_transaction` and `map_transaction`.

use super::{
    spec::{AggregateSpec, Dimension, FactFilter, FactTable, Measure, RowOrder},
    Aggregator,
};
use crate::{
    derived::{sort_chronologically, CategoryPivot, CategoryTotal, CountAmount, NamedValue, PeriodValue},
    error::InsightsResult,
    filter::ScopeFilter,
    types::{Period, RegionScope},
};

impl Aggregator<'_> {
    /// Count and amount per transaction category.
    pub fn category_breakdown(&self, scope: &ScopeFilter) -> InsightsResult<Vec<CategoryTotal>> {
        let spec = AggregateSpec::new(FactTable::AggregatedTransaction, scope.fact_filter())
            .group_by(&[Dimension::Category])
            .sum(Measure::TxnCount)
            .sum(Measure::TxnAmount)
            .order(RowOrder::GroupAscending);
        Ok(self
            .rows(&spec)?
            .iter()
            .map(|r| CategoryTotal {
                category: r.text(0),
                count: r.count(0),
                amount: r.measure(1),
            })
            .collect())
    }

    /// Ungrouped count and amount for the scope. Zero when nothing matches.
    pub fn scoped_transaction_totals(&self, scope: &ScopeFilter) -> InsightsResult<CountAmount> {
        let spec = AggregateSpec::new(FactTable::AggregatedTransaction, scope.fact_filter())
            .sum(Measure::TxnCount)
            .sum(Measure::TxnAmount);
        let rows = self.rows(&spec)?;
        let (count, amount) = rows
            .first()
            .map(|r| (r.count(0), r.measure(1)))
            .unwrap_or((0, 0.0));
        Ok(CountAmount {
            name: scope.region.label().to_string(),
            count,
            amount,
        })
    }

    /// Total amount per region, every region, ascending by name.
    pub fn region_transaction_totals(&self, period: Period) -> InsightsResult<Vec<NamedValue>> {
        let spec = AggregateSpec::new(
            FactTable::AggregatedTransaction,
            FactFilter::period(period, RegionScope::All),
        )
        .group_by(&[Dimension::Region])
        .sum(Measure::TxnAmount)
        .order(RowOrder::GroupAscending);
        Ok(self.rows(&spec)?.iter().map(named_value).collect())
    }

    /// Top-`n` regions by amount.
    pub fn top_states(&self, period: Period, n: usize) -> InsightsResult<Vec<NamedValue>> {
        let spec = AggregateSpec::new(
            FactTable::AggregatedTransaction,
            FactFilter::period(period, RegionScope::All),
        )
        .group_by(&[Dimension::Region])
        .sum(Measure::TxnAmount)
        .order(RowOrder::MeasureDescending(0))
        .limit(n);
        Ok(self.rows(&spec)?.iter().map(named_value).collect())
    }

    /// Region × category amounts, zero-filled.
    pub fn category_pivot(&self, scope: &ScopeFilter) -> InsightsResult<CategoryPivot> {
        let spec = AggregateSpec::new(FactTable::AggregatedTransaction, scope.fact_filter())
            .group_by(&[Dimension::Region, Dimension::Category])
            .sum(Measure::TxnAmount)
            .order(RowOrder::GroupAscending);
        let rows = self.rows(&spec)?;
        Ok(CategoryPivot::from_long(
            rows.iter().map(|r| (r.text(0), r.text(1), r.measure(0))),
        ))
    }

    /// Amount per quarter across every year on record.
    pub fn transaction_trend(&self, region: &RegionScope) -> InsightsResult<Vec<PeriodValue>> {
        let spec = AggregateSpec::new(
            FactTable::AggregatedTransaction,
            FactFilter::all_time(region.clone()),
        )
        .group_by(&[Dimension::Year, Dimension::Quarter])
        .sum(Measure::TxnAmount)
        .order(RowOrder::GroupAscending);
        let mut series: Vec<PeriodValue> = self
            .rows(&spec)?
            .iter()
            .filter_map(|r| r.period(0).map(|period| PeriodValue { period, value: r.measure(0) }))
            .collect();
        sort_chronologically(&mut series);
        Ok(series)
    }

    /// Top-`n` districts by amount, optionally within one region.
    pub fn top_districts(&self, scope: &ScopeFilter, n: usize) -> InsightsResult<Vec<NamedValue>> {
        let spec = AggregateSpec::new(FactTable::MapTransaction, scope.fact_filter())
            .group_by(&[Dimension::District])
            .sum(Measure::TxnAmount)
            .order(RowOrder::MeasureDescending(0))
            .limit(n);
        Ok(self.rows(&spec)?.iter().map(named_value).collect())
    }

    /// Region totals summed from the district table.
    pub fn district_region_totals(&self, period: Period) -> InsightsResult<Vec<NamedValue>> {
        let spec = AggregateSpec::new(
            FactTable::MapTransaction,
            FactFilter::period(period, RegionScope::All),
        )
        .group_by(&[Dimension::Region])
        .sum(Measure::TxnAmount)
        .order(RowOrder::GroupAscending);
        Ok(self.rows(&spec)?.iter().map(named_value).collect())
    }

    /// Count and amount per region from the district table.
    pub fn market_points(&self, period: Period) -> InsightsResult<Vec<CountAmount>> {
        let spec = AggregateSpec::new(
            FactTable::MapTransaction,
            FactFilter::period(period, RegionScope::All),
        )
        .group_by(&[Dimension::Region])
        .sum(Measure::TxnCount)
        .sum(Measure::TxnAmount)
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
}

pub(super) fn named_value(r: &super::spec::AggregateRow) -> NamedValue {
    NamedValue {
        name: r.text(0),
        value: r.measure(0),
    }
}
