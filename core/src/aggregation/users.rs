//! User aggregations over `map_user` and `aggregated_user`.

use super::{
    spec::{AggregateSpec, Dimension, FactFilter, FactTable, Measure, RowOrder},
    transactions::named_value,
    Aggregator,
};
use crate::{
    derived::{
        engagement_ratio, rank_top, sort_chronologically, BrandTrendPoint, EngagementRatio,
        NamedValue, PeriodValue, UserTotals,
    },
    error::InsightsResult,
    filter::ScopeFilter,
    types::{Period, RegionScope},
};

impl Aggregator<'_> {
    /// Registered users and app opens per region.
    pub fn user_totals(&self, scope: &ScopeFilter) -> InsightsResult<Vec<UserTotals>> {
        let spec = AggregateSpec::new(FactTable::MapUser, scope.fact_filter())
            .group_by(&[Dimension::Region])
            .sum(Measure::RegisteredUsers)
            .sum(Measure::AppOpens)
            .order(RowOrder::GroupAscending);
        Ok(self
            .rows(&spec)?
            .iter()
            .map(|r| UserTotals {
                region: r.text(0),
                registered: r.count(0),
                app_opens: r.count(1),
            })
            .collect())
    }

    /// Top-`n` regions by registered users plus app opens.
    pub fn top_user_regions(&self, period: Period, n: usize) -> InsightsResult<Vec<UserTotals>> {
        let all = self.user_totals(&ScopeFilter::new(period, RegionScope::All))?;
        Ok(rank_top(all, n, |u| u.combined() as f64, |u| u.region.as_str()))
    }

    /// App opens per quarter across every year on record.
    pub fn app_opens_trend(&self, region: &RegionScope) -> InsightsResult<Vec<PeriodValue>> {
        let spec = AggregateSpec::new(FactTable::MapUser, FactFilter::all_time(region.clone()))
            .group_by(&[Dimension::Year, Dimension::Quarter])
            .sum(Measure::AppOpens)
            .order(RowOrder::GroupAscending);
        let mut series: Vec<PeriodValue> = self
            .rows(&spec)?
            .iter()
            .filter_map(|r| r.period(0).map(|period| PeriodValue { period, value: r.measure(0) }))
            .collect();
        sort_chronologically(&mut series);
        Ok(series)
    }

    /// App opens per registered user for every region in the period.
    pub fn engagement_ratios(&self, period: Period) -> InsightsResult<Vec<EngagementRatio>> {
        let totals = self.user_totals(&ScopeFilter::new(period, RegionScope::All))?;
        Ok(totals
            .into_iter()
            .map(|u| EngagementRatio {
                ratio: engagement_ratio(u.app_opens, u.registered),
                region: u.region,
                registered: u.registered,
                app_opens: u.app_opens,
            })
            .collect())
    }

    /// Top-`n` device brands by user count.
    pub fn brand_ranking(&self, scope: &ScopeFilter, n: usize) -> InsightsResult<Vec<NamedValue>> {
        let spec = AggregateSpec::new(FactTable::AggregatedUser, scope.fact_filter())
            .group_by(&[Dimension::Brand])
            .sum(Measure::BrandCount)
            .order(RowOrder::MeasureDescending(0))
            .limit(n);
        Ok(self.rows(&spec)?.iter().map(named_value).collect())
    }

    /// User count for every brand, for share charts.
    pub fn brand_share(&self, scope: &ScopeFilter) -> InsightsResult<Vec<NamedValue>> {
        let spec = AggregateSpec::new(FactTable::AggregatedUser, scope.fact_filter())
            .group_by(&[Dimension::Brand])
            .sum(Measure::BrandCount)
            .order(RowOrder::GroupAscending);
        Ok(self.rows(&spec)?.iter().map(named_value).collect())
    }

    /// Brand user counts per quarter, chronological then by brand.
    pub fn brand_trend(&self, region: &RegionScope) -> InsightsResult<Vec<BrandTrendPoint>> {
        let spec = AggregateSpec::new(FactTable::AggregatedUser, FactFilter::all_time(region.clone()))
            .group_by(&[Dimension::Year, Dimension::Quarter, Dimension::Brand])
            .sum(Measure::BrandCount)
            .order(RowOrder::GroupAscending);
        let mut points: Vec<BrandTrendPoint> = self
            .rows(&spec)?
            .iter()
            .filter_map(|r| {
                r.period(0).map(|period| BrandTrendPoint {
                    period,
                    brand: r.text(2),
                    count: r.count(0),
                })
            })
            .collect();
        points.sort_by(|a, b| a.period.cmp(&b.period).then_with(|| a.brand.cmp(&b.brand)));
        Ok(points)
    }
}
