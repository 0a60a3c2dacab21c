//! Report 1: where the money moves and through which payment categories.

use super::{ReportId, ReportView, ViewContext};
use crate::{
    error::InsightsResult,
    filter::ScopeFilter,
    panel::{Chart, ChartKind, Panel, Point},
    types::RegionScope,
};

pub struct TransactionDynamicsReport;

impl ReportView for TransactionDynamicsReport {
    fn id(&self) -> ReportId {
        ReportId::TransactionDynamics
    }

    fn render(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter) -> InsightsResult<Vec<Panel>> {
        let period = scope.period;
        let mut panels = Vec::new();

        let region_totals = ctx.agg.region_transaction_totals(period)?;
        panels.push(ctx.choropleth(
            format!(
                "Total Transaction Amount by State ({}, {})",
                period.quarter, period.year
            ),
            "Transaction Amount",
            "Turbo",
            region_totals.clone(),
        ));

        let categories = ctx.agg.category_breakdown(scope)?;
        panels.push(Panel::chart(
            Chart::new(ChartKind::Pie, "Transaction Count by Payment Method").series(
                "Count",
                categories
                    .iter()
                    .map(|c| Point::labelled(&c.category, c.count as f64))
                    .collect(),
            ),
        ));
        panels.push(Panel::chart(
            Chart::new(ChartKind::Pie, "Transaction Amount by Payment Method").series(
                "Amount",
                categories
                    .iter()
                    .map(|c| Point::labelled(&c.category, c.amount))
                    .collect(),
            ),
        ));

        let top = match &scope.region {
            RegionScope::All => ctx.agg.top_states(period, ctx.config.limits.states)?,
            RegionScope::Named(name) => region_totals
                .into_iter()
                .filter(|r| &r.name == name)
                .collect(),
        };
        panels.push(Panel::chart(
            Chart::new(ChartKind::Bar, "Top Transaction States")
                .axes("State", "Transaction Amount")
                .series(
                    "Amount",
                    top.iter().map(|r| Point::labelled(&r.name, r.value)).collect(),
                ),
        ));

        let pivot = ctx.agg.category_pivot(scope)?;
        let mut by_category = Chart::new(ChartKind::Line, "Transaction by Payment Category and State")
            .axes("Payment Category", "Transaction Amount");
        for region in pivot.regions() {
            let points: Vec<Point> = pivot
                .row(region)
                .map(|row| {
                    row.iter()
                        .map(|(category, amount)| Point::labelled(category, *amount))
                        .collect()
                })
                .unwrap_or_default();
            by_category = by_category.series(region, points);
        }
        panels.push(Panel::chart(by_category));

        let trend = ctx.agg.transaction_trend(&scope.region)?;
        panels.push(Panel::chart(
            Chart::new(
                ChartKind::Bar,
                format!("Transaction Amount Trend per Quarter - {}", scope.region.label()),
            )
            .axes("Quarter", "Transaction Amount")
            .series(
                "Amount",
                trend.iter().map(|p| Point::labelled(p.label(), p.value)).collect(),
            ),
        ));

        Ok(panels)
    }
}
