//! Report 4: market size, growth and frequency by region.

use super::{ReportId, ReportView, ViewContext};
use crate::{
    error::InsightsResult,
    filter::ScopeFilter,
    panel::{Chart, ChartKind, Panel, Point},
    types::RegionScope,
};

pub struct MarketExpansionReport;

impl ReportView for MarketExpansionReport {
    fn id(&self) -> ReportId {
        ReportId::MarketExpansion
    }

    fn render(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter) -> InsightsResult<Vec<Panel>> {
        let period = scope.period;
        let mut panels = Vec::new();

        let totals = ctx.agg.district_region_totals(period)?;
        panels.push(ctx.choropleth(
            "Total Transaction Amounts by State",
            "Transaction Amount",
            "Viridis",
            totals,
        ));

        // Growth is always nationwide; the region control does not apply.
        let growth = ctx.agg.transaction_trend(&RegionScope::All)?;
        panels.push(Panel::chart(
            Chart::new(ChartKind::Line, "Transaction Growth Over Time (All Regions)")
                .axes("Period", "Transaction Amount")
                .series(
                    "Amount",
                    growth.iter().map(|p| Point::labelled(p.label(), p.value)).collect(),
                ),
        ));

        let points = ctx.agg.market_points(period)?;
        let mut bubble = Chart::new(ChartKind::Scatter, "Market Expansion Opportunities by State")
            .axes("Transaction Count", "Transaction Amount");
        for p in &points {
            bubble = bubble.series(
                &p.name,
                vec![Point::numeric(p.count as f64, p.amount, Some(p.amount))],
            );
        }
        panels.push(Panel::chart(bubble));

        Ok(panels)
    }
}
