//! Report 3: insurance adoption by region and against the user base.

use super::{ReportId, ReportView, ViewContext};
use crate::{
    derived::NamedValue,
    error::InsightsResult,
    filter::ScopeFilter,
    panel::{Chart, ChartKind, Panel, Point},
};

pub struct InsurancePenetrationReport;

impl ReportView for InsurancePenetrationReport {
    fn id(&self) -> ReportId {
        ReportId::InsurancePenetration
    }

    fn render(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter) -> InsightsResult<Vec<Panel>> {
        let period = scope.period;
        let limit = ctx.config.limits.insurance;
        let mut panels = Vec::new();

        let by_region = ctx.agg.insurance_by_region(period)?;
        panels.push(ctx.choropleth(
            "Insurance Transactions by State",
            "Insurance Transactions",
            "Blues",
            by_region
                .iter()
                .map(|r| NamedValue {
                    name: r.name.clone(),
                    value: r.count as f64,
                })
                .collect(),
        ));

        let leaders = ctx.agg.insurance_leaders(period, limit)?;
        panels.push(Panel::chart(
            Chart::new(
                ChartKind::HorizontalBar,
                format!("Top {limit} States by Insurance Transactions"),
            )
            .axes("Insurance Transactions", "State")
            .series(
                "Insurance Transactions",
                leaders.iter().map(|r| Point::labelled(&r.name, r.value)).collect(),
            ),
        ));

        let quarterly = ctx.agg.insurance_quarterly(period.year, &scope.region)?;
        panels.push(Panel::chart(
            Chart::new(
                ChartKind::Line,
                format!("Quarterly Insurance Trends - {}", period.year),
            )
            .axes("Quarter", "Insurance Transactions")
            .series(
                scope.region.label(),
                quarterly
                    .iter()
                    .map(|q| Point::labelled(q.quarter.to_string(), q.value))
                    .collect(),
            ),
        ));

        let joined = ctx.agg.insurance_vs_users(period)?;
        let mut bubble = Chart::new(
            ChartKind::Scatter,
            "Insurance Transactions vs Registered Users by State",
        )
        .axes("Registered Users", "Insurance Transactions");
        for row in &joined {
            bubble = bubble.series(
                &row.region,
                vec![Point::numeric(
                    row.registered as f64,
                    row.insurance_count as f64,
                    Some(row.insurance_count as f64),
                )],
            );
        }
        panels.push(Panel::chart(bubble));

        Ok(panels)
    }
}
