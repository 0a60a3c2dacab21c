//! Report 2: device brands and how actively registered users open the app.

use super::{ReportId, ReportView, ViewContext};
use crate::{
    error::InsightsResult,
    filter::ScopeFilter,
    panel::{Chart, ChartKind, Panel, Point},
};
use std::collections::BTreeMap;

pub struct DeviceEngagementReport;

impl ReportView for DeviceEngagementReport {
    fn id(&self) -> ReportId {
        ReportId::DeviceEngagement
    }

    fn render(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter) -> InsightsResult<Vec<Panel>> {
        let period = scope.period;
        let mut panels = Vec::new();

        let brands = ctx.agg.brand_ranking(scope, ctx.config.limits.brands)?;
        panels.push(Panel::chart(
            Chart::new(
                ChartKind::Bar,
                format!(
                    "Top Brands - {} {} ({})",
                    period.quarter,
                    period.year,
                    scope.region.label()
                ),
            )
            .axes("Brand", "User Count")
            .series(
                "Users",
                brands.iter().map(|b| Point::labelled(&b.name, b.value)).collect(),
            ),
        ));

        let users = ctx.agg.user_totals(scope)?;
        let mut scatter = Chart::new(
            ChartKind::Scatter,
            "User Engagement: App Opens vs Registered Users",
        )
        .axes("Registered Users", "App Opens");
        for u in &users {
            scatter = scatter.series(
                &u.region,
                vec![Point::numeric(
                    u.registered as f64,
                    u.app_opens as f64,
                    Some(u.registered as f64),
                )],
            );
        }
        panels.push(Panel::chart(scatter));

        let share = ctx.agg.brand_share(scope)?;
        panels.push(Panel::chart(
            Chart::new(ChartKind::Pie, "Device Brand Market Share").series(
                "Users",
                share.iter().map(|b| Point::labelled(&b.name, b.value)).collect(),
            ),
        ));

        let trend = ctx.agg.brand_trend(&scope.region)?;
        let mut per_brand: BTreeMap<&str, Vec<Point>> = BTreeMap::new();
        for p in &trend {
            per_brand
                .entry(p.brand.as_str())
                .or_default()
                .push(Point::labelled(p.period.label(), p.count as f64));
        }
        let mut lines = Chart::new(
            ChartKind::Line,
            format!("Quarterly Device Usage Trend - {}", scope.region.label()),
        )
        .axes("Quarter", "User Count");
        for (brand, points) in per_brand {
            lines = lines.series(brand, points);
        }
        panels.push(Panel::chart(lines));

        Ok(panels)
    }
}
