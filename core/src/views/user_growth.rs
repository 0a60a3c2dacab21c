//! Report 5: registered users, app engagement and growth headroom.

use super::{ReportId, ReportView, ViewContext};
use crate::{
    derived::{rank_engagement, NamedValue},
    error::InsightsResult,
    filter::ScopeFilter,
    panel::{Chart, ChartKind, Panel, Point},
};

pub struct UserGrowthReport;

impl ReportView for UserGrowthReport {
    fn id(&self) -> ReportId {
        ReportId::UserGrowth
    }

    fn render(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter) -> InsightsResult<Vec<Panel>> {
        let period = scope.period;
        let mut panels = Vec::new();

        let users = ctx.agg.user_totals(&scope.all_regions())?;
        panels.push(ctx.choropleth(
            format!("Registered Users by State ({}, {})", period.quarter, period.year),
            "Registered Users",
            "YlGnBu",
            users
                .iter()
                .map(|u| NamedValue {
                    name: u.region.clone(),
                    value: u.registered as f64,
                })
                .collect(),
        ));

        let opens = ctx.agg.app_opens_trend(&scope.region)?;
        panels.push(Panel::chart(
            Chart::new(
                ChartKind::Line,
                format!("App Opens Over Time - {}", scope.region.label()),
            )
            .axes("Quarter", "App Opens")
            .series(
                "App Opens",
                opens.iter().map(|p| Point::labelled(p.label(), p.value)).collect(),
            ),
        ));

        let ratios = ctx.agg.engagement_ratios(period)?;
        let top = rank_engagement(&ratios, ctx.config.limits.engagement);
        panels.push(Panel::chart(
            Chart::new(ChartKind::Bar, "Top States by App Opens per Registered User")
                .axes("State", "Engagement Ratio")
                .series(
                    "Engagement Ratio",
                    top.iter()
                        .map(|r| Point::labelled(&r.region, r.ratio.unwrap_or(0.0)))
                        .collect(),
                ),
        ));

        let mut bubble = Chart::new(ChartKind::Scatter, "User Growth vs Engagement")
            .axes("Registered Users", "App Opens");
        for r in &ratios {
            bubble = bubble.series(
                &r.region,
                vec![Point::numeric(r.registered as f64, r.app_opens as f64, r.ratio)],
            );
        }
        panels.push(Panel::chart(bubble));

        Ok(panels)
    }
}
