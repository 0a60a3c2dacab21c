//! Home page: map, metric cards and top lists for one metric family.

use super::ViewContext;
use crate::{
    derived::NamedValue,
    enrichment::{Enricher, EnrichmentInput},
    error::InsightsResult,
    filter::{FilterSelection, ScopeFilter},
    format,
    panel::{Page, Panel, RankedEntry},
    types::{MetricFamily, RegionScope},
};

pub const MAP_TITLE: &str = "Map";

pub struct HomeView;

impl HomeView {
    pub fn render(&self, ctx: &ViewContext<'_>, selection: &FilterSelection) -> InsightsResult<Page> {
        let mut page = Page::new(selection.metric.label());
        match selection.metric {
            MetricFamily::Transactions => self.transactions(ctx, &selection.scope, &mut page)?,
            MetricFamily::Users => self.users(ctx, &selection.scope, &mut page)?,
        }
        Ok(page)
    }

    fn transactions(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter, page: &mut Page) -> InsightsResult<()> {
        let limits = &ctx.config.limits;

        page.push(match ctx.boundaries {
            None => Panel::map_unavailable(MAP_TITLE),
            Some(doc) => {
                let totals = ctx.agg.region_transaction_totals(scope.period)?;
                if totals.is_empty() {
                    Panel::no_data(MAP_TITLE)
                } else {
                    let pivot = ctx.agg.category_pivot(&scope.all_regions())?;
                    let enriched = Enricher::from_config(ctx.config).enrich(
                        doc,
                        &EnrichmentInput {
                            totals: &totals,
                            categories: Some(&pivot),
                            users: None,
                        },
                    );
                    Panel::Map {
                        title: MAP_TITLE.into(),
                        document: enriched.document,
                    }
                }
            }
        });

        let totals = ctx.agg.scoped_transaction_totals(scope)?;
        let suffix = match &scope.region {
            RegionScope::All => String::new(),
            RegionScope::Named(name) => format!(" in {name}"),
        };
        page.push(Panel::metric(
            format!("Total Transactions{suffix}"),
            format::grouped(totals.count),
        ));
        page.push(Panel::metric(
            format!("Total Amount{suffix}"),
            ctx.currency(totals.amount),
        ));

        let districts = ctx.agg.top_districts(scope, limits.districts)?;
        page.push(ctx.ranked_amounts(format!("Top {} Districts", limits.districts), &districts));

        let states = ctx.agg.top_states(scope.period, limits.states)?;
        page.push(ctx.ranked_amounts(format!("Top {} States", limits.states), &states));
        Ok(())
    }

    fn users(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter, page: &mut Page) -> InsightsResult<()> {
        let limits = &ctx.config.limits;
        let all = ctx.agg.user_totals(&scope.all_regions())?;

        page.push(match ctx.boundaries {
            None => Panel::map_unavailable(MAP_TITLE),
            Some(_) if all.is_empty() => Panel::no_data(MAP_TITLE),
            Some(doc) => {
                let registered: Vec<NamedValue> = all
                    .iter()
                    .map(|u| NamedValue {
                        name: u.region.clone(),
                        value: u.registered as f64,
                    })
                    .collect();
                let enriched = Enricher::from_config(ctx.config).enrich(
                    doc,
                    &EnrichmentInput {
                        totals: &registered,
                        categories: None,
                        users: Some(&all),
                    },
                );
                Panel::Map {
                    title: MAP_TITLE.into(),
                    document: enriched.document,
                }
            }
        });

        let registered: i64 = all.iter().map(|u| u.registered).sum();
        let opens: i64 = all.iter().map(|u| u.app_opens).sum();
        page.push(Panel::metric("Registered Users", format::grouped(registered)));
        page.push(Panel::metric("App Opens", format::grouped(opens)));

        if let RegionScope::Named(name) = &scope.region {
            match all.iter().find(|u| &u.region == name) {
                Some(u) => {
                    page.push(Panel::metric(
                        format!("Registered Users in {name}"),
                        format::grouped(u.registered),
                    ));
                    page.push(Panel::metric(
                        format!("App Opens in {name}"),
                        format::grouped(u.app_opens),
                    ));
                }
                None => page.push(Panel::notice(
                    format!("{name} Summary"),
                    "No user data available for the selected region.",
                )),
            }
        }

        let top = ctx.agg.top_user_regions(scope.period, limits.states)?;
        page.push(Panel::ranked(
            format!("Top {} States by Total Users", limits.states),
            top.iter()
                .map(|u| RankedEntry {
                    label: u.region.clone(),
                    display: format!("{} users", format::grouped(u.combined())),
                })
                .collect(),
        ));
        Ok(())
    }
}
