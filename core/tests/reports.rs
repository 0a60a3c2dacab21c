use insights_core::{
    boundary::BoundaryDocument,
    config::DashboardConfig,
    dashboard::Dashboard,
    demo::{DemoGenerator, DEMO_REGIONS},
    facts::{InsuranceFact, LocalityFact, UserFact},
    filter::ScopeFilter,
    panel::{AxisValue, ChartKind, Panel, Page},
    store::InsightsStore,
    types::{Period, Quarter, RegionScope},
    views::ReportId,
};

// ── Test helpers ────────────────────────────────────────────────────────────

fn boundaries() -> BoundaryDocument {
    let features: Vec<serde_json::Value> = DEMO_REGIONS
        .iter()
        .map(|(n, _)| serde_json::json!({ "type": "Feature", "properties": { "ST_NM": n }, "geometry": null }))
        .collect();
    BoundaryDocument::from_json_str(
        &serde_json::json!({ "type": "FeatureCollection", "features": features }).to_string(),
    )
    .unwrap()
}

fn demo_dashboard(with_boundaries: bool) -> Dashboard {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = InsightsStore::in_memory().unwrap();
    store.migrate().unwrap();
    DemoGenerator::new(42, 2018..=2024).populate(&store).unwrap();
    Dashboard::build(
        DashboardConfig::default_test(),
        store,
        with_boundaries.then(boundaries),
    )
    .unwrap()
}

fn scope(year: i32, q: u8, region: RegionScope) -> ScopeFilter {
    ScopeFilter::new(Period::new(year, Quarter::new(q).unwrap()), region)
}

fn chart<'a>(page: &'a Page, title: &str) -> &'a insights_core::panel::Chart {
    match page.find(title) {
        Some(Panel::Chart(chart)) => chart,
        other => panic!("no chart {title}: {other:?}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Every report renders for a populated quarter, in menu order, with no
/// empty-data notices.
#[test]
fn all_reports_render_for_populated_quarter() {
    let dash = demo_dashboard(true);
    assert_eq!(dash.report_ids(), ReportId::ALL.to_vec());

    let s = scope(2022, 3, RegionScope::All);
    for id in ReportId::ALL {
        let page = dash.render_report(id, &s).unwrap();
        assert_eq!(page.title, id.title());
        assert!(!page.panels.is_empty());
        for panel in &page.panels {
            assert!(!panel.is_notice(), "{}: unexpected notice {:?}", id.title(), panel.title());
        }
    }
}

#[test]
fn transaction_dynamics_panels() {
    let dash = demo_dashboard(true);
    let page = dash
        .render_report(ReportId::TransactionDynamics, &scope(2022, 3, RegionScope::All))
        .unwrap();

    assert!(matches!(
        page.panels[0],
        Panel::Choropleth { ref color_scale, .. } if color_scale == "Turbo"
    ));
    let pie = chart(&page, "Transaction Count by Payment Method");
    assert_eq!(pie.kind, ChartKind::Pie);
    assert_eq!(pie.point_count(), 5);

    let top = chart(&page, "Top Transaction States");
    assert_eq!(top.point_count(), 10);

    let trend = chart(&page, "Transaction Amount Trend per Quarter - All Regions");
    assert_eq!(trend.point_count(), 28);
    assert_eq!(trend.series[0].points[0].x, AxisValue::Label("2018-Q1".into()));
    assert_eq!(trend.series[0].points[4].x, AxisValue::Label("2019-Q1".into()));
}

/// With a region selected the state bar shows only that region.
#[test]
fn transaction_dynamics_scoped_to_region() {
    let dash = demo_dashboard(true);
    let page = dash
        .render_report(
            ReportId::TransactionDynamics,
            &scope(2022, 3, RegionScope::Named("Kerala".into())),
        )
        .unwrap();
    let top = chart(&page, "Top Transaction States");
    assert_eq!(top.point_count(), 1);
    assert_eq!(top.series[0].points[0].x, AxisValue::Label("Kerala".into()));

    let lines = chart(&page, "Transaction by Payment Category and State");
    assert_eq!(lines.series.len(), 1);
    assert_eq!(lines.series[0].name, "Kerala");
}

#[test]
fn device_engagement_brands_are_ranked_and_capped() {
    let dash = demo_dashboard(true);
    let page = dash
        .render_report(ReportId::DeviceEngagement, &scope(2021, 2, RegionScope::All))
        .unwrap();
    let bar = chart(&page, "Top Brands - Q2 2021 (All Regions)");
    let values: Vec<f64> = bar.series[0].points.iter().map(|p| p.y).collect();
    assert!(values.len() <= 15);
    assert!(values.windows(2).all(|w| w[0] >= w[1]));

    let trend = chart(&page, "Quarterly Device Usage Trend - All Regions");
    assert_eq!(trend.series.len(), 10);
}

/// Insurance launched in 2020 Q2; earlier quarters get notices.
#[test]
fn insurance_before_launch_shows_notices() {
    let dash = demo_dashboard(true);
    let page = dash
        .render_report(ReportId::InsurancePenetration, &scope(2019, 1, RegionScope::All))
        .unwrap();
    assert!(page.find("Insurance Transactions by State").is_some_and(Panel::is_notice));
    assert!(page.find("Top 15 States by Insurance Transactions").is_some_and(Panel::is_notice));
    assert!(page.find("Quarterly Insurance Trends - 2019").is_some_and(Panel::is_notice));
}

#[test]
fn insurance_quarterly_trend_covers_year() {
    let dash = demo_dashboard(true);
    let page = dash
        .render_report(ReportId::InsurancePenetration, &scope(2020, 1, RegionScope::All))
        .unwrap();
    let trend = chart(&page, "Quarterly Insurance Trends - 2020");
    let quarters: Vec<&AxisValue> = trend.series[0].points.iter().map(|p| &p.x).collect();
    assert_eq!(
        quarters,
        vec![
            &AxisValue::Label("Q2".into()),
            &AxisValue::Label("Q3".into()),
            &AxisValue::Label("Q4".into())
        ]
    );
}

#[test]
fn maps_unavailable_without_boundaries() {
    let dash = demo_dashboard(false);
    let s = scope(2022, 3, RegionScope::All);
    for id in [
        ReportId::TransactionDynamics,
        ReportId::InsurancePenetration,
        ReportId::MarketExpansion,
        ReportId::UserGrowth,
    ] {
        let page = dash.render_report(id, &s).unwrap();
        assert!(matches!(page.panels[0], Panel::MapUnavailable { .. }));
        assert!(page.panels[1..].iter().all(|p| !matches!(p, Panel::MapUnavailable { .. })));
    }
}

/// Regions with zero registered users stay on the bubble chart but are
/// never ranked by engagement.
#[test]
fn user_growth_excludes_undefined_ratios_from_ranking() {
    let store = InsightsStore::in_memory().unwrap();
    store.migrate().unwrap();
    let q = Quarter::new(2).unwrap();
    for (region, registered, opens) in [("Goa", 0, 500), ("Kerala", 100, 250), ("Assam", 100, 400)] {
        store
            .insert_user_fact(&UserFact {
                region: region.into(),
                year: 2023,
                quarter: q,
                district: format!("{region} district"),
                registered_users: registered,
                app_opens: opens,
            })
            .unwrap();
    }
    let dash = Dashboard::build(DashboardConfig::default_test(), store, None).unwrap();
    let page = dash
        .render_report(ReportId::UserGrowth, &scope(2023, 2, RegionScope::All))
        .unwrap();

    let bar = chart(&page, "Top States by App Opens per Registered User");
    let ranked: Vec<(&AxisValue, f64)> = bar.series[0].points.iter().map(|p| (&p.x, p.y)).collect();
    assert_eq!(
        ranked,
        vec![
            (&AxisValue::Label("Assam".into()), 4.0),
            (&AxisValue::Label("Kerala".into()), 2.5)
        ]
    );

    let bubble = chart(&page, "User Growth vs Engagement");
    assert_eq!(bubble.series.len(), 3);
    let goa = bubble.series.iter().find(|s| s.name == "Goa").unwrap();
    assert_eq!(goa.points[0].size, None);
}

/// The insurance bubble only includes regions present in both tables.
#[test]
fn insurance_vs_users_is_an_inner_join() {
    let store = InsightsStore::in_memory().unwrap();
    store.migrate().unwrap();
    let q = Quarter::new(1).unwrap();
    for region in ["Goa", "Kerala"] {
        store
            .insert_user_fact(&UserFact {
                region: region.into(),
                year: 2022,
                quarter: q,
                district: "d".into(),
                registered_users: 1_000,
                app_opens: 10,
            })
            .unwrap();
    }
    for region in ["Kerala", "Bihar"] {
        store
            .insert_district_insurance(&LocalityFact {
                region: region.into(),
                year: 2022,
                quarter: q,
                locality: "d".into(),
                count: 7,
                amount: 700.0,
            })
            .unwrap();
        store
            .insert_insurance_fact(&InsuranceFact {
                region: region.into(),
                year: 2022,
                quarter: q,
                count: 7,
                amount: 700.0,
            })
            .unwrap();
    }
    let dash = Dashboard::build(DashboardConfig::default_test(), store, None).unwrap();
    let page = dash
        .render_report(ReportId::InsurancePenetration, &scope(2022, 1, RegionScope::All))
        .unwrap();
    let bubble = chart(&page, "Insurance Transactions vs Registered Users by State");
    let names: Vec<&str> = bubble.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Kerala"]);
}

#[test]
fn report_ids_parse_from_number_or_name() {
    assert_eq!("4".parse::<ReportId>().unwrap(), ReportId::MarketExpansion);
    assert_eq!("user_growth".parse::<ReportId>().unwrap(), ReportId::UserGrowth);
    assert!("9".parse::<ReportId>().is_err());
    assert_eq!(
        ReportId::DeviceEngagement.menu_label(),
        "2. Device Dominance and User Engagement Analysis"
    );
}
