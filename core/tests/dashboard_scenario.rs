//! End-to-end: facts in the store, a boundary document, one filter
//! selection, and the rendered home page.

use insights_core::{
    boundary::BoundaryDocument,
    config::DashboardConfig,
    dashboard::Dashboard,
    facts::{LocalityFact, TransactionFact, UserFact},
    filter::FilterInput,
    panel::Panel,
    request::{Request, Response},
    store::InsightsStore,
    types::{MetricFamily, Quarter, ALL_REGIONS},
};

// ── Test helpers ────────────────────────────────────────────────────────────

fn boundaries(names: &[&str]) -> BoundaryDocument {
    let features: Vec<serde_json::Value> = names
        .iter()
        .map(|n| serde_json::json!({ "type": "Feature", "properties": { "ST_NM": n }, "geometry": null }))
        .collect();
    BoundaryDocument::from_json_str(
        &serde_json::json!({ "type": "FeatureCollection", "features": features }).to_string(),
    )
    .unwrap()
}

fn seeded_store() -> InsightsStore {
    let store = InsightsStore::in_memory().unwrap();
    store.migrate().unwrap();
    let q3 = Quarter::new(3).unwrap();
    let rows = [
        ("Karnataka", "Merchant payments", 100, 10_000.0),
        ("Karnataka", "Peer-to-peer payments", 50, 20_000.0),
        ("Maharashtra", "Merchant payments", 80, 15_000.0),
        ("Maharashtra", "Recharge & bill payments", 40, 2_000.0),
    ];
    for (region, category, count, amount) in rows {
        store
            .insert_transaction_fact(&TransactionFact {
                region: region.into(),
                year: 2022,
                quarter: q3,
                category: category.into(),
                count,
                amount,
            })
            .unwrap();
    }
    let districts = [
        ("Karnataka", "Bengaluru Urban", 25_000.0),
        ("Karnataka", "Mysuru", 5_000.0),
        // No boundary feature exists for this region's districts.
        ("Maharashtra", "Pune", 17_000.0),
    ];
    for (region, district, amount) in districts {
        store
            .insert_district_transaction(&LocalityFact {
                region: region.into(),
                year: 2022,
                quarter: q3,
                locality: district.into(),
                count: 10,
                amount,
            })
            .unwrap();
    }
    store
        .insert_user_fact(&UserFact {
            region: "Karnataka".into(),
            year: 2022,
            quarter: q3,
            district: "Bengaluru Urban".into(),
            registered_users: 12_000,
            app_opens: 300_000,
        })
        .unwrap();
    store
}

fn dashboard(with_boundaries: bool) -> Dashboard {
    let _ = env_logger::builder().is_test(true).try_init();
    let doc = with_boundaries.then(|| boundaries(&["Karnataka", "Kerala"]));
    Dashboard::build(DashboardConfig::default_test(), seeded_store(), doc).unwrap()
}

fn home_request(metric: MetricFamily, region: &str) -> Request {
    Request::Home {
        metric,
        filter: FilterInput { year: 2022, quarter: 3, region: region.into() },
    }
}

fn page_of(response: Option<Response>) -> insights_core::panel::Page {
    match response {
        Some(Response::Page(page)) => page,
        other => panic!("expected a page, got {other:?}"),
    }
}

fn metric_value<'a>(page: &'a insights_core::panel::Page, label: &str) -> &'a str {
    match page.find(label) {
        Some(Panel::Metric { value, .. }) => value,
        other => panic!("no metric {label}: {other:?}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// 2022 Q3, all regions: map, two metric cards, two ranked lists.
#[test]
fn transactions_home_for_2022_q3() {
    let dash = dashboard(true);
    let page = page_of(dash.handle(&home_request(MetricFamily::Transactions, ALL_REGIONS)).unwrap());

    let titles: Vec<&str> = page.panels.iter().map(|p| p.title()).collect();
    assert_eq!(
        titles,
        vec!["Map", "Total Transactions", "Total Amount", "Top 10 Districts", "Top 10 States"]
    );
    assert_eq!(metric_value(&page, "Total Transactions"), "270");
    assert_eq!(metric_value(&page, "Total Amount"), "₹47,000");

    let Some(Panel::Map { document, .. }) = page.find("Map") else {
        panic!("map missing");
    };
    assert_eq!(document.features.len(), 2);
    let ka = &document.features[0].properties;
    assert_eq!(
        ka["tooltip"].as_str().unwrap(),
        "Karnataka\nTotal: ₹30,000\nMerchant payments: ₹10,000\nPeer-to-peer payments: ₹20,000\nRecharge & bill payments: ₹0"
    );
    assert_eq!(ka["elevation"].as_f64(), Some(100.0));
    let kerala = &document.features[1].properties;
    assert_eq!(kerala["value"].as_f64(), Some(0.0));

    let Some(Panel::RankedList { entries, .. }) = page.find("Top 10 Districts") else {
        panic!("district list missing");
    };
    let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Bengaluru Urban", "Pune", "Mysuru"]);
    assert_eq!(entries[0].display, "₹25,000");

    let Some(Panel::RankedList { entries, .. }) = page.find("Top 10 States") else {
        panic!("state list missing");
    };
    assert_eq!(entries[0].label, "Karnataka");
}

#[test]
fn region_filter_scopes_metric_cards() {
    let dash = dashboard(true);
    let page = page_of(dash.handle(&home_request(MetricFamily::Transactions, "Maharashtra")).unwrap());
    assert_eq!(metric_value(&page, "Total Transactions in Maharashtra"), "120");
    assert_eq!(metric_value(&page, "Total Amount in Maharashtra"), "₹17,000");
}

#[test]
fn users_home_reports_missing_region_data() {
    let dash = dashboard(true);
    let page = page_of(dash.handle(&home_request(MetricFamily::Users, "Maharashtra")).unwrap());
    assert_eq!(metric_value(&page, "Registered Users"), "12,000");
    assert_eq!(metric_value(&page, "App Opens"), "300,000");
    assert!(page.find("Maharashtra Summary").is_some_and(Panel::is_notice));

    let page = page_of(dash.handle(&home_request(MetricFamily::Users, "Karnataka")).unwrap());
    assert_eq!(metric_value(&page, "Registered Users in Karnataka"), "12,000");
    let Some(Panel::RankedList { entries, .. }) = page.find("Top 10 States by Total Users") else {
        panic!("user ranking missing");
    };
    assert_eq!(entries[0].display, "312,000 users");
}

/// Without boundaries every other panel still renders.
#[test]
fn missing_boundaries_degrade_only_the_map() {
    let dash = dashboard(false);
    let page = page_of(dash.handle(&home_request(MetricFamily::Transactions, ALL_REGIONS)).unwrap());
    assert!(matches!(page.find("Map"), Some(Panel::MapUnavailable { .. })));
    assert_eq!(metric_value(&page, "Total Amount"), "₹47,000");
}

#[test]
fn empty_quarter_renders_notices_not_errors() {
    let dash = dashboard(true);
    let request = Request::Home {
        metric: MetricFamily::Transactions,
        filter: FilterInput { year: 2019, quarter: 1, region: ALL_REGIONS.into() },
    };
    let page = page_of(dash.handle(&request).unwrap());
    assert!(page.find("Map").is_some_and(Panel::is_notice));
    assert!(page.find("Top 10 Districts").is_some_and(Panel::is_notice));
    assert_eq!(metric_value(&page, "Total Transactions"), "0");
}

#[test]
fn unknown_region_is_rejected() {
    let dash = dashboard(true);
    assert!(dash.handle(&home_request(MetricFamily::Transactions, "Atlantis")).is_err());
}

#[test]
fn regions_request_lists_catalog() {
    let dash = dashboard(false);
    match dash.handle(&Request::Regions).unwrap() {
        Some(Response::Regions { options }) => {
            assert_eq!(options, vec![ALL_REGIONS, "Karnataka", "Maharashtra"]);
        }
        other => panic!("unexpected response {other:?}"),
    }
    assert!(dash.handle(&Request::Quit).unwrap().is_none());
}

/// Only the newest request's frame is delivered.
#[test]
fn superseded_requests_are_dropped() {
    let dash = dashboard(false);
    let request = home_request(MetricFamily::Transactions, ALL_REGIONS);

    let stale = dash.submit(&request);
    let fresh = dash.submit(&request);
    assert!(dash.render_frame(stale, &request).unwrap().is_none());

    let frame = dash.render_frame(fresh, &request).unwrap().unwrap();
    assert_eq!(frame.token, fresh);
    assert_eq!(frame.session_id, dash.session_id);
}

/// A catalog lookup sent while a page renders must not cancel that page.
#[test]
fn regions_lookup_does_not_supersede_pending_page() {
    let dash = dashboard(false);
    let home = home_request(MetricFamily::Transactions, ALL_REGIONS);

    let home_token = dash.submit(&home);
    let regions_token = dash.submit(&Request::Regions);
    assert_eq!(regions_token, home_token);

    let regions = dash.render_frame(regions_token, &Request::Regions).unwrap();
    assert!(matches!(regions.map(|f| f.body), Some(Response::Regions { .. })));

    let frame = dash.render_frame(home_token, &home).unwrap();
    assert!(matches!(frame.map(|f| f.body), Some(Response::Page(_))));
}

/// A lookup is answered even after a newer filter change was issued.
#[test]
fn regions_lookup_answered_under_older_token() {
    let dash = dashboard(false);
    let home = home_request(MetricFamily::Transactions, ALL_REGIONS);

    let lookup = dash.submit(&Request::Regions);
    dash.submit(&home);
    assert!(dash.render_frame(lookup, &Request::Regions).unwrap().is_some());
}

#[test]
fn requests_parse_from_json_lines() {
    let request: Request = serde_json::from_str(
        r#"{"type": "report", "report": "market_expansion", "year": 2022, "quarter": 3, "region": "Karnataka"}"#,
    )
    .unwrap();
    assert!(matches!(request, Request::Report { .. }));

    let request: Request =
        serde_json::from_str(r#"{"type": "home", "metric": "users", "year": 2021, "quarter": 4}"#).unwrap();
    assert_eq!(
        request,
        Request::Home {
            metric: MetricFamily::Users,
            filter: FilterInput { year: 2021, quarter: 4, region: ALL_REGIONS.into() },
        }
    );
}

/// Rendering the same page twice reuses cached aggregates.
#[test]
fn repeated_render_is_served_from_cache() {
    let dash = dashboard(true);
    let request = home_request(MetricFamily::Transactions, ALL_REGIONS);
    dash.handle(&request).unwrap();
    let after_first = dash.cache_stats();
    dash.handle(&request).unwrap();
    let after_second = dash.cache_stats();
    assert_eq!(after_first.entries, after_second.entries);
    assert_eq!(after_second.misses, after_first.misses);
    assert!(after_second.hits > after_first.hits);
}
