use insights_core::{
    boundary::BoundaryDocument,
    derived::{CategoryPivot, NamedValue, UserTotals},
    enrichment::{fill_color, normalized_elevations, scale_elevation, Enricher, EnrichmentInput},
};

// ── Test helpers ────────────────────────────────────────────────────────────

fn document(names: &[&str]) -> BoundaryDocument {
    let features: Vec<serde_json::Value> = names
        .iter()
        .map(|n| {
            serde_json::json!({
                "type": "Feature",
                "properties": { "ST_NM": n },
                "geometry": { "type": "Point", "coordinates": [77.0, 12.0] }
            })
        })
        .collect();
    let json = serde_json::json!({ "type": "FeatureCollection", "features": features });
    BoundaryDocument::from_json_str(&json.to_string()).unwrap()
}

fn totals(rows: &[(&str, f64)]) -> Vec<NamedValue> {
    rows.iter()
        .map(|(n, v)| NamedValue { name: n.to_string(), value: *v })
        .collect()
}

fn prop<'a>(doc: &'a BoundaryDocument, idx: usize, key: &str) -> &'a serde_json::Value {
    &doc.features[idx].properties[key]
}

fn enricher() -> Enricher<'static> {
    Enricher::new("ST_NM", "₹", 100.0)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn elevations_normalize_against_maximum() {
    assert_eq!(normalized_elevations(&[0.0, 50.0, 100.0], 100.0), vec![0.0, 50.0, 100.0]);
    assert_eq!(normalized_elevations(&[0.0, 0.0, 0.0], 100.0), vec![0.0, 0.0, 0.0]);
}

/// A maximum below one never inflates small values.
#[test]
fn elevation_denominator_floors_at_one() {
    assert_eq!(scale_elevation(0.5, 0.5, 100.0), 50.0);
    assert_eq!(scale_elevation(0.0, 0.0, 100.0), 0.0);
}

#[test]
fn fill_colour_red_fades_with_elevation() {
    assert_eq!(fill_color(0.0), [255, 100, 200, 180]);
    assert_eq!(fill_color(50.0), [155, 100, 200, 180]);
    assert_eq!(fill_color(100.0), [55, 100, 200, 180]);
}

#[test]
fn enrich_sets_value_elevation_and_colour() {
    let doc = document(&["A", "B", "C"]);
    let rows = totals(&[("A", 0.0), ("B", 50.0), ("C", 100.0)]);
    let map = enricher().enrich(
        &doc,
        &EnrichmentInput { totals: &rows, categories: None, users: None },
    );
    let elevations: Vec<f64> = (0..3)
        .map(|i| prop(&map.document, i, "elevation").as_f64().unwrap())
        .collect();
    assert_eq!(elevations, vec![0.0, 50.0, 100.0]);
    assert_eq!(prop(&map.document, 2, "fill_color"), &serde_json::json!([55, 100, 200, 180]));
    assert!(map.unmatched_features.is_empty());
    assert!(map.unmatched_regions.is_empty());

    // The loaded document is left untouched.
    assert!(doc.features[0].properties.get("elevation").is_none());
}

/// A feature with no aggregate row renders as zero and is reported.
#[test]
fn missing_region_renders_as_zero() {
    let doc = document(&["A", "Lakshadweep"]);
    let rows = totals(&[("A", 10.0), ("Ladakh", 5.0)]);
    let map = enricher().enrich(
        &doc,
        &EnrichmentInput { totals: &rows, categories: None, users: None },
    );
    assert_eq!(prop(&map.document, 1, "value").as_f64(), Some(0.0));
    assert_eq!(prop(&map.document, 1, "elevation").as_f64(), Some(0.0));
    assert_eq!(map.unmatched_features, vec!["Lakshadweep"]);
    assert_eq!(map.unmatched_regions, vec!["Ladakh"]);
}

#[test]
fn transaction_tooltip_lists_categories() {
    let doc = document(&["Karnataka"]);
    let rows = totals(&[("Karnataka", 1_234_567.4)]);
    let pivot = CategoryPivot::from_long(vec![
        ("Karnataka".to_string(), "Merchant payments".to_string(), 1_000_000.0),
        ("Karnataka".to_string(), "Others".to_string(), 234_567.4),
    ]);
    let map = enricher().enrich(
        &doc,
        &EnrichmentInput { totals: &rows, categories: Some(&pivot), users: None },
    );
    assert_eq!(
        prop(&map.document, 0, "tooltip").as_str().unwrap(),
        "Karnataka\nTotal: ₹1,234,567\nMerchant payments: ₹1,000,000\nOthers: ₹234,567"
    );
}

#[test]
fn user_tooltip_shows_counts_or_absence() {
    let doc = document(&["Kerala", "Goa"]);
    let users = vec![UserTotals { region: "Kerala".into(), registered: 1500, app_opens: 42 }];
    let rows = totals(&[("Kerala", 1500.0)]);
    let map = enricher().enrich(
        &doc,
        &EnrichmentInput { totals: &rows, categories: None, users: Some(&users) },
    );
    assert_eq!(
        prop(&map.document, 0, "tooltip").as_str().unwrap(),
        "Kerala\nRegistered Users: 1500\nApp Opens: 42"
    );
    assert_eq!(
        prop(&map.document, 1, "tooltip").as_str().unwrap(),
        "Goa\nNo user data available"
    );
}
