//! Enrichment: attach per-region values, elevation, colour and tooltip
//! text to the boundary features.
//!
//! Recomputed in full on every filter change from the pristine document;
//! the loaded document itself is never modified.

use crate::{
    boundary::BoundaryDocument,
    config::DashboardConfig,
    derived::{CategoryPivot, NamedValue, UserTotals},
    format,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};

/// Aggregates to merge onto the features.
pub struct EnrichmentInput<'a> {
    /// Per-region value driving elevation and colour.
    pub totals: &'a [NamedValue],
    /// Transaction views: one tooltip line per category.
    pub categories: Option<&'a CategoryPivot>,
    /// User views: registered users and app opens lines.
    pub users: Option<&'a [UserTotals]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichedMap {
    pub document: BoundaryDocument,
    /// Features whose region has no aggregate row (rendered with value 0).
    pub unmatched_features: Vec<String>,
    /// Aggregate regions with no feature in the document.
    pub unmatched_regions: Vec<String>,
}

pub struct Enricher<'a> {
    region_property: &'a str,
    currency_symbol: &'a str,
    elevation_range: f64,
}

impl<'a> Enricher<'a> {
    pub fn new(region_property: &'a str, currency_symbol: &'a str, elevation_range: f64) -> Self {
        Self {
            region_property,
            currency_symbol,
            elevation_range,
        }
    }

    pub fn from_config(config: &'a DashboardConfig) -> Self {
        Self::new(
            &config.boundary_region_property,
            &config.currency_symbol,
            config.elevation_range,
        )
    }

    pub fn enrich(&self, doc: &BoundaryDocument, input: &EnrichmentInput<'_>) -> EnrichedMap {
        let values: HashMap<&str, f64> = input
            .totals
            .iter()
            .map(|t| (t.name.as_str(), t.value))
            .collect();
        let users: HashMap<&str, &UserTotals> = input
            .users
            .unwrap_or_default()
            .iter()
            .map(|u| (u.region.as_str(), u))
            .collect();
        let max_value = input.totals.iter().map(|t| t.value).fold(0.0, f64::max);

        let mut document = doc.clone();
        let mut unmatched_features = Vec::new();
        let mut seen = BTreeSet::new();

        for feature in &mut document.features {
            let name = feature
                .region_name(self.region_property)
                .unwrap_or_default()
                .to_string();
            let value = match values.get(name.as_str()) {
                Some(v) => {
                    seen.insert(name.clone());
                    *v
                }
                None => {
                    unmatched_features.push(name.clone());
                    0.0
                }
            };
            let elevation = scale_elevation(value, max_value, self.elevation_range);
            let tooltip = self.tooltip(&name, value, input, &users);

            let props = &mut feature.properties;
            props.insert("value".into(), json!(value));
            props.insert("elevation".into(), json!(elevation));
            props.insert("fill_color".into(), json!(fill_color(elevation)));
            props.insert("tooltip".into(), Value::String(tooltip));
        }

        let unmatched_regions: Vec<String> = values
            .keys()
            .filter(|r| !seen.contains(**r))
            .map(|r| r.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if !unmatched_features.is_empty() {
            log::warn!(
                "data quality: {} boundary features without aggregate rows: {:?}",
                unmatched_features.len(),
                unmatched_features
            );
        }
        if !unmatched_regions.is_empty() {
            log::warn!(
                "data quality: {} regions without boundary features: {:?}",
                unmatched_regions.len(),
                unmatched_regions
            );
        }

        EnrichedMap {
            document,
            unmatched_features,
            unmatched_regions,
        }
    }

    /// Monetary lines are grouped currency strings. User counts are plain
    /// digits (`Registered Users: 1500`), unlike the grouped metric cards.
    fn tooltip(
        &self,
        name: &str,
        value: f64,
        input: &EnrichmentInput<'_>,
        users: &HashMap<&str, &UserTotals>,
    ) -> String {
        if input.users.is_some() {
            return match users.get(name) {
                Some(u) => format!(
                    "{name}\nRegistered Users: {}\nApp Opens: {}",
                    u.registered, u.app_opens
                ),
                None => format!("{name}\nNo user data available"),
            };
        }

        let mut text = format!("{name}\nTotal: {}", format::currency(value, self.currency_symbol));
        if let Some(row) = input.categories.and_then(|p| p.row(name)) {
            for (category, amount) in row {
                text.push_str(&format!(
                    "\n{category}: {}",
                    format::currency(*amount, self.currency_symbol)
                ));
            }
        }
        text
    }
}

/// `value / max(max_value, 1) * range`, clamped to `[0, range]`.
pub fn scale_elevation(value: f64, max_value: f64, range: f64) -> f64 {
    let denominator = max_value.max(1.0);
    ((value / denominator) * range).clamp(0.0, range)
}

/// Elevations for a whole value set, normalized against its maximum.
pub fn normalized_elevations(values: &[f64], range: f64) -> Vec<f64> {
    let max_value = values.iter().copied().fold(0.0, f64::max);
    values
        .iter()
        .map(|v| scale_elevation(*v, max_value, range))
        .collect()
}

/// RGBA fill: red fades as elevation grows.
pub fn fill_color(elevation: f64) -> [u8; 4] {
    let red = (255.0 - elevation * 2.0).clamp(0.0, 255.0).round() as u8;
    [red, 100, 200, 180]
}
