//! Derived tables: the typed projections views bind to widgets.
//!
//! Every table here is computed fresh for one filter selection and never
//! mutated afterwards. The helpers at the bottom are the pure reshaping
//! steps (pivot, ratio, ranking, join) shared by the aggregation layer.

use crate::types::{Period, Quarter, RegionName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Count and amount for one transaction category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub count: i64,
    pub amount: f64,
}

/// A single named measure: a region total, a district amount, a brand count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

/// Count and amount for one named group (usually a region).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountAmount {
    pub name: String,
    pub count: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTotals {
    pub region: RegionName,
    pub registered: i64,
    pub app_opens: i64,
}

impl UserTotals {
    /// Registered users plus app opens; the "total users" ranking key.
    pub fn combined(&self) -> i64 {
        self.registered + self.app_opens
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodValue {
    pub period: Period,
    pub value: f64,
}

impl PeriodValue {
    pub fn label(&self) -> String {
        self.period.label()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandTrendPoint {
    pub period: Period,
    pub brand: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterValue {
    pub quarter: Quarter,
    pub value: f64,
}

/// App opens per registered user. `ratio` is `None` when nobody registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementRatio {
    pub region: RegionName,
    pub registered: i64,
    pub app_opens: i64,
    pub ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceVsUsers {
    pub region: RegionName,
    pub registered: i64,
    pub insurance_count: i64,
}

/// Region-indexed, category-keyed amounts. Every (region, category) cell
/// is present; combinations absent from the long rows hold 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPivot {
    pub categories: Vec<String>,
    pub cells: BTreeMap<RegionName, BTreeMap<String, f64>>,
}

impl CategoryPivot {
    /// Reshape long `(region, category, amount)` rows.
    pub fn from_long<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String, f64)>,
    {
        let rows: Vec<_> = rows.into_iter().collect();
        let categories: BTreeSet<String> = rows.iter().map(|(_, c, _)| c.clone()).collect();

        let mut cells: BTreeMap<RegionName, BTreeMap<String, f64>> = BTreeMap::new();
        for (region, _, _) in &rows {
            cells.entry(region.clone()).or_insert_with(|| {
                categories.iter().map(|c| (c.clone(), 0.0)).collect()
            });
        }
        for (region, category, amount) in rows {
            if let Some(row) = cells.get_mut(&region) {
                *row.entry(category).or_insert(0.0) += amount;
            }
        }

        Self {
            categories: categories.into_iter().collect(),
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn row(&self, region: &str) -> Option<&BTreeMap<String, f64>> {
        self.cells.get(region)
    }

    pub fn get(&self, region: &str, category: &str) -> f64 {
        self.row(region)
            .and_then(|row| row.get(category))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn region_total(&self, region: &str) -> f64 {
        self.row(region).map(|row| row.values().sum()).unwrap_or(0.0)
    }
}

/// Opens / registered, rounded to 2 decimals. Zero registered → `None`.
pub fn engagement_ratio(app_opens: i64, registered: i64) -> Option<f64> {
    if registered == 0 {
        return None;
    }
    let ratio = app_opens as f64 / registered as f64;
    Some((ratio * 100.0).round() / 100.0)
}

/// Sort descending by `value`, ties by `key` ascending, keep the first `n`.
pub fn rank_top<T, V, K>(mut rows: Vec<T>, n: usize, value: V, key: K) -> Vec<T>
where
    V: Fn(&T) -> f64,
    K: Fn(&T) -> &str,
{
    rows.sort_by(|a, b| {
        value(b)
            .total_cmp(&value(a))
            .then_with(|| key(a).cmp(key(b)))
    });
    rows.truncate(n);
    rows
}

/// Top-`n` regions by engagement ratio. Regions with an undefined ratio
/// are left out rather than ranked.
pub fn rank_engagement(rows: &[EngagementRatio], n: usize) -> Vec<EngagementRatio> {
    let defined: Vec<EngagementRatio> = rows.iter().filter(|r| r.ratio.is_some()).cloned().collect();
    rank_top(defined, n, |r| r.ratio.unwrap_or(0.0), |r| r.region.as_str())
}

/// Inner join on region name. Output follows the order of `users`.
pub fn join_insurance_users(users: &[UserTotals], insurance: &[CountAmount]) -> Vec<InsuranceVsUsers> {
    let by_region: HashMap<&str, i64> = insurance
        .iter()
        .map(|row| (row.name.as_str(), row.count))
        .collect();
    users
        .iter()
        .filter_map(|u| {
            by_region.get(u.region.as_str()).map(|&count| InsuranceVsUsers {
                region: u.region.clone(),
                registered: u.registered,
                insurance_count: count,
            })
        })
        .collect()
}

/// Ascending chronological order on the (year, quarter) tuple.
pub fn sort_chronologically(rows: &mut [PeriodValue]) {
    rows.sort_by_key(|r| r.period);
}
