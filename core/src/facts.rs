//! Fact rows as stored in the fact tables.
//!
//! The dashboard only reads facts. These types exist for the demo-data
//! generator and for test fixtures.

use crate::types::{Quarter, RegionName, Year};
use serde::{Deserialize, Serialize};

/// `aggregated_transaction`: one row per (region, period, category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionFact {
    pub region: RegionName,
    pub year: Year,
    pub quarter: Quarter,
    pub category: String,
    pub count: i64,
    pub amount: f64,
}

/// A count/amount pair below region level. Used for `map_transaction`,
/// `map_insurance` (district localities) and `top_insurance` (pincodes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalityFact {
    pub region: RegionName,
    pub year: Year,
    pub quarter: Quarter,
    pub locality: String,
    pub count: i64,
    pub amount: f64,
}

/// `aggregated_user`: device brand usage per (region, period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandFact {
    pub region: RegionName,
    pub year: Year,
    pub quarter: Quarter,
    pub brand: String,
    pub count: i64,
    pub share: f64,
}

/// `map_user`: registered users and app opens per district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFact {
    pub region: RegionName,
    pub year: Year,
    pub quarter: Quarter,
    pub district: String,
    pub registered_users: i64,
    pub app_opens: i64,
}

/// `aggregated_insurance`: insurance totals per (region, period).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceFact {
    pub region: RegionName,
    pub year: Year,
    pub quarter: Quarter,
    pub count: i64,
    pub amount: f64,
}
