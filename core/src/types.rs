//! Shared primitive types used across the whole dashboard.

use crate::error::{InsightsError, InsightsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar year of fact data.
pub type Year = i32;

/// A region (state) name exactly as stored in the fact tables.
pub type RegionName = String;

/// Label of the "no region filter" entry offered by every region control.
pub const ALL_REGIONS: &str = "All Regions";

/// A calendar quarter, always in 1..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quarter(u8);

impl Quarter {
    pub const Q1: Quarter = Quarter(1);
    pub const Q2: Quarter = Quarter(2);
    pub const Q3: Quarter = Quarter(3);
    pub const Q4: Quarter = Quarter(4);
    pub const ALL: [Quarter; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub fn new(q: u8) -> InsightsResult<Self> {
        if (1..=4).contains(&q) {
            Ok(Self(q))
        } else {
            Err(InsightsError::InvalidFilter {
                field: "quarter",
                reason: format!("{q} is not in 1..=4"),
            })
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Quarter {
    type Error = InsightsError;
    fn try_from(q: u8) -> InsightsResult<Self> {
        Quarter::new(q)
    }
}

impl From<Quarter> for u8 {
    fn from(q: Quarter) -> u8 {
        q.0
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}", self.0)
    }
}

/// A (year, quarter) pair. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: Year,
    pub quarter: Quarter,
}

impl Period {
    pub fn new(year: Year, quarter: Quarter) -> Self {
        Self { year, quarter }
    }

    /// Display label, e.g. `2022-Q3`. Never sort on this.
    pub fn label(&self) -> String {
        format!("{}-Q{}", self.year, self.quarter.get())
    }
}

/// The two metric families offered on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricFamily {
    Transactions,
    Users,
}

impl MetricFamily {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Users        => "Users",
        }
    }
}

/// Either every region or exactly one named region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "name", rename_all = "snake_case")]
pub enum RegionScope {
    All,
    Named(RegionName),
}

impl RegionScope {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name),
        }
    }

    /// Human label used in chart titles.
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_REGIONS,
            Self::Named(name) => name,
        }
    }
}
