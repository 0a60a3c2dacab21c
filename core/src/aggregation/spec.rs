//! Query shapes for the aggregation layer.
//!
//! A spec names a fact table, the dimensions to group by, the measures to
//! sum, the filter and the ordering. Table and column names only ever come
//! from the closed enums below; filter values are always bound parameters.
//! Specs are `Hash + Eq` so they double as memo keys.

use crate::types::{Period, Quarter, RegionScope, Year};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactTable {
    AggregatedTransaction,
    MapTransaction,
    AggregatedUser,
    MapUser,
    AggregatedInsurance,
    MapInsurance,
    TopInsurance,
}

impl FactTable {
    pub const ALL: [FactTable; 7] = [
        FactTable::AggregatedTransaction,
        FactTable::MapTransaction,
        FactTable::AggregatedUser,
        FactTable::MapUser,
        FactTable::AggregatedInsurance,
        FactTable::MapInsurance,
        FactTable::TopInsurance,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            Self::AggregatedTransaction => "aggregated_transaction",
            Self::MapTransaction        => "map_transaction",
            Self::AggregatedUser        => "aggregated_user",
            Self::MapUser               => "map_user",
            Self::AggregatedInsurance   => "aggregated_insurance",
            Self::MapInsurance          => "map_insurance",
            Self::TopInsurance          => "top_insurance",
        }
    }

    pub fn dimension_column(&self, dimension: Dimension) -> Option<&'static str> {
        match (dimension, self) {
            (Dimension::Region, _)  => Some("region"),
            (Dimension::Year, _)    => Some("year"),
            (Dimension::Quarter, _) => Some("quarter"),
            (Dimension::Category, Self::AggregatedTransaction) => Some("category"),
            (Dimension::District, Self::MapTransaction | Self::MapUser | Self::MapInsurance) => {
                Some("district")
            }
            (Dimension::Brand, Self::AggregatedUser)  => Some("brand"),
            (Dimension::Pincode, Self::TopInsurance)  => Some("pincode"),
            _ => None,
        }
    }

    pub fn measure_column(&self, measure: Measure) -> Option<&'static str> {
        match (measure, self) {
            (Measure::TxnCount, Self::AggregatedTransaction | Self::MapTransaction)  => Some("txn_count"),
            (Measure::TxnAmount, Self::AggregatedTransaction | Self::MapTransaction) => Some("txn_amount"),
            (Measure::BrandCount, Self::AggregatedUser)    => Some("brand_count"),
            (Measure::RegisteredUsers, Self::MapUser)      => Some("registered_users"),
            (Measure::AppOpens, Self::MapUser)             => Some("app_opens"),
            (
                Measure::InsuranceCount,
                Self::AggregatedInsurance | Self::MapInsurance | Self::TopInsurance,
            ) => Some("insurance_count"),
            (
                Measure::InsuranceAmount,
                Self::AggregatedInsurance | Self::MapInsurance | Self::TopInsurance,
            ) => Some("insurance_amount"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Region,
    Year,
    Quarter,
    Category,
    District,
    Brand,
    Pincode,
}

impl Dimension {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Region   => "region",
            Self::Year     => "year",
            Self::Quarter  => "quarter",
            Self::Category => "category",
            Self::District => "district",
            Self::Brand    => "brand",
            Self::Pincode  => "pincode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    TxnCount,
    TxnAmount,
    BrandCount,
    RegisteredUsers,
    AppOpens,
    InsuranceCount,
    InsuranceAmount,
}

impl Measure {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TxnCount        => "txn_count",
            Self::TxnAmount       => "txn_amount",
            Self::BrandCount      => "brand_count",
            Self::RegisteredUsers => "registered_users",
            Self::AppOpens        => "app_opens",
            Self::InsuranceCount  => "insurance_count",
            Self::InsuranceAmount => "insurance_amount",
        }
    }
}

/// Row filter. `None` leaves that column unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FactFilter {
    pub year: Option<Year>,
    pub quarter: Option<Quarter>,
    pub region: RegionScope,
}

impl FactFilter {
    /// One quarter, optionally one region.
    pub fn period(period: Period, region: RegionScope) -> Self {
        Self {
            year: Some(period.year),
            quarter: Some(period.quarter),
            region,
        }
    }

    /// Every quarter on record, optionally one region.
    pub fn all_time(region: RegionScope) -> Self {
        Self { year: None, quarter: None, region }
    }

    /// Every quarter of one year, all regions.
    pub fn year(year: Year) -> Self {
        Self { year: Some(year), quarter: None, region: RegionScope::All }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowOrder {
    /// Whatever the store returns.
    Unordered,
    /// By the group-by columns, in declaration order, ascending.
    GroupAscending,
    /// By the measure at this index, descending; ties by group key ascending.
    MeasureDescending(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateSpec {
    pub fact: FactTable,
    pub group_by: Vec<Dimension>,
    pub measures: Vec<Measure>,
    pub filter: FactFilter,
    pub order: RowOrder,
    pub limit: Option<usize>,
}

impl AggregateSpec {
    pub fn new(fact: FactTable, filter: FactFilter) -> Self {
        Self {
            fact,
            group_by: Vec::new(),
            measures: Vec::new(),
            filter,
            order: RowOrder::Unordered,
            limit: None,
        }
    }

    pub fn group_by(mut self, dimensions: &[Dimension]) -> Self {
        self.group_by.extend_from_slice(dimensions);
        self
    }

    pub fn sum(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    pub fn order(mut self, order: RowOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Short name used in logs.
    pub fn shape(&self) -> String {
        let dims: Vec<&str> = self.group_by.iter().map(Dimension::name).collect();
        let measures: Vec<&str> = self.measures.iter().map(Measure::name).collect();
        format!(
            "{}[{}]({})",
            self.fact.table_name(),
            dims.join(","),
            measures.join(",")
        )
    }
}

/// A group-key cell as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum DimValue {
    Text(String),
    Int(i64),
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i)  => write!(f, "{i}"),
        }
    }
}

/// One grouped result row: keys in `group_by` order, sums in `measures` order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub dims: Vec<DimValue>,
    pub measures: Vec<f64>,
}

impl AggregateRow {
    pub fn text(&self, i: usize) -> String {
        self.dims.get(i).map(ToString::to_string).unwrap_or_default()
    }

    pub fn int(&self, i: usize) -> i64 {
        match self.dims.get(i) {
            Some(DimValue::Int(v)) => *v,
            Some(DimValue::Text(s)) => s.parse().unwrap_or_default(),
            None => 0,
        }
    }

    pub fn measure(&self, i: usize) -> f64 {
        self.measures.get(i).copied().unwrap_or(0.0)
    }

    /// Integral measure. Counts are summed as INTEGER by the store.
    pub fn count(&self, i: usize) -> i64 {
        self.measure(i).round() as i64
    }

    /// The (year, quarter) at dimension indices `year_idx`, `year_idx + 1`.
    pub fn period(&self, year_idx: usize) -> Option<Period> {
        let year = self.int(year_idx) as Year;
        let quarter = u8::try_from(self.int(year_idx + 1)).ok()?;
        Quarter::new(quarter).ok().map(|q| Period::new(year, q))
    }
}
