//! Report views and the context they render against.
//!
//! RULE: Every report implements ReportView.
//! A report only sees its own ScopeFilter plus the shared, read-only
//! context (aggregator, config, boundary document).
//! Reports never share state with each other.

pub mod device_engagement;
pub mod home;
pub mod insurance_penetration;
pub mod market_expansion;
pub mod transaction_dynamics;
pub mod user_growth;

use crate::{
    aggregation::Aggregator,
    boundary::BoundaryDocument,
    config::DashboardConfig,
    derived::NamedValue,
    error::{InsightsError, InsightsResult},
    filter::ScopeFilter,
    format,
    panel::{Panel, RankedEntry},
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The five business case study reports, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportId {
    TransactionDynamics,
    DeviceEngagement,
    InsurancePenetration,
    MarketExpansion,
    UserGrowth,
}

impl ReportId {
    pub const ALL: [ReportId; 5] = [
        ReportId::TransactionDynamics,
        ReportId::DeviceEngagement,
        ReportId::InsurancePenetration,
        ReportId::MarketExpansion,
        ReportId::UserGrowth,
    ];

    /// 1-based menu position.
    pub fn number(&self) -> u8 {
        match self {
            Self::TransactionDynamics  => 1,
            Self::DeviceEngagement     => 2,
            Self::InsurancePenetration => 3,
            Self::MarketExpansion      => 4,
            Self::UserGrowth           => 5,
        }
    }

    pub fn from_number(n: u8) -> InsightsResult<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.number() == n)
            .ok_or(InsightsError::UnknownReport { id: n.to_string() })
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::TransactionDynamics  => "Decoding Transaction Dynamics",
            Self::DeviceEngagement     => "Device Dominance and User Engagement Analysis",
            Self::InsurancePenetration => "Insurance Penetration and Growth Potential Analysis",
            Self::MarketExpansion      => "Transaction Analysis for Market Expansion",
            Self::UserGrowth           => "User Engagement and Growth Strategy",
        }
    }

    /// Menu entry, e.g. `1. Decoding Transaction Dynamics`.
    pub fn menu_label(&self) -> String {
        format!("{}. {}", self.number(), self.title())
    }

    fn slug(&self) -> &'static str {
        match self {
            Self::TransactionDynamics  => "transaction_dynamics",
            Self::DeviceEngagement     => "device_engagement",
            Self::InsurancePenetration => "insurance_penetration",
            Self::MarketExpansion      => "market_expansion",
            Self::UserGrowth           => "user_growth",
        }
    }
}

impl FromStr for ReportId {
    type Err = InsightsError;

    /// Accepts the menu number or the snake_case name.
    fn from_str(s: &str) -> InsightsResult<Self> {
        if let Ok(n) = s.parse::<u8>() {
            return Self::from_number(n);
        }
        Self::ALL
            .into_iter()
            .find(|r| r.slug() == s)
            .ok_or(InsightsError::UnknownReport { id: s.to_string() })
    }
}

/// Shared read-only state a view renders against.
#[derive(Clone, Copy)]
pub struct ViewContext<'a> {
    pub agg: Aggregator<'a>,
    pub config: &'a DashboardConfig,
    pub boundaries: Option<&'a BoundaryDocument>,
}

impl ViewContext<'_> {
    pub fn currency(&self, amount: f64) -> String {
        format::currency(amount, &self.config.currency_symbol)
    }

    /// A filled map joined on region name, degrading when the boundary
    /// document is missing or the table is empty.
    pub fn choropleth(
        &self,
        title: impl Into<String>,
        metric: &str,
        color_scale: &str,
        cells: Vec<NamedValue>,
    ) -> Panel {
        let title = title.into();
        if self.boundaries.is_none() {
            return Panel::map_unavailable(title);
        }
        if cells.is_empty() {
            return Panel::no_data(title);
        }
        Panel::Choropleth {
            title,
            metric: metric.to_string(),
            color_scale: color_scale.to_string(),
            join_property: self.config.boundary_region_property.clone(),
            cells,
        }
    }

    /// Ranked list of monetary values.
    pub fn ranked_amounts(&self, title: impl Into<String>, rows: &[NamedValue]) -> Panel {
        Panel::ranked(
            title,
            rows.iter()
                .map(|r| RankedEntry {
                    label: r.name.clone(),
                    display: self.currency(r.value),
                })
                .collect(),
        )
    }
}

/// The contract every report page fulfills.
pub trait ReportView: Send {
    fn id(&self) -> ReportId;

    /// Build the report's panels for one filter triple.
    /// Empty tables become notices; only store failures are errors.
    fn render(&self, ctx: &ViewContext<'_>, scope: &ScopeFilter) -> InsightsResult<Vec<Panel>>;
}
