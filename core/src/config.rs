use crate::types::Year;
use serde::{Deserialize, Serialize};

/// Where the region boundary document comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum BoundarySource {
    Url(String),
    File(String),
    Disabled,
}

impl BoundarySource {
    /// `http(s)://...` becomes a URL source, anything else a file path.
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(location.to_string())
        }
    }
}

/// Row caps for every ranking view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingLimits {
    pub districts: usize,
    pub states: usize,
    pub brands: usize,
    pub insurance: usize,
    pub engagement: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            districts:  10,
            states:     10,
            brands:     15,
            insurance:  15,
            engagement: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub database_path: String,
    pub boundary_source: BoundarySource,
    /// Feature property holding the region name in the boundary document.
    pub boundary_region_property: String,
    pub year_min: Year,
    pub year_max: Year,
    pub currency_symbol: String,
    #[serde(default)]
    pub limits: RankingLimits,
    /// Upper bound of the normalized map elevation.
    pub elevation_range: f64,
    pub boundary_timeout_secs: u64,
}

const DEFAULT_BOUNDARY_URL: &str = "https://gist.githubusercontent.com/jbrobst/56c13bbbf9d97d187fea01ca62ea5112/raw/e388c4cae20aa53cb5090210a42ebb9b765c0a36/india_states.geojson";

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database_path: "insights.db".into(),
            boundary_source: BoundarySource::Url(DEFAULT_BOUNDARY_URL.into()),
            boundary_region_property: "ST_NM".into(),
            year_min: 2018,
            year_max: 2024,
            currency_symbol: "₹".into(),
            limits: RankingLimits::default(),
            elevation_range: 100.0,
            boundary_timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file. Missing keys are an error except `limits`.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// In-memory store, no boundary fetch.
    pub fn default_test() -> Self {
        Self {
            database_path: ":memory:".into(),
            boundary_source: BoundarySource::Disabled,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.year_min > self.year_max {
            anyhow::bail!(
                "year_min {} is after year_max {}",
                self.year_min,
                self.year_max
            );
        }
        let l = &self.limits;
        if [l.districts, l.states, l.brands, l.insurance, l.engagement].contains(&0) {
            anyhow::bail!("ranking limits must be > 0");
        }
        if self.elevation_range.is_nan() || self.elevation_range <= 0.0 {
            anyhow::bail!("elevation_range must be positive");
        }
        if self.boundary_region_property.trim().is_empty() {
            anyhow::bail!("boundary_region_property must not be empty");
        }
        Ok(())
    }

    pub fn years(&self) -> std::ops::RangeInclusive<Year> {
        self.year_min..=self.year_max
    }
}
