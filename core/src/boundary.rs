//! Region boundary document: loading and shape.
//!
//! The document is a GeoJSON FeatureCollection fetched once per process.
//! Failure to get it is never fatal: the loader logs and returns `None`,
//! and every map panel degrades to "map unavailable".

use crate::config::BoundarySource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryDocument {
    #[serde(rename = "type", default = "feature_collection")]
    pub kind: String,
    pub features: Vec<BoundaryFeature>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    #[serde(rename = "type", default = "feature")]
    pub kind: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default)]
    pub geometry: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn feature_collection() -> String {
    "FeatureCollection".into()
}

fn feature() -> String {
    "Feature".into()
}

impl BoundaryFeature {
    /// The join key: the string property holding the region name.
    pub fn region_name(&self, property: &str) -> Option<&str> {
        self.properties.get(property).and_then(Value::as_str)
    }
}

impl BoundaryDocument {
    pub fn from_json_str(json: &str) -> Result<Self, BoundaryError> {
        serde_json::from_str(json).map_err(|e| BoundaryError::Parse(e.to_string()))
    }

    pub fn region_names<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.features.iter().filter_map(move |f| f.region_name(property))
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BoundaryError {
    #[error("boundary source disabled")]
    Disabled,

    #[error("boundary transport error: {0}")]
    Transport(String),

    #[error("boundary fetch returned status {0}")]
    Status(u16),

    #[error("boundary file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("boundary parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BoundaryError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

pub struct BoundaryLoader {
    timeout: Duration,
}

impl BoundaryLoader {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Single attempt, no retry. `None` means every map view degrades.
    pub fn load(&self, source: &BoundarySource) -> Option<BoundaryDocument> {
        match self.try_load(source) {
            Ok(doc) => {
                log::info!("boundary document loaded: {} features", doc.features.len());
                Some(doc)
            }
            Err(BoundaryError::Disabled) => {
                log::info!("boundary document disabled; maps unavailable");
                None
            }
            Err(e) => {
                log::warn!("boundary document unavailable: {e}");
                None
            }
        }
    }

    pub fn try_load(&self, source: &BoundarySource) -> Result<BoundaryDocument, BoundaryError> {
        let body = match source {
            BoundarySource::Url(url) => self.fetch_url(url)?,
            BoundarySource::File(path) => std::fs::read_to_string(path)?,
            BoundarySource::Disabled => return Err(BoundaryError::Disabled),
        };
        BoundaryDocument::from_json_str(&body)
    }

    fn fetch_url(&self, url: &str) -> Result<String, BoundaryError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(15).min(self.timeout))
            .timeout(self.timeout)
            .build()?;
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(BoundaryError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}
