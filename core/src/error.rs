use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable at '{path}': {reason}")]
    StoreUnavailable { path: String, reason: String },

    #[error("Invalid filter '{field}': {reason}")]
    InvalidFilter { field: &'static str, reason: String },

    #[error("Region '{region}' is not in the region catalog")]
    UnknownRegion { region: String },

    #[error("Report '{id}' not found")]
    UnknownReport { id: String },

    #[error("Dimension '{dimension}' is not available on table '{table}'")]
    UnsupportedDimension {
        table: &'static str,
        dimension: &'static str,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type InsightsResult<T> = Result<T, InsightsError>;
