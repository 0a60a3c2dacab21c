//! Client requests and the frames the dashboard answers with.

use crate::{
    filter::FilterInput,
    panel::Page,
    sequencer::{RequestSequencer, RequestToken},
    types::MetricFamily,
    views::ReportId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Home {
        metric: MetricFamily,
        #[serde(flatten)]
        filter: FilterInput,
    },
    Report {
        report: ReportId,
        #[serde(flatten)]
        filter: FilterInput,
    },
    /// The region dropdown options, "All Regions" first.
    Regions,
    Quit,
}

impl Request {
    /// Filter changes replace whatever page was pending. Catalog lookups
    /// and `Quit` do not.
    pub fn supersedes_pending(&self) -> bool {
        matches!(self, Self::Home { .. } | Self::Report { .. })
    }

    /// A fresh token for a filter change, the current one otherwise.
    pub fn token(&self, sequencer: &RequestSequencer) -> RequestToken {
        if self.supersedes_pending() {
            sequencer.begin()
        } else {
            sequencer.latest()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Page(Page),
    Regions { options: Vec<String> },
}

/// One answered request, stamped with the token it was issued under.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub session_id:   String,
    pub token:        RequestToken,
    pub generated_at: String,
    pub body:         Response,
}

impl Frame {
    pub fn new(session_id: &str, token: RequestToken, body: Response) -> Self {
        Self {
            session_id:   session_id.to_string(),
            token,
            generated_at: chrono::Utc::now().to_rfc3339(),
            body,
        }
    }
}
