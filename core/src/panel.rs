//! Panels: the widget descriptions a renderer draws.
//!
//! RULE: Views never emit an empty chart, list or map. The constructors
//! below turn an empty table into a Notice, so every chart-producing path
//! degrades the same way.

use crate::{boundary::BoundaryDocument, derived::NamedValue};
use serde::Serialize;

pub const NO_DATA_MESSAGE: &str = "No data for this selection.";
pub const MAP_UNAVAILABLE_MESSAGE: &str = "Map unavailable: region boundaries could not be loaded.";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Panel {
    /// Extruded map over the enriched boundary document.
    Map {
        title: String,
        document: BoundaryDocument,
    },
    /// Filled map: the renderer joins `cells` to features by region name.
    Choropleth {
        title: String,
        metric: String,
        color_scale: String,
        join_property: String,
        cells: Vec<NamedValue>,
    },
    MapUnavailable {
        title: String,
        message: String,
    },
    Metric {
        label: String,
        value: String,
    },
    RankedList {
        title: String,
        entries: Vec<RankedEntry>,
    },
    Chart(Chart),
    Notice {
        title: String,
        message: String,
    },
}

impl Panel {
    pub fn notice(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Notice {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn no_data(title: impl Into<String>) -> Self {
        Self::notice(title, NO_DATA_MESSAGE)
    }

    pub fn map_unavailable(title: impl Into<String>) -> Self {
        Self::MapUnavailable {
            title: title.into(),
            message: MAP_UNAVAILABLE_MESSAGE.into(),
        }
    }

    pub fn metric(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Metric {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A chart, or a notice if no series carries a point.
    pub fn chart(chart: Chart) -> Self {
        if chart.is_empty() {
            Self::no_data(chart.title)
        } else {
            Self::Chart(chart)
        }
    }

    pub fn ranked(title: impl Into<String>, entries: Vec<RankedEntry>) -> Self {
        let title = title.into();
        if entries.is_empty() {
            Self::no_data(title)
        } else {
            Self::RankedList { title, entries }
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Map { title, .. }
            | Self::Choropleth { title, .. }
            | Self::MapUnavailable { title, .. }
            | Self::RankedList { title, .. }
            | Self::Notice { title, .. } => title,
            Self::Metric { label, .. } => label,
            Self::Chart(chart) => &chart.title,
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self, Self::Notice { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub label: String,
    pub display: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Pie,
    Bar,
    HorizontalBar,
    Line,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValue {
    Label(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: AxisValue,
    pub y: f64,
    /// Bubble size for scatter charts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl Point {
    pub fn labelled(x: impl Into<String>, y: f64) -> Self {
        Self { x: AxisValue::Label(x.into()), y, size: None }
    }

    pub fn numeric(x: f64, y: f64, size: Option<f64>) -> Self {
        Self { x: AxisValue::Number(x), y, size }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Chart {
    pub fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
        }
    }

    pub fn axes(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn series(mut self, name: impl Into<String>, points: Vec<Point>) -> Self {
        self.series.push(Series { name: name.into(), points });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// One rendered view: a title and its panels, top to bottom.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), panels: Vec::new() }
    }

    pub fn push(&mut self, panel: Panel) {
        self.panels.push(panel);
    }

    pub fn find(&self, title: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.title() == title)
    }
}
