use serde::{Deserialize, Serialize};

use crate::core::{Viewport, ViewState};
use crate::render::Color;

/// One visual point as painted, with its row identity and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSnapshot {
    pub id: String,
    pub field: String,
    pub x: f64,
    pub y: f64,
    pub color: Color,
    pub alpha: f64,
    pub selected: bool,
    pub highlighted: bool,
}

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSnapshot {
    pub viewport: Viewport,
    pub view: ViewState,
    pub x_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub x_title: String,
    pub y_title: String,
    pub fields: Vec<String>,
    pub pending_fields: Vec<String>,
    pub highlighted_count: usize,
    /// Points back to front.
    pub points: Vec<PointSnapshot>,
}
