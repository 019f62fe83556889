use serde::{Deserialize, Serialize};

use crate::core::{Axis, DataRow, Viewport, ZoomTransform};
use crate::interaction::{BrushPhase, MouseMode};

/// Read-only state snapshot passed to observer hooks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotContext {
    pub viewport: Viewport,
    pub zoom: ZoomTransform,
    pub mouse_mode: MouseMode,
    pub x_column: String,
    pub y_column: String,
    pub color_column: Option<String>,
    pub point_count: usize,
    pub field_count: usize,
}

/// Event stream exposed to hover/detail panes and other observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlotEvent {
    /// Pointer entered a point (`Some`) or left it (`None`).
    Hovered { row: Option<DataRow> },
    Selected { row: DataRow },
    FieldToggled { field: String, enabled: bool },
    FieldLoaded { field: String, rows: usize },
    FieldLoadFailed { field: String, reason: String },
    ZoomChanged { transform: ZoomTransform },
    BrushUpdated { phase: BrushPhase, highlighted: usize },
    MouseModeChanged { mode: MouseMode },
    AxisChanged { axis: Axis, column: String },
    ColorAxisChanged { column: Option<String> },
    Rendered,
}

/// Extension hook interface for hover panes, detail panes and selectors.
///
/// Observers see events and read engine context without mutating engine
/// internals directly.
pub trait PlotObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &PlotEvent, context: &PlotContext);
}
