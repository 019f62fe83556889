use serde::{Deserialize, Serialize};

use crate::core::{Axis, ZoomTransform};
use crate::interaction::MouseMode;

/// Per-plot view context shared by every component of one engine.
///
/// One instance lives for the session of a plot; components receive it
/// explicitly instead of reading globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub x_column: String,
    pub y_column: String,
    #[serde(default)]
    pub color_column: Option<String>,
    #[serde(default)]
    pub zoom: ZoomTransform,
    #[serde(default)]
    pub mouse_mode: MouseMode,
    pub point_opacity: f64,
}

impl ViewState {
    #[must_use]
    pub fn new(x_column: impl Into<String>, y_column: impl Into<String>, opacity: f64) -> Self {
        Self {
            x_column: x_column.into(),
            y_column: y_column.into(),
            color_column: None,
            zoom: ZoomTransform::identity(),
            mouse_mode: MouseMode::PanZoom,
            point_opacity: opacity,
        }
    }

    #[must_use]
    pub fn column(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x_column,
            Axis::Y => &self.y_column,
        }
    }

    pub(crate) fn set_column(&mut self, axis: Axis, column: String) {
        match axis {
            Axis::X => self.x_column = column,
            Axis::Y => self.y_column = column,
        }
    }
}
