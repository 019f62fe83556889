use serde::{Deserialize, Serialize};

use crate::core::{Easing, Viewport};
use crate::error::{PlotError, PlotResult};
use crate::interaction::{MouseMode, ZoomBehavior};
use crate::overlay::OverlayStyle;
use crate::render::Color;
use crate::surface::PointPalette;

/// Fill and outline of the active brush rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushStyle {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f64,
}

impl Default for BrushStyle {
    fn default() -> Self {
        Self {
            fill_color: Color::from_hex(0x777777).with_alpha(0.3),
            stroke_color: Color::from_hex(0xffffff),
            stroke_width: 1.0,
        }
    }
}

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load plot setup
/// without inventing their own ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotEngineConfig {
    pub viewport: Viewport,
    #[serde(default = "default_palette")]
    pub palette: PointPalette,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_overlay_style")]
    pub overlay: OverlayStyle,
    #[serde(default = "default_brush_style")]
    pub brush: BrushStyle,
    #[serde(default = "default_point_radius")]
    pub point_radius: f64,
    /// Fraction of a column's span added on each side of its axis domain.
    #[serde(default = "default_data_border_buffer")]
    pub data_border_buffer: f64,
    #[serde(default = "default_point_opacity")]
    pub point_opacity: f64,
    #[serde(default = "default_zoom_behavior")]
    pub zoom: ZoomBehavior,
    #[serde(default = "default_transition_duration_ms")]
    pub transition_duration_ms: f64,
    #[serde(default)]
    pub transition_easing: Easing,
    #[serde(default = "default_x_column")]
    pub x_column: String,
    #[serde(default = "default_y_column")]
    pub y_column: String,
    #[serde(default)]
    pub color_column: Option<String>,
    #[serde(default)]
    pub mouse_mode: MouseMode,
}

impl PlotEngineConfig {
    /// Creates a config with the deployed defaults for `viewport`.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            palette: default_palette(),
            background_color: default_background_color(),
            overlay: default_overlay_style(),
            brush: default_brush_style(),
            point_radius: default_point_radius(),
            data_border_buffer: default_data_border_buffer(),
            point_opacity: default_point_opacity(),
            zoom: default_zoom_behavior(),
            transition_duration_ms: default_transition_duration_ms(),
            transition_easing: Easing::default(),
            x_column: default_x_column(),
            y_column: default_y_column(),
            color_column: None,
            mouse_mode: MouseMode::default(),
        }
    }

    /// Sets the initial X/Y columns.
    #[must_use]
    pub fn with_axes(mut self, x_column: impl Into<String>, y_column: impl Into<String>) -> Self {
        self.x_column = x_column.into();
        self.y_column = y_column.into();
        self
    }

    #[must_use]
    pub fn with_color_column(mut self, column: Option<String>) -> Self {
        self.color_column = column;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: PointPalette) -> Self {
        self.palette = palette;
        self
    }

    #[must_use]
    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }

    #[must_use]
    pub fn with_point_opacity(mut self, opacity: f64) -> Self {
        self.point_opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_data_border_buffer(mut self, border: f64) -> Self {
        self.data_border_buffer = border;
        self
    }

    #[must_use]
    pub fn with_zoom_behavior(mut self, zoom: ZoomBehavior) -> Self {
        self.zoom = zoom;
        self
    }

    /// Sets axis-switch animation length; zero snaps immediately.
    #[must_use]
    pub fn with_transition(mut self, duration_ms: f64, easing: Easing) -> Self {
        self.transition_duration_ms = duration_ms;
        self.transition_easing = easing;
        self
    }

    #[must_use]
    pub fn with_mouse_mode(mut self, mode: MouseMode) -> Self {
        self.mouse_mode = mode;
        self
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PlotError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_palette() -> PointPalette {
    PointPalette::default()
}

fn default_background_color() -> Color {
    Color::from_hex(0x1b1b1b)
}

fn default_overlay_style() -> OverlayStyle {
    OverlayStyle::default()
}

fn default_brush_style() -> BrushStyle {
    BrushStyle::default()
}

fn default_point_radius() -> f64 {
    3.0
}

fn default_data_border_buffer() -> f64 {
    0.07
}

fn default_point_opacity() -> f64 {
    0.3
}

fn default_zoom_behavior() -> ZoomBehavior {
    ZoomBehavior::default()
}

fn default_transition_duration_ms() -> f64 {
    1000.0
}

fn default_x_column() -> String {
    "ra".to_owned()
}

fn default_y_column() -> String {
    "dec".to_owned()
}
