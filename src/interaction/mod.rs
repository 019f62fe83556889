use serde::{Deserialize, Serialize};

use crate::core::{ScreenPoint, ZoomTransform};
use crate::surface::PointHandle;

/// Exclusive canvas input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseMode {
    #[default]
    PanZoom,
    Brush,
}

impl MouseMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::PanZoom => Self::Brush,
            Self::Brush => Self::PanZoom,
        }
    }
}

/// Which pass of a brush gesture is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushPhase {
    Start,
    Move,
    End,
}

/// Normalized brush rectangle in screen pixels (`x0 <= x1`, `y0 <= y1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushRect {
    /// Rectangle spanned by two corners in any order.
    #[must_use]
    pub fn from_corners(a: ScreenPoint, b: ScreenPoint) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.y1 - self.y0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Containment test for a point mark of `radius`.
    ///
    /// Near edges are strict; the far edges are pulled in by the radius so
    /// the whole disc has to fit on those sides.
    #[must_use]
    pub fn contains(self, point: ScreenPoint, radius: f64) -> bool {
        point.x > self.x0
            && point.x < self.x1 - radius
            && point.y > self.y0
            && point.y < self.y1 - radius
    }

    #[must_use]
    pub fn clamped(self, width: f64, height: f64) -> Self {
        Self {
            x0: self.x0.clamp(0.0, width),
            y0: self.y0.clamp(0.0, height),
            x1: self.x1.clamp(0.0, width),
            y1: self.y1.clamp(0.0, height),
        }
    }
}

/// Zoom limits and input sensitivities for PanZoom mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomBehavior {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale exponent per wheel delta unit: `k *= 2^(-delta_y * sensitivity)`.
    pub wheel_sensitivity: f64,
    pub double_click_factor: f64,
}

impl Default for ZoomBehavior {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 20.0,
            wheel_sensitivity: 0.002,
            double_click_factor: 2.0,
        }
    }
}

impl ZoomBehavior {
    #[must_use]
    pub fn wheel_factor(self, delta_y: f64) -> f64 {
        if !delta_y.is_finite() {
            return 1.0;
        }
        2f64.powf(-delta_y * self.wheel_sensitivity)
    }

    #[must_use]
    pub fn wheel(self, transform: ZoomTransform, delta_y: f64, anchor: ScreenPoint) -> ZoomTransform {
        transform.scaled_around(
            self.wheel_factor(delta_y),
            anchor,
            self.min_scale,
            self.max_scale,
        )
    }

    #[must_use]
    pub fn double_click(self, transform: ZoomTransform, anchor: ScreenPoint) -> ZoomTransform {
        transform.scaled_around(
            self.double_click_factor,
            anchor,
            self.min_scale,
            self.max_scale,
        )
    }

    #[must_use]
    pub fn pan(self, start: ZoomTransform, dx: f64, dy: f64) -> ZoomTransform {
        start
            .translated_by(dx, dy)
            .clamped(self.min_scale, self.max_scale)
    }
}

/// What an in-progress drag is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragKind {
    /// Pan relative to the transform captured at drag start.
    Pan { start_transform: ZoomTransform },
    Brush,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub origin: ScreenPoint,
    pub current: ScreenPoint,
    pub kind: DragKind,
}

impl DragGesture {
    #[must_use]
    pub fn delta(self) -> (f64, f64) {
        (
            self.current.x - self.origin.x,
            self.current.y - self.origin.y,
        )
    }

    #[must_use]
    pub fn brush_rect(self) -> BrushRect {
        BrushRect::from_corners(self.origin, self.current)
    }
}

/// Pointer state machine shared by both canvas modes.
///
/// Only one mode is installed at a time; `switch_mode` drops any gesture
/// and brush rectangle of the outgoing mode in the same step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InteractionState {
    mode: MouseMode,
    gesture: Option<DragGesture>,
    brush: Option<BrushRect>,
    hovered: Option<PointHandle>,
    pointer: Option<ScreenPoint>,
}

impl InteractionState {
    #[must_use]
    pub fn new(mode: MouseMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn mode(self) -> MouseMode {
        self.mode
    }

    /// Installs `mode`. Returns `false` if it was already active.
    pub fn switch_mode(&mut self, mode: MouseMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.gesture = None;
        self.brush = None;
        self.mode = mode;
        true
    }

    #[must_use]
    pub fn gesture(self) -> Option<DragGesture> {
        self.gesture
    }

    #[must_use]
    pub fn is_dragging(self) -> bool {
        self.gesture.is_some()
    }

    /// Starts the drag gesture of the current mode at `origin`.
    pub fn begin_drag(&mut self, origin: ScreenPoint, transform: ZoomTransform) -> DragGesture {
        let kind = match self.mode {
            MouseMode::PanZoom => DragKind::Pan {
                start_transform: transform,
            },
            MouseMode::Brush => DragKind::Brush,
        };
        let gesture = DragGesture {
            origin,
            current: origin,
            kind,
        };
        self.gesture = Some(gesture);
        if kind == DragKind::Brush {
            self.brush = Some(gesture.brush_rect());
        }
        gesture
    }

    pub fn update_drag(&mut self, current: ScreenPoint) -> Option<DragGesture> {
        let gesture = self.gesture.as_mut()?;
        gesture.current = current;
        let gesture = *gesture;
        if gesture.kind == DragKind::Brush {
            self.brush = Some(gesture.brush_rect());
        }
        Some(gesture)
    }

    pub fn end_drag(&mut self) -> Option<DragGesture> {
        self.gesture.take()
    }

    #[must_use]
    pub fn brush(self) -> Option<BrushRect> {
        self.brush
    }

    pub fn set_brush(&mut self, brush: Option<BrushRect>) {
        self.brush = brush;
    }

    #[must_use]
    pub fn hovered(self) -> Option<PointHandle> {
        self.hovered
    }

    pub fn set_hovered(&mut self, hovered: Option<PointHandle>) -> Option<PointHandle> {
        std::mem::replace(&mut self.hovered, hovered)
    }

    #[must_use]
    pub fn pointer(self) -> Option<ScreenPoint> {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: Option<ScreenPoint>) {
        self.pointer = pointer;
    }
}
