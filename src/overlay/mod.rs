//! Axis rulings, tick labels and axis titles drawn around the point cloud.
//!
//! The overlay never reads catalog data. It only follows the composed
//! scales handed to it by the engine and animates tick motion when an axis
//! changes column.

use serde::{Deserialize, Serialize};

use crate::core::ticks::{
    X_TICK_TARGET_SPACING_PX, Y_TICK_TARGET_SPACING_PX, axis_tick_target_count, format_tick,
    tick_step,
};
use crate::core::transition::lerp;
use crate::core::{Axis, ComposedScales, Easing, LinearScale, TransitionClock, Viewport};
use crate::render::{CanvasLayerKind, Color, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

const MIN_TICKS: usize = 2;
const MAX_TICKS: usize = 10;
const TICK_PADDING_PX: f64 = 3.0;

/// Space reserved around the plot for rulings and titles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotMargins {
    pub left: f64,
    pub right: f64,
    pub lower: f64,
    pub upper: f64,
}

impl Default for PlotMargins {
    fn default() -> Self {
        Self {
            left: 50.0,
            right: 5.0,
            lower: 50.0,
            upper: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub margins: PlotMargins,
    pub axis_color: Color,
    pub grid_color: Color,
    pub tick_font_size_px: f64,
    pub title_font_size_px: f64,
    pub stroke_width: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        let axis_color = Color::from_hex(0xcccccc);
        Self {
            margins: PlotMargins::default(),
            axis_color,
            grid_color: axis_color.with_alpha(0.15),
            tick_font_size_px: 11.0,
            title_font_size_px: 14.0,
            stroke_width: 1.0,
        }
    }
}

/// One rendered tick: data value, pixel position along its axis, label and
/// fade state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub position: f64,
    pub label: String,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct TickTransition {
    from: LinearScale,
    clock: TransitionClock,
}

#[derive(Debug, Clone, PartialEq)]
struct AxisDecoration {
    scale: LinearScale,
    title: String,
    transition: Option<TickTransition>,
    spacing: f64,
}

impl AxisDecoration {
    fn tick_count(&self) -> usize {
        let (r0, r1) = self.scale.range();
        axis_tick_target_count((r1 - r0).abs(), self.spacing, MIN_TICKS, MAX_TICKS)
    }
}

/// Decorations layered over the point canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorOverlay {
    style: OverlayStyle,
    x: AxisDecoration,
    y: AxisDecoration,
}

impl DecoratorOverlay {
    #[must_use]
    pub fn new(style: OverlayStyle, scales: ComposedScales) -> Self {
        Self {
            style,
            x: AxisDecoration {
                scale: scales.x,
                title: String::new(),
                transition: None,
                spacing: X_TICK_TARGET_SPACING_PX,
            },
            y: AxisDecoration {
                scale: scales.y,
                title: String::new(),
                transition: None,
                spacing: Y_TICK_TARGET_SPACING_PX,
            },
        }
    }

    #[must_use]
    pub fn style(&self) -> OverlayStyle {
        self.style
    }

    fn decoration(&self, axis: Axis) -> &AxisDecoration {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    fn decoration_mut(&mut self, axis: Axis) -> &mut AxisDecoration {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    #[must_use]
    pub fn title(&self, axis: Axis) -> &str {
        &self.decoration(axis).title
    }

    pub fn set_title(&mut self, axis: Axis, title: impl Into<String>) {
        self.decoration_mut(axis).title = title.into();
    }

    #[must_use]
    pub fn scale(&self, axis: Axis) -> LinearScale {
        self.decoration(axis).scale
    }

    /// Follows new composed scales instantly. In-flight tick transitions
    /// keep running towards the new scales.
    pub fn rescale(&mut self, scales: ComposedScales) {
        self.x.scale = scales.x;
        self.y.scale = scales.y;
    }

    /// Moves `axis` to `target` with eased tick motion.
    pub fn transition(
        &mut self,
        axis: Axis,
        target: LinearScale,
        duration_ms: f64,
        easing: Easing,
    ) {
        let decoration = self.decoration_mut(axis);
        let clock = TransitionClock::new(duration_ms, easing);
        decoration.transition = if clock.is_finished() {
            None
        } else {
            Some(TickTransition {
                from: decoration.scale,
                clock,
            })
        };
        decoration.scale = target;
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.x.transition.is_some() || self.y.transition.is_some()
    }

    /// Snaps in-flight tick transitions to their target scales.
    pub fn cancel_transitions(&mut self) {
        self.x.transition = None;
        self.y.transition = None;
    }

    /// Advances tick transitions. Returns `true` if anything moved.
    pub fn step(&mut self, delta_ms: f64) -> bool {
        let mut touched = false;
        for decoration in [&mut self.x, &mut self.y] {
            if let Some(transition) = decoration.transition.as_mut() {
                transition.clock.advance(delta_ms);
                touched = true;
                if transition.clock.is_finished() {
                    decoration.transition = None;
                }
            }
        }
        touched
    }

    /// Ticks of `axis` as currently drawn, including fading ticks of an
    /// in-flight transition.
    #[must_use]
    pub fn ticks(&self, axis: Axis) -> Vec<AxisTick> {
        let decoration = self.decoration(axis);
        let count = decoration.tick_count();
        let target = decoration.scale;
        let current = scale_ticks(target, count);

        let Some(transition) = &decoration.transition else {
            return current
                .into_iter()
                .map(|(value, label)| AxisTick {
                    value,
                    position: target.apply(value),
                    label,
                    opacity: 1.0,
                })
                .collect();
        };

        let t = transition.clock.eased();
        let from = transition.from;
        let previous = scale_ticks(from, count);
        let was_shown = |value: f64| previous.iter().any(|(v, _)| *v == value);

        let mut ticks: Vec<AxisTick> = current
            .iter()
            .map(|(value, label)| AxisTick {
                value: *value,
                position: lerp(from.apply(*value), target.apply(*value), t),
                label: label.clone(),
                opacity: if was_shown(*value) { 1.0 } else { t },
            })
            .collect();
        ticks.extend(
            previous
                .into_iter()
                .filter(|(value, _)| !current.iter().any(|(v, _)| v == value))
                .map(|(value, label)| AxisTick {
                    value,
                    position: lerp(from.apply(value), target.apply(value), t),
                    label,
                    opacity: 1.0 - t,
                }),
        );
        ticks.retain(|tick| tick.position.is_finite() && tick.opacity > 0.0);
        ticks
    }

    /// Appends rulings and tick labels to the grid layer and axis titles to
    /// the axis layer.
    pub fn build(&self, frame: &mut RenderFrame, viewport: Viewport) {
        let style = self.style;
        let width = viewport.width_px();
        let height = viewport.height_px();
        let x_axis_y = height - style.margins.lower;
        let y_axis_x = style.margins.left;

        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(y_axis_x, 0.0, y_axis_x, height, style.stroke_width, style.axis_color),
        );
        frame.push_line(
            CanvasLayerKind::Grid,
            LinePrimitive::new(0.0, x_axis_y, width, x_axis_y, style.stroke_width, style.axis_color),
        );

        for tick in self.ticks(Axis::Y) {
            if !(0.0..=height).contains(&tick.position) {
                continue;
            }
            let grid = style.grid_color.with_alpha(style.grid_color.alpha * tick.opacity);
            let text = style.axis_color.with_alpha(style.axis_color.alpha * tick.opacity);
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(y_axis_x, tick.position, width, tick.position, style.stroke_width, grid),
            );
            frame.push_text(
                CanvasLayerKind::Grid,
                TextPrimitive::new(
                    tick.label,
                    y_axis_x - TICK_PADDING_PX,
                    tick.position - style.tick_font_size_px / 2.0,
                    style.tick_font_size_px,
                    text,
                    TextHAlign::Right,
                ),
            );
        }

        for tick in self.ticks(Axis::X) {
            if !(0.0..=width).contains(&tick.position) {
                continue;
            }
            let grid = style.grid_color.with_alpha(style.grid_color.alpha * tick.opacity);
            let text = style.axis_color.with_alpha(style.axis_color.alpha * tick.opacity);
            frame.push_line(
                CanvasLayerKind::Grid,
                LinePrimitive::new(tick.position, 0.0, tick.position, x_axis_y, style.stroke_width, grid),
            );
            frame.push_text(
                CanvasLayerKind::Grid,
                TextPrimitive::new(
                    tick.label,
                    tick.position,
                    x_axis_y + TICK_PADDING_PX,
                    style.tick_font_size_px,
                    text,
                    TextHAlign::Center,
                ),
            );
        }

        if !self.x.title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    self.x.title.clone(),
                    width / 2.0,
                    height - style.margins.lower / 2.0 + 3.0,
                    style.title_font_size_px,
                    style.axis_color,
                    TextHAlign::Center,
                ),
            );
        }
        if !self.y.title.is_empty() {
            frame.push_text(
                CanvasLayerKind::Axis,
                TextPrimitive::new(
                    self.y.title.clone(),
                    style.margins.left / 2.0,
                    height / 2.0,
                    style.title_font_size_px,
                    style.axis_color,
                    TextHAlign::Center,
                )
                .rotated(-90.0),
            );
        }
    }
}

fn scale_ticks(scale: LinearScale, count: usize) -> Vec<(f64, String)> {
    let (d0, d1) = scale.domain();
    let step = tick_step(d0, d1, count);
    scale
        .ticks(count)
        .into_iter()
        .map(|value| (value, format_tick(value, step)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{DecoratorOverlay, OverlayStyle};
    use crate::core::{Axis, ComposedScales, Easing, LinearScale, Viewport};
    use crate::render::{CanvasLayerKind, RenderFrame};

    fn scales() -> ComposedScales {
        ComposedScales {
            x: LinearScale::new((0.0, 100.0), (0.0, 400.0)).expect("x"),
            y: LinearScale::new((50.0, 0.0), (0.0, 200.0)).expect("y"),
        }
    }

    #[test]
    fn ticks_follow_composed_scale() {
        let overlay = DecoratorOverlay::new(OverlayStyle::default(), scales());
        let ticks = overlay.ticks(Axis::X);
        assert!(!ticks.is_empty());
        for tick in &ticks {
            assert!((tick.position - tick.value * 4.0).abs() <= 1e-9);
            assert_eq!(tick.opacity, 1.0);
        }
    }

    #[test]
    fn cancelled_transition_draws_target_ticks() {
        let mut overlay = DecoratorOverlay::new(OverlayStyle::default(), scales());
        let target = LinearScale::new((0.0, 200.0), (0.0, 400.0)).expect("target");
        overlay.transition(Axis::X, target, 1000.0, Easing::Linear);
        overlay.step(250.0);

        overlay.cancel_transitions();

        assert!(!overlay.is_transitioning());
        assert!(!overlay.step(100.0));
        for tick in overlay.ticks(Axis::X) {
            assert!((tick.position - tick.value * 2.0).abs() <= 1e-9);
            assert_eq!(tick.opacity, 1.0);
        }
    }

    #[test]
    fn transition_moves_ticks_then_settles() {
        let mut overlay = DecoratorOverlay::new(OverlayStyle::default(), scales());
        let target = LinearScale::new((0.0, 200.0), (0.0, 400.0)).expect("target");
        overlay.transition(Axis::X, target, 1000.0, Easing::Linear);
        assert!(overlay.is_transitioning());

        overlay.step(500.0);
        let mid = overlay.ticks(Axis::X);
        let fading = mid.iter().filter(|tick| tick.opacity < 1.0).count();
        assert!(fading > 0);

        overlay.step(500.0);
        assert!(!overlay.is_transitioning());
        for tick in overlay.ticks(Axis::X) {
            assert!((tick.position - tick.value * 2.0).abs() <= 1e-9);
        }
    }

    #[test]
    fn titles_land_on_axis_layer_with_rotated_y() {
        let mut overlay = DecoratorOverlay::new(OverlayStyle::default(), scales());
        overlay.set_title(Axis::X, "RA (deg)");
        overlay.set_title(Axis::Y, "Dec (deg)");
        let mut frame = RenderFrame::new(Viewport::new(400, 200));
        overlay.build(&mut frame, Viewport::new(400, 200));

        let titles = &frame.layer(CanvasLayerKind::Axis).expect("axis layer").texts;
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].rotation_deg, 0.0);
        assert_eq!(titles[1].rotation_deg, -90.0);
        assert!(frame.validate().is_ok());
    }
}
