use indexmap::IndexMap;

use crate::core::color_scale::SequentialColorScale;
use crate::core::data_store::RowKey;
use crate::core::scale::round_half_up;
use crate::core::transition::{Easing, TransitionClock, lerp};
use crate::core::{Axis, DataRow, LinearScale, ScreenPoint, ViewState, Viewport, ZoomTransform};
use crate::error::{PlotError, PlotResult};

/// X/Y scales after composition with the current pan/zoom transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComposedScales {
    pub x: LinearScale,
    pub y: LinearScale,
}

/// In-flight eased move of one axis between two domains (or columns).
///
/// Start positions are captured per row in base (un-zoomed) pixel space, so
/// a zoom that happens mid-flight is applied on top of the interpolation
/// instead of being baked into it.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTransition {
    from_scale: LinearScale,
    from_positions: IndexMap<RowKey, f64>,
    clock: TransitionClock,
}

impl AxisTransition {
    #[must_use]
    pub fn from_scale(&self) -> LinearScale {
        self.from_scale
    }

    #[must_use]
    pub fn eased(&self) -> f64 {
        self.clock.eased()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished()
    }

    #[must_use]
    pub fn start_position(&self, row: RowKey) -> Option<f64> {
        self.from_positions.get(&row).copied()
    }
}

/// Owns the data-to-screen transforms of one plot.
#[derive(Debug, Clone)]
pub struct ScaleManager {
    viewport: Viewport,
    x_base: LinearScale,
    y_base: LinearScale,
    color: Option<SequentialColorScale>,
    x_transition: Option<AxisTransition>,
    y_transition: Option<AxisTransition>,
}

impl ScaleManager {
    pub fn new(viewport: Viewport) -> PlotResult<Self> {
        if !viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            viewport,
            x_base: LinearScale::new((0.0, 1.0), (0.0, viewport.width_px()))?,
            y_base: LinearScale::new((1.0, 0.0), (0.0, viewport.height_px()))?,
            color: None,
            x_transition: None,
            y_transition: None,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn base(&self, axis: Axis) -> LinearScale {
        match axis {
            Axis::X => self.x_base,
            Axis::Y => self.y_base,
        }
    }

    /// Replaces the X domain with a bordered `(lo, hi)` range.
    pub fn set_x_domain(&mut self, range: (f64, f64)) -> PlotResult<()> {
        self.x_base = self.x_base.with_domain(non_degenerate(range)?)?;
        Ok(())
    }

    /// Replaces the Y domain; stored reversed so larger values sit higher.
    pub fn set_y_domain(&mut self, range: (f64, f64)) -> PlotResult<()> {
        let (lo, hi) = non_degenerate(range)?;
        self.y_base = self.y_base.with_domain((hi, lo))?;
        Ok(())
    }

    pub fn set_domain(&mut self, axis: Axis, range: (f64, f64)) -> PlotResult<()> {
        match axis {
            Axis::X => self.set_x_domain(range),
            Axis::Y => self.set_y_domain(range),
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> PlotResult<()> {
        if !viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.x_base = self.x_base.with_range((0.0, viewport.width_px()))?;
        self.y_base = self.y_base.with_range((0.0, viewport.height_px()))?;
        self.viewport = viewport;
        Ok(())
    }

    /// Base scales composed with `transform`, rounded to whole pixels.
    pub fn compose_with_transform(&self, transform: ZoomTransform) -> PlotResult<ComposedScales> {
        transform.validate()?;
        Ok(ComposedScales {
            x: transform.rescale_x(self.x_base)?.rounded(),
            y: transform.rescale_y(self.y_base)?.rounded(),
        })
    }

    #[must_use]
    pub fn color_scale(&self) -> Option<&SequentialColorScale> {
        self.color.as_ref()
    }

    pub fn set_color_scale(&mut self, scale: Option<SequentialColorScale>) {
        self.color = scale;
    }

    /// Un-zoomed pixel coordinate of `row` on `axis` for `column`.
    ///
    /// Missing values take the low end of the domain.
    #[must_use]
    pub fn base_position(&self, axis: Axis, row: &DataRow, column: &str) -> f64 {
        let scale = self.base(axis);
        let value = row
            .finite_value(column)
            .unwrap_or_else(|| sentinel_low(scale));
        scale.apply(value)
    }

    /// Base coordinate including any in-flight transition on `axis`.
    #[must_use]
    pub fn animated_base_position(
        &self,
        axis: Axis,
        key: RowKey,
        row: &DataRow,
        column: &str,
    ) -> f64 {
        let target = self.base_position(axis, row, column);
        match self.transition(axis) {
            Some(transition) => {
                let start = transition.start_position(key).unwrap_or(target);
                lerp(start, target, transition.eased())
            }
            None => target,
        }
    }

    /// Screen position of a row under the current view, animation included.
    #[must_use]
    pub fn project(&self, key: RowKey, row: &DataRow, view: &ViewState) -> ScreenPoint {
        let base_x = self.animated_base_position(Axis::X, key, row, &view.x_column);
        let base_y = self.animated_base_position(Axis::Y, key, row, &view.y_column);
        ScreenPoint::new(
            round_half_up(view.zoom.apply_x(base_x)),
            round_half_up(view.zoom.apply_y(base_y)),
        )
    }

    #[must_use]
    pub fn transition(&self, axis: Axis) -> Option<&AxisTransition> {
        match axis {
            Axis::X => self.x_transition.as_ref(),
            Axis::Y => self.y_transition.as_ref(),
        }
    }

    #[must_use]
    pub fn has_active_transition(&self) -> bool {
        self.x_transition.is_some() || self.y_transition.is_some()
    }

    /// Starts an eased move on `axis` from `from_scale`/`from_positions`
    /// towards whatever the base scale currently is.
    pub fn begin_transition(
        &mut self,
        axis: Axis,
        from_scale: LinearScale,
        from_positions: IndexMap<RowKey, f64>,
        duration_ms: f64,
        easing: Easing,
    ) {
        let transition = AxisTransition {
            from_scale,
            from_positions,
            clock: TransitionClock::new(duration_ms, easing),
        };
        let slot = match axis {
            Axis::X => &mut self.x_transition,
            Axis::Y => &mut self.y_transition,
        };
        *slot = if transition.is_finished() {
            None
        } else {
            Some(transition)
        };
    }

    /// Advances both axes. Returns `true` while anything is still moving
    /// or something finished during this step.
    pub fn step_transitions(&mut self, delta_ms: f64) -> bool {
        let mut touched = false;
        for slot in [&mut self.x_transition, &mut self.y_transition] {
            if let Some(transition) = slot {
                transition.clock.advance(delta_ms);
                touched = true;
                if transition.is_finished() {
                    *slot = None;
                }
            }
        }
        touched
    }

    pub fn cancel_transitions(&mut self) {
        self.x_transition = None;
        self.y_transition = None;
    }
}

/// Lowest value of a scale's domain, used for missing data.
#[must_use]
pub fn sentinel_low(scale: LinearScale) -> f64 {
    let (d0, d1) = scale.domain();
    d0.min(d1)
}

fn non_degenerate(range: (f64, f64)) -> PlotResult<(f64, f64)> {
    if !range.0.is_finite() || !range.1.is_finite() {
        return Err(PlotError::InvalidData(
            "axis range must be finite".to_owned(),
        ));
    }
    if range.0 == range.1 {
        return Ok((range.0 - 0.5, range.1 + 0.5));
    }
    Ok(range)
}
