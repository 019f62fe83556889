use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{Axis, RowKey};
use crate::error::{PlotError, PlotResult};
use crate::extensions::PlotEvent;
use crate::interaction::MouseMode;
use crate::render::Renderer;

use super::PlotEngine;

impl<R: Renderer> PlotEngine<R> {
    /// Switches `axis` to `column` with an eased move of points and ticks.
    ///
    /// Fails with `InvalidAxisSelection`, leaving every piece of state as it
    /// was, when the merged metadata does not know `column`. The zoom
    /// transform is kept and re-applied over the new domain. Returns `false`
    /// when `column` is already shown.
    pub fn set_axis(&mut self, axis: Axis, column: &str) -> PlotResult<bool> {
        let Some(range) = self
            .core
            .store
            .range_with_border(column, self.core.config.data_border_buffer)
        else {
            warn!(?axis, column, "axis switch rejected for unknown column");
            return Err(PlotError::InvalidAxisSelection {
                column: column.to_owned(),
            });
        };
        if self.core.view.column(axis) == column {
            return Ok(false);
        }

        let brushing = self.core.interaction.mode() == MouseMode::Brush;
        if brushing {
            self.core.interaction.switch_mode(MouseMode::PanZoom);
        }
        let result = self.switch_axis_domain(axis, column, range);
        if brushing {
            self.core.interaction.switch_mode(MouseMode::Brush);
        }
        result?;

        debug!(?axis, column, "axis switched");
        self.invalidate_full();
        self.emit_event(PlotEvent::AxisChanged {
            axis,
            column: column.to_owned(),
        });
        Ok(true)
    }

    fn switch_axis_domain(&mut self, axis: Axis, column: &str, range: (f64, f64)) -> PlotResult<()> {
        let core = &mut self.core;
        let from_scale = core.scales.base(axis);
        let current_column = core.view.column(axis);
        let from_positions: IndexMap<RowKey, f64> = core
            .registry
            .points()
            .filter_map(|(key, _)| {
                let row = core.store.row(key)?;
                Some((
                    key,
                    core.scales
                        .animated_base_position(axis, key, row, current_column),
                ))
            })
            .collect();

        core.scales.set_domain(axis, range)?;
        core.view.set_column(axis, column.to_owned());

        let duration_ms = core.config.transition_duration_ms;
        let easing = core.config.transition_easing;
        core.scales
            .begin_transition(axis, from_scale, from_positions, duration_ms, easing);
        let composed = core.composed_scales()?;
        let target = match axis {
            Axis::X => composed.x,
            Axis::Y => composed.y,
        };
        core.overlay.transition(axis, target, duration_ms, easing);
        core.sync_titles();
        core.reposition_points();
        core.recolor_points();
        Ok(())
    }

    /// Maps point fill color to `column`, or back to the default color for
    /// `None`. Selection and highlight colors still win.
    pub fn set_color_axis(&mut self, column: Option<&str>) -> PlotResult<()> {
        if let Some(column) = column {
            if !self.core.store.metadata().contains_column(column) {
                warn!(column, "color axis rejected for unknown column");
                return Err(PlotError::InvalidAxisSelection {
                    column: column.to_owned(),
                });
            }
        }
        self.core.view.color_column = column.map(str::to_owned);
        self.core.sync_color_scale();
        self.core.recolor_points();
        self.invalidate_light();
        debug!(column = ?self.core.view.color_column, "color axis switched");
        self.emit_event(PlotEvent::ColorAxisChanged {
            column: self.core.view.color_column.clone(),
        });
        Ok(())
    }

    /// Advances axis transitions by `delta_ms` and places the points for the
    /// new progress. Returns `true` while anything moved.
    pub fn step_animations(&mut self, delta_ms: f64) -> bool {
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            return false;
        }
        let points_moved = self.core.scales.step_transitions(delta_ms);
        let ticks_moved = self.core.overlay.step(delta_ms);
        if points_moved {
            self.core.reposition_points();
        }
        if points_moved || ticks_moved {
            self.invalidate_full();
        }
        points_moved || ticks_moved
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.core.scales.has_active_transition() || self.core.overlay.is_transitioning()
    }
}
