use tracing::{debug, trace, warn};

use crate::core::{ScreenPoint, ZoomTransform};
use crate::error::PlotResult;
use crate::extensions::{PlotEvent, SourceDetail};
use crate::interaction::{BrushPhase, DragGesture, DragKind, MouseMode};
use crate::render::Renderer;
use crate::surface::PointHandle;

use super::PlotEngine;

impl<R: Renderer> PlotEngine<R> {
    /// Pointer pressed on the canvas.
    ///
    /// In Brush mode every press starts a brush, on top of points or not.
    /// In PanZoom mode a press over a point selects it and a press over
    /// empty canvas starts a pan.
    pub fn pointer_down(&mut self, position: ScreenPoint) -> PlotResult<()> {
        self.core.interaction.set_pointer(Some(position));
        if self.core.interaction.mode() == MouseMode::PanZoom {
            if let Some(handle) = self.core.surface.hit_test(position) {
                return self.select_point(handle);
            }
        }

        let gesture = self
            .core
            .interaction
            .begin_drag(position, self.core.view.zoom);
        trace!(x = position.x, y = position.y, kind = ?gesture.kind, "drag started");
        if gesture.kind == DragKind::Brush {
            self.run_brush_pass(BrushPhase::Start);
        }
        Ok(())
    }

    /// Pointer moved. Drives the active drag, or hover hit-testing when no
    /// drag is in progress.
    pub fn pointer_move(&mut self, position: ScreenPoint) -> PlotResult<()> {
        self.core.interaction.set_pointer(Some(position));
        match self.core.interaction.update_drag(position) {
            Some(gesture) => self.apply_drag(gesture, BrushPhase::Move),
            None => {
                let hit = self.core.surface.hit_test(position);
                self.set_hovered_point(hit);
                Ok(())
            }
        }
    }

    /// Pointer released. Ends the active drag, if any.
    pub fn pointer_up(&mut self, position: ScreenPoint) -> PlotResult<()> {
        self.core.interaction.set_pointer(Some(position));
        if self.core.interaction.update_drag(position).is_none() {
            return Ok(());
        }
        let Some(gesture) = self.core.interaction.end_drag() else {
            return Ok(());
        };
        self.apply_drag(gesture, BrushPhase::End)
    }

    /// Pointer left the canvas. Clears hover; drags keep running.
    pub fn pointer_leave(&mut self) {
        self.core.interaction.set_pointer(None);
        self.set_hovered_point(None);
    }

    /// Wheel zoom around `anchor`. Ignored outside PanZoom mode.
    ///
    /// Returns `true` when the transform changed.
    pub fn wheel(&mut self, delta_y: f64, anchor: ScreenPoint) -> PlotResult<bool> {
        if self.core.interaction.mode() != MouseMode::PanZoom {
            return Ok(false);
        }
        let target = self
            .core
            .config
            .zoom
            .wheel(self.core.view.zoom, delta_y, anchor);
        self.apply_zoom(target)
    }

    /// Double-click zoom in around `anchor`. Ignored outside PanZoom mode.
    pub fn double_click(&mut self, anchor: ScreenPoint) -> PlotResult<bool> {
        if self.core.interaction.mode() != MouseMode::PanZoom {
            return Ok(false);
        }
        let target = self
            .core
            .config
            .zoom
            .double_click(self.core.view.zoom, anchor);
        self.apply_zoom(target)
    }

    pub fn reset_zoom(&mut self) -> PlotResult<bool> {
        self.apply_zoom(ZoomTransform::identity())
    }

    /// Sets the pan/zoom transform directly, clamped to the scale extent.
    pub fn set_zoom(&mut self, transform: ZoomTransform) -> PlotResult<bool> {
        let zoom = self.core.config.zoom;
        self.apply_zoom(transform.clamped(zoom.min_scale, zoom.max_scale))
    }

    /// Installs `mode`, dropping the outgoing mode's gesture and brush
    /// rectangle. Highlights stay until the next brush pass.
    ///
    /// Returns `false` if `mode` was already active.
    pub fn set_mouse_mode(&mut self, mode: MouseMode) -> bool {
        if !self.core.interaction.switch_mode(mode) {
            return false;
        }
        self.core.view.mouse_mode = mode;
        debug!(?mode, "mouse mode switched");
        self.invalidate_light();
        self.emit_event(PlotEvent::MouseModeChanged { mode });
        true
    }

    pub fn toggle_mouse_mode(&mut self) -> MouseMode {
        let mode = self.core.interaction.mode().toggled();
        self.set_mouse_mode(mode);
        mode
    }

    /// Removes the brush rectangle and every highlight.
    pub fn clear_brush(&mut self) {
        self.core.interaction.set_brush(None);
        let cleared = self.core.registry.clear_highlights();
        if cleared > 0 {
            self.core.recolor_points();
        }
        self.invalidate_light();
        self.emit_event(PlotEvent::BrushUpdated {
            phase: BrushPhase::End,
            highlighted: 0,
        });
    }

    /// Selects `handle`, restoring the paint of the previous selection.
    pub fn select_point(&mut self, handle: PointHandle) -> PlotResult<()> {
        let previous = self.core.registry.select(handle)?;
        if let Some(previous) = previous.filter(|previous| *previous != handle) {
            if let Err(err) = self.core.restyle_point(previous) {
                warn!(error = %err, "previous selection could not be restyled");
            }
        }
        self.core.restyle_point(handle)?;
        self.invalidate_light();

        if let Some(row) = self.row_for_point(handle).cloned() {
            debug!(id = %row.id, field = %row.field, "point selected");
            self.emit_event(PlotEvent::Selected { row });
        }
        Ok(())
    }

    /// Selects the point of the row `id`, if it is loaded.
    pub fn select_row_by_id(&mut self, id: &str) -> PlotResult<bool> {
        let Some(handle) = self
            .row_key_by_id(id)
            .and_then(|key| self.core.registry.point_for_row(key))
        else {
            return Ok(false);
        };
        self.select_point(handle)?;
        Ok(true)
    }

    /// Recolors from a clean baseline and describes the selected source
    /// for a context menu.
    pub fn prepare_context_menu(&mut self) -> Option<SourceDetail> {
        self.core.interaction.set_hovered(None);
        self.core.recolor_points();
        self.invalidate_light();
        let row = self.selected_row()?.clone();
        Some(SourceDetail::new(
            row,
            &self.core.view.x_column,
            &self.core.view.y_column,
        ))
    }

    fn apply_drag(&mut self, gesture: DragGesture, phase: BrushPhase) -> PlotResult<()> {
        match gesture.kind {
            DragKind::Pan { start_transform } => {
                let (dx, dy) = gesture.delta();
                let target = self.core.config.zoom.pan(start_transform, dx, dy);
                self.apply_zoom(target)?;
            }
            DragKind::Brush => self.run_brush_pass(phase),
        }
        Ok(())
    }

    fn run_brush_pass(&mut self, phase: BrushPhase) {
        let viewport = self.core.scales.viewport();
        let brush = self
            .core
            .interaction
            .brush()
            .map(|rect| rect.clamped(viewport.width_px(), viewport.height_px()));
        self.core.interaction.set_brush(brush);
        let highlighted = self.core.brush_pass(brush);
        self.invalidate_light();
        self.emit_event(PlotEvent::BrushUpdated { phase, highlighted });
    }

    /// Composes the new transform, repositions every point and rescales the
    /// overlay, in that order.
    pub(super) fn apply_zoom(&mut self, transform: ZoomTransform) -> PlotResult<bool> {
        if transform == self.core.view.zoom {
            return Ok(false);
        }
        let composed = self.core.scales.compose_with_transform(transform)?;
        self.core.view.zoom = transform;
        self.core.reposition_points();
        self.core.overlay.rescale(composed);
        self.invalidate_full();
        trace!(k = transform.k, x = transform.x, y = transform.y, "zoom applied");
        self.emit_event(PlotEvent::ZoomChanged { transform });
        Ok(true)
    }

    fn set_hovered_point(&mut self, hovered: Option<PointHandle>) {
        let previous = self.core.interaction.set_hovered(hovered);
        if previous == hovered {
            return;
        }
        if let Some(previous) = previous {
            if let Err(err) = self.core.restyle_point(previous) {
                trace!(error = %err, "previously hovered point is gone");
            }
        }
        if let Some(handle) = hovered {
            if let Err(err) = self.core.paint_hovered(handle) {
                warn!(error = %err, "hovered point could not be painted");
                self.core.interaction.set_hovered(None);
            }
        }
        self.invalidate_light();

        let row = self
            .core
            .interaction
            .hovered()
            .and_then(|handle| self.row_for_point(handle))
            .cloned();
        self.emit_event(PlotEvent::Hovered { row });
    }
}
