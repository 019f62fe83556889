use crate::core::{
    Axis, CatalogMetadata, DataRow, DataStore, RowKey, ScreenPoint, Viewport, ViewState,
    ZoomTransform,
};
use crate::error::PlotResult;
use crate::interaction::{BrushRect, MouseMode};
use crate::overlay::DecoratorOverlay;
use crate::render::Renderer;
use crate::surface::{PointHandle, RenderSurface, VisualEntityRegistry, VisualPoint};

use super::validation::validate_opacity;
use super::{PlotEngine, PlotEngineConfig};

impl<R: Renderer> PlotEngine<R> {
    #[must_use]
    pub fn config(&self) -> &PlotEngineConfig {
        &self.core.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.core.scales.viewport()
    }

    /// Resizes the plot. Scale ranges follow the new size and every point
    /// is placed again; in-flight point and tick transitions snap to their
    /// targets together.
    pub fn set_viewport(&mut self, viewport: Viewport) -> PlotResult<()> {
        self.core.scales.set_viewport(viewport)?;
        self.core.config.viewport = viewport;
        self.core.scales.cancel_transitions();
        self.core.overlay.cancel_transitions();
        self.core.reposition_points();
        self.core.sync_overlay()?;
        if let Some(brush) = self.core.interaction.brush() {
            self.core.interaction.set_brush(Some(
                brush.clamped(viewport.width_px(), viewport.height_px()),
            ));
        }
        self.invalidate_full();
        Ok(())
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.core.view
    }

    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.core.store
    }

    /// Merged metadata of every loaded field.
    #[must_use]
    pub fn metadata(&self) -> &CatalogMetadata {
        self.core.store.metadata()
    }

    #[must_use]
    pub fn registry(&self) -> &VisualEntityRegistry {
        &self.core.registry
    }

    #[must_use]
    pub fn surface(&self) -> &RenderSurface {
        &self.core.surface
    }

    #[must_use]
    pub fn overlay(&self) -> &DecoratorOverlay {
        &self.core.overlay
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.core.surface.len()
    }

    #[must_use]
    pub fn loaded_fields(&self) -> Vec<&str> {
        self.core.store.field_names().collect()
    }

    #[must_use]
    pub fn axis_title(&self, axis: Axis) -> &str {
        self.core.overlay.title(axis)
    }

    /// First loaded row carrying `id`.
    #[must_use]
    pub fn row_key_by_id(&self, id: &str) -> Option<RowKey> {
        self.core
            .store
            .rows()
            .find(|(_, row)| row.id == id)
            .map(|(key, _)| key)
    }

    #[must_use]
    pub fn point_for_row(&self, key: RowKey) -> Option<(PointHandle, &VisualPoint)> {
        let handle = self.core.registry.point_for_row(key)?;
        self.core.surface.point(handle).map(|point| (handle, point))
    }

    #[must_use]
    pub fn row_for_point(&self, handle: PointHandle) -> Option<&DataRow> {
        let key = self.core.row_key_for_point(handle)?;
        self.core.store.row(key)
    }

    #[must_use]
    pub fn is_row_selected(&self, key: RowKey) -> bool {
        self.core
            .registry
            .point_for_row(key)
            .is_some_and(|handle| self.core.registry.is_selected(handle))
    }

    #[must_use]
    pub fn is_row_highlighted(&self, key: RowKey) -> bool {
        self.core
            .registry
            .point_for_row(key)
            .is_some_and(|handle| self.core.registry.is_highlighted(handle))
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<&DataRow> {
        self.row_for_point(self.core.registry.selected()?)
    }

    #[must_use]
    pub fn hovered_row(&self) -> Option<&DataRow> {
        self.row_for_point(self.core.interaction.hovered()?)
    }

    #[must_use]
    pub fn highlighted_rows(&self) -> Vec<&DataRow> {
        self.core
            .registry
            .highlighted_points()
            .filter_map(|handle| self.row_for_point(handle))
            .collect()
    }

    #[must_use]
    pub fn mouse_mode(&self) -> MouseMode {
        self.core.interaction.mode()
    }

    #[must_use]
    pub fn zoom(&self) -> ZoomTransform {
        self.core.view.zoom
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.core.interaction.is_dragging()
    }

    /// Last pointer position over the canvas.
    #[must_use]
    pub fn pointer_position(&self) -> Option<ScreenPoint> {
        self.core.interaction.pointer()
    }

    /// Brush rectangle currently drawn, if any.
    #[must_use]
    pub fn brush(&self) -> Option<BrushRect> {
        self.core.interaction.brush()
    }

    #[must_use]
    pub fn point_opacity(&self) -> f64 {
        self.core.view.point_opacity
    }

    /// Opacity of points that are neither selected nor highlighted.
    pub fn set_point_opacity(&mut self, opacity: f64) -> PlotResult<()> {
        validate_opacity(opacity)?;
        self.core.view.point_opacity = opacity;
        self.core.recolor_points();
        self.invalidate_light();
        Ok(())
    }
}
