use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::core::{
    Axis, ComposedScales, DataStore, RowKey, ScaleManager, ScreenPoint, SequentialColorScale,
    ViewState,
};
use crate::error::{PlotError, PlotResult};
use crate::extensions::{PlotContext, PlotObserver};
use crate::interaction::{BrushRect, InteractionState};
use crate::overlay::DecoratorOverlay;
use crate::surface::{PointHandle, RenderSurface, StyleContext, VisualEntityRegistry};

use super::{InvalidationLevel, PlotEngineConfig};

/// Internal engine state used by the public facade (`PlotEngine`).
///
/// Every component that the pointer, axis and field handlers touch lives
/// here so each handler can leave all of it consistent before returning.
pub(super) struct EngineCore {
    pub(super) config: PlotEngineConfig,
    pub(super) view: ViewState,
    pub(super) store: DataStore,
    pub(super) registry: VisualEntityRegistry,
    pub(super) surface: RenderSurface,
    pub(super) scales: ScaleManager,
    pub(super) overlay: DecoratorOverlay,
    pub(super) interaction: InteractionState,
    /// Field name to the id of its outstanding load ticket.
    pub(super) pending_fields: IndexMap<String, u64>,
    pub(super) next_ticket_id: u64,
    pub(super) observers: Vec<Box<dyn PlotObserver>>,
    pub(super) invalidation: InvalidationLevel,
}

impl EngineCore {
    pub(super) fn composed_scales(&self) -> PlotResult<ComposedScales> {
        self.scales.compose_with_transform(self.view.zoom)
    }

    pub(super) fn context(&self) -> PlotContext {
        PlotContext {
            viewport: self.scales.viewport(),
            zoom: self.view.zoom,
            mouse_mode: self.interaction.mode(),
            x_column: self.view.x_column.clone(),
            y_column: self.view.y_column.clone(),
            color_column: self.view.color_column.clone(),
            point_count: self.surface.len(),
            field_count: self.store.field_names().count(),
        }
    }

    pub(super) fn row_key_for_point(&self, handle: PointHandle) -> Option<RowKey> {
        self.registry.row_for_point(handle)
    }

    pub(super) fn reposition_points(&mut self) -> usize {
        self.surface
            .reposition(&self.store, &self.registry, &self.scales, &self.view)
    }

    /// Recolors every point, then puts the mouseover paint back on the
    /// hovered point.
    pub(super) fn recolor_points(&mut self) -> usize {
        let style = StyleContext {
            palette: &self.config.palette,
            color_scale: self.scales.color_scale(),
            base_opacity: self.view.point_opacity,
        };
        let recolored = self.surface.recolor(&self.store, &self.registry, style);
        if let Some(hovered) = self.interaction.hovered() {
            if let Err(err) = self
                .surface
                .set_paint(hovered, self.config.palette.mouseover, 1.0)
            {
                warn!(error = %err, "hovered point vanished during recolor");
                self.interaction.set_hovered(None);
            }
        }
        recolored
    }

    /// Re-resolves one point's paint through the registry.
    pub(super) fn restyle_point(&mut self, handle: PointHandle) -> PlotResult<()> {
        let key = self
            .registry
            .row_for_point(handle)
            .ok_or(PlotError::StalePoint)?;
        let row = self.store.row(key).ok_or(PlotError::StalePoint)?;
        let style = StyleContext {
            palette: &self.config.palette,
            color_scale: self.scales.color_scale(),
            base_opacity: self.view.point_opacity,
        };
        self.surface.apply_style(handle, row, &self.registry, style)
    }

    /// Paints `handle` with the mouseover color at full opacity and lifts it.
    pub(super) fn paint_hovered(&mut self, handle: PointHandle) -> PlotResult<()> {
        self.surface
            .set_paint(handle, self.config.palette.mouseover, 1.0)?;
        self.surface.bring_to_front(handle)
    }

    /// Recomputes both X/Y domains from the merged metadata.
    ///
    /// Axes whose column is unknown keep their previous domain.
    pub(super) fn sync_domains(&mut self) {
        for axis in [Axis::X, Axis::Y] {
            let column = self.view.column(axis);
            let Some(range) = self
                .store
                .range_with_border(column, self.config.data_border_buffer)
            else {
                continue;
            };
            if let Err(err) = self.scales.set_domain(axis, range) {
                warn!(error = %err, ?axis, column, "keeping previous axis domain");
            }
        }
    }

    /// Rebuilds the color scale for the current color column, if the merged
    /// metadata knows it.
    pub(super) fn sync_color_scale(&mut self) {
        let scale = self.view.color_column.as_deref().and_then(|column| {
            let range = self
                .store
                .range_with_border(column, self.config.data_border_buffer)?;
            match SequentialColorScale::new(column, range) {
                Ok(scale) => Some(scale),
                Err(err) => {
                    warn!(error = %err, column, "color axis disabled for degenerate range");
                    None
                }
            }
        });
        self.scales.set_color_scale(scale);
    }

    pub(super) fn sync_titles(&mut self) {
        for axis in [Axis::X, Axis::Y] {
            let title = self
                .store
                .metadata()
                .column(self.view.column(axis))
                .map(|meta| meta.axis_label())
                .unwrap_or_default();
            self.overlay.set_title(axis, title);
        }
    }

    pub(super) fn sync_overlay(&mut self) -> PlotResult<()> {
        let composed = self.composed_scales()?;
        self.overlay.rescale(composed);
        Ok(())
    }

    /// Full consistency pass after the loaded rows changed.
    pub(super) fn resync_after_data_change(&mut self) -> PlotResult<()> {
        self.sync_domains();
        self.sync_color_scale();
        self.sync_titles();
        self.reposition_points();
        self.recolor_points();
        self.sync_overlay()
    }

    /// Highlights the points that fit inside `brush` and lifts them to the
    /// front; everything else loses its highlight. Returns the highlight
    /// count.
    pub(super) fn brush_pass(&mut self, brush: Option<BrushRect>) -> usize {
        let radius = self.surface.point_radius();
        let verdicts: Vec<(PointHandle, bool)> = self
            .registry
            .points()
            .map(|(_, handle)| {
                let inside = match (brush, self.surface.point(handle)) {
                    (Some(rect), Some(point)) => {
                        rect.contains(ScreenPoint::new(point.x, point.y), radius)
                    }
                    _ => false,
                };
                (handle, inside)
            })
            .collect();

        let mut highlighted = 0;
        for (handle, inside) in verdicts {
            if self.registry.set_highlighted(handle, inside).is_err() {
                continue;
            }
            if inside {
                highlighted += 1;
                if let Err(err) = self.surface.bring_to_front(handle) {
                    warn!(error = %err, "highlighted point vanished during brush pass");
                }
            }
        }
        self.recolor_points();
        trace!(highlighted, "brush pass");
        highlighted
    }
}
