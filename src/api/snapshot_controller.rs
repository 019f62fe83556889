use crate::core::Axis;
use crate::error::{PlotError, PlotResult};
use crate::render::Renderer;

use super::{PlotEngine, PlotSnapshot, PointSnapshot};

impl<R: Renderer> PlotEngine<R> {
    /// Builds a deterministic snapshot useful for regression tests.
    #[must_use]
    pub fn snapshot(&self) -> PlotSnapshot {
        let core = &self.core;
        let points = core
            .surface
            .paint_order()
            .into_iter()
            .filter_map(|(handle, point)| {
                let key = core.registry.row_for_point(handle)?;
                let row = core.store.row(key)?;
                Some(PointSnapshot {
                    id: row.id.clone(),
                    field: row.field.clone(),
                    x: point.x,
                    y: point.y,
                    color: point.color,
                    alpha: point.alpha,
                    selected: core.registry.is_selected(handle),
                    highlighted: core.registry.is_highlighted(handle),
                })
            })
            .collect();

        PlotSnapshot {
            viewport: core.scales.viewport(),
            view: core.view.clone(),
            x_domain: core.scales.base(Axis::X).domain(),
            y_domain: core.scales.base(Axis::Y).domain(),
            x_title: core.overlay.title(Axis::X).to_owned(),
            y_title: core.overlay.title(Axis::Y).to_owned(),
            fields: core.store.field_names().map(str::to_owned).collect(),
            pending_fields: core.pending_fields.keys().cloned().collect(),
            highlighted_count: core.registry.highlighted_count(),
            points,
        }
    }

    /// Serializes snapshot as pretty JSON for fixture-based regression checks.
    pub fn snapshot_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| PlotError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
