use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{DataRow, RowKey, SequentialColorScale};
use crate::error::{PlotError, PlotResult};
use crate::render::Color;
use crate::surface::PointHandle;

/// Fill colors of the four point states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPalette {
    pub default: Color,
    pub highlight: Color,
    pub mouseover: Color,
    pub clicked: Color,
}

impl Default for PointPalette {
    fn default() -> Self {
        Self {
            default: Color::from_hex(0x777777),
            highlight: Color::from_hex(0x849cba),
            mouseover: Color::from_hex(0xfacb73),
            clicked: Color::from_hex(0x73adfa),
        }
    }
}

/// Inputs to color/opacity resolution that live outside the registry.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    pub palette: &'a PointPalette,
    pub color_scale: Option<&'a SequentialColorScale>,
    pub base_opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PointLink {
    row: RowKey,
    generation: u32,
    highlighted: bool,
}

/// Two-way row/point association plus the per-point selection flags.
///
/// Both directions are plain tables keyed by integer handles; neither side
/// owns the other. At most one point is selected at any time.
#[derive(Debug, Clone, Default)]
pub struct VisualEntityRegistry {
    row_to_point: IndexMap<RowKey, PointHandle>,
    point_links: Vec<Option<PointLink>>,
    selected: Option<PointHandle>,
    highlighted_count: usize,
}

impl VisualEntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.row_to_point.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_to_point.is_empty()
    }

    /// Associates `row` with `point`, both flags cleared.
    pub fn register(&mut self, row: RowKey, point: PointHandle) -> PlotResult<()> {
        if self.row_to_point.contains_key(&row) {
            return Err(PlotError::InvalidData(format!(
                "row {} already has a visual point",
                row.get()
            )));
        }
        let index = point.index();
        if self.point_links.len() <= index {
            self.point_links.resize(index + 1, None);
        }
        if self.point_links[index].is_some() {
            return Err(PlotError::InvalidData(format!(
                "point slot {index} is already associated"
            )));
        }
        self.point_links[index] = Some(PointLink {
            row,
            generation: point.generation(),
            highlighted: false,
        });
        self.row_to_point.insert(row, point);
        Ok(())
    }

    /// Drops both directions of the association for `row`.
    pub fn unregister_row(&mut self, row: RowKey) -> Option<PointHandle> {
        let point = self.row_to_point.shift_remove(&row)?;
        self.clear_point_slot(point);
        Some(point)
    }

    /// Drops the associations of every row in `rows` in one pass over the
    /// row table. Returns the handles that were linked.
    pub fn unregister_rows(&mut self, rows: &[RowKey]) -> Vec<PointHandle> {
        let doomed: HashSet<RowKey> = rows.iter().copied().collect();
        let mut released = Vec::with_capacity(doomed.len());
        self.row_to_point.retain(|row, point| {
            if doomed.contains(row) {
                released.push(*point);
                false
            } else {
                true
            }
        });
        for point in &released {
            self.clear_point_slot(*point);
        }
        trace!(rows = released.len(), "rows unregistered");
        released
    }

    /// Drops both directions of the association for `point`.
    pub fn unregister_point(&mut self, point: PointHandle) -> Option<RowKey> {
        let link = self.link(point)?;
        self.row_to_point.shift_remove(&link.row);
        self.clear_point_slot(point);
        Some(link.row)
    }

    fn clear_point_slot(&mut self, point: PointHandle) {
        if let Some(slot) = self.point_links.get_mut(point.index()) {
            if let Some(link) = slot.take() {
                if link.highlighted {
                    self.highlighted_count -= 1;
                }
            }
        }
        if self.selected == Some(point) {
            self.selected = None;
        }
    }

    fn link(&self, point: PointHandle) -> Option<PointLink> {
        self.point_links
            .get(point.index())
            .copied()
            .flatten()
            .filter(|link| link.generation == point.generation())
    }

    #[must_use]
    pub fn point_for_row(&self, row: RowKey) -> Option<PointHandle> {
        self.row_to_point.get(&row).copied()
    }

    #[must_use]
    pub fn row_for_point(&self, point: PointHandle) -> Option<RowKey> {
        self.link(point).map(|link| link.row)
    }

    pub fn points(&self) -> impl Iterator<Item = (RowKey, PointHandle)> + '_ {
        self.row_to_point.iter().map(|(row, point)| (*row, *point))
    }

    #[must_use]
    pub fn selected(&self) -> Option<PointHandle> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, point: PointHandle) -> bool {
        self.selected == Some(point)
    }

    #[must_use]
    pub fn is_highlighted(&self, point: PointHandle) -> bool {
        self.link(point).is_some_and(|link| link.highlighted)
    }

    #[must_use]
    pub fn highlighted_count(&self) -> usize {
        self.highlighted_count
    }

    pub fn highlighted_points(&self) -> impl Iterator<Item = PointHandle> + '_ {
        self.row_to_point
            .values()
            .copied()
            .filter(|point| self.is_highlighted(*point))
    }

    /// Marks `point` selected and returns the point that held the flag
    /// before, if it was a different one.
    pub fn select(&mut self, point: PointHandle) -> PlotResult<Option<PointHandle>> {
        if self.link(point).is_none() {
            return Err(PlotError::StalePoint);
        }
        let previous = self.selected.replace(point);
        trace!(point = point.index(), "point selected");
        Ok(previous.filter(|prev| *prev != point))
    }

    pub fn clear_selection(&mut self) -> Option<PointHandle> {
        self.selected.take()
    }

    /// Sets the brush flag. Returns `true` when the flag changed.
    pub fn set_highlighted(&mut self, point: PointHandle, highlighted: bool) -> PlotResult<bool> {
        let generation = point.generation();
        let link = self
            .point_links
            .get_mut(point.index())
            .and_then(Option::as_mut)
            .filter(|link| link.generation == generation)
            .ok_or(PlotError::StalePoint)?;
        if link.highlighted == highlighted {
            return Ok(false);
        }
        link.highlighted = highlighted;
        if highlighted {
            self.highlighted_count += 1;
        } else {
            self.highlighted_count -= 1;
        }
        Ok(true)
    }

    /// Clears every brush flag. Returns how many points changed.
    pub fn clear_highlights(&mut self) -> usize {
        let mut cleared = 0;
        for link in self.point_links.iter_mut().flatten() {
            if link.highlighted {
                link.highlighted = false;
                cleared += 1;
            }
        }
        self.highlighted_count = 0;
        cleared
    }

    /// Fill color of `point`: selected, then highlighted, then the color
    /// axis, then the default color.
    pub fn resolve_color(
        &self,
        point: PointHandle,
        row: &DataRow,
        context: StyleContext<'_>,
    ) -> PlotResult<Color> {
        let link = self.link(point).ok_or(PlotError::StalePoint)?;
        if self.is_selected(point) {
            return Ok(context.palette.clicked);
        }
        if link.highlighted {
            return Ok(context.palette.highlight);
        }
        Ok(match context.color_scale {
            Some(scale) => scale.color(row.value(&scale.column)),
            None => context.palette.default,
        })
    }

    /// Full opacity for selected or highlighted points, else the view's.
    pub fn resolve_opacity(&self, point: PointHandle, context: StyleContext<'_>) -> PlotResult<f64> {
        let link = self.link(point).ok_or(PlotError::StalePoint)?;
        if self.is_selected(point) || link.highlighted {
            Ok(1.0)
        } else {
            Ok(context.base_opacity)
        }
    }
}
