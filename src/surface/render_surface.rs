use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{DataRow, DataStore, RowKey, ScaleManager, ScreenPoint, ViewState};
use crate::error::{PlotError, PlotResult};
use crate::render::Color;
use crate::surface::{StyleContext, VisualEntityRegistry};

/// Generational handle of one visual point.
///
/// A handle outlives its point only as a stale value: once the slot is
/// reused the generation differs and every lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointHandle {
    index: u32,
    generation: u32,
}

impl PointHandle {
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// On-screen mark of one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualPoint {
    pub x: f64,
    pub y: f64,
    pub color: Color,
    pub alpha: f64,
    pub z: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    point: Option<VisualPoint>,
}

/// Canvas-like stage holding one visual point per loaded row.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    next_z: u64,
    point_radius: f64,
}

impl RenderSurface {
    #[must_use]
    pub fn new(point_radius: f64) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            next_z: 0,
            point_radius,
        }
    }

    #[must_use]
    pub fn point_radius(&self) -> f64 {
        self.point_radius
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[must_use]
    pub fn point(&self, handle: PointHandle) -> Option<&VisualPoint> {
        self.slots
            .get(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.point.as_ref())
    }

    fn point_mut(&mut self, handle: PointHandle) -> PlotResult<&mut VisualPoint> {
        self.slots
            .get_mut(handle.index())
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.point.as_mut())
            .ok_or(PlotError::StalePoint)
    }

    fn allocate(&mut self, point: VisualPoint) -> PlotResult<PointHandle> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.point = Some(point);
            return Ok(PointHandle::new(index, slot.generation));
        }
        let index = u32::try_from(self.slots.len())
            .map_err(|_| PlotError::InvalidData("visual point arena is full".to_owned()))?;
        self.slots.push(Slot {
            generation: 0,
            point: Some(point),
        });
        Ok(PointHandle::new(index, 0))
    }

    fn next_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }

    /// Creates the point for `row`, placed and styled from current state,
    /// and records the association.
    pub fn create_point(
        &mut self,
        key: RowKey,
        row: &DataRow,
        registry: &mut VisualEntityRegistry,
        scales: &ScaleManager,
        view: &ViewState,
        style: StyleContext<'_>,
    ) -> PlotResult<PointHandle> {
        let position = scales.project(key, row, view);
        let z = self.next_z();
        let handle = self.allocate(VisualPoint {
            x: position.x,
            y: position.y,
            color: style.palette.default,
            alpha: style.base_opacity,
            z,
        })?;
        if let Err(err) = registry.register(key, handle) {
            self.release(handle);
            return Err(err);
        }
        self.live += 1;
        self.apply_style(handle, row, registry, style)?;
        Ok(handle)
    }

    fn release(&mut self, handle: PointHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index()) else {
            return false;
        };
        if slot.generation != handle.generation() || slot.point.is_none() {
            return false;
        }
        slot.point = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        true
    }

    /// Removes the points of `rows`, unregistering each one first.
    ///
    /// Returns how many points were destroyed.
    pub fn destroy_rows(&mut self, rows: &[RowKey], registry: &mut VisualEntityRegistry) -> usize {
        let mut destroyed = 0;
        for handle in registry.unregister_rows(rows) {
            if self.release(handle) {
                self.live -= 1;
                destroyed += 1;
            }
        }
        destroyed
    }

    /// Removes every point whose row belongs to `field_name`.
    ///
    /// Must run while the field's rows are still in `store`.
    pub fn destroy_field(
        &mut self,
        field_name: &str,
        store: &DataStore,
        registry: &mut VisualEntityRegistry,
    ) -> usize {
        let destroyed = self.destroy_rows(store.field_rows(field_name), registry);
        trace!(field = field_name, destroyed, "field points destroyed");
        destroyed
    }

    /// Recomputes every live point's position from its row.
    pub fn reposition(
        &mut self,
        store: &DataStore,
        registry: &VisualEntityRegistry,
        scales: &ScaleManager,
        view: &ViewState,
    ) -> usize {
        let targets: Vec<(PointHandle, RowKey)> = registry
            .points()
            .map(|(row, handle)| (handle, row))
            .collect();
        let positions = project_all(&targets, store, scales, view);

        let mut moved = 0;
        for (handle, position) in positions {
            if let Ok(point) = self.point_mut(handle) {
                point.x = position.x;
                point.y = position.y;
                moved += 1;
            }
        }
        trace!(points = moved, "reposition pass");
        moved
    }

    /// Re-resolves one point's color and opacity through the registry.
    pub fn apply_style(
        &mut self,
        handle: PointHandle,
        row: &DataRow,
        registry: &VisualEntityRegistry,
        style: StyleContext<'_>,
    ) -> PlotResult<()> {
        let color = registry.resolve_color(handle, row, style)?;
        let alpha = registry.resolve_opacity(handle, style)?;
        let point = self.point_mut(handle)?;
        point.color = color;
        point.alpha = alpha;
        Ok(())
    }

    /// Overrides one point's paint without touching registry flags.
    pub fn set_paint(&mut self, handle: PointHandle, color: Color, alpha: f64) -> PlotResult<()> {
        let point = self.point_mut(handle)?;
        point.color = color;
        point.alpha = alpha;
        Ok(())
    }

    /// Recomputes color and opacity of every live point.
    pub fn recolor(
        &mut self,
        store: &DataStore,
        registry: &VisualEntityRegistry,
        style: StyleContext<'_>,
    ) -> usize {
        let mut recolored = 0;
        for (row_key, handle) in registry.points() {
            let Some(row) = store.row(row_key) else {
                continue;
            };
            if self.apply_style(handle, row, registry, style).is_ok() {
                recolored += 1;
            }
        }
        trace!(points = recolored, "recolor pass");
        recolored
    }

    /// Moves `handle` to the top of the paint order.
    pub fn bring_to_front(&mut self, handle: PointHandle) -> PlotResult<()> {
        let z = self.next_z();
        self.point_mut(handle)?.z = z;
        Ok(())
    }

    /// Live points back to front.
    #[must_use]
    pub fn paint_order(&self) -> Vec<(PointHandle, &VisualPoint)> {
        let mut points: Vec<(PointHandle, &VisualPoint)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.point
                    .as_ref()
                    .map(|point| (PointHandle::new(index as u32, slot.generation), point))
            })
            .collect();
        points.sort_by_key(|(_, point)| point.z);
        points
    }

    /// Topmost point whose disc contains `pointer`.
    #[must_use]
    pub fn hit_test(&self, pointer: ScreenPoint) -> Option<PointHandle> {
        let radius = self.point_radius;
        let mut hits: SmallVec<[(u64, OrderedFloat<f64>, PointHandle); 4]> = SmallVec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(point) = slot.point.as_ref() else {
                continue;
            };
            let distance = (point.x - pointer.x).hypot(point.y - pointer.y);
            if distance <= radius {
                hits.push((
                    point.z,
                    OrderedFloat(distance),
                    PointHandle::new(index as u32, slot.generation),
                ));
            }
        }
        hits.into_iter()
            .max_by_key(|(z, distance, _)| (*z, std::cmp::Reverse(*distance)))
            .map(|(_, _, handle)| handle)
    }
}

#[cfg(not(feature = "parallel-projection"))]
fn project_all(
    targets: &[(PointHandle, RowKey)],
    store: &DataStore,
    scales: &ScaleManager,
    view: &ViewState,
) -> Vec<(PointHandle, ScreenPoint)> {
    targets
        .iter()
        .filter_map(|(handle, key)| {
            let row = store.row(*key)?;
            Some((*handle, scales.project(*key, row, view)))
        })
        .collect()
}

#[cfg(feature = "parallel-projection")]
fn project_all(
    targets: &[(PointHandle, RowKey)],
    store: &DataStore,
    scales: &ScaleManager,
    view: &ViewState,
) -> Vec<(PointHandle, ScreenPoint)> {
    use rayon::prelude::*;

    targets
        .par_iter()
        .filter_map(|(handle, key)| {
            let row = store.row(*key)?;
            Some((*handle, scales.project(*key, row, view)))
        })
        .collect()
}
