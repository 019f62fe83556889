use tracing::{debug, warn};

use crate::core::{FieldPayload, RowKey};
use crate::error::{PlotError, PlotResult};
use crate::extensions::PlotEvent;
use crate::render::Renderer;
use crate::surface::StyleContext;

use super::{FieldLoadOutcome, FieldLoadTicket, PlotEngine};

impl<R: Renderer> PlotEngine<R> {
    /// Field-selector toggle.
    ///
    /// Enabling returns a ticket when a load has to be started, and `None`
    /// when the field is already loaded or already loading. Disabling
    /// removes the field's points and rows at once and voids any pending
    /// ticket for it.
    pub fn on_field_toggled(
        &mut self,
        name: &str,
        enabled: bool,
    ) -> PlotResult<Option<FieldLoadTicket>> {
        if name.is_empty() {
            return Err(PlotError::InvalidData(
                "field name must not be empty".to_owned(),
            ));
        }

        let ticket = if enabled {
            if self.core.store.has_field(name) || self.core.pending_fields.contains_key(name) {
                return Ok(None);
            }
            let id = self.core.next_ticket_id;
            self.core.next_ticket_id += 1;
            self.core.pending_fields.insert(name.to_owned(), id);
            debug!(field = name, ticket = id, "field load requested");
            Some(FieldLoadTicket {
                field: name.to_owned(),
                id,
            })
        } else {
            let was_pending = self.core.pending_fields.shift_remove(name).is_some();
            let removed = self.remove_field(name)?;
            if !was_pending && removed.is_none() {
                return Ok(None);
            }
            None
        };

        self.emit_event(PlotEvent::FieldToggled {
            field: name.to_owned(),
            enabled,
        });
        Ok(ticket)
    }

    /// Integrates the result of a load started by `on_field_toggled`.
    ///
    /// Results for tickets that are no longer current are dropped. Load
    /// failures leave the field absent and are reported, not returned.
    pub fn complete_field_load(
        &mut self,
        ticket: &FieldLoadTicket,
        result: PlotResult<FieldPayload>,
    ) -> PlotResult<FieldLoadOutcome> {
        if self.core.pending_fields.get(&ticket.field) != Some(&ticket.id) {
            debug!(field = %ticket.field, ticket = ticket.id, "stale field load discarded");
            return Ok(FieldLoadOutcome::Stale);
        }
        self.core.pending_fields.shift_remove(&ticket.field);

        match result.and_then(|payload| self.integrate_field(&ticket.field, payload)) {
            Ok(rows) => {
                self.emit_event(PlotEvent::FieldLoaded {
                    field: ticket.field.clone(),
                    rows,
                });
                Ok(FieldLoadOutcome::Integrated { rows })
            }
            Err(err) => {
                let reason = match err {
                    PlotError::FieldLoadFailure { reason, .. } => reason,
                    other => other.to_string(),
                };
                warn!(field = %ticket.field, reason = %reason, "field load failed");
                self.emit_event(PlotEvent::FieldLoadFailed {
                    field: ticket.field.clone(),
                    reason: reason.clone(),
                });
                Ok(FieldLoadOutcome::Failed { reason })
            }
        }
    }

    #[must_use]
    pub fn is_field_pending(&self, name: &str) -> bool {
        self.core.pending_fields.contains_key(name)
    }

    pub fn pending_fields(&self) -> impl Iterator<Item = &str> {
        self.core.pending_fields.keys().map(String::as_str)
    }

    /// Adds the rows of `name` and one point per row, then brings domains,
    /// colors and decorations up to date. Nothing is kept on failure.
    fn integrate_field(&mut self, name: &str, payload: FieldPayload) -> PlotResult<usize> {
        let keys = self.core.store.insert_field(name, payload)?;
        if let Err(err) = self.create_points(&keys) {
            let core = &mut self.core;
            core.surface.destroy_field(name, &core.store, &mut core.registry);
            core.store.remove_field(name);
            core.resync_after_data_change()?;
            return Err(err);
        }
        self.core.resync_after_data_change()?;
        self.invalidate_full();
        debug!(
            field = name,
            rows = keys.len(),
            points = self.core.surface.len(),
            "field integrated"
        );
        Ok(keys.len())
    }

    fn create_points(&mut self, keys: &[RowKey]) -> PlotResult<()> {
        let core = &mut self.core;
        let style = StyleContext {
            palette: &core.config.palette,
            color_scale: core.scales.color_scale(),
            base_opacity: core.view.point_opacity,
        };
        for key in keys {
            let Some(row) = core.store.row(*key) else {
                continue;
            };
            core.surface.create_point(
                *key,
                row,
                &mut core.registry,
                &core.scales,
                &core.view,
                style,
            )?;
        }
        Ok(())
    }

    /// Destroys the points and rows of `name`. Returns the number of
    /// destroyed points, or `None` if the field was not loaded.
    fn remove_field(&mut self, name: &str) -> PlotResult<Option<usize>> {
        if !self.core.store.has_field(name) {
            return Ok(None);
        }

        let hovered_in_field = self
            .core
            .interaction
            .hovered()
            .and_then(|handle| self.core.row_key_for_point(handle))
            .and_then(|key| self.core.store.row(key))
            .is_some_and(|row| row.field == name);
        if hovered_in_field {
            self.core.interaction.set_hovered(None);
        }

        let core = &mut self.core;
        let destroyed = core
            .surface
            .destroy_field(name, &core.store, &mut core.registry);
        core.store.remove_field(name);
        core.resync_after_data_change()?;
        self.invalidate_full();
        debug!(field = name, destroyed, points = self.core.surface.len(), "field removed");

        if hovered_in_field {
            self.emit_event(PlotEvent::Hovered { row: None });
        }
        Ok(Some(destroyed))
    }
}
