use crate::error::{PlotError, PlotResult};
use crate::extensions::{PlotContext, PlotEvent, PlotObserver};
use crate::render::Renderer;

use super::PlotEngine;

impl<R: Renderer> PlotEngine<R> {
    /// Registers an observer with a unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn PlotObserver>) -> PlotResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(PlotError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(PlotError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.core.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .core
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.core.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.core.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.core
            .observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }

    #[must_use]
    pub fn plot_context(&self) -> PlotContext {
        self.core.context()
    }

    pub(super) fn emit_event(&mut self, event: PlotEvent) {
        if self.core.observers.is_empty() {
            return;
        }
        let context = self.core.context();
        for observer in &mut self.core.observers {
            observer.on_event(&event, &context);
        }
    }
}
