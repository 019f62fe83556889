use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::FieldPayload;
use crate::error::{PlotError, PlotResult};
use crate::render::Renderer;

use super::PlotEngine;

/// Source of field rows and metadata (files, HTTP, fixtures).
pub trait FieldLoader {
    fn load_field(&self, name: &str) -> PlotResult<FieldPayload>;
}

impl<F> FieldLoader for F
where
    F: Fn(&str) -> PlotResult<FieldPayload>,
{
    fn load_field(&self, name: &str) -> PlotResult<FieldPayload> {
        self(name)
    }
}

/// Handle for one requested field load.
///
/// Only the newest ticket of a field may integrate its result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldLoadTicket {
    pub field: String,
    pub id: u64,
}

/// What happened to a finished load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldLoadOutcome {
    Integrated { rows: usize },
    /// The field was disabled or re-requested while loading.
    Stale,
    Failed { reason: String },
}

/// Result of a load run on a worker thread.
#[derive(Debug)]
pub struct FieldLoadCompletion {
    pub ticket: FieldLoadTicket,
    pub result: PlotResult<FieldPayload>,
}

/// Runs a `FieldLoader` on worker threads and hands completions back over
/// a channel, to be drained on the thread that owns the engine.
pub struct BackgroundFieldLoader<L> {
    loader: Arc<L>,
    sender: Sender<FieldLoadCompletion>,
    receiver: Receiver<FieldLoadCompletion>,
    in_flight: usize,
}

impl<L> BackgroundFieldLoader<L>
where
    L: FieldLoader + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(loader: L) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            loader: Arc::new(loader),
            sender,
            receiver,
            in_flight: 0,
        }
    }

    /// Loads that were spawned and not yet drained.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn spawn(&mut self, ticket: FieldLoadTicket) -> PlotResult<()> {
        let loader = Arc::clone(&self.loader);
        let sender = self.sender.clone();
        let field = ticket.field.clone();
        thread::Builder::new()
            .name(format!("field-load-{field}"))
            .spawn(move || {
                let result = loader.load_field(&ticket.field);
                if sender.send(FieldLoadCompletion { ticket, result }).is_err() {
                    trace!("field load finished after its loader was dropped");
                }
            })
            .map_err(|err| PlotError::FieldLoadFailure {
                field: field.clone(),
                reason: err.to_string(),
            })?;
        self.in_flight += 1;
        trace!(field = %field, in_flight = self.in_flight, "field load spawned");
        Ok(())
    }

    /// Completions that are ready now, without blocking.
    pub fn drain(&mut self) -> Vec<FieldLoadCompletion> {
        let completions: Vec<FieldLoadCompletion> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(completions.len());
        completions
    }

    /// Blocks up to `timeout` for the next completion.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<FieldLoadCompletion> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(completion)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl<R: Renderer> PlotEngine<R> {
    /// Loads and integrates `name` on the calling thread.
    pub fn load_field_now<L: FieldLoader + ?Sized>(
        &mut self,
        loader: &L,
        name: &str,
    ) -> PlotResult<FieldLoadOutcome> {
        let Some(ticket) = self.on_field_toggled(name, true)? else {
            return Ok(FieldLoadOutcome::Stale);
        };
        let result = loader.load_field(name);
        self.complete_field_load(&ticket, result)
    }

    /// Enables `name` and starts its load on `loader`'s workers.
    ///
    /// Returns `false` when nothing had to be started.
    pub fn request_field_in_background<L>(
        &mut self,
        loader: &mut BackgroundFieldLoader<L>,
        name: &str,
    ) -> PlotResult<bool>
    where
        L: FieldLoader + Send + Sync + 'static,
    {
        let Some(ticket) = self.on_field_toggled(name, true)? else {
            return Ok(false);
        };
        if let Err(err) = loader.spawn(ticket.clone()) {
            self.complete_field_load(&ticket, Err(err.clone()))?;
            return Err(err);
        }
        Ok(true)
    }

    /// Integrates every finished background load.
    pub fn integrate_background_loads<L>(
        &mut self,
        loader: &mut BackgroundFieldLoader<L>,
    ) -> PlotResult<Vec<(FieldLoadTicket, FieldLoadOutcome)>>
    where
        L: FieldLoader + Send + Sync + 'static,
    {
        let completions = loader.drain();
        let mut outcomes = Vec::with_capacity(completions.len());
        for completion in completions {
            let outcome = self.complete_field_load(&completion.ticket, completion.result)?;
            outcomes.push((completion.ticket, outcome));
        }
        if !outcomes.is_empty() {
            debug!(completed = outcomes.len(), "background field loads integrated");
        }
        Ok(outcomes)
    }
}
