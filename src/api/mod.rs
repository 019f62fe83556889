//! Public engine facade.
//!
//! `PlotEngine` is one type whose `impl` blocks are split by concern across
//! the files of this module.

mod axis_controller;
mod engine;
mod engine_accessors;
mod engine_config;
mod engine_core;
mod engine_init;
mod engine_snapshot;
mod field_controller;
mod field_loading;
mod interaction_controller;
mod invalidation;
mod observer_dispatch;
mod render_frame_builder;
mod snapshot_controller;
mod validation;

pub use engine::PlotEngine;
pub use engine_config::{BrushStyle, PlotEngineConfig};
pub use engine_snapshot::{PlotSnapshot, PointSnapshot};
pub use field_loading::{
    BackgroundFieldLoader, FieldLoadCompletion, FieldLoadOutcome, FieldLoadTicket, FieldLoader,
};
pub use invalidation::InvalidationLevel;
pub use validation::validate_config;
