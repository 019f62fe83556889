//! skyplot-rs: point-rendering and interaction engine for large
//! astronomical catalogs.
//!
//! Catalog fields are loaded into a `DataStore`, drawn as one point per row,
//! and explored through pan/zoom, rectangular brushing, hover and selection,
//! animated axis switches and an optional color axis. Drawing goes through a
//! backend-agnostic `RenderFrame` so the engine runs headless in tests.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod overlay;
pub mod render;
pub mod surface;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{PlotEngine, PlotEngineConfig};
pub use error::{PlotError, PlotResult};
