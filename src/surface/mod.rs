//! Visual points and their association with catalog rows.

mod registry;
mod render_surface;

pub use registry::{PointPalette, StyleContext, VisualEntityRegistry};
pub use render_surface::{PointHandle, RenderSurface, VisualPoint};
