use tracing::trace;

use crate::error::PlotResult;
use crate::extensions::PlotEvent;
use crate::render::Renderer;

use super::engine_core::EngineCore;

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Main orchestration facade consumed by host applications.
///
/// `PlotEngine` owns the catalog rows, their visual points, the scales and
/// the interaction state of one scatter plot, and hands finished frames to
/// its renderer.
pub struct PlotEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) core: EngineCore,
}

impl<R: Renderer> PlotEngine<R> {
    /// Builds the current frame and hands it to the renderer.
    pub fn render(&mut self) -> PlotResult<()> {
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)?;
        trace!(
            circles = frame.circles().count(),
            level = ?self.core.invalidation,
            "frame rendered"
        );
        self.finish_render_cycle();
        Ok(())
    }

    /// Renders the frame into an external cairo context.
    ///
    /// This path is used by GTK draw callbacks while keeping the renderer
    /// implementation decoupled from GTK-specific APIs.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> PlotResult<()>
    where
        R: CairoContextRenderer,
    {
        let frame = self.build_render_frame()?;
        self.renderer.render_on_cairo_context(context, &frame)?;
        self.finish_render_cycle();
        Ok(())
    }

    fn finish_render_cycle(&mut self) {
        self.clear_invalidation();
        self.emit_event(PlotEvent::Rendered);
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
