use crate::error::PlotResult;
use crate::render::{CanvasLayerKind, CirclePrimitive, RectPrimitive, RenderFrame, Renderer};

use super::PlotEngine;

impl<R: Renderer> PlotEngine<R> {
    /// Materializes the current plot: background, decorations, points back
    /// to front, the brush rectangle, then axis titles.
    pub fn build_render_frame(&self) -> PlotResult<RenderFrame> {
        let viewport = self.core.scales.viewport();
        let width = viewport.width_px();
        let height = viewport.height_px();
        let mut frame = RenderFrame::new(viewport);

        frame.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::new(0.0, 0.0, width, height, self.core.config.background_color),
        );
        self.core.overlay.build(&mut frame, viewport);

        let radius = self.core.surface.point_radius();
        for (_, point) in self.core.surface.paint_order() {
            let visible = point.x + radius >= 0.0
                && point.x - radius <= width
                && point.y + radius >= 0.0
                && point.y - radius <= height;
            if !visible {
                continue;
            }
            frame.push_circle(
                CanvasLayerKind::Points,
                CirclePrimitive::new(
                    point.x,
                    point.y,
                    radius,
                    point.color.with_alpha(point.color.alpha * point.alpha),
                ),
            );
        }

        if let Some(brush) = self.core.interaction.brush().filter(|brush| !brush.is_empty()) {
            let style = self.core.config.brush;
            frame.push_rect(
                CanvasLayerKind::Brush,
                RectPrimitive::new(brush.x0, brush.y0, brush.width(), brush.height(), style.fill_color)
                    .with_border(style.stroke_width, style.stroke_color),
            );
        }

        frame.validate()?;
        Ok(frame)
    }
}
