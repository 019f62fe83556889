use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::render::{CirclePrimitive, LinePrimitive, RectPrimitive, TextPrimitive};

/// Fixed back-to-front drawing layers of one plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Points,
    Brush,
    Axis,
}

impl CanvasLayerKind {
    pub const ORDERED: [Self; 5] = [
        Self::Background,
        Self::Grid,
        Self::Points,
        Self::Brush,
        Self::Axis,
    ];
}

/// Primitives of one layer. Within a layer backends draw rects, then
/// lines, then circles, then texts.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerPrimitives {
    pub kind: CanvasLayerKind,
    pub rects: Vec<RectPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub circles: Vec<CirclePrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl LayerPrimitives {
    fn empty(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            rects: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
            && self.lines.is_empty()
            && self.circles.is_empty()
            && self.texts.is_empty()
    }
}

/// Backend-agnostic scene for one plot draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub layers: Vec<LayerPrimitives>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: CanvasLayerKind::ORDERED
                .into_iter()
                .map(LayerPrimitives::empty)
                .collect(),
        }
    }

    #[must_use]
    pub fn layer(&self, kind: CanvasLayerKind) -> Option<&LayerPrimitives> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    fn layer_mut(&mut self, kind: CanvasLayerKind) -> &mut LayerPrimitives {
        let index = match self.layers.iter().position(|layer| layer.kind == kind) {
            Some(index) => index,
            None => {
                self.layers.push(LayerPrimitives::empty(kind));
                self.layers.sort_by_key(|layer| layer.kind);
                self.layers
                    .iter()
                    .position(|layer| layer.kind == kind)
                    .unwrap_or(self.layers.len() - 1)
            }
        };
        &mut self.layers[index]
    }

    pub fn push_rect(&mut self, kind: CanvasLayerKind, rect: RectPrimitive) {
        self.layer_mut(kind).rects.push(rect);
    }

    pub fn push_line(&mut self, kind: CanvasLayerKind, line: LinePrimitive) {
        self.layer_mut(kind).lines.push(line);
    }

    pub fn push_circle(&mut self, kind: CanvasLayerKind, circle: CirclePrimitive) {
        self.layer_mut(kind).circles.push(circle);
    }

    pub fn push_text(&mut self, kind: CanvasLayerKind, text: TextPrimitive) {
        self.layer_mut(kind).texts.push(text);
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.layers.iter().flat_map(|layer| layer.lines.iter())
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectPrimitive> {
        self.layers.iter().flat_map(|layer| layer.rects.iter())
    }

    pub fn circles(&self) -> impl Iterator<Item = &CirclePrimitive> {
        self.layers.iter().flat_map(|layer| layer.circles.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.layers.iter().flat_map(|layer| layer.texts.iter())
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for layer in &self.layers {
            for rect in &layer.rects {
                rect.validate()?;
            }
            for line in &layer.lines {
                line.validate()?;
            }
            for circle in &layer.circles {
                circle.validate()?;
            }
            for text in &layer.texts {
                text.validate()?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(LayerPrimitives::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasLayerKind, RenderFrame};
    use crate::core::Viewport;
    use crate::render::{CirclePrimitive, Color, RectPrimitive};

    #[test]
    fn layers_keep_back_to_front_order() {
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        frame.push_rect(
            CanvasLayerKind::Brush,
            RectPrimitive::new(1.0, 1.0, 5.0, 5.0, Color::rgb(1.0, 1.0, 1.0)),
        );
        frame.push_circle(
            CanvasLayerKind::Points,
            CirclePrimitive::new(3.0, 3.0, 3.0, Color::rgb(0.5, 0.5, 0.5)),
        );

        let kinds: Vec<_> = frame.layers.iter().map(|layer| layer.kind).collect();
        assert_eq!(kinds, CanvasLayerKind::ORDERED.to_vec());
        assert_eq!(frame.circles().count(), 1);
        assert_eq!(frame.rects().count(), 1);
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn new_frame_is_empty() {
        assert!(RenderFrame::new(Viewport::new(10, 10)).is_empty());
    }
}
