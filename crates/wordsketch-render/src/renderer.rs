//! Renderer trait abstraction.

use peniko::Color;
use thiserror::Error;
use wordsketch_core::Stroke;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Image has no area: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything needed to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Committed strokes in paint order.
    pub strokes: &'a [Stroke],
    /// Stroke being drawn. Drawn on top once it has two points.
    pub in_progress: Option<&'a Stroke>,
    /// Fill applied before any stroke. `None` leaves the raster transparent.
    pub background: Option<Color>,
}

impl<'a> RenderContext<'a> {
    /// Context for a set of committed strokes on a transparent background.
    pub fn new(strokes: &'a [Stroke]) -> Self {
        Self {
            strokes,
            in_progress: None,
            background: None,
        }
    }

    /// Set the in-progress stroke.
    pub fn with_in_progress(mut self, stroke: Option<&'a Stroke>) -> Self {
        self.in_progress = stroke;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    /// Strokes to draw, back to front, skipping an in-progress stroke too short to show.
    pub fn visible_strokes(&self) -> impl Iterator<Item = &'a Stroke> + '_ {
        self.strokes
            .iter()
            .chain(self.in_progress.filter(|stroke| stroke.is_committable()))
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Redraw the whole frame from scratch.
    fn render(&mut self, ctx: &RenderContext);

    /// Resize the backing store. Contents are cleared.
    fn resize(&mut self, width: u32, height: u32);

    /// Backing store size in pixels.
    fn size(&self) -> (u32, u32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_visible_strokes_skip_short_in_progress() {
        let committed = vec![Stroke::from_points(
            "#000",
            2.0,
            vec![Point::ZERO, Point::new(1.0, 1.0)],
        )];
        let tap = Stroke::from_points("#000", 2.0, vec![Point::ZERO]);

        let ctx = RenderContext::new(&committed).with_in_progress(Some(&tap));
        assert_eq!(ctx.visible_strokes().count(), 1);

        let drag = Stroke::from_points("#f00", 2.0, vec![Point::ZERO, Point::new(3.0, 3.0)]);
        let ctx = RenderContext::new(&committed).with_in_progress(Some(&drag));
        assert_eq!(ctx.visible_strokes().last(), Some(&drag));
    }
}
