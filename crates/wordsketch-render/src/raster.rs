//! Stroke rasterization on `vello_cpu`.
//!
//! Strokes become round-joined, round-capped polylines in a
//! `vello_cpu::RenderContext`. The rendered frame is kept as straight-alpha
//! RGBA bytes, ready for sampling and PNG encoding.

use peniko::Color;
use vello_cpu::color::{AlphaColor, Srgb};
use vello_cpu::kurbo::{BezPath, Cap, Circle, Join, Rect, Shape, Stroke as StrokeStyle};
use wordsketch_core::Stroke;

/// Flattening tolerance for dot outlines, in pixels.
const TOLERANCE: f64 = 0.1;

/// A rendered frame: straight-alpha 8-bit RGBA, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Pixmap {
    /// Create a transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub(crate) fn from_vello(pixmap: vello_cpu::Pixmap) -> Self {
        let width = u32::from(pixmap.width());
        let height = u32::from(pixmap.height());
        let data = pixmap
            .take_unpremultiplied()
            .into_iter()
            .flat_map(|px| [px.r, px.g, px.b, px.a])
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// RGBA bytes, row-major.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.data
    }
}

/// Size as `vello_cpu` takes it. `None` for an empty or oversized frame.
pub(crate) fn frame_size(width: u32, height: u32) -> Option<(u16, u16)> {
    let width = u16::try_from(width).ok().filter(|w| *w > 0)?;
    let height = u16::try_from(height).ok().filter(|h| *h > 0)?;
    Some((width, height))
}

pub(crate) fn paint(color: Color) -> AlphaColor<Srgb> {
    AlphaColor::new(color.components)
}

/// Fill the whole frame with `color`.
pub(crate) fn fill_background(
    scene: &mut vello_cpu::RenderContext,
    size: (u16, u16),
    color: Color,
) {
    scene.set_paint(paint(color));
    scene.fill_rect(&Rect::new(0.0, 0.0, f64::from(size.0), f64::from(size.1)));
}

/// Draw one stroke as a polyline of constant width.
///
/// A stroke whose points all coincide draws a dot of diameter `size`.
pub(crate) fn draw_stroke(scene: &mut vello_cpu::RenderContext, stroke: &Stroke, color: Color) {
    let Some(first) = stroke.points.first() else {
        return;
    };
    scene.set_paint(paint(color));

    if stroke.points.iter().all(|point| point == first) {
        let dot = Circle::new((first.x, first.y), stroke.size / 2.0);
        scene.fill_path(&dot.to_path(TOLERANCE));
        return;
    }

    let mut path = BezPath::new();
    path.move_to((first.x, first.y));
    for point in &stroke.points[1..] {
        path.line_to((point.x, point.y));
    }
    scene.set_stroke(
        StrokeStyle::new(stroke.size)
            .with_join(Join::Round)
            .with_caps(Cap::Round),
    );
    scene.stroke_path(&path);
}
