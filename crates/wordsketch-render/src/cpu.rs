//! CPU renderer backed by `vello_cpu`.

use crate::export::encode_png;
use crate::raster::{self, Pixmap};
use crate::renderer::{RenderContext, RenderResult, Renderer};
use wordsketch_core::parse_color;

/// Software renderer that redraws every stroke into an owned pixmap.
#[derive(Debug, Clone)]
pub struct CpuRenderer {
    pixmap: Pixmap,
}

impl CpuRenderer {
    /// Create a renderer with a transparent backing store.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixmap: Pixmap::new(width, height),
        }
    }

    /// The last rendered frame.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encode the last rendered frame as PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        encode_png(&self.pixmap)
    }
}

impl Renderer for CpuRenderer {
    fn render(&mut self, ctx: &RenderContext) {
        let (width, height) = self.size();
        let Some(size) = raster::frame_size(width, height) else {
            if width > 0 && height > 0 {
                log::warn!("Raster {width}x{height} is too large to draw");
            }
            self.pixmap = Pixmap::new(width, height);
            return;
        };

        let mut scene = vello_cpu::RenderContext::new(size.0, size.1);
        if let Some(color) = ctx.background {
            raster::fill_background(&mut scene, size, color);
        }
        for stroke in ctx.visible_strokes() {
            match parse_color(&stroke.color) {
                Ok(color) => raster::draw_stroke(&mut scene, stroke, color),
                Err(e) => log::warn!("Skipping stroke with unusable color: {e}"),
            }
        }
        scene.flush();

        let mut target = vello_cpu::Pixmap::new(size.0, size.1);
        scene.render_to_pixmap(&mut target);
        self.pixmap = Pixmap::from_vello(target);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.size() {
            log::debug!("Resizing raster to {width}x{height}");
        }
        self.pixmap = Pixmap::new(width, height);
    }

    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }
}
