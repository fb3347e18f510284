//! PNG export.

use crate::raster::Pixmap;
use crate::renderer::{RenderResult, RendererError};

/// Encode a pixmap as 8-bit RGBA PNG bytes.
pub fn encode_png(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    if pixmap.is_empty() {
        return Err(RendererError::EmptyImage {
            width: pixmap.width(),
            height: pixmap.height(),
        });
    }

    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::Encode(format!("Failed to write PNG header: {e}")))?;
        writer
            .write_image_data(pixmap.as_rgba8())
            .map_err(|e| RendererError::Encode(format!("Failed to write PNG data: {e}")))?;
    }

    log::debug!(
        "Encoded {}x{} PNG: {} bytes",
        pixmap.width(),
        pixmap.height(),
        png_data.len()
    );
    Ok(png_data)
}
