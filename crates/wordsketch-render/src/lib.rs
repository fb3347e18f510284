//! WordSketch Render Library
//!
//! Renderer abstraction and a `vello_cpu` renderer for freehand strokes, with
//! PNG export of the rendered frame.

mod cpu;
mod export;
mod raster;
mod renderer;

pub use cpu::CpuRenderer;
pub use export::encode_png;
pub use raster::Pixmap;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
