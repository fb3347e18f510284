//! The drawing surface: pointer capture, live raster and export.
//!
//! [`DrawingSurface`] ties the capture state machine to a CPU raster and a
//! list of observers. Every state change redraws the raster synchronously.
//! Observers see the committed stroke list after each commit, undo, clear,
//! restart, load or remount, never the stroke still being drawn.

use crate::config::{AppConfig, ConfigError};
use kurbo::Point;
use peniko::Color;
use thiserror::Error;
use wordsketch_core::{
    Brush, BrushError, BrushSize, Drawing, GesturePhase, Observers, PointerEvent, RawPointer,
    Stroke, StrokeCapture, StrokeEnd, StrokeObserver, SurfaceGeometry,
};
use wordsketch_render::{CpuRenderer, Pixmap, RenderContext, Renderer, RendererError};

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Surface is not mounted")]
    NotMounted,
    #[error("Surface has no area")]
    EmptySurface,
    #[error("Failed to encode image: {0}")]
    Encode(#[from] RendererError),
}

/// A mountable freehand drawing surface.
#[derive(Debug)]
pub struct DrawingSurface {
    capture: StrokeCapture,
    geometry: Option<SurfaceGeometry>,
    renderer: CpuRenderer,
    background: Option<Color>,
    observers: Observers,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface {
    /// Create an unmounted surface with the default brush and a transparent background.
    pub fn new() -> Self {
        Self {
            capture: StrokeCapture::new(),
            geometry: None,
            renderer: CpuRenderer::new(0, 0),
            background: None,
            observers: Observers::new(),
        }
    }

    /// Create an unmounted surface using the configured brush and background.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let mut surface = Self::new();
        surface.capture = StrokeCapture::with_brush(config.brush()?);
        surface.background = config.background_color()?;
        Ok(surface)
    }

    /// Set the background painted under the strokes.
    pub fn with_background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    /// Register an observer of the committed stroke list.
    pub fn subscribe(&mut self, observer: impl StrokeObserver + 'static) {
        self.observers.subscribe(Box::new(observer));
    }

    // --- lifecycle ---

    /// Attach the surface to a host element. Starts from an empty drawing.
    pub fn mount(&mut self, geometry: SurfaceGeometry) {
        log::debug!(
            "Mounting surface: backing {}x{}, displayed {:?}",
            geometry.backing_width,
            geometry.backing_height,
            geometry.displayed
        );
        self.geometry = Some(geometry);
        self.renderer
            .resize(geometry.backing_width, geometry.backing_height);
        self.discard_drawing();
    }

    /// Update the geometry after a layout change. Strokes are kept.
    pub fn resize(&mut self, geometry: SurfaceGeometry) {
        if self.geometry.is_none() {
            log::debug!("Ignoring resize of unmounted surface");
            return;
        }
        self.geometry = Some(geometry);
        self.renderer
            .resize(geometry.backing_width, geometry.backing_height);
        self.render();
    }

    /// Detach the surface and discard the drawing.
    pub fn unmount(&mut self) {
        self.geometry = None;
        self.renderer.resize(0, 0);
        self.discard_drawing();
    }

    pub fn is_mounted(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn geometry(&self) -> Option<&SurfaceGeometry> {
        self.geometry.as_ref()
    }

    /// Discard the drawing for a fresh attempt, keeping the brush.
    ///
    /// Observers are told only if committed strokes were removed.
    pub fn restart(&mut self) {
        self.discard_drawing();
    }

    /// Drop every stroke and redraw, telling observers if committed strokes went away.
    fn discard_drawing(&mut self) {
        let had_strokes = !self.capture.strokes().is_empty();
        self.capture.load(Drawing::new());
        self.render();
        if had_strokes {
            self.notify();
        }
    }

    // --- brush ---

    pub fn brush(&self) -> &Brush {
        self.capture.brush()
    }

    /// Set the color of the next stroke.
    pub fn set_brush_color(&mut self, color: &str) -> Result<(), BrushError> {
        self.capture.brush_mut().set_color(color)
    }

    /// Set the width of the next stroke.
    pub fn set_brush_size(&mut self, size: f64) -> Result<(), BrushError> {
        self.capture.brush_mut().set_size(size)
    }

    pub fn set_brush_preset(&mut self, preset: BrushSize) {
        self.capture.brush_mut().set_preset(preset);
    }

    // --- gestures ---

    /// Dispatch a host pointer event. Returns true if it changed anything.
    pub fn handle_event(&mut self, event: &PointerEvent) -> bool {
        match event.phase() {
            GesturePhase::Start => event.pointer().is_some_and(|raw| self.begin_stroke(raw)),
            GesturePhase::Move => event.pointer().is_some_and(|raw| self.extend_stroke(raw)),
            GesturePhase::End => self.end_stroke() != StrokeEnd::NotDrawing,
        }
    }

    /// Start a stroke at the event's primary point.
    ///
    /// No-op when unmounted or when the event has no usable coordinates.
    pub fn begin_stroke(&mut self, raw: &RawPointer) -> bool {
        let Some(point) = self.local_point(raw) else {
            log::trace!("Ignoring gesture start without a usable point: {raw:?}");
            return false;
        };
        let previous = self.capture.begin(point);
        self.render();
        if previous == StrokeEnd::Committed {
            self.notify();
        }
        true
    }

    /// Append the event's primary point to the current stroke.
    pub fn extend_stroke(&mut self, raw: &RawPointer) -> bool {
        if !self.capture.is_drawing() {
            return false;
        }
        let Some(point) = self.local_point(raw) else {
            log::trace!("Ignoring gesture move without a usable point: {raw:?}");
            return false;
        };
        self.capture.extend(point);
        self.render();
        true
    }

    /// Finish the current stroke, committing it if it has at least two points.
    pub fn end_stroke(&mut self) -> StrokeEnd {
        let outcome = self.capture.end();
        match outcome {
            StrokeEnd::Committed => {
                self.render();
                self.notify();
            }
            StrokeEnd::Discarded => {
                log::debug!("Discarded single-point stroke");
                self.render();
            }
            StrokeEnd::NotDrawing => {}
        }
        outcome
    }

    fn local_point(&self, raw: &RawPointer) -> Option<Point> {
        self.geometry.as_ref()?.to_local(raw.primary()?)
    }

    // --- editing ---

    /// Remove the newest committed stroke.
    pub fn undo(&mut self) -> Option<Stroke> {
        let removed = self.capture.undo()?;
        self.render();
        self.notify();
        Some(removed)
    }

    /// Remove every stroke, including one being drawn.
    pub fn clear(&mut self) {
        self.capture.clear();
        self.render();
        self.notify();
    }

    /// Replace the committed strokes, e.g. with saved progress. Invalid strokes are dropped.
    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) {
        let drawing = Drawing::from_strokes(strokes);
        log::debug!("Loading {} strokes", drawing.len());
        self.capture.load(drawing);
        self.render();
        self.notify();
    }

    fn notify(&mut self) {
        self.observers.notify(self.capture.strokes());
    }

    // --- state ---

    /// Committed strokes in paint order.
    pub fn strokes(&self) -> &[Stroke] {
        self.capture.strokes()
    }

    pub fn in_progress(&self) -> Option<&Stroke> {
        self.capture.in_progress()
    }

    pub fn is_drawing(&self) -> bool {
        self.capture.is_drawing()
    }

    /// The live raster, including the stroke being drawn.
    pub fn raster(&self) -> &Pixmap {
        self.renderer.pixmap()
    }

    // --- output ---

    /// Redraw the live raster from the current state.
    pub fn render(&mut self) {
        let ctx = RenderContext::new(self.capture.strokes())
            .with_in_progress(self.capture.in_progress())
            .with_background(self.background);
        self.renderer.render(&ctx);
    }

    /// Encode the committed strokes as PNG at backing resolution.
    ///
    /// A stroke still being drawn is left out.
    pub fn export_raster(&self) -> Result<Vec<u8>, ExportError> {
        let geometry = self.geometry.ok_or(ExportError::NotMounted)?;
        if geometry.backing_width == 0 || geometry.backing_height == 0 {
            return Err(ExportError::EmptySurface);
        }

        let mut renderer = CpuRenderer::new(geometry.backing_width, geometry.backing_height);
        renderer.render(
            &RenderContext::new(self.capture.strokes()).with_background(self.background),
        );
        let png = renderer.encode_png()?;
        log::info!(
            "Exported {} strokes as {}x{} PNG ({} bytes)",
            self.capture.strokes().len(),
            geometry.backing_width,
            geometry.backing_height,
            png.len()
        );
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn mounted() -> DrawingSurface {
        let mut surface = DrawingSurface::new();
        surface.mount(SurfaceGeometry::unscaled(100, 100));
        surface
    }

    fn recorder(surface: &mut DrawingSurface) -> Rc<RefCell<Vec<usize>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        surface.subscribe(move |strokes: &[Stroke]| sink.borrow_mut().push(strokes.len()));
        seen
    }

    fn draw_line(surface: &mut DrawingSurface, from: (f64, f64), to: (f64, f64)) {
        surface.begin_stroke(&RawPointer::mouse(from.0, from.1));
        surface.extend_stroke(&RawPointer::mouse(to.0, to.1));
        surface.end_stroke();
    }

    #[test]
    fn test_unmounted_surface_ignores_input() {
        let mut surface = DrawingSurface::new();
        assert!(!surface.begin_stroke(&RawPointer::mouse(1.0, 1.0)));
        assert!(!surface.is_drawing());
        assert!(matches!(surface.export_raster(), Err(ExportError::NotMounted)));
    }

    #[test]
    fn test_commit_notifies_once() {
        let mut surface = mounted();
        let seen = recorder(&mut surface);

        draw_line(&mut surface, (10.0, 10.0), (50.0, 50.0));
        assert_eq!(*seen.borrow(), vec![1]);

        surface.begin_stroke(&RawPointer::mouse(5.0, 5.0));
        assert_eq!(surface.end_stroke(), StrokeEnd::Discarded);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_undo_and_clear_notifications() {
        let mut surface = mounted();
        let seen = recorder(&mut surface);

        assert!(surface.undo().is_none());
        assert!(seen.borrow().is_empty());

        draw_line(&mut surface, (10.0, 10.0), (50.0, 50.0));
        assert!(surface.undo().is_some());
        surface.clear();
        surface.clear();
        assert_eq!(*seen.borrow(), vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_live_raster_shows_in_progress() {
        let mut surface = mounted();
        surface.set_brush_color("#ff0000").unwrap();
        surface.begin_stroke(&RawPointer::mouse(10.0, 50.0));
        surface.extend_stroke(&RawPointer::mouse(90.0, 50.0));

        assert_eq!(surface.raster().pixel(50, 50), Some([255, 0, 0, 255]));
        assert!(surface.strokes().is_empty());
    }

    #[test]
    fn test_handle_event_dispatch() {
        let mut surface = mounted();
        assert!(!surface.handle_event(&PointerEvent::MouseUp));
        assert!(surface.handle_event(&PointerEvent::TouchStart(RawPointer::touch(vec![
            Point::new(10.0, 10.0),
            Point::new(80.0, 80.0),
        ]))));
        assert!(surface.handle_event(&PointerEvent::TouchMove(RawPointer::touch(vec![
            Point::new(20.0, 20.0)
        ]))));
        assert!(!surface.handle_event(&PointerEvent::TouchMove(RawPointer::touch(vec![]))));
        assert!(surface.handle_event(&PointerEvent::TouchCancel));

        assert_eq!(
            surface.strokes()[0].points,
            vec![Point::new(10.0, 10.0), Point::new(20.0, 20.0)]
        );
    }

    #[test]
    fn test_scaled_geometry() {
        let mut surface = DrawingSurface::new();
        surface.mount(SurfaceGeometry::new(Rect::new(100.0, 50.0, 300.0, 250.0), 400, 400));
        draw_line(&mut surface, (100.0, 50.0), (200.0, 150.0));

        assert_eq!(
            surface.strokes()[0].points,
            vec![Point::ZERO, Point::new(200.0, 200.0)]
        );
    }

    #[test]
    fn test_resize_keeps_strokes() {
        let mut surface = mounted();
        draw_line(&mut surface, (10.0, 10.0), (50.0, 50.0));
        surface.resize(SurfaceGeometry::unscaled(200, 150));

        assert_eq!(surface.strokes().len(), 1);
        assert_eq!((surface.raster().width(), surface.raster().height()), (200, 150));
    }

    #[test]
    fn test_remount_starts_empty() {
        let mut surface = mounted();
        let seen = recorder(&mut surface);
        draw_line(&mut surface, (10.0, 10.0), (50.0, 50.0));
        surface.unmount();
        assert!(surface.strokes().is_empty());
        assert!(!surface.is_mounted());
        assert_eq!(*seen.borrow(), vec![1, 0]);

        surface.mount(SurfaceGeometry::unscaled(100, 100));
        assert!(surface.strokes().is_empty());
        // nothing left to drop
        assert_eq!(*seen.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_mount_over_drawing_notifies() {
        let mut surface = mounted();
        let seen = recorder(&mut surface);
        draw_line(&mut surface, (10.0, 10.0), (50.0, 50.0));

        surface.mount(SurfaceGeometry::unscaled(200, 200));
        assert!(surface.strokes().is_empty());
        assert_eq!(seen.borrow().last(), Some(&0));
    }

    #[test]
    fn test_restart_notifies_only_with_strokes() {
        let mut surface = mounted();
        let seen = recorder(&mut surface);

        surface.restart();
        assert!(seen.borrow().is_empty());

        draw_line(&mut surface, (10.0, 10.0), (50.0, 50.0));
        surface.restart();
        assert_eq!(*seen.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_load_strokes_sanitizes() {
        let mut surface = mounted();
        let seen = recorder(&mut surface);
        surface.load_strokes(vec![
            Stroke::from_points("#000", 4.0, vec![Point::ZERO, Point::new(5.0, 5.0)]),
            Stroke::from_points("#000", -1.0, vec![Point::ZERO, Point::new(5.0, 5.0)]),
        ]);

        assert_eq!(surface.strokes().len(), 1);
        assert_eq!(*seen.borrow(), vec![1]);
    }

    #[test]
    fn test_empty_surface_export() {
        let mut surface = DrawingSurface::new();
        surface.mount(SurfaceGeometry::new(Rect::new(0.0, 0.0, 100.0, 100.0), 0, 100));
        assert!(matches!(surface.export_raster(), Err(ExportError::EmptySurface)));
    }
}
