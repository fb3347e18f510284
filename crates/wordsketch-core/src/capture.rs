//! Stroke capture state machine.
//!
//! Turns gesture start/move/end into committed strokes. Points given to
//! [`StrokeCapture`] are already in surface-local coordinates; mapping from
//! client coordinates happens in [`SurfaceGeometry`](crate::SurfaceGeometry).

use crate::brush::Brush;
use crate::drawing::Drawing;
use crate::stroke::Stroke;
use kurbo::Point;

/// State of the capture machine.
#[derive(Debug, Clone, Default)]
pub enum CaptureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A gesture is active and its stroke is being recorded.
    Drawing {
        /// The stroke in progress. Not part of the drawing until committed.
        stroke: Stroke,
    },
}

/// Result of ending a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeEnd {
    /// The stroke had enough points and was appended to the drawing.
    Committed,
    /// The stroke was a tap and was dropped.
    Discarded,
    /// There was no gesture to end.
    NotDrawing,
}

/// Owns the drawing, the brush and the in-progress stroke.
#[derive(Debug, Clone, Default)]
pub struct StrokeCapture {
    state: CaptureState,
    drawing: Drawing,
    brush: Brush,
}

impl StrokeCapture {
    /// Create an idle capture with an empty drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a starting brush.
    pub fn with_brush(brush: Brush) -> Self {
        Self {
            brush,
            ..Self::default()
        }
    }

    /// Begin a gesture at `point`, snapshotting the brush.
    ///
    /// A gesture that is still open is ended first; its outcome is returned.
    pub fn begin(&mut self, point: Point) -> StrokeEnd {
        let previous = self.end();
        if previous != StrokeEnd::NotDrawing {
            log::debug!("New gesture started while drawing; previous stroke {previous:?}");
        }
        self.state = CaptureState::Drawing {
            stroke: Stroke::begin(&self.brush, point),
        };
        previous
    }

    /// Extend the current gesture. Returns false when idle.
    pub fn extend(&mut self, point: Point) -> bool {
        match &mut self.state {
            CaptureState::Drawing { stroke } => {
                stroke.add_point(point);
                true
            }
            CaptureState::Idle => false,
        }
    }

    /// End the current gesture, committing the stroke if it has at least two points.
    pub fn end(&mut self) -> StrokeEnd {
        match std::mem::take(&mut self.state) {
            CaptureState::Drawing { stroke } => {
                if self.drawing.push(stroke) {
                    StrokeEnd::Committed
                } else {
                    StrokeEnd::Discarded
                }
            }
            CaptureState::Idle => StrokeEnd::NotDrawing,
        }
    }

    /// Drop the in-progress stroke without committing it.
    pub fn cancel(&mut self) -> bool {
        matches!(
            std::mem::take(&mut self.state),
            CaptureState::Drawing { .. }
        )
    }

    /// Remove the most recently committed stroke. The in-progress stroke is untouched.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.drawing.pop()
    }

    /// Remove every committed stroke and cancel the in-progress one.
    pub fn clear(&mut self) {
        self.cancel();
        self.drawing.clear();
    }

    /// Replace the committed strokes, cancelling any gesture.
    pub fn load(&mut self, drawing: Drawing) {
        self.cancel();
        self.drawing = drawing;
    }

    /// Check if a gesture is active.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing { .. })
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// The stroke being drawn, if any.
    pub fn in_progress(&self) -> Option<&Stroke> {
        match &self.state {
            CaptureState::Drawing { stroke } => Some(stroke),
            CaptureState::Idle => None,
        }
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    /// Committed strokes in paint order.
    pub fn strokes(&self) -> &[Stroke] {
        self.drawing.strokes()
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Mutable brush; changes apply from the next gesture.
    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }
}
