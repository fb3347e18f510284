//! Raw pointer input from the host, unified across mouse and touch.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Coordinate data carried by a raw event, in client coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawPointer {
    /// A single mouse pointer.
    Mouse { client: Point },
    /// Every active touch point, in the order the host reported them.
    Touch { touches: Vec<Point> },
    /// The host had no coordinates for this event.
    Unknown,
}

impl RawPointer {
    pub fn mouse(x: f64, y: f64) -> Self {
        RawPointer::Mouse {
            client: Point::new(x, y),
        }
    }

    pub fn touch(touches: Vec<Point>) -> Self {
        RawPointer::Touch { touches }
    }

    /// The point that drives drawing: the mouse position or the first touch.
    ///
    /// Additional simultaneous touches are ignored; drawing is single-finger.
    pub fn primary(&self) -> Option<Point> {
        let point = match self {
            RawPointer::Mouse { client } => *client,
            RawPointer::Touch { touches } => *touches.first()?,
            RawPointer::Unknown => return None,
        };
        (point.x.is_finite() && point.y.is_finite()).then_some(point)
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    MouseDown(RawPointer),
    MouseMove(RawPointer),
    MouseUp,
    MouseLeave,
    TouchStart(RawPointer),
    TouchMove(RawPointer),
    TouchEnd,
    TouchCancel,
}

/// What a pointer event means for a drawing gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

impl PointerEvent {
    /// Classify the event.
    pub fn phase(&self) -> GesturePhase {
        match self {
            PointerEvent::MouseDown(_) | PointerEvent::TouchStart(_) => GesturePhase::Start,
            PointerEvent::MouseMove(_) | PointerEvent::TouchMove(_) => GesturePhase::Move,
            PointerEvent::MouseUp
            | PointerEvent::MouseLeave
            | PointerEvent::TouchEnd
            | PointerEvent::TouchCancel => GesturePhase::End,
        }
    }

    /// Coordinates carried by start and move events.
    pub fn pointer(&self) -> Option<&RawPointer> {
        match self {
            PointerEvent::MouseDown(raw)
            | PointerEvent::MouseMove(raw)
            | PointerEvent::TouchStart(raw)
            | PointerEvent::TouchMove(raw) => Some(raw),
            _ => None,
        }
    }
}
