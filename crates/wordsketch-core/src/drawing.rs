//! The committed strokes of one drawing.

use crate::stroke::{Stroke, sanitize_strokes};
use kurbo::Rect;
use serde::{Deserialize, Serialize};

/// Completed strokes in append order (later strokes render on top).
///
/// Never holds a stroke with fewer than two points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Drawing {
    strokes: Vec<Stroke>,
}

impl Drawing {
    /// Create a new empty drawing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from loaded strokes, discarding invalid ones.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            strokes: sanitize_strokes(strokes),
        }
    }

    /// Append a stroke. Returns false (and drops it) if it is too short.
    pub fn push(&mut self, stroke: Stroke) -> bool {
        if !stroke.is_committable() {
            return false;
        }
        self.strokes.push(stroke);
        true
    }

    /// Remove the most recently added stroke.
    pub fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Remove every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Strokes in paint order (back to front).
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Total number of recorded points.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum()
    }

    /// Painted bounding box of all strokes.
    pub fn bounds(&self) -> Option<Rect> {
        self.strokes
            .iter()
            .map(Stroke::painted_bounds)
            .reduce(|acc, rect| acc.union(rect))
    }

    /// Serialize the stroke list to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.strokes)
    }

    /// Parse a stroke list from JSON, discarding invalid strokes.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let strokes: Vec<Stroke> = serde_json::from_str(json)?;
        Ok(Self::from_strokes(strokes))
    }
}
