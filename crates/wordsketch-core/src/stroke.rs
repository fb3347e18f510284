//! Freehand stroke: the recorded path of one gesture.

use crate::brush::{Brush, parse_color};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A stroke needs at least this many points to leave a visible mark.
pub const MIN_STROKE_POINTS: usize = 2;

/// A freehand stroke (color, width and an ordered series of points).
///
/// Points are in surface-local pixel space. Once a stroke is committed to a
/// [`Drawing`](crate::Drawing) it is only ever handed out by shared reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Any CSS color.
    pub color: String,
    /// Line width in surface pixels.
    pub size: f64,
    /// Points in the polyline.
    pub points: Vec<Point>,
}

impl Stroke {
    /// Start a stroke at `start` using the brush settings at this moment.
    pub fn begin(brush: &Brush, start: Point) -> Self {
        Self {
            color: brush.color().to_string(),
            size: brush.size(),
            points: vec![start],
        }
    }

    /// Create from existing points.
    pub fn from_points(color: impl Into<String>, size: f64, points: Vec<Point>) -> Self {
        Self {
            color: color.into(),
            size,
            points,
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the stroke is long enough to be committed.
    ///
    /// A tap yields a single point and produces no visible mark.
    pub fn is_committable(&self) -> bool {
        self.points.len() >= MIN_STROKE_POINTS
    }

    /// Consecutive point pairs of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Bounding box of the points, not including the line width.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Bounding box including half the line width on every side.
    pub fn painted_bounds(&self) -> Rect {
        self.bounds().inflate(self.size / 2.0, self.size / 2.0)
    }

    /// Drop invalid data from a stroke loaded from outside.
    ///
    /// Non-finite points are removed. Returns `None` when the color does not
    /// parse, the size is not a positive finite number, or fewer than
    /// [`MIN_STROKE_POINTS`] points remain.
    pub fn sanitized(mut self) -> Option<Self> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return None;
        }
        if parse_color(&self.color).is_err() {
            return None;
        }
        self.points.retain(|point| point.x.is_finite() && point.y.is_finite());
        if !self.is_committable() {
            return None;
        }
        Some(self)
    }
}

/// Sanitize a list of strokes, keeping order and dropping the invalid ones.
pub fn sanitize_strokes(strokes: Vec<Stroke>) -> Vec<Stroke> {
    let total = strokes.len();
    let kept: Vec<Stroke> = strokes.into_iter().filter_map(Stroke::sanitized).collect();
    if kept.len() != total {
        log::warn!("Dropped {} invalid strokes", total - kept.len());
    }
    kept
}
