//! Surface geometry and client-to-local coordinate mapping.

use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Where the surface sits on screen and how large its backing store is.
///
/// The displayed rectangle is in client (CSS) pixels; the backing size is the
/// raster resolution strokes are recorded and rendered at. The two differ on
/// high-density displays or when layout scales the element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceGeometry {
    /// On-screen bounding rectangle in client coordinates.
    pub displayed: Rect,
    /// Backing store width in pixels.
    pub backing_width: u32,
    /// Backing store height in pixels.
    pub backing_height: u32,
}

impl SurfaceGeometry {
    /// Geometry for a surface displayed at `displayed` with the given backing size.
    pub fn new(displayed: Rect, backing_width: u32, backing_height: u32) -> Self {
        Self {
            displayed,
            backing_width,
            backing_height,
        }
    }

    /// Geometry where displayed and backing sizes match, placed at the origin.
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self::new(
            Rect::new(0.0, 0.0, width as f64, height as f64),
            width,
            height,
        )
    }

    /// Backing store size.
    pub fn backing_size(&self) -> Size {
        Size::new(self.backing_width as f64, self.backing_height as f64)
    }

    /// Whether either the displayed rect or the backing store has no area.
    pub fn is_empty(&self) -> bool {
        self.backing_width == 0
            || self.backing_height == 0
            || !(self.displayed.width() > 0.0)
            || !(self.displayed.height() > 0.0)
    }

    /// Backing pixels per displayed pixel on each axis.
    pub fn scale(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((
            self.backing_width as f64 / self.displayed.width(),
            self.backing_height as f64 / self.displayed.height(),
        ))
    }

    /// Transform from client coordinates to surface-local coordinates.
    pub fn client_to_local(&self) -> Option<Affine> {
        let (scale_x, scale_y) = self.scale()?;
        Some(
            Affine::scale_non_uniform(scale_x, scale_y)
                * Affine::translate(-self.displayed.origin().to_vec2()),
        )
    }

    /// Map a client point into surface-local pixel space.
    ///
    /// `None` if the surface has no area or the point is not finite.
    pub fn to_local(&self, client: Point) -> Option<Point> {
        if !(client.x.is_finite() && client.y.is_finite()) {
            return None;
        }
        self.client_to_local().map(|transform| transform * client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_hidpi_mapping() {
        let geometry = SurfaceGeometry::new(Rect::new(0.0, 0.0, 400.0, 400.0), 800, 800);

        assert!(approx(geometry.to_local(Point::new(0.0, 0.0)).unwrap(), Point::ZERO));
        assert!(approx(
            geometry.to_local(Point::new(200.0, 200.0)).unwrap(),
            Point::new(400.0, 400.0)
        ));
    }

    #[test]
    fn test_offset_rect() {
        let geometry = SurfaceGeometry::new(Rect::new(50.0, 20.0, 250.0, 120.0), 400, 400);

        // top-left corner of the element
        assert!(approx(geometry.to_local(Point::new(50.0, 20.0)).unwrap(), Point::ZERO));
        // x scale 2, y scale 4
        assert!(approx(
            geometry.to_local(Point::new(60.0, 30.0)).unwrap(),
            Point::new(20.0, 40.0)
        ));
    }

    #[test]
    fn test_unscaled_identity() {
        let geometry = SurfaceGeometry::unscaled(400, 400);
        assert!(approx(
            geometry.to_local(Point::new(10.0, 10.0)).unwrap(),
            Point::new(10.0, 10.0)
        ));
    }

    #[test]
    fn test_zero_sized_surface() {
        let collapsed = SurfaceGeometry::new(Rect::new(0.0, 0.0, 0.0, 400.0), 400, 400);
        assert!(collapsed.is_empty());
        assert!(collapsed.to_local(Point::new(1.0, 1.0)).is_none());

        let no_backing = SurfaceGeometry::new(Rect::new(0.0, 0.0, 400.0, 400.0), 0, 400);
        assert!(no_backing.to_local(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_non_finite_point() {
        let geometry = SurfaceGeometry::unscaled(400, 400);
        assert!(geometry.to_local(Point::new(f64::NAN, 1.0)).is_none());
    }
}
