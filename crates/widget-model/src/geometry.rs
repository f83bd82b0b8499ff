//! Screen-space geometry.

use serde::{Deserialize, Serialize};

/// A point in screen coordinates (pixels).
///
/// Used for gaze targets: recomputed on every qualifying input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// An axis-aligned bounding box in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A square of side `size` whose center is `(cx, cy)`.
    pub fn centered_square(cx: f64, cy: f64, size: f64) -> Self {
        Self::new(cx - size / 2.0, cy - size / 2.0, size, size)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Geometric center.
    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn top_left(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Point at `(fx, fy)` fractions of the width/height from the top-left.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Point2D {
        Point2D::new(self.x + self.width * fx, self.y + self.height * fy)
    }
}

/// Translation applied to a pupil, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EyeOffset {
    pub dx: f64,
    pub dy: f64,
}

impl EyeOffset {
    /// The resting position.
    pub const CENTERED: EyeOffset = EyeOffset { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    pub fn is_centered(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center_and_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);
        assert_eq!(rect.center(), Point2D::new(60.0, 40.0));
        assert_eq!(rect.right(), 110.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.top_left(), Point2D::new(10.0, 20.0));
    }

    #[test]
    fn test_centered_square() {
        let rect = Rect::centered_square(100.0, 100.0, 40.0);
        assert_eq!(rect.center(), Point2D::new(100.0, 100.0));
        assert_eq!(rect.width, 40.0);
    }

    #[test]
    fn test_at_fraction() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let p = rect.at_fraction(0.35, 0.45);
        assert!((p.x - 70.0).abs() < 1e-9);
        assert!((p.y - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_offset_magnitude() {
        assert_eq!(EyeOffset::new(3.0, 4.0).magnitude(), 5.0);
        assert!(EyeOffset::CENTERED.is_centered());
        assert!(!EyeOffset::new(0.0, 0.1).is_centered());
    }

    #[test]
    fn test_point2d_distance() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-9);
    }

    proptest::proptest! {
        #[test]
        fn prop_centered_square_round_trips_center(
            cx in -5000.0f64..5000.0,
            cy in -5000.0f64..5000.0,
            size in 1.0f64..500.0,
        ) {
            let center = Rect::centered_square(cx, cy, size).center();
            proptest::prop_assert!((center.x - cx).abs() < 1e-6);
            proptest::prop_assert!((center.y - cy).abs() < 1e-6);
        }
    }
}
