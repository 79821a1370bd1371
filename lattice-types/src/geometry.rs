//! Geometric value types for the 2D lattice.

use nalgebra::{Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotate a vector by 90 degrees counter-clockwise.
///
/// Used to derive edge normals; the caller picks the sign.
#[must_use]
pub fn perpendicular(v: &Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-v.y, v.x)
}

/// A directed 2D line segment between two points.
///
/// Represents a lattice edge between two axis-adjacent particles, either in
/// rest, current, or goal space. The segment is a value type: nothing here
/// references particles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSegment {
    /// Start point.
    pub start: Point2<f64>,
    /// End point.
    pub end: Point2<f64>,
}

impl LineSegment {
    /// Create a segment from start to end.
    #[must_use]
    pub fn new(start: Point2<f64>, end: Point2<f64>) -> Self {
        Self { start, end }
    }

    /// The direction vector `end - start` (not normalized).
    #[must_use]
    pub fn direction(&self) -> Vector2<f64> {
        self.end - self.start
    }

    /// Segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.direction().norm()
    }

    /// Squared segment length.
    #[must_use]
    pub fn length_squared(&self) -> f64 {
        self.direction().norm_squared()
    }

    /// A normal of the segment (counter-clockwise perpendicular of the
    /// direction, not normalized). Degenerate segments yield a zero vector,
    /// which callers must guard.
    #[must_use]
    pub fn normal(&self) -> Vector2<f64> {
        perpendicular(&self.direction())
    }

    /// Point at parameter `u` along the segment (`u = 0` is `start`,
    /// `u = 1` is `end`).
    #[must_use]
    pub fn point_at(&self, u: f64) -> Point2<f64> {
        self.start + self.direction() * u
    }

    /// Parameter of the orthogonal projection of `point` onto the segment's
    /// carrier line. Returns `0.0` for degenerate segments.
    #[must_use]
    pub fn parameter_of(&self, point: &Point2<f64>) -> f64 {
        let d = self.direction();
        let len_sq = d.norm_squared();
        if len_sq <= f64::EPSILON {
            return 0.0;
        }
        (point - self.start).dot(&d) / len_sq
    }

    /// Linearly interpolate between this segment and `other`.
    ///
    /// Both endpoints move on straight paths; `t = 0` is `self`, `t = 1` is
    /// `other`. This is the segment swept by a moving lattice edge.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            start: self.start + (other.start - self.start) * t,
            end: self.end + (other.end - self.end) * t,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_and_direction() {
        let seg = LineSegment::new(Point2::new(1.0, 1.0), Point2::new(4.0, 5.0));
        assert_relative_eq!(seg.length(), 5.0);
        assert_relative_eq!(seg.length_squared(), 25.0);
        assert_relative_eq!(seg.direction(), Vector2::new(3.0, 4.0));
    }

    #[test]
    fn test_point_at_interpolates() {
        let seg = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert_relative_eq!(seg.point_at(0.0), seg.start);
        assert_relative_eq!(seg.point_at(1.0), seg.end);
        assert_relative_eq!(seg.point_at(0.25), Point2::new(2.5, 0.0));
    }

    #[test]
    fn test_normal_is_ccw_perpendicular() {
        let seg = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert_relative_eq!(seg.normal(), Vector2::new(0.0, 1.0));
        // Normal is orthogonal to the direction
        assert_relative_eq!(seg.normal().dot(&seg.direction()), 0.0);
    }

    #[test]
    fn test_parameter_of_projection() {
        let seg = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert_relative_eq!(seg.parameter_of(&Point2::new(2.5, 3.0)), 0.25);

        // Degenerate segment
        let degenerate = LineSegment::new(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0));
        assert_relative_eq!(degenerate.parameter_of(&Point2::new(5.0, 5.0)), 0.0);
    }

    #[test]
    fn test_lerp_sweeps_both_endpoints() {
        let a = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(0.0, 10.0));
        let b = LineSegment::new(Point2::new(4.0, 0.0), Point2::new(8.0, 10.0));
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.start, Point2::new(2.0, 0.0));
        assert_relative_eq!(mid.end, Point2::new(4.0, 10.0));
    }
}
