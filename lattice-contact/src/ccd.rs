//! Time-of-impact solvers for a point against a lattice edge.
//!
//! Two kernels:
//!
//! - [`solve_swept`] - both the point and the edge move linearly over the
//!   tick; finds the earliest time the point lies exactly on the
//!   interpolated edge segment.
//! - [`segment_intersection`] - the static case used for frozen-body
//!   edges, where only the point's path is swept.
//!
//! # Swept formulation
//!
//! With the point at `P(t) = p + dp·t` and the edge endpoints at
//! `A(t) = a + da·t`, `B(t) = b + db·t` for `t ∈ [0, 1]`, the point lies
//! on the edge's carrier line when
//!
//! ```text
//! cross(P(t) - A(t), B(t) - A(t)) = 0
//! ```
//!
//! Both factors are linear in `t`, so the cross product is quadratic:
//! `c2·t² + c1·t + c0 = 0`. Each real root in `[0, 1]` is then accepted
//! only if the edge parameter `u = (P - A)·(B - A) / |B - A|²` lies in
//! `[0, 1]`; the earliest accepted root wins. Degenerate denominators
//! (parallel paths, zero-length edges) produce no collision.

use lattice_types::LineSegment;
use nalgebra::Point2;

/// Coefficient/range tolerance for the root finder.
const EPS: f64 = 1e-12;

/// Slack applied when testing `t` and `u` against `[0, 1]`.
const RANGE_SLACK: f64 = 1e-9;

/// Input to the swept point-vs-edge solver.
///
/// `edge`/`point` are positions at the start of the interval and
/// `edge_next`/`point_next` at the end; all four sweep linearly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweptInput {
    /// Edge at the start of the interval.
    pub edge: LineSegment,
    /// Edge at the end of the interval.
    pub edge_next: LineSegment,
    /// Point at the start of the interval.
    pub point: Point2<f64>,
    /// Point at the end of the interval.
    pub point_next: Point2<f64>,
}

/// Geometry of a resolved contact, interpolated to the time of impact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactGeometry {
    /// The point at the time of impact.
    pub point: Point2<f64>,
    /// The edge at the time of impact.
    pub edge: LineSegment,
    /// Barycentric coordinate of the contact point along the edge
    /// (`0` at the edge start, `1` at the edge end).
    pub edge_coordinate: f64,
}

impl ContactGeometry {
    /// Interpolate the input to time `t` and compute the contact
    /// coordinate along the edge.
    #[must_use]
    pub fn at_time(input: &SweptInput, t: f64) -> Self {
        let point = input.point + (input.point_next - input.point) * t;
        let edge = input.edge.lerp(&input.edge_next, t);
        let edge_coordinate = edge.parameter_of(&point);
        Self {
            point,
            edge,
            edge_coordinate,
        }
    }
}

/// Find the earliest `t ∈ [0, 1]` at which the swept point lies on the
/// swept edge segment, or `None` if no such time exists.
#[must_use]
pub fn solve_swept(input: &SweptInput) -> Option<f64> {
    // r(t) = P(t) - A(t) = r0 + r1·t,  e(t) = B(t) - A(t) = e0 + e1·t
    let r0 = input.point - input.edge.start;
    let r1 = (input.point_next - input.point) - (input.edge_next.start - input.edge.start);
    let e0 = input.edge.direction();
    let e1 = input.edge_next.direction() - e0;

    // cross(r, e) expanded by powers of t
    let c0 = r0.perp(&e0);
    let c1 = r0.perp(&e1) + r1.perp(&e0);
    let c2 = r1.perp(&e1);

    let mut roots = [0.0f64; 2];
    let count = if c2.abs() < EPS {
        if c1.abs() < EPS {
            // Constant cross product: either never collinear, or collinear
            // for the whole interval (point sliding along the carrier
            // line). Neither produces a crossing event.
            return None;
        }
        roots[0] = -c0 / c1;
        1
    } else {
        let disc = c1 * c1 - 4.0 * c2 * c0;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let (a, b) = ((-c1 - sq) / (2.0 * c2), (-c1 + sq) / (2.0 * c2));
        roots[0] = a.min(b);
        roots[1] = a.max(b);
        2
    };

    roots[..count]
        .iter()
        .filter(|t| (-RANGE_SLACK..=1.0 + RANGE_SLACK).contains(*t))
        .map(|t| t.clamp(0.0, 1.0))
        .find(|&t| {
            // Root is on the carrier line; accept only if it lies within
            // the segment at that time.
            let geometry = ContactGeometry::at_time(input, t);
            if geometry.edge.length_squared() < EPS {
                return false;
            }
            (-RANGE_SLACK..=1.0 + RANGE_SLACK).contains(&geometry.edge_coordinate)
        })
}

/// Intersection of two static segments via the standard 2-line parametric
/// formulas. Returns the intersection point when both parameters lie in
/// `[0, 1]`; parallel or degenerate segments return `None`.
#[must_use]
pub fn segment_intersection(first: &LineSegment, second: &LineSegment) -> Option<Point2<f64>> {
    let d1 = first.direction();
    let d2 = second.direction();
    let denominator = d2.y * d1.x - d2.x * d1.y;
    if denominator.abs() < EPS {
        return None;
    }

    let offset = first.start - second.start;
    let ua = (d2.x * offset.y - d2.y * offset.x) / denominator;
    let ub = (d1.x * offset.y - d1.y * offset.x) / denominator;
    if (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub) {
        Some(first.point_at(ua))
    } else {
        None
    }
}
