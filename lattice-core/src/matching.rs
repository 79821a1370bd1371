//! Per-region shape matching.
//!
//! Each [`SmoothingRegion`] computes the rotation that best aligns its
//! members' rest shape to their current shape (mass-weighted, translation
//! removed), then contributes a goal position to every member:
//!
//! ```text
//! goal_i = R · (x0_i - c0) + c
//! ```
//!
//! where `c0`/`c` are the region's rest and current mass-weighted
//! centroids. A particle in several regions averages the contributed goals
//! and rotations. The averaged rotation feeds the fracture angle test.
//!
//! The rotational part of the covariance `A = Σ m~ (x - c)(x0 - c0)ᵀ` is
//! its polar factor `R = A (AᵀA)^(-1/2)`; in 2D this has the closed form
//! angle `atan2(a21 - a12, a11 + a22)`. A singular covariance (collinear
//! rest points fully collapsed) falls back to the identity rotation.
//!
//! Weights use the per-region mass `m~ = m / region_count` so particles
//! shared by overlapping regions are not over-counted.

use nalgebra::{Matrix2, Point2, Vector2};

use crate::body::{Body, Particle};

/// Singularity threshold for the polar decomposition.
const SINGULAR_EPS: f64 = 1e-10;

/// A fixed neighborhood of particles sharing one shape-matching
/// transform.
///
/// Membership is fixed at body construction and is not re-partitioned
/// when fracture splits a chunk; a region may span two post-fracture
/// chunks, which is accepted approximate behavior.
#[derive(Debug, Clone)]
pub struct SmoothingRegion {
    /// Indices of member particles.
    pub members: Vec<usize>,
    /// Sum of members' per-region masses.
    total_mass: f64,
    /// Per-region-mass-weighted rest centroid.
    rest_center: Point2<f64>,
}

impl SmoothingRegion {
    pub(crate) fn new(members: Vec<usize>) -> Self {
        Self {
            members,
            total_mass: 0.0,
            rest_center: Point2::origin(),
        }
    }

    /// Cache the rest-side invariants. Run once all region memberships
    /// (and therefore per-region masses) are final.
    pub(crate) fn recompute_rest(&mut self, arena: &[Particle]) {
        let mut mass = 0.0;
        let mut center = Vector2::zeros();
        for &i in &self.members {
            let w = arena[i].per_region_mass();
            mass += w;
            center += arena[i].x0.coords * w;
        }
        self.total_mass = mass;
        self.rest_center = if mass > 0.0 {
            Point2::from(center / mass)
        } else {
            Point2::origin()
        };
    }

    /// The cached rest centroid.
    #[must_use]
    pub fn rest_center(&self) -> Point2<f64> {
        self.rest_center
    }
}

/// Extract the rotation factor of a 2x2 matrix's polar decomposition.
/// `None` when the matrix is singular in the rotational sense.
fn polar_rotation(a: &Matrix2<f64>) -> Option<Matrix2<f64>> {
    let cos_raw = a[(0, 0)] + a[(1, 1)];
    let sin_raw = a[(1, 0)] - a[(0, 1)];
    let magnitude = cos_raw.hypot(sin_raw);
    if magnitude < SINGULAR_EPS {
        return None;
    }
    let cos = cos_raw / magnitude;
    let sin = sin_raw / magnitude;
    Some(Matrix2::new(cos, -sin, sin, cos))
}

/// Run shape matching over every region of the body, writing each
/// particle's `goal` and averaged `rotation`. Positions and velocities
/// are not touched.
pub fn match_shapes(body: &mut Body) {
    let particles = &mut body.particles;

    // Accumulate contributions in place; finalized below.
    let mut goal_sums = vec![Vector2::zeros(); particles.len()];
    let mut rotation_sums = vec![Matrix2::zeros(); particles.len()];

    for region in &body.regions {
        if region.total_mass <= 0.0 {
            continue;
        }

        // Current mass-weighted centroid.
        let mut current = Vector2::zeros();
        for &i in &region.members {
            current += particles[i].x.coords * particles[i].per_region_mass();
        }
        let current_center = current / region.total_mass;

        // Covariance A = Σ m~ (x - c)(x0 - c0)ᵀ
        let mut covariance = Matrix2::zeros();
        for &i in &region.members {
            let p = &particles[i];
            let dx = p.x.coords - current_center;
            let dx0 = p.x0 - region.rest_center;
            covariance += dx * dx0.transpose() * p.per_region_mass();
        }

        let rotation = polar_rotation(&covariance).unwrap_or_else(Matrix2::identity);

        for &i in &region.members {
            let p = &particles[i];
            goal_sums[i] += rotation * (p.x0 - region.rest_center) + current_center;
            rotation_sums[i] += rotation;
        }
    }

    for (i, p) in particles.iter_mut().enumerate() {
        if p.region_count == 0 {
            // Not covered by any region (sparse stride): rigid fallback.
            p.goal = p.x;
            p.rotation = Matrix2::identity();
            continue;
        }
        let count = p.region_count as f64;
        p.goal = Point2::from(goal_sums[i] / count);
        p.rotation = rotation_sums[i] / count;
    }
}
