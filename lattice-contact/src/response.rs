//! Impulse response: turning a detected contact into a velocity update
//! and a sub-frame time split.
//!
//! The base response is a perfectly elastic reflection: the particle's
//! velocity, expressed relative to the edge's own velocity at the contact
//! point, is mirrored about the edge normal and returned to the global
//! frame. No restitution or friction coefficient is applied.
//!
//! Each resolved contact yields a [`CollisionSubframe`]: the velocity the
//! particle carried *before* the contact and the fraction of the tick it
//! was carried for. The caller integrates up to that fraction at the old
//! velocity, swaps in the new one, and re-runs detection on the remainder.

use lattice_types::{perpendicular, LineSegment, Point2, Vector2};

use crate::{ccd::ContactGeometry, ContactParams};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sub-interval of a tick bounded by a contact.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionSubframe {
    /// Velocity in effect during this subframe (global frame).
    pub velocity: Vector2<f64>,
    /// Fraction of the full tick this subframe covers, in `[0, 1]`.
    pub time_coefficient: f64,
}

/// Strategy for converting a contact into a velocity update.
///
/// The shipped strategy is [`Reflection`]. A momentum-conserving strategy
/// - distributing the impulse between the particle and both edge endpoints
/// by mass instead of reflecting kinematically - is the intended second
/// implementation of this trait; it changes the response, not the
/// detection, so it plugs in here without touching the CCD kernels.
pub trait ImpulseResponse {
    /// Respond to a swept contact against a moving edge.
    ///
    /// * `velocity` - particle velocity (global frame)
    /// * `edge_velocity_start` / `edge_velocity_end` - velocities of the
    ///   edge's endpoints
    /// * `geometry` - contact geometry at the time of impact
    /// * `toi` - time of impact within the swept interval, in `[0, 1]`
    /// * `prediction` - fraction of the tick the sweep covered
    /// * `dt` - full tick duration in seconds
    ///
    /// Returns `None` when the contact is degenerate (zero-length edge).
    #[allow(clippy::too_many_arguments)]
    fn moving_edge(
        &self,
        params: &ContactParams,
        velocity: Vector2<f64>,
        edge_velocity_start: Vector2<f64>,
        edge_velocity_end: Vector2<f64>,
        geometry: &ContactGeometry,
        toi: f64,
        prediction: f64,
        dt: f64,
    ) -> Option<CollisionSubframe>;

    /// Respond to a static-edge contact (frozen bodies).
    ///
    /// `intersection` is where the particle's path crosses the edge.
    /// Returns `None` for degenerate edges, for particles at rest, and
    /// for intersections closer than `params.epsilon` to the particle
    /// (the anti-sticking guard against a just-reflected edge).
    fn static_edge(
        &self,
        params: &ContactParams,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        edge: &LineSegment,
        intersection: Point2<f64>,
        dt: f64,
    ) -> Option<CollisionSubframe>;
}

/// Perfectly elastic kinematic reflection.
#[derive(Debug, Default, Clone, Copy)]
pub struct Reflection;

/// Mirror `v` about `normal` (not necessarily unit length).
fn reflect(v: Vector2<f64>, normal: Vector2<f64>) -> Vector2<f64> {
    v - normal * (2.0 * normal.dot(&v) / normal.norm_squared())
}

impl ImpulseResponse for Reflection {
    fn moving_edge(
        &self,
        params: &ContactParams,
        velocity: Vector2<f64>,
        edge_velocity_start: Vector2<f64>,
        edge_velocity_end: Vector2<f64>,
        geometry: &ContactGeometry,
        toi: f64,
        prediction: f64,
        dt: f64,
    ) -> Option<CollisionSubframe> {
        let surface = geometry.edge.direction();
        if surface.norm_squared() < f64::EPSILON {
            return None;
        }

        // Edge velocity interpolated at the contact coordinate; work in
        // the edge's frame.
        let edge_velocity = edge_velocity_start
            + (edge_velocity_end - edge_velocity_start) * geometry.edge_coordinate;
        let relative = velocity - edge_velocity;

        // Normal sign chosen against the incoming relative velocity.
        let mut normal = perpendicular(&surface);
        if normal.dot(&relative) < 0.0 {
            normal = -normal;
        }
        let reflected = reflect(relative, normal);

        // Clip the tick at the impact, backed off by epsilon over the new
        // speed so the next detection pass does not re-trigger at zero
        // distance.
        let mut time_coefficient = prediction * toi * (1.0 - params.time_offset);
        let speed = reflected.norm();
        if speed > f64::EPSILON {
            time_coefficient -= params.epsilon / (speed * dt);
        } else {
            time_coefficient = 0.0;
        }
        let time_coefficient = time_coefficient.max(0.0);

        Some(CollisionSubframe {
            velocity: reflected + edge_velocity,
            time_coefficient,
        })
    }

    fn static_edge(
        &self,
        params: &ContactParams,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        edge: &LineSegment,
        intersection: Point2<f64>,
        dt: f64,
    ) -> Option<CollisionSubframe> {
        let offset = (intersection - position).norm();
        if offset <= params.epsilon {
            // Start point is sitting on a just-reflected edge.
            return None;
        }
        let surface = edge.direction();
        if surface.norm_squared() < f64::EPSILON {
            return None;
        }
        let speed = velocity.norm();
        if speed <= f64::EPSILON {
            return None;
        }

        let mut normal = perpendicular(&surface);
        if normal.dot(&velocity) < 0.0 {
            normal = -normal;
        }

        Some(CollisionSubframe {
            velocity: reflect(velocity, normal),
            time_coefficient: offset / (speed * dt),
        })
    }
}
