//! Environment force collaborators.
//!
//! The engine does not hard-code any force model. Anything that pushes
//! particles around implements [`EnvironmentForce`]: given a body and the
//! tick duration, contribute force into each particle's `f_ext`
//! accumulator. The stepper converts accumulated force to a velocity
//! change once per tick; locked particles accumulate force but are never
//! integrated.

use lattice_types::Vector2;

use crate::body::Body;

/// A pluggable acceleration contributor.
pub trait EnvironmentForce {
    /// Accumulate this force's contribution into the body's particles.
    fn apply(&self, body: &mut Body, dt: f64);
}

/// Uniform gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    /// Acceleration applied to every particle.
    pub acceleration: Vector2<f64>,
}

impl Gravity {
    /// Earth gravity, y-down.
    #[must_use]
    pub fn earth() -> Self {
        Self {
            acceleration: Vector2::new(0.0, -9.81),
        }
    }

    /// Gravity with a custom acceleration.
    #[must_use]
    pub fn new(acceleration: Vector2<f64>) -> Self {
        Self { acceleration }
    }
}

impl EnvironmentForce for Gravity {
    fn apply(&self, body: &mut Body, _dt: f64) {
        for p in body.particles_mut() {
            p.f_ext += self.acceleration * p.mass;
        }
    }
}

/// The elastic restoring pull toward each particle's shape-matched goal.
///
/// With stiffness `α ∈ (0, 1]`, integrating the contributed force moves
/// an otherwise-free particle `α · (goal - x)` over one tick; `α = 1`
/// snaps fully to the goal, smaller values soften the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalRestoring {
    /// Restoring stiffness in `(0, 1]`.
    pub stiffness: f64,
}

impl Default for GoalRestoring {
    fn default() -> Self {
        Self { stiffness: 1.0 }
    }
}

impl GoalRestoring {
    /// Restoring force with the given stiffness.
    #[must_use]
    pub fn new(stiffness: f64) -> Self {
        Self { stiffness }
    }
}

impl EnvironmentForce for GoalRestoring {
    fn apply(&self, body: &mut Body, dt: f64) {
        let inv_dt_sq = 1.0 / (dt * dt);
        for p in body.particles_mut() {
            p.f_ext += (p.goal - p.x) * (self.stiffness * p.mass * inv_dt_sq);
        }
    }
}
