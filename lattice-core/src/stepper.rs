//! Simulation stepping and control flow.
//!
//! The [`Stepper`] orchestrates one tick per body:
//!
//! 1. Clear force accumulators and subframe buffers
//! 2. Shape-match every region (goals and averaged rotations)
//! 3. Apply every registered environment force (matching reads only
//!    positions, so running it first hands fresh goals to the elastic
//!    restoring collaborator)
//! 4. Integrate accumulated force into velocity (locked particles pinned)
//! 5. Per particle, run the bounded CCD subframe loop against every
//!    *other* body's edges, advancing position piecewise
//! 6. Run the fracture pass
//!
//! Bodies are processed independently; during one body's CCD pass the
//! other bodies are only read. A body never collides with itself here -
//! frozen bodies cover the boundary-collider case through the static-edge
//! path instead.

use lattice_contact::{
    ccd, CollisionSubframe, ContactGeometry, ContactParams, ImpulseResponse, Reflection,
    SweptInput,
};
use lattice_types::{LineSegment, Point2, SimEvent, Vector2};

use crate::body::Body;
use crate::fracture::fracture_pass;
use crate::matching::match_shapes;
use crate::world::World;

/// Summary of one completed tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSummary {
    /// Simulation time after the tick.
    pub time: f64,
    /// Tick counter after the tick.
    pub step: u64,
    /// Contacts resolved (subframes recorded) across all bodies.
    pub contacts: usize,
    /// Links severed by fracture.
    pub fractures: usize,
    /// Chunk splits performed.
    pub splits: usize,
}

/// The simulation stepper.
pub struct Stepper {
    response: Box<dyn ImpulseResponse>,
}

impl Default for Stepper {
    fn default() -> Self {
        Self::new()
    }
}

impl Stepper {
    /// Create a stepper with the default reflection response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            response: Box::new(Reflection),
        }
    }

    /// Create a stepper with a custom impulse response strategy.
    #[must_use]
    pub fn with_response(response: Box<dyn ImpulseResponse>) -> Self {
        Self { response }
    }

    /// Execute one simulation tick.
    pub fn step(&mut self, world: &mut World) -> StepSummary {
        let dt = world.config.timestep;
        let damping = 1.0 - world.config.damping;
        let mut contacts = 0;
        let mut fractures = 0;
        let mut splits = 0;
        let mut events: Vec<SimEvent> = Vec::new();

        for index in 0..world.bodies.len() {
            if world.bodies[index].frozen() {
                continue;
            }

            // Forces, shape matching, velocity update. Only this body is
            // touched.
            {
                let World { bodies, forces, .. } = &mut *world;
                let body = &mut bodies[index];
                for p in body.particles_mut() {
                    p.f_ext = Vector2::zeros();
                    p.subframes.clear();
                }
                match_shapes(body);
                for force in forces.iter() {
                    force.apply(body, dt);
                }
                for p in body.particles_mut() {
                    if p.locked {
                        p.v = Vector2::zeros();
                        continue;
                    }
                    p.v += p.f_ext * (dt / p.mass);
                    p.v *= damping;
                }
            }

            // CCD + integration. This body is written; the others are
            // only read.
            {
                let (before, rest) = world.bodies.split_at_mut(index);
                if let Some((body, after)) = rest.split_first_mut() {
                    contacts += resolve_body_contacts(
                        body,
                        before,
                        after,
                        &world.contact_params,
                        self.response.as_ref(),
                        dt,
                        &mut events,
                    );
                }
            }

            // Fracture, after positions settle and before the next body.
            let stats = fracture_pass(&mut world.bodies[index], &mut |e| events.push(e));
            fractures += stats.severed;
            splits += stats.splits;
        }

        for event in events {
            world.emit(event);
        }

        world.time += dt;
        world.step_count += 1;
        StepSummary {
            time: world.time,
            step: world.step_count,
            contacts,
            fractures,
            splits,
        }
    }

    /// Run `ticks` consecutive steps, returning the final summary.
    pub fn run(&mut self, world: &mut World, ticks: usize) -> Option<StepSummary> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step(world));
        }
        last
    }
}

/// Integrate every particle of `body` through the tick, splitting at
/// contacts against the other bodies' edges. Returns the number of
/// contacts resolved.
#[allow(clippy::too_many_arguments)]
fn resolve_body_contacts(
    body: &mut Body,
    before: &[Body],
    after: &[Body],
    params: &ContactParams,
    response: &dyn ImpulseResponse,
    dt: f64,
    events: &mut Vec<SimEvent>,
) -> usize {
    let mut contacts = 0;

    for i in 0..body.particles.len() {
        if body.particles[i].locked {
            continue;
        }

        let mut remaining = 1.0_f64;
        let mut iterations = 0_usize;
        while remaining > 0.0 {
            let pos = body.particles[i].x;
            let vel = body.particles[i].v;
            let pos_next = pos + vel * (dt * remaining);

            let mut best: Option<CollisionSubframe> = None;
            for other in before.iter().chain(after.iter()) {
                let candidate =
                    earliest_contact(other, pos, pos_next, vel, remaining, params, response, dt,
                        events);
                if let Some(sub) = candidate {
                    let earlier = best
                        .as_ref()
                        .is_none_or(|b| sub.time_coefficient < b.time_coefficient);
                    if earlier {
                        best = Some(sub);
                    }
                }
            }

            let Some(sub) = best else {
                // No further contact: advance the remainder of the tick.
                body.particles[i].x = pos + vel * (dt * remaining);
                break;
            };

            let tc = sub.time_coefficient.min(remaining);
            body.particles[i].subframes.push(CollisionSubframe {
                velocity: vel,
                time_coefficient: tc,
            });
            body.particles[i].x = pos + vel * (dt * tc);
            body.particles[i].v = sub.velocity;
            remaining -= tc;
            contacts += 1;
            iterations += 1;

            if iterations >= params.max_subframes && remaining > 0.0 {
                // Degenerate repeated grazing: drop the rest of the tick
                // rather than risk a livelock.
                events.push(SimEvent::SubframeCapReached { iterations });
                break;
            }
        }
    }
    contacts
}

/// The earliest contact of the swept point against one other body's
/// edges, if any.
#[allow(clippy::too_many_arguments)]
fn earliest_contact(
    other: &Body,
    pos: Point2<f64>,
    pos_next: Point2<f64>,
    vel: Vector2<f64>,
    remaining: f64,
    params: &ContactParams,
    response: &dyn ImpulseResponse,
    dt: f64,
    events: &mut Vec<SimEvent>,
) -> Option<CollisionSubframe> {
    let mut best: Option<CollisionSubframe> = None;
    let frozen = other.frozen();

    for (start, end) in other.edges() {
        let candidate = if frozen {
            // Frozen edges do not move; test them in goal space with the
            // plain segment intersection.
            let edge = LineSegment::new(other.particles[start].goal, other.particles[end].goal);
            let path = LineSegment::new(pos, pos_next);
            ccd::segment_intersection(&edge, &path).and_then(|hit| {
                response.static_edge(params, pos, vel, &edge, hit, dt)
            })
        } else {
            let a = &other.particles[start];
            let b = &other.particles[end];
            let edge = LineSegment::new(a.x, b.x);
            let edge_next = LineSegment::new(
                a.x + a.v * (dt * remaining),
                b.x + b.v * (dt * remaining),
            );
            let input = SweptInput {
                edge,
                edge_next,
                point: pos,
                point_next: pos_next,
            };
            ccd::solve_swept(&input).and_then(|toi| {
                if toi <= 0.0 {
                    // Zero-distance contact; the epsilon backoff below
                    // will hold the particle off the edge.
                    events.push(SimEvent::ZeroTimeContact);
                }
                let geometry = ContactGeometry::at_time(&input, toi);
                response.moving_edge(params, vel, a.v, b.v, &geometry, toi, remaining, dt)
            })
        };

        if let Some(sub) = candidate {
            let earlier = best
                .as_ref()
                .is_none_or(|b| sub.time_coefficient < b.time_coefficient);
            if earlier {
                best = Some(sub);
            }
        }
    }
    best
}
