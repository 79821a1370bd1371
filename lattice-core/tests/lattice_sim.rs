//! End-to-end scenarios for the lattice simulation.
//!
//! These drive the public API only: build bodies from blueprints, run the
//! stepper, observe chunks, contacts, and diagnostic events.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::uninlined_format_args)]

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use lattice_core::{
    fracture_pass, Blueprint, Body, EnvironmentForce, GoalRestoring, Gravity, RecordingSink,
    SimEvent, Stepper, World,
};
use lattice_types::{BodyConfig, Point2, SolverConfig, Vector2};

/// Spec scenario: a 1x2 lattice with rest distance 10, stretched in goal
/// space just past tolerance with aligned rotations, severs and leaves
/// two single-particle chunks.
#[test]
fn stretched_pair_splits_into_two_single_particle_chunks() {
    let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
    let blueprint = Blueprint::rectangle(1, 2);
    let mut body = Body::from_blueprint(&blueprint, Point2::origin(), config).unwrap();

    // Goal-space distance = 10 * (1 + tolerance + 0.01), angle difference 0.
    body.particles_mut()[1].goal = Point2::new(10.0 * (1.0 + 0.25 + 0.01), 0.0);

    let mut events = Vec::new();
    let stats = fracture_pass(&mut body, &mut |e| events.push(e));

    assert_eq!(stats.severed, 1);
    assert_eq!(stats.splits, 1);
    assert_eq!(body.chunk_count(), 2);
    assert!(body.chunks().iter().all(|c| c.particles.len() == 1));
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::LengthFracture { .. })));

    // Re-running on the already-split body is a no-op.
    let again = fracture_pass(&mut body, &mut |_| {});
    assert_eq!(again.severed, 0);
    assert_eq!(body.chunk_count(), 2);
}

/// Spec scenario: a point at (0, 5) moving to (10, 5) against a static
/// edge from (5, 0) to (5, 10) contacts at half the tick and reflects.
#[test]
fn point_reflects_off_frozen_edge_at_half_tick() {
    let mut world = World::new(SolverConfig::with_timestep(1.0));

    let mover = world.add_body(
        Body::from_blueprint(
            &Blueprint::rectangle(1, 1),
            Point2::new(0.0, 5.0),
            BodyConfig::default(),
        )
        .unwrap(),
    );
    world.add_body(
        Body::from_blueprint(
            &Blueprint::rectangle(2, 1),
            Point2::new(5.0, 0.0),
            BodyConfig::frozen(),
        )
        .unwrap(),
    );
    world.body_mut(mover).unwrap().particles_mut()[0].v = Vector2::new(10.0, 0.0);

    let summary = Stepper::new().step(&mut world);

    assert_eq!(summary.contacts, 1);
    let p = &world.body(mover).unwrap().particles()[0];
    assert_relative_eq!(p.subframes[0].time_coefficient, 0.5, epsilon = 1e-9);
    assert_relative_eq!(p.v, Vector2::new(-10.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(p.x, Point2::new(0.0, 5.0), epsilon = 1e-9);
}

/// A particle bouncing between two frozen walls keeps its speed and
/// stays inside.
#[test]
fn particle_bounces_between_frozen_walls() {
    let mut world = World::new(SolverConfig::with_timestep(1.0));

    let mover = world.add_body(
        Body::from_blueprint(
            &Blueprint::rectangle(1, 1),
            Point2::new(10.0, 5.0),
            BodyConfig::default(),
        )
        .unwrap(),
    );
    // Vertical walls at x = 0 and x = 30.
    for x in [0.0, 30.0] {
        world.add_body(
            Body::from_blueprint(
                &Blueprint::rectangle(2, 1),
                Point2::new(x, 0.0),
                BodyConfig::frozen(),
            )
            .unwrap(),
        );
    }
    world.body_mut(mover).unwrap().particles_mut()[0].v = Vector2::new(7.0, 0.0);

    let mut stepper = Stepper::new();
    let mut total_contacts = 0;
    for _ in 0..20 {
        total_contacts += stepper.step(&mut world).contacts;
        let p = &world.body(mover).unwrap().particles()[0];
        assert!(
            (-0.5..=30.5).contains(&p.x.x),
            "particle escaped to x = {}",
            p.x.x
        );
        assert_relative_eq!(p.v.norm(), 7.0, epsilon = 1e-9);
    }
    assert!(total_contacts >= 4, "expected repeated bounces");
}

/// A soft square dropped onto a frozen floor never tunnels through it.
#[test]
fn falling_square_does_not_tunnel_through_frozen_floor() {
    let mut world = World::new(SolverConfig::default());
    world.add_force(Gravity::earth());
    world.add_force(GoalRestoring::default());

    let square = world.add_body(
        Body::from_blueprint(
            &Blueprint::rectangle(2, 2),
            Point2::new(5.0, 30.0),
            BodyConfig::unbreakable(),
        )
        .unwrap(),
    );
    world.add_body(
        Body::from_blueprint(
            &Blueprint::rectangle(1, 8),
            Point2::new(-20.0, 0.0),
            BodyConfig::frozen(),
        )
        .unwrap(),
    );

    let mut stepper = Stepper::new();
    let mut total_contacts = 0;
    for _ in 0..240 {
        total_contacts += stepper.step(&mut world).contacts;
    }

    assert!(total_contacts > 0, "square never touched the floor");
    let body = world.body(square).unwrap();
    for p in body.particles() {
        assert!(p.x.y > -1.0, "particle tunneled to y = {}", p.x.y);
    }
    assert_eq!(body.chunk_count(), 1);
}

/// Pulls one end particle of a strip until the lattice tears.
struct PullRight {
    index: usize,
    force: f64,
}

impl EnvironmentForce for PullRight {
    fn apply(&self, body: &mut Body, _dt: f64) {
        body.apply_force(self.index, Vector2::new(self.force, 0.0));
    }
}

/// Dragging the free end of an anchored strip tears it apart, splitting
/// the chunk; the pieces partition the particle set exactly.
#[test]
fn dragged_strip_tears_and_splits() {
    let sink = Rc::new(RefCell::new(RecordingSink::new()));
    let mut world = World::new(SolverConfig::default());
    world.set_event_sink(Box::new(Rc::clone(&sink)));
    world.add_force(PullRight {
        index: 3,
        force: 60.0,
    });

    // Angle tolerance beyond pi isolates the length test.
    let config = BodyConfig::default().with_fracture_tolerances(0.25, 10.0);
    let mut body =
        Body::from_blueprint(&Blueprint::rectangle(1, 4), Point2::origin(), config).unwrap();
    body.lock_particle(0);
    let id = world.add_body(body);

    let mut stepper = Stepper::new();
    let mut tore = false;
    for _ in 0..600 {
        let summary = stepper.step(&mut world);
        if summary.splits > 0 {
            tore = true;
            break;
        }
    }

    assert!(tore, "strip never tore");
    let body = world.body(id).unwrap();
    assert_eq!(body.chunk_count(), 2);

    // The two chunks partition the original particle set.
    let mut all: Vec<usize> = body
        .chunks()
        .iter()
        .flat_map(|c| c.particles.iter().copied())
        .collect();
    all.sort_unstable();
    assert_eq!(all, vec![0, 1, 2, 3]);

    // The anchor never moved.
    assert_relative_eq!(body.particle(0).x, body.particle(0).x0);

    // Diagnostics flowed through the sink.
    let events = sink.borrow().events().to_vec();
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::LengthFracture { .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::ChunkSplit { .. })));
}

/// The same drag with zero tolerances never fractures.
#[test]
fn zero_tolerances_never_tear() {
    let mut world = World::new(SolverConfig::default());
    world.add_force(PullRight {
        index: 3,
        force: 60.0,
    });

    let mut body = Body::from_blueprint(
        &Blueprint::rectangle(1, 4),
        Point2::origin(),
        BodyConfig::unbreakable(),
    )
    .unwrap();
    body.lock_particle(0);
    let id = world.add_body(body);

    let mut stepper = Stepper::new();
    for _ in 0..300 {
        let summary = stepper.step(&mut world);
        assert_eq!(summary.fractures, 0);
    }
    assert_eq!(world.body(id).unwrap().chunk_count(), 1);
}
