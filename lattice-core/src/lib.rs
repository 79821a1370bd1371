//! 2D lattice shape-matching simulation engine.
//!
//! Deformable rigid-ish bodies on a 2D lattice: particles linked to their
//! four axis-aligned neighbors, pulled toward per-region shape-matched
//! goals, colliding continuously against other bodies' edges, and
//! fracturing when local deformation exceeds tolerance.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Stepper                              │
//! │  Orchestrates: matching → forces → CCD subframes → fracture │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         World                               │
//! │  Contains: bodies, environment forces, event sink, time     │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Body                               │
//! │  Particle arena + adjacency table + chunks + regions        │
//! │  matching: per-region rotations and goal positions          │
//! │  fracture: break tests, BFS connectivity, chunk splits      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Continuous collision detection and the reflection response live in
//! [`lattice_contact`]; pure data types in [`lattice_types`].
//!
//! # Quick Start
//!
//! ```
//! use lattice_core::{Blueprint, Body, Gravity, GoalRestoring, Stepper, World};
//! use lattice_types::{BodyConfig, Point2, SolverConfig};
//!
//! // A 4x4 deformable square above a frozen floor strip.
//! let mut world = World::new(SolverConfig::default());
//! world.add_force(Gravity::earth());
//! world.add_force(GoalRestoring::default());
//!
//! let square = Body::from_blueprint(
//!     &Blueprint::rectangle(4, 4),
//!     Point2::new(0.0, 100.0),
//!     BodyConfig::default(),
//! ).unwrap();
//! world.add_body(square);
//!
//! let floor = Body::from_blueprint(
//!     &Blueprint::rectangle(1, 8),
//!     Point2::new(-20.0, 0.0),
//!     BodyConfig::frozen(),
//! ).unwrap();
//! world.add_body(floor);
//!
//! let mut stepper = Stepper::new();
//! for _ in 0..60 {
//!     stepper.step(&mut world);
//! }
//! ```
//!
//! # Concurrency model
//!
//! Single-threaded and frame-stepped: one tick runs to completion, every
//! loop is bounded (particle counts, region counts, a hard cap on CCD
//! subframes). During one body's tick the other bodies are only read, so
//! a per-body reader-writer discipline suffices if stepping is ever
//! parallelized across bodies.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // nalgebra constructors are not const
    clippy::cast_precision_loss,   // usize to f64 is fine for counts
    clippy::missing_errors_doc,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::float_cmp))]

mod blueprint;
mod body;
mod forces;
mod fracture;
mod matching;
mod stepper;
mod world;

pub use blueprint::Blueprint;
pub use body::{Body, Chunk, Neighbors, Particle};
pub use forces::{EnvironmentForce, Gravity, GoalRestoring};
pub use fracture::{fracture_pass, FractureStats};
pub use matching::{match_shapes, SmoothingRegion};
pub use stepper::{StepSummary, Stepper};
pub use world::{BodyId, World};

// Re-export the companion crates' key types
pub use lattice_contact::{CollisionSubframe, ContactParams, ImpulseResponse, Reflection};
pub use lattice_types::{
    BodyConfig, EventSink, LatticeError, LineSegment, RecordingSink, Severity, SimEvent,
    SolverConfig,
};
