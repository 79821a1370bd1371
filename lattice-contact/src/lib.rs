//! Continuous collision detection and impulse response for 2D lattices.
//!
//! Discrete collision checks miss contacts when a fast particle crosses an
//! edge entirely within one tick. This crate solves the continuous problem
//! instead: the exact in-tick time at which a moving point crosses a moving
//! (or static) edge, and the velocity reflection to apply at that time.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        ccd                               │
//! │  swept point vs moving edge  →  earliest time-of-impact  │
//! │  static segment intersection (frozen edges)              │
//! └───────────────────────────┬──────────────────────────────┘
//!                             │ ContactGeometry
//!                             ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                      response                            │
//! │  reflect velocity about the edge normal (relative frame) │
//! │  clip the tick into collision subframes                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller (the lattice engine) owns the iteration: it repeats
//! detection against the remaining tick fraction until no contact remains,
//! bounded by [`ContactParams::max_subframes`].
//!
//! # Quick Start
//!
//! ```
//! use lattice_contact::{ccd, ContactParams};
//! use lattice_types::LineSegment;
//! use nalgebra::Point2;
//!
//! // A point sweeping left-to-right across a static vertical edge.
//! let input = ccd::SweptInput {
//!     edge: LineSegment::new(Point2::new(5.0, 0.0), Point2::new(5.0, 10.0)),
//!     edge_next: LineSegment::new(Point2::new(5.0, 0.0), Point2::new(5.0, 10.0)),
//!     point: Point2::new(0.0, 5.0),
//!     point_next: Point2::new(10.0, 5.0),
//! };
//! let t = ccd::solve_swept(&input);
//! assert!((t.unwrap() - 0.5).abs() < 1e-12);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // nalgebra constructors are not const
    clippy::missing_errors_doc,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::float_cmp))]

pub mod ccd;
mod params;
pub mod response;

pub use ccd::{segment_intersection, solve_swept, ContactGeometry, SweptInput};
pub use params::ContactParams;
pub use response::{CollisionSubframe, ImpulseResponse, Reflection};
