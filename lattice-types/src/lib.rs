//! Core types for 2D lattice shape-matching simulation.
//!
//! This crate provides the foundational types shared by the lattice
//! simulation crates:
//!
//! - [`LineSegment`] - A 2D edge between two lattice particles
//! - [`BodyConfig`] / [`SolverConfig`] - Construction-time configuration
//! - [`SimEvent`] / [`EventSink`] - One-way diagnostic notifications
//! - [`LatticeError`] - Construction-time error taxonomy
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no physics, no integration, no
//! graph mutation. They're the common language between:
//!
//! - The contact kernel (lattice-contact)
//! - The lattice engine (lattice-core)
//! - Diagnostic consumers (status displays, test harnesses)
//!
//! # Coordinate System
//!
//! 2D, right-handed:
//!
//! - X: right
//! - Y: up
//!
//! All quantities are `f64`.
//!
//! # Example
//!
//! ```
//! use lattice_types::{BodyConfig, LineSegment};
//! use nalgebra::Point2;
//!
//! let config = BodyConfig::default().with_fracture_tolerances(0.25, 0.5);
//! assert!(config.validate().is_ok());
//!
//! let edge = LineSegment::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
//! assert!((edge.length() - 5.0).abs() < 1e-12);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
// Allow certain clippy lints that are overly pedantic for type definitions
#![allow(
    clippy::missing_const_for_fn,  // Many methods can't be const due to nalgebra
    clippy::cast_precision_loss,   // usize to f64 is fine for counts
    clippy::missing_errors_doc,    // Error docs added where non-obvious
)]

mod config;
mod error;
mod events;
mod geometry;

pub use config::{BodyConfig, SolverConfig};
pub use error::LatticeError;
pub use events::{EventSink, NullSink, RecordingSink, Severity, SimEvent};
pub use geometry::{perpendicular, LineSegment};

// Re-export math types for convenience
pub use nalgebra::{Matrix2, Point2, Vector2};

/// Result type for lattice operations.
pub type Result<T> = std::result::Result<T, LatticeError>;
