//! Error types for lattice simulation.
//!
//! All variants are construction-time contract violations. Per-tick
//! numerics (degenerate covariance, parallel segments, zero-length
//! vectors) recover locally inside the solvers and never surface here.

use thiserror::Error;

/// Errors that can occur while building lattice bodies.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    /// The blueprint grid has zero rows or zero columns.
    #[error("blueprint grid is empty")]
    EmptyBlueprint,

    /// The blueprint grid contains no occupied cells.
    #[error("blueprint has no occupied cells")]
    NoOccupiedCells,

    /// Non-positive or non-finite particle mass.
    #[error("invalid particle mass: {mass} (must be positive and finite)")]
    InvalidMass {
        /// The offending mass value.
        mass: f64,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },
}
