//! Configuration types for lattice simulation.
//!
//! All tunables are explicit values passed into body/world construction;
//! there is no process-wide mutable state. Body-level fracture tolerances
//! may be adjusted between ticks through [`BodyConfig`] accessors on the
//! owning body.

use crate::{LatticeError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-body configuration, fixed at construction except for the fracture
/// tolerances, which an external controller may change between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyConfig {
    /// Kinematic/immovable body. Frozen bodies skip dynamics entirely and
    /// act as one-sided colliders; their edges are tested in goal space.
    pub frozen: bool,
    /// Relative elongation threshold for severing a link
    /// (`| len/rest - 1 | > tolerance`). `0.0` disables the length test.
    pub fracture_length_tolerance: f64,
    /// Maximum angle (radians) between two linked particles' averaged
    /// rotations before the link severs. `0.0` disables the angle test.
    pub fracture_angle_tolerance: f64,
    /// Lattice spacing: distance between adjacent rest positions.
    pub spacing: f64,
    /// Mass of each particle.
    pub particle_mass: f64,
    /// Chebyshev radius of each smoothing region's window, in cells.
    pub region_half_width: usize,
    /// Stride between smoothing-region centers, in cells.
    pub region_stride: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            frozen: false,
            fracture_length_tolerance: 0.25,
            fracture_angle_tolerance: 0.5,
            spacing: 10.0,
            particle_mass: 1.0,
            region_half_width: 1,
            region_stride: 1,
        }
    }
}

impl BodyConfig {
    /// A frozen (immovable) collider body.
    #[must_use]
    pub fn frozen() -> Self {
        Self {
            frozen: true,
            ..Default::default()
        }
    }

    /// A body that never fractures (both tolerances zero).
    #[must_use]
    pub fn unbreakable() -> Self {
        Self {
            fracture_length_tolerance: 0.0,
            fracture_angle_tolerance: 0.0,
            ..Default::default()
        }
    }

    /// Set the fracture tolerances (length strain ratio, angle in radians).
    #[must_use]
    pub fn with_fracture_tolerances(mut self, length: f64, angle: f64) -> Self {
        self.fracture_length_tolerance = length;
        self.fracture_angle_tolerance = angle;
        self
    }

    /// Set the lattice spacing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the per-particle mass.
    #[must_use]
    pub fn with_particle_mass(mut self, mass: f64) -> Self {
        self.particle_mass = mass;
        self
    }

    /// Set the smoothing-region window radius and stride.
    #[must_use]
    pub fn with_regions(mut self, half_width: usize, stride: usize) -> Self {
        self.region_half_width = half_width;
        self.region_stride = stride;
        self
    }

    /// Whether the fracture pass runs at all. Tolerances of zero disable
    /// fracture.
    #[must_use]
    pub fn fracture_enabled(&self) -> bool {
        self.fracture_length_tolerance > 0.0 || self.fracture_angle_tolerance > 0.0
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.particle_mass.is_finite() || self.particle_mass <= 0.0 {
            return Err(LatticeError::InvalidMass {
                mass: self.particle_mass,
            });
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(LatticeError::InvalidConfig {
                reason: format!("spacing must be positive and finite, got {}", self.spacing),
            });
        }
        if self.fracture_length_tolerance < 0.0 || self.fracture_angle_tolerance < 0.0 {
            return Err(LatticeError::InvalidConfig {
                reason: "fracture tolerances must be non-negative".into(),
            });
        }
        if self.region_stride == 0 {
            return Err(LatticeError::InvalidConfig {
                reason: "region stride must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// World-level solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Fixed timestep for one simulation tick (seconds).
    pub timestep: f64,
    /// Linear velocity damping per tick, in `[0, 1)`. `0.0` disables.
    pub damping: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            damping: 0.0,
        }
    }
}

impl SolverConfig {
    /// Create a config with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// Set the per-tick damping factor.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(LatticeError::InvalidConfig {
                reason: format!(
                    "timestep must be positive and finite, got {}",
                    self.timestep
                ),
            });
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(LatticeError::InvalidConfig {
                reason: format!("damping must be in [0, 1), got {}", self.damping),
            });
        }
        Ok(())
    }
}
