//! Contact resolution parameters.

use lattice_types::{LatticeError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters controlling contact detection and subframe clipping.
///
/// The subframe loop uses a fixed iteration cap rather than a convergence
/// test: the same inputs always cost the same and always terminate, even
/// under near-degenerate repeated grazing contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactParams {
    /// Distance/time epsilon. A resolved contact backs the time
    /// coefficient off by `epsilon / speed` so the next detection pass
    /// does not re-trigger at zero distance, and frozen-edge hits closer
    /// than `epsilon` to the particle are ignored (anti-sticking guard).
    pub epsilon: f64,
    /// Extra fractional backoff applied to each swept time-of-impact,
    /// in `[0, 1)`. `0.0` resolves exactly at the impact time.
    pub time_offset: f64,
    /// Hard cap on collision subframes per particle per tick. When
    /// reached, the remaining tick fraction is truncated.
    pub max_subframes: usize,
}

impl Default for ContactParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-5,
            time_offset: 0.0,
            max_subframes: 16,
        }
    }
}

impl ContactParams {
    /// Set the contact epsilon.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the fractional time-of-impact backoff.
    #[must_use]
    pub fn with_time_offset(mut self, time_offset: f64) -> Self {
        self.time_offset = time_offset;
        self
    }

    /// Set the subframe iteration cap.
    #[must_use]
    pub fn with_max_subframes(mut self, max_subframes: usize) -> Self {
        self.max_subframes = max_subframes;
        self
    }

    /// Validate the parameters.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(LatticeError::InvalidConfig {
                reason: format!("contact epsilon must be positive, got {}", self.epsilon),
            });
        }
        if !(0.0..1.0).contains(&self.time_offset) {
            return Err(LatticeError::InvalidConfig {
                reason: format!("time offset must be in [0, 1), got {}", self.time_offset),
            });
        }
        if self.max_subframes == 0 {
            return Err(LatticeError::InvalidConfig {
                reason: "max_subframes must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = ContactParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.max_subframes, 16);
        assert!(params.epsilon > 0.0);
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(ContactParams::default()
            .with_epsilon(0.0)
            .validate()
            .is_err());
        assert!(ContactParams::default()
            .with_time_offset(1.0)
            .validate()
            .is_err());
        assert!(ContactParams::default()
            .with_max_subframes(0)
            .validate()
            .is_err());
    }
}
