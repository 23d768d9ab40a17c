//! Session configuration
//!
//! Bundles the vehicle preset, rate profile, and stepping parameters for one
//! flight session. Constructed and selected entirely outside the core; the
//! core never reads global configuration state.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dynamics::{ConfigError, PhysicsConfig};
use crate::input::{RateProfile, RateProfileError};

/// Session-level validation errors
#[derive(Debug, Error, PartialEq)]
pub enum SimConfigError {
    #[error("physics config invalid: {0}")]
    Physics(#[from] ConfigError),
    #[error("rate profile invalid: {0}")]
    Rates(#[from] RateProfileError),
    #[error("substeps must be at least 1, got {0}")]
    ZeroSubsteps(usize),
    #[error("max frame dt {0} must be positive")]
    NonPositiveMaxFrameDt(f64),
}

/// Configuration for one flight session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Vehicle preset
    pub physics: PhysicsConfig,
    /// Stick response profile
    pub rates: RateProfile,
    /// Substeps per rendered frame; the explicit-Euler scheme needs small
    /// slices to stay stable
    pub substeps: usize,
    /// Frame dt clamp [s]; protects against pause/tab-switch spikes
    pub max_frame_dt: f64,
    /// Spawn position [m]
    pub initial_position: Vector3<f64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            rates: RateProfile::default(),
            substeps: 4,
            max_frame_dt: 0.05,
            initial_position: Vector3::new(0.0, 0.1, 0.0),
        }
    }
}

impl SimConfig {
    /// Validate every nested config; call once before starting the session
    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.physics.validate()?;
        self.rates.validate()?;
        if self.substeps == 0 {
            return Err(SimConfigError::ZeroSubsteps(0));
        }
        if self.max_frame_dt <= 0.0 {
            return Err(SimConfigError::NonPositiveMaxFrameDt(self.max_frame_dt));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn test_nested_physics_error_propagates() {
        let mut config = SimConfig::default();
        config.physics.mass = -1.0;

        assert!(matches!(
            config.validate(),
            Err(SimConfigError::Physics(ConfigError::NonPositiveMass(_)))
        ));
    }

    #[test]
    fn test_nested_rate_error_propagates() {
        let mut config = SimConfig::default();
        config.rates.deadzone = 1.5;

        assert!(matches!(config.validate(), Err(SimConfigError::Rates(_))));
    }

    #[test]
    fn test_zero_substeps_rejected() {
        let config = SimConfig {
            substeps: 0,
            ..SimConfig::default()
        };

        assert_eq!(config.validate(), Err(SimConfigError::ZeroSubsteps(0)));
    }
}
