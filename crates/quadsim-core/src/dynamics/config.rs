//! Physical vehicle configuration
//!
//! Static per-vehicle constants, set once at construction and swapped
//! wholesale to represent a different drone preset, never mutated
//! field-by-field mid-flight. Validation happens once here so the engine
//! never has to check for non-physical values per step.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GRAVITY;

/// Configuration validation errors, reported at construction time
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("mass {0} must be positive")]
    NonPositiveMass(f64),
    #[error("inertia component {0} must be positive")]
    NonPositiveInertia(f64),
    #[error("arm length {0} must be positive")]
    NonPositiveArmLength(f64),
    #[error("prop diameter {0} must be positive")]
    NonPositivePropDiameter(f64),
    #[error("rpm range [{min}, {max}] is empty or negative")]
    InvalidRpmRange { min: f64, max: f64 },
    #[error("motor response rate {0} must be positive")]
    NonPositiveResponseRate(f64),
    #[error("angular drag {0} outside (0, 1]")]
    AngularDragOutOfRange(f64),
}

/// Static physical constants for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Total mass [kg]
    pub mass: f64,
    /// Center-to-motor arm length [m]
    pub arm_length: f64,
    /// Motor velocity constant [rpm/V]
    pub motor_kv: f64,
    /// Propeller diameter [m]
    pub prop_diameter: f64,
    /// Propeller pitch [m]
    pub prop_pitch: f64,
    /// Quadratic drag coefficient (folds in frontal area)
    pub drag_coefficient: f64,
    /// Idle RPM at zero throttle
    pub min_rpm: f64,
    /// RPM at full throttle
    pub max_rpm: f64,
    /// Diagonal moment of inertia [kg·m²] (x-pitch, y-yaw, z-roll)
    pub inertia: Vector3<f64>,
    /// Exponential motor spool rate [1/s]
    pub motor_response_rate: f64,
    /// Multiplicative angular velocity decay, applied once per update call
    pub angular_drag: f64,
    /// Air density [kg/m³]
    pub air_density: f64,
    /// Static thrust coefficient Ct
    pub thrust_coefficient: f64,
    /// Full-stick RPM differentials for the direct-mix path (roll, pitch, yaw)
    pub mix_rates: Vector3<f64>,
    /// Ground plane height [m]
    pub ground_level: f64,
    /// Rest height of the frame above the ground plane [m]
    pub ground_offset: f64,
    /// Altitude ceiling [m]
    pub max_altitude: f64,
    /// Horizontal world boundary [m]
    pub max_distance: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        // 5-inch freestyle quad
        Self {
            mass: 0.65,
            arm_length: 0.15,
            motor_kv: 2400.0,
            prop_diameter: 0.127,
            prop_pitch: 0.1016,
            drag_coefficient: 0.35,
            min_rpm: 1500.0,
            max_rpm: 28_000.0,
            inertia: Vector3::new(0.008, 0.01, 0.008),
            motor_response_rate: 15.0,
            angular_drag: 0.95,
            air_density: 1.225,
            thrust_coefficient: 0.11,
            mix_rates: Vector3::new(4000.0, 4000.0, 2200.0),
            ground_level: 0.0,
            ground_offset: 0.1,
            max_altitude: 120.0,
            max_distance: 400.0,
        }
    }
}

impl PhysicsConfig {
    /// Sub-65g micro quad preset
    pub fn tiny_whoop() -> Self {
        Self {
            mass: 0.032,
            arm_length: 0.04,
            motor_kv: 19_000.0,
            prop_diameter: 0.04,
            prop_pitch: 0.025,
            drag_coefficient: 0.15,
            min_rpm: 4000.0,
            max_rpm: 95_000.0,
            inertia: Vector3::new(2.5e-5, 3.0e-5, 2.5e-5),
            motor_response_rate: 25.0,
            angular_drag: 0.92,
            thrust_coefficient: 0.09,
            mix_rates: Vector3::new(14_000.0, 14_000.0, 8000.0),
            ..Self::default()
        }
    }

    /// Heavy 7-inch cinelifter preset
    pub fn cinelift() -> Self {
        Self {
            mass: 1.45,
            arm_length: 0.21,
            motor_kv: 1600.0,
            prop_diameter: 0.178,
            prop_pitch: 0.12,
            drag_coefficient: 0.55,
            min_rpm: 1200.0,
            max_rpm: 18_000.0,
            inertia: Vector3::new(0.028, 0.035, 0.028),
            motor_response_rate: 10.0,
            angular_drag: 0.96,
            thrust_coefficient: 0.12,
            mix_rates: Vector3::new(2400.0, 2400.0, 1300.0),
            ..Self::default()
        }
    }

    /// Validate physical plausibility; call once when the preset is selected
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        for &i in &[self.inertia.x, self.inertia.y, self.inertia.z] {
            if i <= 0.0 {
                return Err(ConfigError::NonPositiveInertia(i));
            }
        }
        if self.arm_length <= 0.0 {
            return Err(ConfigError::NonPositiveArmLength(self.arm_length));
        }
        if self.prop_diameter <= 0.0 {
            return Err(ConfigError::NonPositivePropDiameter(self.prop_diameter));
        }
        if self.min_rpm < 0.0 || self.max_rpm <= self.min_rpm {
            return Err(ConfigError::InvalidRpmRange {
                min: self.min_rpm,
                max: self.max_rpm,
            });
        }
        if self.motor_response_rate <= 0.0 {
            return Err(ConfigError::NonPositiveResponseRate(self.motor_response_rate));
        }
        if !(self.angular_drag > 0.0 && self.angular_drag <= 1.0) {
            return Err(ConfigError::AngularDragOutOfRange(self.angular_drag));
        }
        Ok(())
    }

    /// Static thrust of one motor at the given RPM [N]
    ///
    /// T = Ct · ρ · (rpm/60)² · D⁴
    pub fn motor_thrust(&self, rpm: f64) -> f64 {
        let rev_per_sec = rpm / 60.0;
        self.thrust_coefficient
            * self.air_density
            * rev_per_sec.powi(2)
            * self.prop_diameter.powi(4)
    }

    /// RPM (per motor) at which total thrust equals weight
    pub fn hover_rpm(&self) -> f64 {
        let per_motor = self.mass * GRAVITY / 4.0;
        let rev_per_sec = (per_motor
            / (self.thrust_coefficient * self.air_density * self.prop_diameter.powi(4)))
        .sqrt();
        60.0 * rev_per_sec
    }

    /// Throttle fraction that holds hover (before throttle-curve shaping)
    pub fn hover_throttle(&self) -> f64 {
        ((self.hover_rpm() - self.min_rpm) / (self.max_rpm - self.min_rpm)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_presets_are_valid() {
        for config in [
            PhysicsConfig::default(),
            PhysicsConfig::tiny_whoop(),
            PhysicsConfig::cinelift(),
        ] {
            config.validate().unwrap();
        }
    }

    #[test]
    fn test_validation_rejects_zero_mass() {
        let config = PhysicsConfig {
            mass: 0.0,
            ..PhysicsConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveMass(0.0)));
    }

    #[test]
    fn test_validation_rejects_inverted_rpm_range() {
        let config = PhysicsConfig {
            min_rpm: 10_000.0,
            max_rpm: 5000.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRpmRange { .. })
        ));
    }

    #[test]
    fn test_thrust_quadratic_in_rpm() {
        let config = PhysicsConfig::default();
        let t1 = config.motor_thrust(10_000.0);
        let t2 = config.motor_thrust(20_000.0);

        assert_relative_eq!(t2 / t1, 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_hover_rpm_balances_weight() {
        let config = PhysicsConfig::default();
        let total = 4.0 * config.motor_thrust(config.hover_rpm());

        assert_relative_eq!(total, config.mass * GRAVITY, epsilon = 1e-9);
    }

    #[test]
    fn test_hover_throttle_within_usable_band() {
        for config in [
            PhysicsConfig::default(),
            PhysicsConfig::tiny_whoop(),
            PhysicsConfig::cinelift(),
        ] {
            let hover = config.hover_throttle();
            assert!(hover > 0.1 && hover < 0.9, "hover throttle {hover} unusable");
        }
    }
}
