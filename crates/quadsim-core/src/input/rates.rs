//! Stick-to-rate response curves ("Actual Rates" model)
//!
//! Maps a stick axis in [-1, 1] to a target rotation rate in deg/s using
//! the center-sensitivity / max-rate / expo parameterization popularized by
//! flight-controller firmware, plus a centered expo throttle curve.
//!
//! All curves are pure functions over an immutable profile; swapping the
//! active profile does not touch any controller state.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stick::{apply_deadzone, NormalizedInput};

/// Profile validation errors, reported once at load time
#[derive(Debug, Error, PartialEq)]
pub enum RateProfileError {
    #[error("{axis} expo {value} outside [0, 1]")]
    ExpoOutOfRange { axis: &'static str, value: f64 },
    #[error("{axis} center sensitivity {center} exceeds max rate {max}")]
    CenterAboveMax {
        axis: &'static str,
        center: f64,
        max: f64,
    },
    #[error("{axis} has negative rate parameter")]
    NegativeRate { axis: &'static str },
    #[error("deadzone {0} outside [0, 1)")]
    DeadzoneOutOfRange(f64),
    #[error("throttle mid point {0} outside [0, 1]")]
    MidPointOutOfRange(f64),
    #[error("throttle limit {0} outside (0, 1]")]
    LimitOutOfRange(f64),
}

/// Per-axis rate curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRates {
    /// Stick-center slope [deg/s per unit stick]
    pub center_sensitivity: f64,
    /// Rate at full deflection [deg/s]
    pub max_rate: f64,
    /// Curvature [0, 1]; 0 = linear blend, 1 = fully cubic
    pub expo: f64,
}

impl AxisRates {
    pub fn new(center_sensitivity: f64, max_rate: f64, expo: f64) -> Self {
        Self {
            center_sensitivity,
            max_rate,
            expo,
        }
    }

    /// Target rotation rate for a stick deflection
    ///
    /// rate = sign · (center·a + (max − center)·(a(1−expo) + a³·expo))
    ///
    /// Pure and well-defined for any input; only |stick| and its cube are
    /// used, so out-of-range sticks extrapolate smoothly.
    ///
    /// Properties (for valid profiles): rate(0) = 0, rate(±1) = ±max_rate,
    /// odd symmetry, monotone in |stick|.
    pub fn rate(&self, stick: f64) -> f64 {
        let a = stick.abs();
        let sign = if stick < 0.0 { -1.0 } else { 1.0 };

        let expo_curve = a * (1.0 - self.expo) + a.powi(3) * self.expo;

        sign * (self.center_sensitivity * a + (self.max_rate - self.center_sensitivity) * expo_curve)
    }

    fn validate(&self, axis: &'static str) -> Result<(), RateProfileError> {
        if !(0.0..=1.0).contains(&self.expo) {
            return Err(RateProfileError::ExpoOutOfRange {
                axis,
                value: self.expo,
            });
        }
        if self.center_sensitivity < 0.0 || self.max_rate < 0.0 {
            return Err(RateProfileError::NegativeRate { axis });
        }
        if self.center_sensitivity > self.max_rate {
            return Err(RateProfileError::CenterAboveMax {
                axis,
                center: self.center_sensitivity,
                max: self.max_rate,
            });
        }
        Ok(())
    }
}

/// Throttle response curve: centered expo around the hover point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrottleCurve {
    /// Hover point the expo is centered on [0, 1]
    pub mid_point: f64,
    /// Curvature [0, 1]
    pub expo: f64,
    /// Hard output ceiling (0, 1]
    pub limit: f64,
}

impl ThrottleCurve {
    /// Shape a raw throttle value and clamp to [0, limit]
    pub fn apply(&self, stick: f64) -> f64 {
        let centered = stick - self.mid_point;
        let shaped = self.mid_point
            + centered * (1.0 - self.expo)
            + centered.signum() * centered.abs().powi(3) * self.expo;

        shaped.clamp(0.0, self.limit)
    }

    fn validate(&self) -> Result<(), RateProfileError> {
        if !(0.0..=1.0).contains(&self.expo) {
            return Err(RateProfileError::ExpoOutOfRange {
                axis: "throttle",
                value: self.expo,
            });
        }
        if !(0.0..=1.0).contains(&self.mid_point) {
            return Err(RateProfileError::MidPointOutOfRange(self.mid_point));
        }
        if !(self.limit > 0.0 && self.limit <= 1.0) {
            return Err(RateProfileError::LimitOutOfRange(self.limit));
        }
        Ok(())
    }
}

/// Complete stick response profile for one pilot feel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateProfile {
    pub roll: AxisRates,
    pub pitch: AxisRates,
    pub yaw: AxisRates,
    pub throttle: ThrottleCurve,
    /// Stick deadzone applied before the rate curve [0, 1)
    pub deadzone: f64,
}

impl Default for RateProfile {
    fn default() -> Self {
        Self {
            roll: AxisRates::new(200.0, 670.0, 0.54),
            pitch: AxisRates::new(200.0, 670.0, 0.54),
            yaw: AxisRates::new(180.0, 560.0, 0.48),
            throttle: ThrottleCurve {
                mid_point: 0.5,
                expo: 0.3,
                limit: 1.0,
            },
            deadzone: 0.03,
        }
    }
}

impl RateProfile {
    /// Smooth, low-rate profile for cinematic flying
    pub fn cinematic() -> Self {
        Self {
            roll: AxisRates::new(120.0, 360.0, 0.7),
            pitch: AxisRates::new(120.0, 360.0, 0.7),
            yaw: AxisRates::new(100.0, 280.0, 0.6),
            throttle: ThrottleCurve {
                mid_point: 0.5,
                expo: 0.5,
                limit: 0.85,
            },
            deadzone: 0.05,
        }
    }

    /// Balanced sport profile
    pub fn sport() -> Self {
        Self::default()
    }

    /// Aggressive racing profile: high end rates, snappy center
    pub fn race() -> Self {
        Self {
            roll: AxisRates::new(280.0, 860.0, 0.56),
            pitch: AxisRates::new(280.0, 860.0, 0.56),
            yaw: AxisRates::new(220.0, 650.0, 0.5),
            throttle: ThrottleCurve {
                mid_point: 0.4,
                expo: 0.2,
                limit: 1.0,
            },
            deadzone: 0.02,
        }
    }

    /// Validate every curve parameter; call once at profile-load time
    pub fn validate(&self) -> Result<(), RateProfileError> {
        self.roll.validate("roll")?;
        self.pitch.validate("pitch")?;
        self.yaw.validate("yaw")?;
        self.throttle.validate()?;
        if !(0.0..1.0).contains(&self.deadzone) {
            return Err(RateProfileError::DeadzoneOutOfRange(self.deadzone));
        }
        Ok(())
    }

    /// Per-axis target rotation rates [deg/s] for a pilot input sample
    ///
    /// Deadzone is applied before the curve. Components are (roll, pitch, yaw).
    pub fn target_rates(&self, input: &NormalizedInput) -> Vector3<f64> {
        Vector3::new(
            self.roll.rate(apply_deadzone(input.roll, self.deadzone)),
            self.pitch.rate(apply_deadzone(input.pitch, self.deadzone)),
            self.yaw.rate(apply_deadzone(input.yaw, self.deadzone)),
        )
    }

    /// Shaped throttle [0, limit] for a pilot input sample
    pub fn shaped_throttle(&self, input: &NormalizedInput) -> f64 {
        self.throttle.apply(input.throttle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_zero_stick() {
        let rates = AxisRates::new(200.0, 670.0, 0.54);
        assert_relative_eq!(rates.rate(0.0), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rate_full_deflection_hits_max() {
        let rates = AxisRates::new(200.0, 670.0, 0.54);
        assert_relative_eq!(rates.rate(1.0), 670.0, epsilon = 1e-10);
        assert_relative_eq!(rates.rate(-1.0), -670.0, epsilon = 1e-10);
    }

    #[test]
    fn test_rate_odd_symmetry() {
        let rates = AxisRates::new(150.0, 500.0, 0.8);
        for &s in &[0.1, 0.25, 0.5, 0.77, 1.0] {
            assert_relative_eq!(rates.rate(-s), -rates.rate(s), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_rate_monotonic() {
        let rates = AxisRates::new(100.0, 800.0, 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let r = rates.rate(i as f64 / 100.0);
            assert!(r >= prev, "rate must be non-decreasing over [0, 1]");
            prev = r;
        }
    }

    #[test]
    fn test_rate_zero_expo_is_linear_blend() {
        let rates = AxisRates::new(100.0, 400.0, 0.0);
        // expo = 0: rate = center·a + (max − center)·a = max·a
        assert_relative_eq!(rates.rate(0.5), 200.0, epsilon = 1e-10);
    }

    #[test]
    fn test_expo_softens_center() {
        let linear = AxisRates::new(100.0, 700.0, 0.0);
        let curved = AxisRates::new(100.0, 700.0, 0.9);

        // Near center the curved profile responds less
        assert!(curved.rate(0.3) < linear.rate(0.3));
        // Endpoints still agree
        assert_relative_eq!(curved.rate(1.0), linear.rate(1.0), epsilon = 1e-10);
    }

    #[test]
    fn test_throttle_curve_passes_mid_point() {
        let curve = ThrottleCurve {
            mid_point: 0.45,
            expo: 0.6,
            limit: 1.0,
        };
        assert_relative_eq!(curve.apply(0.45), 0.45, epsilon = 1e-10);
    }

    #[test]
    fn test_throttle_curve_clamps_to_limit() {
        let curve = ThrottleCurve {
            mid_point: 0.5,
            expo: 0.0,
            limit: 0.8,
        };
        assert_relative_eq!(curve.apply(1.0), 0.8, epsilon = 1e-10);
        assert_relative_eq!(curve.apply(0.0), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_profile_validation_rejects_bad_expo() {
        let mut profile = RateProfile::default();
        profile.pitch.expo = 1.4;

        assert!(matches!(
            profile.validate(),
            Err(RateProfileError::ExpoOutOfRange { axis: "pitch", .. })
        ));
    }

    #[test]
    fn test_profile_validation_rejects_center_above_max() {
        let mut profile = RateProfile::default();
        profile.roll = AxisRates::new(900.0, 600.0, 0.3);

        assert!(matches!(
            profile.validate(),
            Err(RateProfileError::CenterAboveMax { axis: "roll", .. })
        ));
    }

    #[test]
    fn test_profile_validation_rejects_full_deadzone() {
        let mut profile = RateProfile::default();
        profile.deadzone = 1.0;

        assert_eq!(
            profile.validate(),
            Err(RateProfileError::DeadzoneOutOfRange(1.0))
        );
    }

    #[test]
    fn test_named_presets_are_valid() {
        for profile in [
            RateProfile::default(),
            RateProfile::cinematic(),
            RateProfile::sport(),
            RateProfile::race(),
        ] {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn test_target_rates_applies_deadzone() {
        let profile = RateProfile::default();
        let input = NormalizedInput::new(0.5, 0.01, 0.0, 0.0);

        let rates = profile.target_rates(&input);

        assert_relative_eq!(rates.x, 0.0, epsilon = 1e-10);
    }
}
