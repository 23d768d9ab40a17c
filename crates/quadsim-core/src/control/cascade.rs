//! Cascaded attitude/rate flight controller
//!
//! Two nested loops per axis: an outer attitude PID converts angle error to
//! a rate setpoint, and an inner rate PID converts rate error to a motor-mix
//! command. Angle mode runs the full cascade for roll/pitch (self-leveling,
//! yaw stays rate-controlled); acro mode runs the rate loop only.
//!
//! The caller selects the mode per frame; there is no internal transition
//! guard, but PID state must be reset on mode change and on disarm.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::input::{NormalizedInput, RateProfile};

use super::pid::{PidConfig, PidController, PidGains};

/// Flight mode selected externally per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightMode {
    /// Self-leveling: stick maps to target attitude angle
    #[default]
    Angle,
    /// Rate-only: stick maps directly to target rotation rate
    Acro,
}

/// Normalized 3-axis command for the motor mixer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MixCommand {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

/// Cascade controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeConfig {
    /// Outer-loop gains (angle error [deg] -> rate setpoint [deg/s])
    pub attitude_gains: PidGains,
    /// Inner-loop gains (rate error [deg/s] -> mix command)
    pub rate_gains: PidGains,
    /// Full-stick target angle in angle mode [deg]
    pub max_angle: f64,
    /// Per-axis rate ceiling [deg/s]; also the attitude loops' output limit
    pub max_rates: Vector3<f64>,
    /// Attitude integral accumulator limit [deg·s]
    pub attitude_integral_limit: f64,
    /// Rate integral accumulator limit [deg]
    pub rate_integral_limit: f64,
    /// Derivative low-pass coefficient for both loops (0, 1]
    pub derivative_filter: f64,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            attitude_gains: PidGains::new(6.0, 0.4, 0.015),
            rate_gains: PidGains::new(0.0035, 0.002, 0.0002),
            max_angle: 55.0,
            max_rates: Vector3::new(670.0, 670.0, 560.0),
            attitude_integral_limit: 25.0,
            rate_integral_limit: 120.0,
            derivative_filter: 0.5,
        }
    }
}

/// Cascaded attitude/rate controller for one vehicle
///
/// Owns six PID controllers (roll/pitch/yaw × attitude/rate). Flat
/// composition, no shared state with the physics engine.
#[derive(Debug, Clone)]
pub struct CascadeFlightController {
    config: CascadeConfig,
    profile: RateProfile,
    attitude: [PidController; 3],
    rate: [PidController; 3],
}

impl CascadeFlightController {
    pub fn new(config: CascadeConfig, profile: RateProfile) -> Self {
        let attitude_pid = |limit: f64| {
            PidController::new(PidConfig {
                gains: config.attitude_gains,
                output_limit: limit,
                integral_limit: config.attitude_integral_limit,
                derivative_filter: config.derivative_filter,
            })
        };
        let rate_pid = || {
            PidController::new(PidConfig {
                gains: config.rate_gains,
                output_limit: 1.0,
                integral_limit: config.rate_integral_limit,
                derivative_filter: config.derivative_filter,
            })
        };

        Self {
            config,
            profile,
            attitude: [
                attitude_pid(config.max_rates.x),
                attitude_pid(config.max_rates.y),
                attitude_pid(config.max_rates.z),
            ],
            rate: [rate_pid(), rate_pid(), rate_pid()],
        }
    }

    /// Angle (self-leveling) mode step
    ///
    /// Roll/pitch sticks map to target angles; the attitude loop output
    /// becomes the rate loop setpoint. Yaw remains rate-controlled from the
    /// rate profile.
    ///
    /// # Arguments
    /// * `input` - Pilot input for this frame
    /// * `attitude_deg` - Measured (roll, pitch, yaw) angles [deg]
    /// * `rates_deg` - Measured body rates (roll, pitch, yaw) [deg/s]
    /// * `dt` - Time step [s]
    pub fn angle_mode_update(
        &mut self,
        input: &NormalizedInput,
        attitude_deg: Vector3<f64>,
        rates_deg: Vector3<f64>,
        dt: f64,
    ) -> MixCommand {
        let target_roll = input.roll * self.config.max_angle;
        let target_pitch = input.pitch * self.config.max_angle;

        let roll_rate_sp = self.attitude[0].update(target_roll, attitude_deg.x, dt);
        let pitch_rate_sp = self.attitude[1].update(target_pitch, attitude_deg.y, dt);
        let yaw_rate_sp = self
            .profile
            .yaw
            .rate(crate::input::apply_deadzone(input.yaw, self.profile.deadzone));

        self.rate_step(
            Vector3::new(roll_rate_sp, pitch_rate_sp, yaw_rate_sp),
            rates_deg,
            dt,
        )
    }

    /// Acro (rate-only) mode step
    ///
    /// Sticks map directly to rate setpoints via the rate profile; no outer
    /// attitude loop, no self-leveling.
    pub fn acro_mode_update(
        &mut self,
        input: &NormalizedInput,
        rates_deg: Vector3<f64>,
        dt: f64,
    ) -> MixCommand {
        let setpoints = self.profile.target_rates(input);
        self.rate_step(setpoints, rates_deg, dt)
    }

    fn rate_step(&mut self, setpoints: Vector3<f64>, measured: Vector3<f64>, dt: f64) -> MixCommand {
        MixCommand {
            roll: self.rate[0].update(setpoints.x, measured.x, dt),
            pitch: self.rate[1].update(setpoints.y, measured.y, dt),
            yaw: self.rate[2].update(setpoints.z, measured.z, dt),
        }
    }

    /// Reset all six PID controllers (disarm, mode transition)
    pub fn reset(&mut self) {
        for pid in self.attitude.iter_mut().chain(self.rate.iter_mut()) {
            pid.reset();
        }
    }

    /// Adjust the per-axis rate ceiling
    ///
    /// The outer loop's ceiling is the inner loop's domain, so the attitude
    /// PIDs' output limits must follow the new max rates.
    pub fn set_max_rates(&mut self, max_rates: Vector3<f64>) {
        self.config.max_rates = max_rates;
        self.attitude[0].config.output_limit = max_rates.x;
        self.attitude[1].config.output_limit = max_rates.y;
        self.attitude[2].config.output_limit = max_rates.z;
    }

    /// Adjust the full-stick target angle for angle mode [deg]
    pub fn set_max_angle(&mut self, max_angle: f64) {
        self.config.max_angle = max_angle;
    }

    /// Swap the active rate profile (does not reset PID state)
    pub fn set_rate_profile(&mut self, profile: RateProfile) {
        self.profile = profile;
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    pub fn profile(&self) -> &RateProfile {
        &self.profile
    }
}

impl Default for CascadeFlightController {
    fn default() -> Self {
        Self::new(CascadeConfig::default(), RateProfile::default())
    }
}
