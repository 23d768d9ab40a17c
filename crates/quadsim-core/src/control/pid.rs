//! Single-axis PID controller
//!
//! Stateful controller with integral anti-windup and a first-order low-pass
//! on the derivative term. The integral accumulator (not the I term) is
//! clamped, so gain changes cannot reintroduce windup that the clamp already
//! removed.

use serde::{Deserialize, Serialize};

/// PID gains
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

/// PID configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    pub gains: PidGains,
    /// Output magnitude ceiling
    pub output_limit: f64,
    /// Integral accumulator magnitude ceiling (anti-windup)
    pub integral_limit: f64,
    /// Derivative low-pass coefficient (0, 1]: near 0 = heavy smoothing,
    /// 1 = raw finite difference
    pub derivative_filter: f64,
}

impl PidConfig {
    pub fn new(gains: PidGains, output_limit: f64, integral_limit: f64) -> Self {
        Self {
            gains,
            output_limit,
            integral_limit,
            derivative_filter: 0.5,
        }
    }
}

/// Single-axis PID controller
///
/// State belongs to exactly one control loop; sharing an instance across two
/// simultaneous loops corrupts both. Callers reset on disarm and on flight
/// mode transition.
#[derive(Debug, Clone)]
pub struct PidController {
    pub config: PidConfig,
    integral: f64,
    previous_error: f64,
    filtered_derivative: f64,
}

impl PidController {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            previous_error: 0.0,
            filtered_derivative: 0.0,
        }
    }

    /// Advance the controller one step
    ///
    /// Returns 0 without mutating state when `dt <= 0` (stalled or
    /// duplicate frame).
    pub fn update(&mut self, setpoint: f64, measured: f64, dt: f64) -> f64 {
        if dt <= 0.0 {
            return 0.0;
        }

        let error = setpoint - measured;
        let gains = self.config.gains;

        let p_term = gains.kp * error;

        // Clamp the accumulator itself, before Ki is applied
        self.integral += error * dt;
        self.integral = self
            .integral
            .clamp(-self.config.integral_limit, self.config.integral_limit);
        let i_term = gains.ki * self.integral;

        // Raw finite-difference derivative, then first-order low-pass
        let raw_derivative = (error - self.previous_error) / dt;
        self.filtered_derivative +=
            self.config.derivative_filter * (raw_derivative - self.filtered_derivative);
        let d_term = gains.kd * self.filtered_derivative;

        self.previous_error = error;

        (p_term + i_term + d_term).clamp(-self.config.output_limit, self.config.output_limit)
    }

    /// Zero all accumulator state
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
        self.filtered_derivative = 0.0;
    }

    /// Current integral accumulator (exposed for anti-windup tests)
    pub fn integral(&self) -> f64 {
        self.integral
    }
}
