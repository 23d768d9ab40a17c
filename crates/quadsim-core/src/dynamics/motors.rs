//! Motor mixing and the thrust/torque model
//!
//! X layout, body frame x-right / y-up / z-back:
//!
//! ```text
//!   m2 (front-left, CW)    m1 (front-right, CCW)
//!              \            /
//!               \          /
//!                +--------+          front = -z
//!               /          \
//!              /            \
//!   m4 (back-left, CCW)    m3 (back-right, CW)
//! ```
//!
//! Sign table: m1 +pitch +roll +yaw, m2 +pitch -roll -yaw,
//! m3 -pitch +roll -yaw, m4 -pitch -roll +yaw. Positive roll stick speeds up
//! the right-side pair (m1, m3); positive pitch the front pair (m1, m2);
//! positive yaw the CCW pair (m1, m4).

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;

use super::config::PhysicsConfig;

/// Per-motor sign pattern (pitch, roll, yaw), motors m1..m4
const MIX_TABLE: [[f64; 3]; 4] = [
    [1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
];

/// The four motors of one vehicle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorSet {
    /// Current RPM, m1..m4
    pub rpm: [f64; 4],
}

impl MotorSet {
    /// All motors stopped
    pub fn stopped() -> Self {
        Self::default()
    }

    /// Target RPM per motor from throttle and stick differentials
    ///
    /// Base RPM interpolates min..max with throttle; roll/pitch/yaw
    /// deflections widen the spread between opposing motors by the
    /// configured mix rates. Each target clamps to [min_rpm, max_rpm].
    pub fn mix_targets(
        config: &PhysicsConfig,
        throttle: f64,
        roll: f64,
        pitch: f64,
        yaw: f64,
    ) -> [f64; 4] {
        let base = config.min_rpm + throttle.clamp(0.0, 1.0) * (config.max_rpm - config.min_rpm);

        let roll_d = roll * config.mix_rates.x;
        let pitch_d = pitch * config.mix_rates.y;
        let yaw_d = yaw * config.mix_rates.z;

        let mut targets = [0.0; 4];
        for (i, signs) in MIX_TABLE.iter().enumerate() {
            let differential = signs[0] * pitch_d + signs[1] * roll_d + signs[2] * yaw_d;
            targets[i] = (base + differential).clamp(config.min_rpm, config.max_rpm);
        }
        targets
    }

    /// Exponential spool toward target RPM
    ///
    /// rpm += (target - rpm) · min(1, response_rate · dt)
    pub fn approach(&mut self, targets: &[f64; 4], response_rate: f64, dt: f64) {
        let blend = (response_rate * dt).min(1.0);
        for (rpm, target) in self.rpm.iter_mut().zip(targets) {
            *rpm += (target - *rpm) * blend;
        }
    }

    /// Static thrust per motor [N]
    pub fn thrusts(&self, config: &PhysicsConfig) -> [f64; 4] {
        [
            config.motor_thrust(self.rpm[0]),
            config.motor_thrust(self.rpm[1]),
            config.motor_thrust(self.rpm[2]),
            config.motor_thrust(self.rpm[3]),
        ]
    }

    /// Total thrust along the body up-axis [N]
    pub fn total_thrust(&self, config: &PhysicsConfig) -> f64 {
        self.thrusts(config).iter().sum()
    }

    /// Body torque from differential thrust and reaction asymmetry [N·m]
    ///
    /// Pitch (x) from the front/back split, roll (z) from the right/left
    /// split, both across the arm projection; yaw (y) from the CW/CCW
    /// reaction-torque imbalance, scaled by the prop pitch.
    pub fn torque(&self, config: &PhysicsConfig) -> Vector3<f64> {
        let [t1, t2, t3, t4] = self.thrusts(config);
        let arm = config.arm_length * FRAC_1_SQRT_2;

        let pitch = arm * (t1 + t2 - t3 - t4);
        let roll = arm * (t1 + t3 - t2 - t4);

        // Reaction torque per motor is roughly thrust · pitch/(2π); CCW
        // motors (m1, m4) push the frame CW and vice versa
        let yaw_coefficient = config.prop_pitch / std::f64::consts::TAU;
        let yaw = yaw_coefficient * (t1 - t2 - t3 + t4);

        Vector3::new(pitch, yaw, roll)
    }
}
