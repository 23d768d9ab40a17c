//! Flight session runner
//!
//! Owns one rigid-body engine, one cascade controller, and the active rate
//! profile, and advances them together with fixed substepping. Hosts call
//! [`FlightSession::advance`] once per rendered frame; the session splits
//! the frame into small equal slices so the explicit-Euler integration stays
//! stable even when the host frame rate hiccups.

use log::{debug, warn};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::control::{CascadeConfig, CascadeFlightController, FlightMode};
use crate::dynamics::{PhysicsState, RigidBodyPhysics};
use crate::input::{apply_deadzone, NormalizedInput, RateProfile};
use crate::math::EulerAngles;

use super::config::{SimConfig, SimConfigError};

const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

/// Recorded traces of one flight, one sample per advanced frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightHistory {
    /// Sample times [s]
    pub times: Vec<f64>,
    /// Positions [m]
    pub positions: Vec<Vector3<f64>>,
    /// Velocities [m/s]
    pub velocities: Vec<Vector3<f64>>,
    /// Motor RPM
    pub motor_rpm: Vec<[f64; 4]>,
}

impl FlightHistory {
    /// Record one sample
    pub fn record(&mut self, time: f64, state: &PhysicsState) {
        self.times.push(time);
        self.positions.push(state.position);
        self.velocities.push(state.velocity);
        self.motor_rpm.push(state.motors.rpm);
    }

    /// Recorded duration [s]
    pub fn duration(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn clear(&mut self) {
        self.times.clear();
        self.positions.clear();
        self.velocities.clear();
        self.motor_rpm.clear();
    }
}

/// One interactive flight session
///
/// The session is the single logical owner of its physics state and PID
/// state. Hosts running rendering on another thread must hand off
/// [`FlightSession::snapshot`] copies rather than sharing the session.
pub struct FlightSession {
    config: SimConfig,
    physics: RigidBodyPhysics,
    controller: CascadeFlightController,
    mode: FlightMode,
    armed: bool,
    time: f64,
    was_crashed: bool,
    history: FlightHistory,
}

impl FlightSession {
    /// Build a session, validating the full configuration first
    pub fn new(config: SimConfig) -> Result<Self, SimConfigError> {
        config.validate()?;

        let mut physics = RigidBodyPhysics::new(config.physics.clone());
        physics.reset(Some(config.initial_position));
        let controller = CascadeFlightController::new(CascadeConfig::default(), config.rates);

        Ok(Self {
            config,
            physics,
            controller,
            mode: FlightMode::default(),
            armed: false,
            time: 0.0,
            was_crashed: false,
            history: FlightHistory::default(),
        })
    }

    /// Advance one rendered frame
    pub fn advance(&mut self, input: &NormalizedInput, frame_dt: f64) {
        self.advance_with_wind(input, frame_dt, None);
    }

    /// Advance one rendered frame with a wind disturbance [m/s²]
    pub fn advance_with_wind(
        &mut self,
        input: &NormalizedInput,
        frame_dt: f64,
        wind: Option<Vector3<f64>>,
    ) {
        if !self.armed || frame_dt <= 0.0 {
            return;
        }

        let mut frame_dt = frame_dt;
        if frame_dt > self.config.max_frame_dt {
            warn!(
                "frame dt {:.3}s exceeds {:.3}s cap, clamping",
                frame_dt, self.config.max_frame_dt
            );
            frame_dt = self.config.max_frame_dt;
        }

        let sub_dt = frame_dt / self.config.substeps as f64;
        for _ in 0..self.config.substeps {
            let step_input = self.controller_step(input, sub_dt);
            self.physics.update(&step_input, sub_dt, wind);
            self.time += sub_dt;
        }

        self.history.record(self.time, &self.physics.snapshot());

        let crashed = self.physics.is_crashed();
        if crashed && !self.was_crashed {
            warn!(
                "crash at t={:.2}s, speed {:.1} m/s",
                self.time,
                self.physics.snapshot().speed()
            );
        }
        self.was_crashed = crashed;
    }

    /// Run the controller for one substep and fold its output into the
    /// stick channels the motor mixer consumes
    fn controller_step(&mut self, input: &NormalizedInput, dt: f64) -> NormalizedInput {
        let throttle = self.controller.profile().shaped_throttle(input);

        match self.mode {
            FlightMode::Angle => {
                let euler = self.physics.euler_angles();
                let omega = self.physics.snapshot().angular_velocity;

                let attitude_deg =
                    Vector3::new(euler.roll, euler.pitch, euler.yaw) * RAD_TO_DEG;
                // Body rates reordered to (roll, pitch, yaw) axes
                let rates_deg = Vector3::new(omega.z, omega.x, omega.y) * RAD_TO_DEG;

                let mix = self
                    .controller
                    .angle_mode_update(input, attitude_deg, rates_deg, dt);

                NormalizedInput {
                    throttle,
                    roll: mix.roll,
                    pitch: mix.pitch,
                    yaw: mix.yaw,
                    ..*input
                }
            }
            // Acro folds the rate scaling directly into the RPM
            // differentials; only deadzone and throttle shaping apply here
            FlightMode::Acro => {
                let deadzone = self.controller.profile().deadzone;
                NormalizedInput {
                    throttle,
                    roll: apply_deadzone(input.roll, deadzone),
                    pitch: apply_deadzone(input.pitch, deadzone),
                    yaw: apply_deadzone(input.yaw, deadzone),
                    ..*input
                }
            }
        }
    }

    /// Arm for flight: respawn at the configured position with fresh
    /// controller state and an empty history
    pub fn arm(&mut self) {
        if self.armed {
            return;
        }
        debug!("arming at {:?}", self.config.initial_position);
        self.physics.reset(Some(self.config.initial_position));
        self.controller.reset();
        self.history.clear();
        self.time = 0.0;
        self.was_crashed = false;
        self.armed = true;
    }

    /// Disarm: stop stepping and drop accumulated controller state
    pub fn disarm(&mut self) {
        if !self.armed {
            return;
        }
        debug!("disarming at t={:.2}s", self.time);
        self.controller.reset();
        self.armed = false;
    }

    /// Select the flight mode; resets PID state on an actual change
    pub fn set_flight_mode(&mut self, mode: FlightMode) {
        if mode != self.mode {
            debug!("flight mode {:?} -> {:?}", self.mode, mode);
            self.controller.reset();
            self.mode = mode;
        }
    }

    /// Swap the stick response profile (controller state is kept)
    pub fn set_rate_profile(&mut self, profile: RateProfile) {
        self.config.rates = profile;
        self.controller.set_rate_profile(profile);
    }

    /// Replace the dynamic state (ghost replay, checkpoint restore)
    pub fn restore_state(&mut self, state: PhysicsState) {
        self.physics.restore(state);
    }

    pub fn snapshot(&self) -> PhysicsState {
        self.physics.snapshot()
    }

    pub fn euler_angles(&self) -> EulerAngles {
        self.physics.euler_angles()
    }

    pub fn is_crashed(&self) -> bool {
        self.physics.is_crashed()
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn flight_mode(&self) -> FlightMode {
        self.mode
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn history(&self) -> &FlightHistory {
        &self.history
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn armed_session() -> FlightSession {
        let mut session = FlightSession::new(SimConfig::default()).unwrap();
        session.arm();
        session
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.physics.mass = 0.0;

        assert!(FlightSession::new(config).is_err());
    }

    #[test]
    fn test_disarmed_session_does_not_step() {
        let mut session = FlightSession::new(SimConfig::default()).unwrap();
        let before = session.snapshot();

        session.advance(&NormalizedInput::new(1.0, 0.0, 0.0, 0.0), 0.016);

        assert_eq!(session.snapshot(), before);
        assert_relative_eq!(session.time(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_advance_splits_frame_into_substeps() {
        let mut session = armed_session();

        session.advance(&NormalizedInput::idle(), 0.016);

        assert_relative_eq!(session.time(), 0.016, epsilon = 1e-12);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_oversized_frame_dt_is_clamped() {
        let mut session = armed_session();

        // Tab-switch spike: a full second arrives as one frame
        session.advance(&NormalizedInput::idle(), 1.0);

        assert_relative_eq!(session.time(), session.config().max_frame_dt, epsilon = 1e-12);
    }

    #[test]
    fn test_angle_mode_self_levels_from_tilt() {
        let mut session = armed_session();
        session.set_flight_mode(FlightMode::Angle);

        let mut state = PhysicsState::at_rest(Vector3::new(0.0, 20.0, 0.0));
        state.rotation = nalgebra::UnitQuaternion::from_axis_angle(
            &Vector3::z_axis(),
            0.5, // ~29° roll
        );
        session.restore_state(state);

        let hover = session.config().physics.hover_throttle();
        let input = NormalizedInput::new(hover, 0.0, 0.0, 0.0);
        for _ in 0..240 {
            session.advance(&input, 0.016);
        }

        let roll = session.euler_angles().roll;
        assert!(
            roll.abs() < 0.1,
            "angle mode should level out, roll still {roll:.3} rad"
        );
    }

    #[test]
    fn test_acro_mode_holds_tilt() {
        let mut session = armed_session();
        session.set_flight_mode(FlightMode::Acro);

        let tilt = 0.4;
        let mut state = PhysicsState::at_rest(Vector3::new(0.0, 20.0, 0.0));
        state.rotation =
            nalgebra::UnitQuaternion::from_axis_angle(&Vector3::z_axis(), tilt);
        session.restore_state(state);

        let hover = session.config().physics.hover_throttle();
        let input = NormalizedInput::new(hover, 0.0, 0.0, 0.0);
        for _ in 0..60 {
            session.advance(&input, 0.016);
        }

        // No self-leveling: the roll angle stays near where it was left
        assert_relative_eq!(session.euler_angles().roll, tilt, epsilon = 0.05);
    }

    #[test]
    fn test_mode_change_resets_controller() {
        let mut session = armed_session();
        session.set_flight_mode(FlightMode::Angle);

        // Accumulate controller state against a persistent tilt
        let mut state = PhysicsState::at_rest(Vector3::new(0.0, 20.0, 0.0));
        state.rotation =
            nalgebra::UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.5);
        session.restore_state(state);
        let input = NormalizedInput::new(0.5, 0.0, 0.0, 0.0);
        for _ in 0..30 {
            session.advance(&input, 0.016);
        }

        session.set_flight_mode(FlightMode::Acro);
        // Indirect check: switching back and forth is allowed and the
        // session keeps stepping without stale windup exploding the output
        session.set_flight_mode(FlightMode::Angle);
        session.advance(&input, 0.016);

        assert!(session.snapshot().position.y.is_finite());
    }

    #[test]
    fn test_rearm_respawns_and_clears_history() {
        let mut session = armed_session();
        let input = NormalizedInput::new(0.9, 0.3, 0.0, 0.0);
        for _ in 0..120 {
            session.advance(&input, 0.016);
        }
        assert!(session.history().len() > 0);

        session.disarm();
        session.arm();

        assert_relative_eq!(session.time(), 0.0, epsilon = 1e-12);
        assert!(session.history().is_empty());
        assert_eq!(
            session.snapshot().position,
            session.config().initial_position
        );
    }

    #[test]
    fn test_history_duration_tracks_time() {
        let mut session = armed_session();
        for _ in 0..10 {
            session.advance(&NormalizedInput::idle(), 0.016);
        }

        let history = session.history();
        assert_eq!(history.len(), 10);
        assert_relative_eq!(history.duration(), 9.0 * 0.016, epsilon = 1e-9);
    }
}
