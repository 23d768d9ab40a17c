//! Rigid-body physics engine
//!
//! Owns the authoritative simulation state and advances it one time slice
//! per `update` call: motor mixing, spool lag, thrust/torque, gravity, drag,
//! ground effect, semi-implicit Euler integration, quaternion attitude
//! update, and ground/boundary handling.
//!
//! Single-threaded and synchronous; consumers read state through
//! [`RigidBodyPhysics::snapshot`] copies, never the live struct.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::input::NormalizedInput;
use crate::math::{
    body_up_axis, euler_from_quaternion, integrate_quaternion, semi_implicit_euler, EulerAngles,
};

use super::config::PhysicsConfig;
use super::motors::MotorSet;

/// Vertical speed above which ground contact bounces instead of settling [m/s]
const BOUNCE_SPEED: f64 = 2.0;
/// Vertical restitution for a hard ground impact
const BOUNCE_RESTITUTION: f64 = 0.2;
/// Horizontal velocity retained through a hard impact
const BOUNCE_FRICTION: f64 = 0.5;
/// Horizontal velocity retained per step while resting on the ground
const ROLLING_FRICTION: f64 = 0.9;
/// Roll/pitch angular velocity retained per step on ground contact
const GROUND_ANGULAR_DAMPING: f64 = 0.5;
/// Total speed at/below ground level that counts as a crash [m/s]
const CRASH_IMPACT_SPEED: f64 = 5.0;
/// Ground-effect thrust bonus at zero height
const GROUND_EFFECT_GAIN: f64 = 0.3;

/// Complete dynamic state of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    /// Position [m] (world frame, y-up)
    pub position: Vector3<f64>,
    /// Velocity [m/s] (world frame)
    pub velocity: Vector3<f64>,
    /// Orientation (body to world)
    pub rotation: UnitQuaternion<f64>,
    /// Angular velocity [rad/s] (body frame)
    pub angular_velocity: Vector3<f64>,
    /// Motor state
    pub motors: MotorSet,
}

impl PhysicsState {
    /// At-rest state at the given spawn position
    pub fn at_rest(position: Vector3<f64>) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
            motors: MotorSet::stopped(),
        }
    }

    /// Total speed [m/s]
    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Rigid-body physics engine for one vehicle
#[derive(Debug, Clone)]
pub struct RigidBodyPhysics {
    config: PhysicsConfig,
    state: PhysicsState,
}

impl RigidBodyPhysics {
    /// Create an engine at rest on the ground plane
    pub fn new(config: PhysicsConfig) -> Self {
        let spawn = Vector3::new(0.0, config.ground_level + config.ground_offset, 0.0);
        Self {
            state: PhysicsState::at_rest(spawn),
            config,
        }
    }

    /// Advance the simulation by one time slice
    ///
    /// `wind` is an optional world-frame disturbance acceleration [m/s²],
    /// scaled by vehicle mass into a force. Non-positive `dt` is a no-op.
    pub fn update(&mut self, input: &NormalizedInput, dt: f64, wind: Option<Vector3<f64>>) {
        if dt <= 0.0 {
            return;
        }

        // 1-2. Motor RPM targets and spool lag
        let targets = MotorSet::mix_targets(
            &self.config,
            input.throttle,
            input.roll,
            input.pitch,
            input.yaw,
        );
        self.state
            .motors
            .approach(&targets, self.config.motor_response_rate, dt);

        // 3. Thrust, boosted near the ground
        let thrust = self.state.motors.total_thrust(&self.config) * self.ground_effect_multiplier();

        // 4. Body torque
        let torque = self.state.motors.torque(&self.config);

        // 5. World-frame forces
        let gravity = crate::gravity_world() * self.config.mass;
        let thrust_world = body_up_axis(&self.state.rotation) * thrust;
        let drag = -self.config.drag_coefficient * self.state.speed() * self.state.velocity;
        let wind_force = wind.map_or(Vector3::zeros(), |w| w * self.config.mass);

        // 6. Integration
        let acceleration = (gravity + thrust_world + drag + wind_force) / self.config.mass;
        let (position, velocity) = semi_implicit_euler(
            &self.state.position,
            &self.state.velocity,
            &acceleration,
            dt,
        );
        self.state.position = position;
        self.state.velocity = velocity;

        let angular_acceleration = torque.component_div(&self.config.inertia);
        self.state.angular_velocity += angular_acceleration * dt;
        // Fixed multiplicative decay per call, not per second
        self.state.angular_velocity *= self.config.angular_drag;

        // 7-8. Contact and world bounds, then attitude update
        self.handle_ground_contact();
        self.clamp_boundaries();

        self.state.rotation =
            integrate_quaternion(&self.state.rotation, &self.state.angular_velocity, dt);
    }

    /// Ground-effect thrust multiplier: up to +30% below two rotor
    /// diameters, decaying linearly to 1.0
    fn ground_effect_multiplier(&self) -> f64 {
        let height = self.state.position.y - self.config.ground_level;
        let span = 2.0 * self.config.prop_diameter;
        if height >= span {
            return 1.0;
        }
        1.0 + GROUND_EFFECT_GAIN * (1.0 - height / span).clamp(0.0, 1.0)
    }

    fn handle_ground_contact(&mut self) {
        let floor = self.config.ground_level + self.config.ground_offset;
        if self.state.position.y >= floor {
            return;
        }

        self.state.position.y = floor;

        if self.state.velocity.y < -BOUNCE_SPEED {
            // Hard impact: inelastic bounce and scrub
            self.state.velocity.y = -self.state.velocity.y * BOUNCE_RESTITUTION;
            self.state.velocity.x *= BOUNCE_FRICTION;
            self.state.velocity.z *= BOUNCE_FRICTION;
        } else {
            // Settle: kill vertical motion, roll out horizontally
            self.state.velocity.y = 0.0;
            self.state.velocity.x *= ROLLING_FRICTION;
            self.state.velocity.z *= ROLLING_FRICTION;
        }

        // Damp roll/pitch rotation on contact to prevent tip-over jitter
        self.state.angular_velocity.x *= GROUND_ANGULAR_DAMPING;
        self.state.angular_velocity.z *= GROUND_ANGULAR_DAMPING;
    }

    fn clamp_boundaries(&mut self) {
        if self.state.position.y > self.config.max_altitude {
            self.state.position.y = self.config.max_altitude;
            self.state.velocity.y = self.state.velocity.y.min(0.0);
        }

        let limit = self.config.max_distance;
        if self.state.position.x > limit {
            self.state.position.x = limit;
            self.state.velocity.x = self.state.velocity.x.min(0.0);
        } else if self.state.position.x < -limit {
            self.state.position.x = -limit;
            self.state.velocity.x = self.state.velocity.x.max(0.0);
        }
        if self.state.position.z > limit {
            self.state.position.z = limit;
            self.state.velocity.z = self.state.velocity.z.min(0.0);
        } else if self.state.position.z < -limit {
            self.state.position.z = -limit;
            self.state.velocity.z = self.state.velocity.z.max(0.0);
        }
    }

    /// Reset to rest: zero velocity and RPM, identity rotation
    ///
    /// `position` overrides the spawn point; `None` respawns on the ground
    /// plane at the origin.
    pub fn reset(&mut self, position: Option<Vector3<f64>>) {
        let spawn = position.unwrap_or_else(|| {
            Vector3::new(0.0, self.config.ground_level + self.config.ground_offset, 0.0)
        });
        self.state = PhysicsState::at_rest(spawn);
    }

    /// Replace the full dynamic state (replay, checkpoint restore)
    pub fn restore(&mut self, state: PhysicsState) {
        self.state = state;
    }

    /// Swap the vehicle preset wholesale; dynamic state is untouched
    pub fn set_config(&mut self, config: PhysicsConfig) {
        self.config = config;
    }

    /// Copy of the current state for external consumers
    pub fn snapshot(&self) -> PhysicsState {
        self.state.clone()
    }

    /// Derived roll/pitch/yaw view of the orientation [rad]
    pub fn euler_angles(&self) -> EulerAngles {
        euler_from_quaternion(&self.state.rotation)
    }

    /// Crash query: at/below rest height and moving faster than the impact
    /// threshold
    ///
    /// Derived from the live position/velocity, never latched, so it stays
    /// consistent with whatever the state currently holds. Collaborators
    /// poll once per step.
    pub fn is_crashed(&self) -> bool {
        let floor = self.config.ground_level + self.config.ground_offset;
        self.state.position.y <= floor + 1e-9 && self.state.speed() > CRASH_IMPACT_SPEED
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }
}
