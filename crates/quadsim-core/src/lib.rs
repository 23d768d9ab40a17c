//! # Quadsim Core
//!
//! Quadcopter flight-dynamics core for an interactive simulator.
//!
//! Converts normalized pilot-stick input into rigid-body motion and
//! per-motor RPM through three coupled stages:
//!
//! - [`input`]: stick normalization and the "Actual Rates" stick-to-rate curve
//! - [`control`]: single-axis PID and the cascaded attitude/rate controller
//! - [`dynamics`]: motor mixing, thrust/torque model, rigid-body integration
//! - [`simulation`]: session orchestration with fixed substepping
//! - [`math`]: quaternion and integration utilities shared by the above
//!
//! The core is single-threaded and synchronous: one `update` call fully
//! advances state with no I/O and no callbacks. Hosts that render on a
//! separate thread must hand off copies via [`dynamics::RigidBodyPhysics::snapshot`].

pub mod math;
pub mod input;
pub mod control;
pub mod dynamics;
pub mod simulation;

// Common type aliases
use nalgebra::{UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// Unit quaternion type for rotations
pub type Quat = UnitQuaternion<f64>;

/// Gravity constant [m/s²]
pub const GRAVITY: f64 = 9.81;

/// World frame is Y-up: gravity points along -y.
pub fn gravity_world() -> Vec3 {
    Vec3::new(0.0, -GRAVITY, 0.0)
}
