//! Numerical integration
//!
//! The rigid-body engine uses semi-implicit (symplectic) Euler: velocity is
//! updated from acceleration first, then position from the already-updated
//! velocity. More stable than explicit Euler for oscillatory systems at the
//! small fixed substeps the session feeds in.

use nalgebra::Vector3;

/// Semi-implicit Euler for second-order systems
///
/// # Arguments
/// * `pos` - Current position
/// * `vel` - Current velocity
/// * `acc` - Acceleration (derivative of velocity)
/// * `dt` - Time step [s]
///
/// # Returns
/// (new_position, new_velocity)
pub fn semi_implicit_euler(
    pos: &Vector3<f64>,
    vel: &Vector3<f64>,
    acc: &Vector3<f64>,
    dt: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    let new_vel = vel + acc * dt;
    let new_pos = pos + new_vel * dt;
    (new_pos, new_vel)
}
