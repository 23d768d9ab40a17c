//! Quaternion operations for attitude representation
//!
//! Implements the quaternion kinematics used by the rigid-body engine:
//! - Quaternion derivative: q̇ = 1/2 Λ(q)[0;ω]
//! - Small-angle delta integration with renormalization
//! - Degenerate-norm guard (identity fallback)

use nalgebra::{Matrix4, Quaternion, UnitQuaternion, Vector3, Vector4};

/// Compute the quaternion derivative given body-frame angular velocity
///
/// q̇ = 1/2 Λ(q)[0;ω]
///
/// # Arguments
/// * `q` - Current orientation as unit quaternion
/// * `omega` - Angular velocity in body frame [rad/s]
///
/// # Returns
/// Quaternion derivative as Vector4 (w, x, y, z)
pub fn quaternion_derivative(q: &UnitQuaternion<f64>, omega: &Vector3<f64>) -> Vector4<f64> {
    let w = q.w;
    let x = q.i;
    let y = q.j;
    let z = q.k;

    // [0, ωx, ωy, ωz]^T
    let omega_quat = Vector4::new(0.0, omega.x, omega.y, omega.z);

    // Quaternion multiplication matrix Λ(q)
    let lambda = Matrix4::new(
        w, -x, -y, -z,
        x,  w, -z,  y,
        y,  z,  w, -x,
        z, -y,  x,  w,
    );

    0.5 * lambda * omega_quat
}

/// Normalize a raw quaternion, falling back to identity on degenerate norm
///
/// Repeated extreme angular velocity can collapse the raw quaternion toward
/// zero; returning identity instead of dividing by zero keeps NaN out of all
/// subsequent steps.
pub fn normalize_or_identity(q: Quaternion<f64>) -> UnitQuaternion<f64> {
    let norm = q.norm();
    if norm < 1e-12 {
        UnitQuaternion::identity()
    } else {
        UnitQuaternion::new_unchecked(q / norm)
    }
}

/// Integrate orientation over one step from body-frame angular velocity
///
/// Builds the small-angle delta quaternion from ω·dt/2, right-multiplies the
/// current orientation, and renormalizes to counter numerical drift:
///
/// Δq = [1, ωx·dt/2, ωy·dt/2, ωz·dt/2], q_new = normalize(q ⊗ Δq)
///
/// # Arguments
/// * `q` - Current orientation
/// * `omega` - Angular velocity in body frame [rad/s]
/// * `dt` - Time step [s]
pub fn integrate_quaternion(
    q: &UnitQuaternion<f64>,
    omega: &Vector3<f64>,
    dt: f64,
) -> UnitQuaternion<f64> {
    let half_dt = 0.5 * dt;
    let delta = Quaternion::new(1.0, omega.x * half_dt, omega.y * half_dt, omega.z * half_dt);
    normalize_or_identity(q.quaternion() * delta)
}

/// Quaternion norm as stored (should stay within tolerance of 1.0)
pub fn quaternion_norm(q: &UnitQuaternion<f64>) -> f64 {
    (q.w.powi(2) + q.i.powi(2) + q.j.powi(2) + q.k.powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_quaternion_derivative_zero_angular_velocity() {
        let q = UnitQuaternion::identity();
        let omega = Vector3::zeros();

        let q_dot = quaternion_derivative(&q, &omega);

        assert_relative_eq!(q_dot.norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_quaternion_derivative_pure_rotation() {
        let q = UnitQuaternion::identity();
        let omega = Vector3::new(0.0, 0.0, 1.0); // Rotate around z-axis at 1 rad/s

        let q_dot = quaternion_derivative(&q, &omega);

        // For identity quaternion and z-rotation:
        // q̇ = 0.5 * [0, 0, 0, 1]^T
        assert_relative_eq!(q_dot[0], 0.0, epsilon = 1e-10);
        assert_relative_eq!(q_dot[1], 0.0, epsilon = 1e-10);
        assert_relative_eq!(q_dot[2], 0.0, epsilon = 1e-10);
        assert_relative_eq!(q_dot[3], 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_integration_preserves_unit_norm() {
        let q = UnitQuaternion::identity();
        let omega = Vector3::new(0.0, 0.0, PI); // 180 deg/s around z
        let dt = 0.01;

        let q_new = integrate_quaternion(&q, &omega, dt);

        assert_relative_eq!(quaternion_norm(&q_new), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_integration_matches_axis_angle_for_small_steps() {
        let q = UnitQuaternion::identity();
        let omega = Vector3::new(0.0, 1.0, 0.0);
        let dt = 1e-4;

        let q_new = integrate_quaternion(&q, &omega, dt);
        let exact = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), omega.y * dt);

        assert_relative_eq!(q_new.angle_to(&exact), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_long_integration_stays_normalized() {
        let mut q = UnitQuaternion::identity();
        let omega = Vector3::new(3.0, -2.0, 5.0);
        let dt = 0.004;

        for _ in 0..10_000 {
            q = integrate_quaternion(&q, &omega, dt);
        }

        assert_relative_eq!(quaternion_norm(&q), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_quaternion_falls_back_to_identity() {
        let q = normalize_or_identity(Quaternion::new(0.0, 0.0, 0.0, 0.0));

        assert_relative_eq!(q.angle_to(&UnitQuaternion::identity()), 0.0, epsilon = 1e-10);
        assert!(q.w.is_finite());
    }
}
