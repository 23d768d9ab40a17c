//! Rotation utilities and Euler-angle extraction
//!
//! World frame is Y-up; body axes are x-right, y-up, z-back. The Euler
//! decomposition is intrinsic YXZ (yaw about y, pitch about x, roll about z),
//! which keeps yaw unambiguous for a hovering vehicle.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Roll/pitch/yaw view of an orientation [rad]
///
/// Derived read-only convenience for consumers that need human-readable
/// angles; never fed back into the integration state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    /// Rotation about the body z-axis [rad]
    pub roll: f64,
    /// Rotation about the body x-axis [rad]
    pub pitch: f64,
    /// Rotation about the world y-axis [rad]
    pub yaw: f64,
}

/// Rotate a vector by quaternion
///
/// v' = R(q) * v
pub fn rotate_vector(q: &UnitQuaternion<f64>, v: &Vector3<f64>) -> Vector3<f64> {
    q.transform_vector(v)
}

/// Body up-axis in world frame (thrust direction for a quadcopter)
///
/// up_body = R(q) * [0, 1, 0]^T
pub fn body_up_axis(q: &UnitQuaternion<f64>) -> Vector3<f64> {
    rotate_vector(q, &Vector3::new(0.0, 1.0, 0.0))
}

/// Extract YXZ Euler angles from a quaternion
///
/// The pitch term saturates at ±90° via an asin domain clamp; near gimbal
/// lock the roll component folds into yaw and roll is reported as zero.
pub fn euler_from_quaternion(q: &UnitQuaternion<f64>) -> EulerAngles {
    let r = q.to_rotation_matrix();

    // For R = Ry(yaw)·Rx(pitch)·Rz(roll), r[(1,2)] = -sin(pitch)
    let sin_pitch = (-r[(1, 2)]).clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();

    if sin_pitch.abs() < 0.999_999 {
        EulerAngles {
            roll: r[(1, 0)].atan2(r[(1, 1)]),
            pitch,
            yaw: r[(0, 2)].atan2(r[(2, 2)]),
        }
    } else {
        // Gimbal lock: pitch pinned to ±90°, roll indistinguishable from yaw
        EulerAngles {
            roll: 0.0,
            pitch,
            yaw: (-r[(2, 0)]).atan2(r[(0, 0)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_body_up_axis_identity() {
        let q = UnitQuaternion::identity();
        let up = body_up_axis(&q);

        assert_relative_eq!(up, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-10);
    }

    #[test]
    fn test_body_up_axis_rolled() {
        // Roll 90° about z: body up becomes world -x
        let q = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let up = body_up_axis(&q);

        assert_relative_eq!(up, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-10);
    }

    #[test]
    fn test_euler_identity() {
        let e = euler_from_quaternion(&UnitQuaternion::identity());

        assert_relative_eq!(e.roll, 0.0, epsilon = 1e-10);
        assert_relative_eq!(e.pitch, 0.0, epsilon = 1e-10);
        assert_relative_eq!(e.yaw, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_euler_roundtrip_yxz() {
        let (yaw, pitch, roll) = (0.7, -0.4, 0.3);
        let q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll);

        let e = euler_from_quaternion(&q);

        assert_relative_eq!(e.yaw, yaw, epsilon = 1e-9);
        assert_relative_eq!(e.pitch, pitch, epsilon = 1e-9);
        assert_relative_eq!(e.roll, roll, epsilon = 1e-9);
    }

    #[test]
    fn test_euler_gimbal_lock_clamps_pitch() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2);
        let e = euler_from_quaternion(&q);

        assert_relative_eq!(e.pitch, FRAC_PI_2, epsilon = 1e-6);
        assert!(e.roll.is_finite());
        assert!(e.yaw.is_finite());
    }

    #[test]
    fn test_euler_yaw_wraps() {
        let q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), PI - 0.1);
        let e = euler_from_quaternion(&q);

        assert_relative_eq!(e.yaw, PI - 0.1, epsilon = 1e-9);
    }
}
