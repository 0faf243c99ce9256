//! Per-wheel tangent frame on the contact surface.

use axledyn_core::Vec3;
use axledyn_dynamics::ChassisBody;
use glam::Quat;

/// Orthonormal (forward, lateral) pair in the contact plane. `lateral`
/// points to the wheel's right so a positive lateral force pushes right.
pub struct ContactFrame {
    pub forward: Vec3,
    pub lateral: Vec3,
}

impl ContactFrame {
    /// Projects the (steered) chassis forward axis into the surface plane.
    /// Returns `None` for a degenerate normal or a near-vertical surface
    /// where the projection collapses.
    pub fn build(
        body: &(impl ChassisBody + ?Sized),
        normal: Vec3,
        steer_angle: f32,
    ) -> Option<Self> {
        if !normal.is_finite() || normal.length_squared() < 1.0e-8 {
            return None;
        }
        let n = normal.normalize();
        let fwd_raw = if steer_angle != 0.0 {
            Quat::from_axis_angle(body.up().into(), steer_angle) * body.forward()
        } else {
            body.forward()
        };
        let tangent = fwd_raw - n * fwd_raw.dot(n);
        if tangent.length_squared() < 1.0e-8 {
            return None;
        }
        let forward = tangent.normalize();
        let lateral = n.cross(forward);
        Some(Self { forward, lateral })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axledyn_core::{iso, quat_identity, vec3};
    use axledyn_dynamics::Chassis;

    fn body() -> Chassis {
        Chassis::new_box(
            iso(vec3(0.0, 0.5, 0.0), quat_identity()),
            1000.0,
            vec3(2.0, 0.5, 0.8),
        )
    }

    #[test]
    fn flat_ground_frame_matches_body_axes() {
        let b = body();
        let f = ContactFrame::build(&b, Vec3::Y, 0.0).unwrap();
        assert!((f.forward - Vec3::X).length() < 1e-6);
        // Right of +X forward under +Y up is -Z.
        assert!((f.lateral - vec3(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn positive_steer_swings_the_frame_right() {
        let b = body();
        let f = ContactFrame::build(&b, Vec3::Y, 0.4).unwrap();
        // Rotating +X about +Y by a positive angle heads toward -Z, the
        // wheel's right under the +Z-left convention.
        assert!(f.forward.z < 0.0);
        assert!(f.forward.x > 0.0);
        assert!((f.forward.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_normal_rejected() {
        let b = body();
        assert!(ContactFrame::build(&b, Vec3::ZERO, 0.0).is_none());
        assert!(ContactFrame::build(&b, vec3(f32::NAN, 1.0, 0.0), 0.0).is_none());
    }

    #[test]
    fn vertical_wall_normal_collapses_projection() {
        let b = body();
        // Normal along the travel axis: no tangent forward survives.
        assert!(ContactFrame::build(&b, Vec3::X, 0.0).is_none());
    }
}
