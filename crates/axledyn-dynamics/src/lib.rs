//! Host rigid-body boundary.
//!
//! The simulation never integrates the chassis itself; it reads kinematic
//! state through `ChassisBody` and accumulates forces/torques back through
//! it. `Chassis` is a concrete free body for tests and the bench harness.

use axledyn_core::{Isometry, Mat3, Scalar, Vec3, Velocity, vec3};
use glam::{Mat3A, Quat};

/// What the vehicle pipeline needs from the host integrator. Stages must not
/// retain the reference beyond their tick call.
pub trait ChassisBody {
    fn mass(&self) -> Scalar;
    fn world_com(&self) -> Vec3;
    /// World-space inverse inertia tensor: R * I_local^-1 * R^T.
    fn inv_inertia_world(&self) -> Mat3;

    fn pose(&self) -> Isometry;
    fn linear_velocity(&self) -> Vec3;
    fn angular_velocity(&self) -> Vec3;

    fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.linear_velocity() + self.angular_velocity().cross(point - self.world_com())
    }

    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3);
    fn apply_torque(&mut self, torque: Vec3);

    // Chassis axes in world space. +X forward, +Y up, +Z left.
    fn forward(&self) -> Vec3 { self.pose().rot * vec3(1.0, 0.0, 0.0) }
    fn up(&self) -> Vec3 { self.pose().rot * vec3(0.0, 1.0, 0.0) }
    fn left(&self) -> Vec3 { self.pose().rot * vec3(0.0, 0.0, 1.0) }

    fn to_world(&self, local: Vec3) -> Vec3 {
        self.pose().transform_point(local)
    }
}

/// Free rigid body with force/torque accumulators and semi-implicit Euler
/// integration. Box inertia by default.
#[derive(Clone, Debug)]
pub struct Chassis {
    pub pose: Isometry,
    pub vel: Velocity,
    mass: Scalar,
    inv_mass: Scalar,
    inv_inertia_local: Mat3,
    com_local: Vec3,
    force_accum: Vec3,
    torque_accum: Vec3,
}

impl Chassis {
    pub fn new_box(pose: Isometry, mass: Scalar, half_extents: Vec3) -> Self {
        let inertia = Self::box_inertia(mass, half_extents);
        let inv = Mat3A::from_diagonal(
            glam::Vec3::new(1.0 / inertia.x, 1.0 / inertia.y, 1.0 / inertia.z),
        );
        Self {
            pose,
            vel: Velocity::default(),
            mass,
            inv_mass: 1.0 / mass,
            inv_inertia_local: inv,
            com_local: Vec3::ZERO,
            force_accum: Vec3::ZERO,
            torque_accum: Vec3::ZERO,
        }
    }

    /// Principal moments of a solid box with the given half extents.
    fn box_inertia(mass: Scalar, half: Vec3) -> Vec3 {
        let d = half * 2.0;
        let (x2, y2, z2) = (d.x * d.x, d.y * d.y, d.z * d.z);
        vec3(
            mass / 12.0 * (y2 + z2),
            mass / 12.0 * (x2 + z2),
            mass / 12.0 * (x2 + y2),
        )
    }

    pub fn set_com_local(&mut self, com: Vec3) {
        self.com_local = com;
    }

    pub fn set_velocity(&mut self, vel: Velocity) {
        self.vel = vel;
    }

    /// Advance one step from the accumulated forces, then clear accumulators.
    pub fn integrate(&mut self, dt: Scalar) {
        self.vel.lin += self.force_accum * (self.inv_mass * dt);
        self.vel.ang += self.inv_inertia_world() * (self.torque_accum * dt);

        self.pose.pos += self.vel.lin * dt;
        let w = self.vel.ang * dt;
        if w.length_squared() > 0.0 {
            let dq = Quat::from_xyzw(w.x * 0.5, w.y * 0.5, w.z * 0.5, 1.0).normalize();
            self.pose.rot = (dq * self.pose.rot).normalize();
        }

        self.force_accum = Vec3::ZERO;
        self.torque_accum = Vec3::ZERO;
    }
}

impl ChassisBody for Chassis {
    fn mass(&self) -> Scalar { self.mass }

    fn world_com(&self) -> Vec3 {
        self.pose.transform_point(self.com_local)
    }

    fn inv_inertia_world(&self) -> Mat3 {
        let r = Mat3A::from_quat(self.pose.rot);
        r * self.inv_inertia_local * r.transpose()
    }

    fn pose(&self) -> Isometry { self.pose }
    fn linear_velocity(&self) -> Vec3 { self.vel.lin }
    fn angular_velocity(&self) -> Vec3 { self.vel.ang }

    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.force_accum += force;
        self.torque_accum += (point - self.world_com()).cross(force);
    }

    fn apply_torque(&mut self, torque: Vec3) {
        self.torque_accum += torque;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axledyn_core::{iso, quat_identity};

    fn test_body() -> Chassis {
        Chassis::new_box(
            iso(vec3(0.0, 0.5, 0.0), quat_identity()),
            1200.0,
            vec3(2.0, 0.6, 0.9),
        )
    }

    #[test]
    fn force_through_com_is_pure_translation() {
        let mut b = test_body();
        let com = b.world_com();
        b.apply_force_at_point(vec3(1200.0, 0.0, 0.0), com);
        b.integrate(1.0);
        assert!((b.vel.lin.x - 1.0).abs() < 1e-5);
        assert!(b.vel.ang.length() < 1e-6);
    }

    #[test]
    fn offset_force_induces_spin() {
        let mut b = test_body();
        let p = b.world_com() + vec3(0.0, 0.0, 0.9);
        b.apply_force_at_point(vec3(500.0, 0.0, 0.0), p);
        b.integrate(1.0 / 60.0);
        assert!(b.vel.ang.y.abs() > 0.0);
    }

    #[test]
    fn velocity_at_point_includes_rotation() {
        let mut b = test_body();
        b.set_velocity(Velocity { lin: vec3(10.0, 0.0, 0.0), ang: vec3(0.0, 1.0, 0.0) });
        let v = b.velocity_at_point(b.world_com() + vec3(1.0, 0.0, 0.0));
        // omega x r = (0,1,0) x (1,0,0) = (0,0,-1)
        assert!((v.x - 10.0).abs() < 1e-6);
        assert!((v.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn inv_inertia_world_tracks_rotation() {
        let mut b = test_body();
        let before = b.inv_inertia_world();
        b.pose.rot = Quat::from_rotation_y(0.7);
        let after = b.inv_inertia_world();
        assert!((before.x_axis.x - after.x_axis.x).abs() > 1e-6);
    }
}
