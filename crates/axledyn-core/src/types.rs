//! Math aliases and the small pose/velocity records shared by every stage.
//!
//! Chassis space is +X forward, +Y up, +Z left. All per-wheel math runs on
//! the wide `Vec3A`/`Mat3A` types so the four-wheel loops stay on the SIMD
//! path.

use crate::Scalar;
use glam::{Mat3A, Quat, Vec3A};

pub type Vec3 = Vec3A;
pub type Mat3 = Mat3A;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }
#[inline] pub fn quat_identity() -> Quat { Quat::IDENTITY }

/// Rigid pose of the chassis in world space.
#[derive(Copy, Clone, Debug)]
pub struct Isometry {
    pub pos: Vec3,
    pub rot: Quat,
}

impl Isometry {
    /// Chassis-local point into world space.
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.pos + self.rot * local
    }
}

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

/// Linear + angular velocity pair as reported by the host body.
#[derive(Copy, Clone, Debug, Default)]
pub struct Velocity {
    pub lin: Vec3,
    pub ang: Vec3,
}
