//! Ground query boundary for wheel casts.
//!
//! The contact stage only ever asks "cast from this point along this down
//! axis, how far to the surface and what is its normal" — the trait keeps
//! the terrain representation out of the vehicle pipeline.

use axledyn_core::{Scalar, Vec3, vec3};

#[derive(Copy, Clone, Debug)]
pub struct GroundHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: Scalar,
}

pub trait Ground {
    /// Cast from `origin` along the (unit) `down` axis, up to `max_dist`.
    fn cast_down(&self, origin: Vec3, down: Vec3, max_dist: Scalar) -> Option<GroundHit>;
}

/// Infinite horizontal plane at a fixed height.
#[derive(Copy, Clone, Debug)]
pub struct FlatGround {
    pub height: Scalar,
}

impl FlatGround {
    pub fn new(height: Scalar) -> Self { Self { height } }
}

impl Ground for FlatGround {
    fn cast_down(&self, origin: Vec3, down: Vec3, max_dist: Scalar) -> Option<GroundHit> {
        // Ray-plane along an arbitrary down axis; reject rays parallel to
        // or pointing away from the plane.
        if down.y > -1.0e-4 {
            return None;
        }
        let t = (self.height - origin.y) / down.y;
        if t < 0.0 || t > max_dist {
            return None;
        }
        Some(GroundHit {
            point: origin + down * t,
            normal: Vec3::Y,
            distance: t,
        })
    }
}

/// Row-major regular-grid heightfield, bilinear height and gradient normal.
#[derive(Clone, Debug)]
pub struct HeightField {
    nx: usize,
    nz: usize,
    cell: Scalar,
    heights: Vec<Scalar>,
}

impl HeightField {
    pub fn new(nx: usize, nz: usize, cell: Scalar, heights: Vec<Scalar>) -> Self {
        assert_eq!(nx * nz, heights.len());
        assert!(nx >= 2 && nz >= 2);
        Self { nx, nz, cell, heights }
    }

    #[inline]
    fn grid(&self, ix: usize, iz: usize) -> Scalar {
        self.heights[iz * self.nx + ix]
    }

    pub fn height_at(&self, x: Scalar, z: Scalar) -> Scalar {
        let fx = (x / self.cell).clamp(0.0, (self.nx - 1) as Scalar - 1.0e-5);
        let fz = (z / self.cell).clamp(0.0, (self.nz - 1) as Scalar - 1.0e-5);
        let x0 = fx.floor() as usize;
        let z0 = fz.floor() as usize;
        let (tx, tz) = (fx - x0 as Scalar, fz - z0 as Scalar);

        let lo = self.grid(x0, z0) * (1.0 - tx) + self.grid(x0 + 1, z0) * tx;
        let hi = self.grid(x0, z0 + 1) * (1.0 - tx) + self.grid(x0 + 1, z0 + 1) * tx;
        lo * (1.0 - tz) + hi * tz
    }

    pub fn normal_at(&self, x: Scalar, z: Scalar) -> Vec3 {
        let h = self.cell;
        let dx = (self.height_at(x + h, z) - self.height_at((x - h).max(0.0), z)) / (2.0 * h);
        let dz = (self.height_at(x, z + h) - self.height_at(x, (z - h).max(0.0))) / (2.0 * h);
        let n = vec3(-dx, 1.0, -dz);
        let len = n.length();
        if len > 1.0e-6 { n / len } else { Vec3::Y }
    }
}

impl Ground for HeightField {
    fn cast_down(&self, origin: Vec3, down: Vec3, max_dist: Scalar) -> Option<GroundHit> {
        if down.y > -1.0e-4 {
            return None;
        }
        // Sample at the origin's XZ column; good enough for near-vertical
        // suspension casts on gentle terrain.
        let surface = self.height_at(origin.x, origin.z);
        let t = (surface - origin.y) / down.y;
        if t < 0.0 || t > max_dist {
            return None;
        }
        Some(GroundHit {
            point: origin + down * t,
            normal: self.normal_at(origin.x, origin.z),
            distance: t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_cast_hits_below() {
        let g = FlatGround::new(0.0);
        let hit = g.cast_down(vec3(3.0, 1.0, -2.0), vec3(0.0, -1.0, 0.0), 2.0).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-6);
        assert!((hit.point.y - 0.0).abs() < 1e-6);
        assert!((hit.normal.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn flat_cast_misses_beyond_range() {
        let g = FlatGround::new(0.0);
        assert!(g.cast_down(vec3(0.0, 5.0, 0.0), vec3(0.0, -1.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn heightfield_bilinear_interpolates() {
        // 2x2 grid ramping from 0 to 1 along x.
        let hf = HeightField::new(2, 2, 1.0, vec![0.0, 1.0, 0.0, 1.0]);
        assert!((hf.height_at(0.5, 0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn heightfield_slope_normal_leans_uphill() {
        let hf = HeightField::new(3, 3, 1.0, vec![
            0.0, 0.5, 1.0,
            0.0, 0.5, 1.0,
            0.0, 0.5, 1.0,
        ]);
        let n = hf.normal_at(1.0, 1.0);
        assert!(n.x < 0.0);
        assert!(n.y > 0.8);
    }
}
