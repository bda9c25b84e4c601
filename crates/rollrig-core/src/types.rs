use glam::{Vec3A, Mat3A, Quat};
use crate::Scalar;

pub type Vec3 = Vec3A;
pub type Mat3 = Mat3A;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }
#[inline] pub fn quat_identity() -> Quat { Quat::IDENTITY }

#[derive(Copy, Clone, Debug)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

impl Isometry {
    /// Local point -> world.
    #[inline] pub fn transform_point(&self, p_local: Vec3) -> Vec3 {
        self.pos + self.rot * p_local
    }
    /// World point -> local.
    #[inline] pub fn inverse_transform_point(&self, p_world: Vec3) -> Vec3 {
        self.rot.conjugate() * (p_world - self.pos)
    }
    /// World-space forward axis (−Z by convention, matching tracked poses).
    #[inline] pub fn forward(&self) -> Vec3 {
        self.rot * Vec3::new(0.0, 0.0, -1.0)
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Velocity { pub lin: Vec3, pub ang: Vec3 }

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn point_round_trip() {
        let xf = iso(vec3(1.0, 2.0, 3.0), Quat::from_rotation_y(0.7));
        let p = vec3(-0.3, 0.5, 2.0);
        let back = xf.inverse_transform_point(xf.transform_point(p));
        assert!((back - p).length() < 1e-5);
    }

    #[test] fn forward_is_neg_z_at_identity() {
        let xf = Isometry::default();
        assert!((xf.forward() - vec3(0.0, 0.0, -1.0)).length() < 1e-6);
    }
}
