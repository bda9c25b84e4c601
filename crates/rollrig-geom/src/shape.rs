use rollrig_core::types::{Isometry, Vec3, Mat3};
use glam::Mat3A;
use crate::aabb::Aabb;

#[derive(Copy, Clone, Debug)]
pub enum Shape {
    Sphere { r: f32 },
    Box { hx: f32, hy: f32, hz: f32 },
}

impl Shape {
    /// Radius if this is a sphere; the locomotion setup path demands one
    /// on the ball and fails construction otherwise.
    #[inline] pub fn sphere_radius(&self) -> Option<f32> {
        match *self { Shape::Sphere { r } => Some(r), _ => None }
    }
}

#[inline]
pub fn aabb_of(shape: &Shape, xf: &Isometry) -> Aabb {
    match *shape {
        Shape::Sphere { r } => Aabb::from_center_half_extents(xf.pos, Vec3::splat(r)),
        Shape::Box { hx, hy, hz } => {
            let he = Vec3::new(hx, hy, hz);
            let rot = Mat3A::from_quat(xf.rot);
            let m = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
            let world_he = m * he;
            Aabb::from_center_half_extents(xf.pos, world_he)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollrig_core::{vec3, iso, quat_identity};

    #[test] fn sphere_aabb_is_cube_of_radius() {
        let bb = aabb_of(&Shape::Sphere { r: 1.5 }, &iso(vec3(2.0, 0.0, 0.0), quat_identity()));
        assert!((bb.min - vec3(0.5, -1.5, -1.5)).length() < 1e-6);
        assert!((bb.max - vec3(3.5, 1.5, 1.5)).length() < 1e-6);
    }
}
