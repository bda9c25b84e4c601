use rollrig_core::types::Vec3;

#[derive(Copy, Clone, Debug, Default)]
pub struct Aabb { pub min: Vec3, pub max: Vec3 }

impl Aabb {
    #[inline] pub fn new(min: Vec3, max: Vec3) -> Self { Self { min, max } }
    #[inline] pub fn from_center_half_extents(c: Vec3, he: Vec3) -> Self {
        Self { min: c - he, max: c + he }
    }
    #[inline] pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
    /// |half extents|, r·√3 for a sphere of radius r. The rig follower
    /// hangs the play-area origin half this far below the ball center.
    #[inline] pub fn half_extents_magnitude(&self) -> f32 {
        self.half_extents().length()
    }
    #[inline] pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x || self.min.x > other.max.x ||
            self.max.y < other.min.y || self.min.y > other.max.y ||
            self.max.z < other.min.z || self.min.z > other.max.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollrig_core::vec3;

    #[test] fn sphere_half_extents_magnitude() {
        let r = 2.0_f32;
        let bb = Aabb::from_center_half_extents(vec3(5.0, 1.0, -3.0), Vec3::splat(r));
        assert!((bb.half_extents_magnitude() - r * 3.0_f32.sqrt()).abs() < 1e-5);
    }
}
