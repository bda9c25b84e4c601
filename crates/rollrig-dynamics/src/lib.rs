use rollrig_core::types::{Isometry, Vec3, Velocity};
use rollrig_core::{Quat, Scalar};

/// Input descriptor when creating a body.
#[derive(Copy, Clone, Debug)]
pub struct BodyDesc {
    pub pose: Isometry,
    pub vel: Velocity,
    pub inv_mass: Scalar,
    pub dynamic: bool,
    /// Pose driven from outside (tracked hands). Never integrated, ignores impulses.
    pub kinematic: bool,
    pub gravity_on: bool,
}

impl BodyDesc {
    /// Free-moving body under gravity.
    pub fn dynamic_at(pose: Isometry, inv_mass: Scalar) -> Self {
        Self {
            pose,
            vel: Velocity::default(),
            inv_mass,
            dynamic: true,
            kinematic: false,
            gravity_on: true,
        }
    }

    /// Tracker-driven body: pose is written every tick, solver leaves it alone.
    pub fn kinematic_at(pose: Isometry) -> Self {
        Self {
            pose,
            vel: Velocity::default(),
            inv_mass: 0.0,
            dynamic: false,
            kinematic: true,
            gravity_on: false,
        }
    }

    /// Immovable scenery (floor).
    pub fn fixed_at(pose: Isometry) -> Self {
        Self {
            pose,
            vel: Velocity::default(),
            inv_mass: 0.0,
            dynamic: false,
            kinematic: false,
            gravity_on: false,
        }
    }
}

/// SoA body storage with deterministic ID = index semantics.
pub struct Bodies {
    pos: Vec<Vec3>,
    rot: Vec<Quat>,
    linvel: Vec<Vec3>,
    angvel: Vec<Vec3>,
    force: Vec<Vec3>,
    inv_mass: Vec<Scalar>,
    dynamic: Vec<bool>,
    kinematic: Vec<bool>,
    gravity_on: Vec<bool>,
}

impl Bodies {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            pos: Vec::with_capacity(cap),
            rot: Vec::with_capacity(cap),
            linvel: Vec::with_capacity(cap),
            angvel: Vec::with_capacity(cap),
            force: Vec::with_capacity(cap),
            inv_mass: Vec::with_capacity(cap),
            dynamic: Vec::with_capacity(cap),
            kinematic: Vec::with_capacity(cap),
            gravity_on: Vec::with_capacity(cap),
        }
    }

    pub fn add(&mut self, desc: BodyDesc) -> u32 {
        self.pos.push(desc.pose.pos);
        self.rot.push(desc.pose.rot);
        self.linvel.push(desc.vel.lin);
        self.angvel.push(desc.vel.ang);
        self.force.push(Vec3::ZERO);
        self.inv_mass.push(desc.inv_mass);
        self.dynamic.push(desc.dynamic);
        self.kinematic.push(desc.kinematic);
        self.gravity_on.push(desc.gravity_on);

        (self.pos.len() as u32) - 1
    }

    #[inline] pub fn len(&self) -> usize { self.pos.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.pos.is_empty() }

    /// Accumulate a force for this tick; cleared by `integrate_all`.
    #[inline]
    pub fn apply_force(&mut self, id: u32, f: Vec3) {
        let i = id as usize;
        if self.dynamic[i] && !self.kinematic[i] {
            self.force[i] += f;
        }
    }

    #[inline]
    pub fn apply_impulse(&mut self, id: u32, j: Vec3) {
        let i = id as usize;
        let im = self.inv_mass[i];
        if im != 0.0 && !self.kinematic[i] {
            self.linvel[i] += j * im;
        }
    }

    /// Exponential velocity damping: v *= (1 - strength*dt), floored so a large
    /// strength parks the body instead of reversing it.
    pub fn damp_linear(&mut self, id: u32, strength: Scalar, dt: Scalar) {
        let i = id as usize;
        if !self.dynamic[i] || self.kinematic[i] { return; }
        let factor = (1.0 - strength * dt).max(0.0);
        self.linvel[i] *= factor;
    }

    /// Semi-implicit Euler over every dynamic body. Kinematic and fixed bodies
    /// keep whatever pose was last written into them.
    pub fn integrate_all(&mut self, gravity: Vec3, dt: Scalar) {
        for i in 0..self.len() {
            if !self.dynamic[i] || self.kinematic[i] || self.inv_mass[i] == 0.0 {
                self.force[i] = Vec3::ZERO;
                continue;
            }
            if self.gravity_on[i] {
                self.linvel[i] += gravity * dt;
            }
            self.linvel[i] += self.force[i] * self.inv_mass[i] * dt;
            self.force[i] = Vec3::ZERO;
            self.pos[i] += self.linvel[i] * dt;

            let dtheta = self.angvel[i] * dt;
            if dtheta.length_squared() > 0.0 {
                // Small-angle quaternion: (v*0.5, 1) normalized.
                let dq = Quat::from_xyzw(dtheta.x * 0.5, dtheta.y * 0.5, dtheta.z * 0.5, 1.0)
                    .normalize();
                self.rot[i] = (dq * self.rot[i]).normalize();
            }
        }
    }

    // -------- Accessors used by world/solver/hash --------
    #[inline] pub fn pose(&self, id: u32) -> Isometry {
        let i = id as usize;
        Isometry { pos: self.pos[i], rot: self.rot[i] }
    }
    #[inline] pub fn set_pose(&mut self, id: u32, iso: Isometry) {
        let i = id as usize;
        self.pos[i] = iso.pos;
        self.rot[i] = iso.rot;
    }

    #[inline] pub fn vel(&self, id: u32) -> Velocity {
        let i = id as usize;
        Velocity { lin: self.linvel[i], ang: self.angvel[i] }
    }
    #[inline] pub fn set_vel(&mut self, id: u32, v: Velocity) {
        let i = id as usize;
        self.linvel[i] = v.lin;
        self.angvel[i] = v.ang;
    }

    #[inline] pub fn inv_mass_of(&self, id: u32) -> Scalar { self.inv_mass[id as usize] }
    #[inline] pub fn is_dynamic(&self, id: u32) -> bool { self.dynamic[id as usize] }
    #[inline] pub fn is_kinematic(&self, id: u32) -> bool { self.kinematic[id as usize] }
    #[inline] pub fn gravity_enabled(&self, id: u32) -> bool { self.gravity_on[id as usize] }

    pub fn set_gravity_enabled(&mut self, id: u32, on: bool) {
        self.gravity_on[id as usize] = on;
    }

    // Iterator for hashing in stable order
    pub fn indices(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        0..(self.len() as u32)
    }
}

impl Default for Bodies {
    fn default() -> Self { Self::with_capacity(0) }
}

/* ---------------- tests ---------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use rollrig_core::types::{iso, quat_identity, vec3};

    const DT: Scalar = 1.0 / 60.0;
    const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    #[test]
    fn dynamic_body_falls() {
        let mut b = Bodies::default();
        let id = b.add(BodyDesc::dynamic_at(iso(vec3(0.0, 2.0, 0.0), quat_identity()), 1.0));
        b.integrate_all(GRAVITY, DT);
        assert!(b.vel(id).lin.y < 0.0);
        assert!(b.pose(id).pos.y < 2.0);
    }

    #[test]
    fn kinematic_body_ignores_gravity_and_impulses() {
        let mut b = Bodies::default();
        let id = b.add(BodyDesc::kinematic_at(iso(vec3(0.0, 1.5, 0.0), quat_identity())));
        b.apply_impulse(id, vec3(10.0, 10.0, 10.0));
        b.apply_force(id, vec3(0.0, 100.0, 0.0));
        b.integrate_all(GRAVITY, DT);
        assert_eq!(b.vel(id).lin, Vec3::ZERO);
        assert_eq!(b.pose(id).pos, vec3(0.0, 1.5, 0.0));
    }

    #[test]
    fn gravity_flag_gates_freefall() {
        let mut b = Bodies::default();
        let mut desc = BodyDesc::dynamic_at(iso(vec3(0.0, 2.0, 0.0), quat_identity()), 1.0);
        desc.gravity_on = false;
        let id = b.add(desc);
        b.integrate_all(GRAVITY, DT);
        assert_eq!(b.vel(id).lin, Vec3::ZERO);
    }

    #[test]
    fn forces_are_cleared_each_tick() {
        let mut b = Bodies::default();
        let mut desc = BodyDesc::dynamic_at(iso(vec3(0.0, 0.0, 0.0), quat_identity()), 1.0);
        desc.gravity_on = false;
        let id = b.add(desc);
        b.apply_force(id, vec3(60.0, 0.0, 0.0));
        b.integrate_all(GRAVITY, DT);
        let v1 = b.vel(id).lin.x;
        b.integrate_all(GRAVITY, DT);
        let v2 = b.vel(id).lin.x;
        assert!((v1 - 1.0).abs() < 1.0e-6);
        assert!((v2 - v1).abs() < 1.0e-6); // no force carry-over
    }

    #[test]
    fn damping_decays_without_sign_flip() {
        let mut b = Bodies::default();
        let mut desc = BodyDesc::dynamic_at(iso(vec3(0.0, 0.0, 0.0), quat_identity()), 1.0);
        desc.gravity_on = false;
        desc.vel = Velocity { lin: vec3(3.0, 0.0, 0.0), ang: Vec3::ZERO };
        let id = b.add(desc);

        b.damp_linear(id, 4.0, DT);
        let v1 = b.vel(id).lin.x;
        assert!(v1 > 0.0 && v1 < 3.0);

        // Pathological strength must park the body, never reverse it.
        b.damp_linear(id, 1000.0, DT);
        assert_eq!(b.vel(id).lin.x, 0.0);
    }

    #[test]
    fn angular_velocity_turns_the_body() {
        let mut b = Bodies::default();
        let mut desc = BodyDesc::dynamic_at(iso(vec3(0.0, 0.0, 0.0), quat_identity()), 1.0);
        desc.gravity_on = false;
        desc.vel = Velocity { lin: Vec3::ZERO, ang: vec3(0.0, 1.0, 0.0) };
        let id = b.add(desc);
        let before = b.pose(id).rot;
        b.integrate_all(GRAVITY, DT);
        let after = b.pose(id).rot;
        assert!((before.dot(after).abs() - 1.0).abs() > 1.0e-9);
    }
}
