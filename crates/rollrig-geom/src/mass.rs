use rollrig_core::types::{Mat3, Vec3};

#[derive(Copy, Clone, Debug)]
pub struct MassProps {
    pub mass: f32,
    pub inv_mass: f32,
    pub inertia: Mat3,
}

impl MassProps {
    pub fn infinite() -> Self {
        Self { mass: f32::INFINITY, inv_mass: 0.0, inertia: Mat3::IDENTITY }
    }

    /// Hollow sphere (a shell you stand inside): I = (2/3) m r².
    pub fn from_hollow_sphere(radius: f32, mass: f32) -> Self {
        let ii = (2.0 / 3.0) * mass * radius * radius;
        Self { mass, inv_mass: 1.0 / mass, inertia: Mat3::from_diagonal(Vec3::splat(ii).into()) }
    }

    pub fn from_box(half: Vec3, density: f32) -> Self {
        let dims = half * 2.0;
        let vol = dims.x * dims.y * dims.z;
        let m = density * vol;
        let x2 = dims.x * dims.x;
        let y2 = dims.y * dims.y;
        let z2 = dims.z * dims.z;
        let ix = (1.0 / 12.0) * m * (y2 + z2);
        let iy = (1.0 / 12.0) * m * (x2 + z2);
        let iz = (1.0 / 12.0) * m * (x2 + y2);
        Self { mass: m, inv_mass: 1.0 / m, inertia: Mat3::from_diagonal(Vec3::new(ix, iy, iz).into()) }
    }
}
