use rollrig_world::{Inputs, SimWorld, World};

/// Two identically-built worlds fed the same input stream, bit-compared by
/// state hash after every tick. Determinism regressions show up as a first
/// divergence tick instead of a vague drift.
pub struct Lockstep {
    pub a: World,
    pub b: World,
    eq_ticks: u32,
    first_divergence: Option<u64>,
}

impl Lockstep {
    pub fn new(a: World, b: World) -> Self {
        Self { a, b, eq_ticks: 0, first_divergence: None }
    }

    /// Apply the same inputs to both worlds, step and present both, then
    /// compare hashes. Returns whether the worlds still agree.
    pub fn step(&mut self, inputs: &Inputs, dt: f32) -> bool {
        self.a.apply_inputs(inputs);
        self.b.apply_inputs(inputs);
        self.a.step_dt(dt);
        self.b.step_dt(dt);
        self.a.present(dt);
        self.b.present(dt);

        let ok = self.a.step_hash() == self.b.step_hash();
        if ok {
            self.eq_ticks += 1;
        } else if self.first_divergence.is_none() {
            self.first_divergence = Some(self.a.tick_index());
        }
        ok
    }

    pub fn eq_ticks(&self) -> u32 { self.eq_ticks }
    pub fn first_divergence(&self) -> Option<u64> { self.first_divergence }
}
