use crate::StepHasher;

/// Ordered stages of one fixed simulation step. `present()` work (rig
/// follow, fade sampling) is render-side and deliberately outside the
/// hashed schedule.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum StepStage {
    ApplyInputs = 1,
    Controllers = 2,
    SolveSprings = 3,
    Integrate = 4,
    GroundClamp = 5,
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}
