use rollrig_core::{BodyId, HandId};
use rollrig_input::GrabTrigger;
use serde::{Deserialize, Serialize};

/// What the harness expects from any sim world (your World implements this).
pub trait SimWorld {
    fn step_dt(&mut self, dt: f32) -> StepReport;
    fn step_hash(&self) -> [u8; 32];
    fn apply_inputs(&mut self, inputs: &Inputs);
}

/// Minimal per-step report used for provenance and checks.
#[derive(Clone, Copy, Default)]
pub struct StepReport {
    pub dt: f32,
    pub hash: [u8; 32],
    pub events_applied: u32,
    pub grabs_active: u32,
    pub springs_solved: u32,
    pub braking: bool,
}

/// On-disk inputs (tagged). Extend as needed; tags stable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag="type")]
pub enum InputEvent {
    Button { hand: HandId, trigger: GrabTrigger, pressed: bool },
    SetHandPose { hand: HandId, pos: [f32; 3], rot: [f32; 4] },
    SetVelocity { body: BodyId, lin: [f32; 3], ang: [f32; 3] },
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Inputs {
    pub tick_index: u32,
    pub events: Vec<InputEvent>,
}
