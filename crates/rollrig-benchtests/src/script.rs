use rollrig_core::{HandId, Quat};
use rollrig_input::GrabTrigger;
use rollrig_world::{InputEvent, Inputs};

// Scripted session, all times in seconds at the configured tick rate:
//   0.5   grab the front wall with the right hand
//   0.5-3 stir: sweep the aim left/right so the wall point drags the ball
//   3.0   release, coast + brake
//   6.5   short regrab (fades the ball back in if it already hid)
//   7.0   release again, idle out
const GRAB_AT: f32 = 0.5;
const STIR_UNTIL: f32 = 3.0;
const REGRAB_AT: f32 = 6.5;
const REGRAB_UNTIL: f32 = 7.0;

const HAND_POS: [f32; 3] = [0.0, 2.5, 0.5];

#[inline]
fn at(tick: u32, hz: u32, sec: f32) -> bool {
    tick == (sec * hz as f32) as u32
}

fn hand_pose_event(yaw: f32) -> InputEvent {
    let rot = Quat::from_rotation_y(yaw);
    InputEvent::SetHandPose {
        hand: HandId::Right,
        pos: HAND_POS,
        rot: [rot.x, rot.y, rot.z, rot.w],
    }
}

fn button(pressed: bool) -> InputEvent {
    InputEvent::Button { hand: HandId::Right, trigger: GrabTrigger::Trigger, pressed }
}

/// Input batch for one tick of the scripted session. Pure function of the
/// tick index so every run (and every lockstep twin) sees the same stream.
pub fn inputs_for_tick(tick: u32, hz: u32) -> Inputs {
    let t = tick as f32 / hz as f32;
    let mut events = Vec::new();

    if (GRAB_AT..STIR_UNTIL).contains(&t) {
        let yaw = 1.1 * ((t - GRAB_AT) * 1.9).sin();
        events.push(hand_pose_event(yaw));
    }
    if at(tick, hz, GRAB_AT) {
        events.push(button(true));
    }
    if at(tick, hz, STIR_UNTIL) {
        events.push(button(false));
    }
    if at(tick, hz, REGRAB_AT) {
        events.push(button(true));
    }
    if at(tick, hz, REGRAB_UNTIL) {
        events.push(button(false));
    }

    Inputs { tick_index: tick, events }
}
