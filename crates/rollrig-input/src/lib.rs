use rollrig_core::HandId;
use serde::{Deserialize, Serialize};

/// Which raw controller signal drives the grab lifecycle. Exactly one is
/// active per configuration; edges on the other kinds are ignored.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GrabTrigger {
    Trigger,
    PadClick,
    PadTouch,
    Grip,
}

/// Raw press/release edge as sampled from the runtime.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ButtonEdge {
    pub hand: HandId,
    pub trigger: GrabTrigger,
    pub pressed: bool,
}

/// Interpreted grab-lifecycle signal.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GrabSignal {
    Begin(HandId),
    End(HandId),
}

/// Maps raw button edges onto grab begin/end for one configured trigger kind.
/// Tracks per-hand held state so repeated same-state edges collapse to nothing
/// and the downstream grab counter only ever sees alternating begin/end.
#[derive(Copy, Clone, Debug)]
pub struct GrabBinding {
    active: GrabTrigger,
    held: [bool; 2],
}

impl GrabBinding {
    pub fn new(active: GrabTrigger) -> Self {
        Self { active, held: [false; 2] }
    }

    #[inline] pub fn active(&self) -> GrabTrigger { self.active }
    #[inline] pub fn is_held(&self, hand: HandId) -> bool { self.held[hand.index()] }

    pub fn interpret(&mut self, edge: ButtonEdge) -> Option<GrabSignal> {
        if edge.trigger != self.active {
            return None;
        }
        let slot = &mut self.held[edge.hand.index()];
        if *slot == edge.pressed {
            return None; // repeat of the state we already saw
        }
        *slot = edge.pressed;
        Some(if edge.pressed {
            GrabSignal::Begin(edge.hand)
        } else {
            GrabSignal::End(edge.hand)
        })
    }
}

/* ---------------- tests ---------------- */
