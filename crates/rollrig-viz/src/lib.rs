use rollrig_core::{schedule_digest, CtrlId, HandId, SpringId, StepStage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct ScheduleRecorder { stages: Vec<StepStage> }

impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

/// Knobs for periodic console dumps and JSONL telemetry. Zero disables.
#[derive(Copy, Clone, Debug)]
pub struct DebugSettings {
    pub print_every: u32,
    pub json_every: u32,
    pub show_bodies: bool,
    pub show_springs: bool,
    pub show_ctrl: bool,
    pub max_lines: usize,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            print_every: 0,
            json_every: 0,
            show_bodies: true,
            show_springs: true,
            show_ctrl: true,
            max_lines: 8,
        }
    }
}

/// One locomotion happening, recorded at the point the world decides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag="type")]
pub enum LedgerEvent {
    GrabBegin { ctrl: CtrlId, hand: HandId, grabs: u32, anchor_ws: [f32; 3] },
    GrabEnd { ctrl: CtrlId, hand: HandId, grabs: u32 },
    SpringRetarget { ctrl: CtrlId, spring: SpringId, dist: f32, strength: f32 },
    Brake { ctrl: CtrlId, strength: f32, speed: f32 },
    FadeStart { ctrl: CtrlId, to_visible: bool },
    RigFollow { ctrl: CtrlId, rig_pos: [f32; 3] },
}

/// Bounded per-tick event log. The world clears it at the top of each step and
/// flushes it to `out/tick_NNNNNN.jsonl` when telemetry is enabled.
pub struct Ledger {
    cap: usize,
    events: Vec<LedgerEvent>,
}

impl Ledger {
    pub fn new(cap: usize) -> Self {
        Self { cap, events: Vec::with_capacity(cap.min(1024)) }
    }

    /// Record one event; silently drops past the cap so a pathological tick
    /// cannot grow the log without bound.
    pub fn push(&mut self, ev: LedgerEvent) {
        if self.events.len() < self.cap {
            self.events.push(ev);
        }
    }

    pub fn clear(&mut self) { self.events.clear(); }
    #[inline] pub fn len(&self) -> usize { self.events.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.events.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> {
        self.events.iter()
    }

    /// One JSON object per line, one file per tick.
    pub fn write_jsonl(&self, dir: impl AsRef<Path>, tick: u64) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("tick_{:06}.jsonl", tick));
        let mut f = fs::File::create(&path)?;
        for ev in &self.events {
            let line = serde_json::to_string(ev)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            writeln!(f, "{line}")?;
        }
        Ok(path)
    }
}

/* ---------------- tests ---------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_is_bounded() {
        let mut l = Ledger::new(2);
        for i in 0..5 {
            l.push(LedgerEvent::Brake { ctrl: CtrlId(0), strength: i as f32, speed: 0.0 });
        }
        assert_eq!(l.len(), 2);
        l.clear();
        assert!(l.is_empty());
    }

    #[test]
    fn events_serialize_tagged() {
        let ev = LedgerEvent::GrabBegin {
            ctrl: CtrlId(1),
            hand: HandId::Right,
            grabs: 2,
            anchor_ws: [0.5, 1.0, -0.25],
        };
        let s = serde_json::to_string(&ev).unwrap();
        assert!(s.contains("\"type\":\"GrabBegin\""));
        assert!(s.contains("\"hand\":\"Right\""));
        let back: LedgerEvent = serde_json::from_str(&s).unwrap();
        match back {
            LedgerEvent::GrabBegin { ctrl, grabs, .. } => {
                assert_eq!(ctrl, CtrlId(1));
                assert_eq!(grabs, 2);
            }
            other => panic!("wrong tag: {other:?}"),
        }
    }

    #[test]
    fn jsonl_has_one_line_per_event() {
        let mut l = Ledger::new(16);
        l.push(LedgerEvent::FadeStart { ctrl: CtrlId(0), to_visible: false });
        l.push(LedgerEvent::RigFollow { ctrl: CtrlId(0), rig_pos: [0.0, 0.1, 0.0] });

        let dir = std::env::temp_dir().join("rollrig_viz_test");
        let path = l.write_jsonl(&dir, 42).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(path.ends_with("tick_000042.jsonl"));
        let _ = std::fs::remove_file(path);
    }
}
