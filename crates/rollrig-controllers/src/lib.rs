mod fade;
pub use fade::{FadeAnim, FadeDir};

use rollrig_core::Scalar;
use serde::{Deserialize, Serialize};

/// Anchor separation at which the push spring reaches full stiffness (m).
pub const FULL_STRENGTH_DIST: Scalar = 5.0;

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RollParams {
    pub push_strength: Scalar,  // spring stiffness at full reach (> 0)
    pub brake_strength: Scalar, // velocity damping while unheld (>= 0)
    pub idle_timeout: Scalar,   // seconds of stillness before hiding (>= 0)
    pub fade_duration: Scalar,  // seconds for a full alpha ramp (> 0)
}

impl Default for RollParams {
    fn default() -> Self {
        Self {
            push_strength: 10.0,
            brake_strength: 2.0,
            idle_timeout: 7.0,
            fade_duration: 0.5,
        }
    }
}

impl RollParams {
    /// Spring stiffness for the current rest-to-target anchor gap. Linear ramp,
    /// zero at the goal, full strength from `FULL_STRENGTH_DIST` out; softening
    /// near the goal keeps the ball from oscillating around it.
    pub fn spring_strength(&self, dist: Scalar) -> Scalar {
        if !dist.is_finite() {
            return 0.0; // degenerate separations collapse to an inert spring
        }
        self.push_strength * (dist / FULL_STRENGTH_DIST).clamp(0.0, 1.0)
    }
}

/// What the world should do with the ball this tick.
#[derive(Copy, Clone, Debug, Default)]
pub struct RollDirective {
    /// Damping coefficient to apply; zero while any grab is live.
    pub brake: Scalar,
    /// The idle timer just expired: start fading the ball out.
    pub begin_fade_out: bool,
}

/// Grab-count state machine for one rolled ball.
///
/// Counts paired begin/end signals from both hands; "rolling" is never stored,
/// it is always derived from the count. The idle timer only runs while the
/// ball is unheld, and the hidden latch trips at most once per idle stretch.
#[derive(Copy, Clone, Debug)]
pub struct RollCtrl {
    pub params: RollParams,
    grab_count: u32,
    idle_left: Scalar,
    hidden: bool,
}

impl RollCtrl {
    pub fn new(params: RollParams) -> Self {
        Self {
            params,
            grab_count: 0,
            idle_left: params.idle_timeout,
            hidden: false,
        }
    }

    #[inline] pub fn grab_count(&self) -> u32 { self.grab_count }
    #[inline] pub fn is_rolling(&self) -> bool { self.grab_count > 0 }
    #[inline] pub fn is_hidden(&self) -> bool { self.hidden }
    #[inline] pub fn idle_left(&self) -> Scalar { self.idle_left }

    /// A hand closed on the ball. Returns true when the ball was hidden and a
    /// fade-in must start before the next alpha sample.
    pub fn on_grab_begin(&mut self) -> bool {
        self.grab_count += 1;
        self.idle_left = self.params.idle_timeout;
        let was_hidden = self.hidden;
        self.hidden = false;
        was_hidden
    }

    /// A hand let go. Returns true when this release emptied the count and the
    /// spring must come down. Unmatched releases clamp at zero.
    pub fn on_grab_end(&mut self) -> bool {
        if self.grab_count == 0 {
            return false;
        }
        self.grab_count -= 1;
        self.grab_count == 0
    }

    /// Advance one tick of the unheld-side behavior.
    pub fn step(&mut self, dt: Scalar) -> RollDirective {
        if self.is_rolling() {
            return RollDirective::default();
        }
        let mut out = RollDirective {
            brake: self.params.brake_strength,
            begin_fade_out: false,
        };
        self.idle_left -= dt;
        if self.idle_left < 0.0 && !self.hidden {
            self.hidden = true;
            out.begin_fade_out = true;
        }
        out
    }
}

/* ---------------- tests ---------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_with_timeout(idle_timeout: Scalar) -> RollCtrl {
        RollCtrl::new(RollParams { idle_timeout, ..RollParams::default() })
    }

    #[test]
    fn rolling_tracks_grab_count() {
        let mut c = RollCtrl::new(RollParams::default());
        assert!(!c.is_rolling());
        c.on_grab_begin();
        c.on_grab_begin();
        assert_eq!(c.grab_count(), 2);
        assert!(c.is_rolling());
        c.on_grab_end();
        assert!(c.is_rolling());
        assert!(c.on_grab_end()); // last hand off
        assert!(!c.is_rolling());
    }

    #[test]
    fn unmatched_release_clamps_at_zero() {
        let mut c = RollCtrl::new(RollParams::default());
        assert!(!c.on_grab_end());
        assert_eq!(c.grab_count(), 0);
        c.on_grab_begin();
        c.on_grab_end();
        assert!(!c.on_grab_end()); // stray release after empty
        assert_eq!(c.grab_count(), 0);
    }

    #[test]
    fn no_braking_while_held() {
        let mut c = RollCtrl::new(RollParams::default());
        c.on_grab_begin();
        let d = c.step(1.0 / 60.0);
        assert_eq!(d.brake, 0.0);
        assert!(!d.begin_fade_out);
    }

    #[test]
    fn braking_after_last_release() {
        let mut c = RollCtrl::new(RollParams::default());
        c.on_grab_begin();
        c.on_grab_end();
        let d = c.step(1.0 / 60.0);
        assert_eq!(d.brake, c.params.brake_strength);
    }

    #[test]
    fn idle_expiry_fires_fade_out_exactly_once() {
        let mut c = ctrl_with_timeout(2.0);
        let dt = 0.05;
        let mut fade_outs = 0;
        let mut t = 0.0;
        while t < 2.5 {
            if c.step(dt).begin_fade_out {
                fade_outs += 1;
            }
            t += dt;
        }
        assert_eq!(fade_outs, 1);
        assert!(c.is_hidden());
    }

    #[test]
    fn grab_resets_idle_timer() {
        let mut c = ctrl_with_timeout(2.0);
        let dt = 0.1;
        for _ in 0..19 {
            assert!(!c.step(dt).begin_fade_out); // 1.9 s of idling
        }
        c.on_grab_begin();
        c.on_grab_end();
        for _ in 0..19 {
            assert!(!c.step(dt).begin_fade_out); // needs the full window again
        }
        assert!(c.step(dt).begin_fade_out);
    }

    #[test]
    fn grab_while_hidden_requests_fade_in() {
        let mut c = ctrl_with_timeout(0.1);
        while !c.step(0.05).begin_fade_out {}
        assert!(c.is_hidden());
        assert!(c.on_grab_begin());
        assert!(!c.is_hidden());
        // A grab from the visible state must not retrigger a fade-in.
        c.on_grab_end();
        assert!(!c.on_grab_begin());
    }

    #[test]
    fn idle_timer_frozen_while_held() {
        let mut c = ctrl_with_timeout(0.2);
        c.on_grab_begin();
        for _ in 0..100 {
            assert!(!c.step(0.05).begin_fade_out);
        }
        assert!(!c.is_hidden());
    }

    #[test]
    fn strength_ramp_is_clamped_linear() {
        let p = RollParams { push_strength: 10.0, ..RollParams::default() };
        assert_eq!(p.spring_strength(0.0), 0.0);
        assert!((p.spring_strength(2.5) - 5.0).abs() < 1.0e-6);
        assert!((p.spring_strength(5.0) - 10.0).abs() < 1.0e-6);
        assert_eq!(p.spring_strength(20.0), 10.0);
        assert_eq!(p.spring_strength(-1.0), 0.0);
        assert_eq!(p.spring_strength(Scalar::NAN), 0.0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let p: RollParams = serde_json::from_str(r#"{ "push_strength": 25.0 }"#).unwrap();
        assert_eq!(p.push_strength, 25.0);
        assert_eq!(p.brake_strength, RollParams::default().brake_strength);
        assert_eq!(p.idle_timeout, RollParams::default().idle_timeout);
    }
}
