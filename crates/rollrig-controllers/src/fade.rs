use rollrig_core::Scalar;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FadeDir { In, Out }

/// Per-frame-sampled alpha ramp. The state is explicit (current alpha plus an
/// optional in-flight direction) so a new fade in the opposite direction
/// supersedes the old one mid-ramp and keeps going from the current alpha
/// instead of snapping.
#[derive(Copy, Clone, Debug)]
pub struct FadeAnim {
    alpha: Scalar,
    dir: Option<FadeDir>,
    rate: Scalar, // alpha units per second
}

impl FadeAnim {
    /// Starts fully visible. `duration` is the time for a full 0..1 ramp.
    pub fn new(duration: Scalar) -> Self {
        Self {
            alpha: 1.0,
            dir: None,
            rate: 1.0 / duration,
        }
    }

    #[inline] pub fn alpha(&self) -> Scalar { self.alpha }
    #[inline] pub fn is_fading(&self) -> bool { self.dir.is_some() }
    #[inline] pub fn direction(&self) -> Option<FadeDir> { self.dir }

    /// Start (or supersede with) a ramp toward the given direction's endpoint.
    pub fn begin(&mut self, dir: FadeDir) {
        self.dir = Some(dir);
    }

    /// Advance by one frame and return the alpha to present. Settles and
    /// clears the in-flight direction when the endpoint is reached.
    pub fn sample(&mut self, dt: Scalar) -> Scalar {
        match self.dir {
            None => {}
            Some(FadeDir::In) => {
                self.alpha = (self.alpha + self.rate * dt).min(1.0);
                if self.alpha >= 1.0 {
                    self.dir = None;
                }
            }
            Some(FadeDir::Out) => {
                self.alpha = (self.alpha - self.rate * dt).max(0.0);
                if self.alpha <= 0.0 {
                    self.dir = None;
                }
            }
        }
        self.alpha
    }
}

/* ---------------- tests ---------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Scalar = 1.0 / 60.0;

    fn run_until_settled(f: &mut FadeAnim) -> u32 {
        let mut frames = 0;
        while f.is_fading() {
            f.sample(FRAME);
            frames += 1;
            assert!(frames < 10_000);
        }
        frames
    }

    #[test]
    fn fade_out_hits_zero_within_duration() {
        let mut f = FadeAnim::new(0.5);
        f.begin(FadeDir::Out);
        let frames = run_until_settled(&mut f);
        assert_eq!(f.alpha(), 0.0);
        // 0.5 s at 60 Hz is 30 frames; settling may take one frame extra.
        assert!(frames >= 30 && frames <= 31);
    }

    #[test]
    fn round_trip_restores_full_alpha() {
        let mut f = FadeAnim::new(0.35);
        f.begin(FadeDir::Out);
        run_until_settled(&mut f);
        f.begin(FadeDir::In);
        run_until_settled(&mut f);
        assert!((f.alpha() - 1.0).abs() < 1.0e-4);
    }

    #[test]
    fn opposite_direction_supersedes_mid_ramp() {
        let mut f = FadeAnim::new(1.0);
        f.begin(FadeDir::Out);
        for _ in 0..30 {
            f.sample(FRAME); // half a second out
        }
        let midway = f.alpha();
        assert!(midway > 0.0 && midway < 1.0);

        f.begin(FadeDir::In);
        let after_one = f.sample(FRAME);
        assert!(after_one > midway); // continues from where it was, no snap
        run_until_settled(&mut f);
        assert_eq!(f.alpha(), 1.0);
    }

    #[test]
    fn alpha_never_leaves_unit_range() {
        let mut f = FadeAnim::new(0.1);
        f.begin(FadeDir::Out);
        for _ in 0..100 {
            let a = f.sample(FRAME);
            assert!((0.0..=1.0).contains(&a));
        }
        f.begin(FadeDir::In);
        for _ in 0..100 {
            let a = f.sample(FRAME);
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn restarting_same_direction_is_continuous() {
        let mut f = FadeAnim::new(1.0);
        f.begin(FadeDir::Out);
        for _ in 0..10 {
            f.sample(FRAME);
        }
        let before = f.alpha();
        f.begin(FadeDir::Out); // restart must not rewind
        assert_eq!(f.alpha(), before);
        assert!(f.sample(FRAME) < before);
    }
}
