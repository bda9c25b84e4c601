use rollrig_core::types::Vec3;
use rollrig_core::{BodyId, Scalar, SpringId};
use rollrig_dynamics::Bodies;

/// Force spring between a local anchor on a rolled body and a local anchor on
/// a tracked target body. Strength is retuned every tick by whoever owns it;
/// the solver itself just turns (separation, strength) into a force.
#[derive(Copy, Clone, Debug)]
pub struct AnchorSpring {
    pub ball: BodyId,
    pub target: BodyId,
    /// Grab point in ball-local space, captured at attach/retarget time.
    pub anchor_ball: Vec3,
    /// Anchor in target-local space (usually the target origin).
    pub anchor_target: Vec3,
    pub strength: Scalar,
}

impl AnchorSpring {
    /// Both anchors in world space: (on-ball, on-target).
    pub fn world_anchors(&self, bodies: &Bodies) -> (Vec3, Vec3) {
        let a = bodies.pose(self.ball.0).transform_point(self.anchor_ball);
        let b = bodies.pose(self.target.0).transform_point(self.anchor_target);
        (a, b)
    }
}

/// Slot container: detaching leaves a hole that the next attach reuses, so
/// a release/regrab cycle hands back the same `SpringId`.
#[derive(Default)]
pub struct Springs {
    slots: Vec<Option<AnchorSpring>>,
}

impl Springs {
    pub fn new() -> Self { Self { slots: Vec::new() } }

    pub fn attach(&mut self, spring: AnchorSpring) -> SpringId {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(spring);
                return SpringId(i as u32);
            }
        }
        self.slots.push(Some(spring));
        SpringId((self.slots.len() as u32) - 1)
    }

    pub fn detach(&mut self, id: SpringId) {
        if let Some(slot) = self.slots.get_mut(id.0 as usize) {
            *slot = None;
        }
    }

    #[inline]
    pub fn get(&self, id: SpringId) -> Option<&AnchorSpring> {
        self.slots.get(id.0 as usize).and_then(|s| s.as_ref())
    }

    pub fn set_strength(&mut self, id: SpringId, strength: Scalar) {
        if let Some(Some(s)) = self.slots.get_mut(id.0 as usize) {
            s.strength = strength;
        }
    }

    /// Per-tick resnap of the target-side anchor (target-local space).
    pub fn set_target_anchor(&mut self, id: SpringId, anchor_target: Vec3) {
        if let Some(Some(s)) = self.slots.get_mut(id.0 as usize) {
            s.anchor_target = anchor_target;
        }
    }

    /// Re-aim the spring at a fresh grab: new on-ball anchor, new target body.
    /// The most recent call wins; there is no blending between grabs.
    pub fn retarget(
        &mut self,
        id: SpringId,
        anchor_ball: Vec3,
        target: BodyId,
        anchor_target: Vec3,
    ) {
        if let Some(Some(s)) = self.slots.get_mut(id.0 as usize) {
            s.anchor_ball = anchor_ball;
            s.target = target;
            s.anchor_target = anchor_target;
        }
    }

    /// World-space gap between the two anchors, if the spring is live.
    pub fn separation(&self, id: SpringId, bodies: &Bodies) -> Option<Scalar> {
        let s = self.get(id)?;
        let (a, b) = s.world_anchors(bodies);
        Some((b - a).length())
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Accumulate spring forces into the bodies. Kinematic ends soak up their
    /// share for free (apply_force is a no-op on them), so a tracked hand can
    /// drag a dynamic ball without recoil.
    pub fn solve(&self, bodies: &mut Bodies, _dt: Scalar) -> u32 {
        let mut solved = 0u32;
        for spring in self.slots.iter().flatten() {
            if spring.strength <= 0.0 { continue; }
            let (a, b) = spring.world_anchors(bodies);
            let f = (b - a) * spring.strength;
            bodies.apply_force(spring.ball.0, f);
            bodies.apply_force(spring.target.0, -f);
            solved += 1;
        }
        solved
    }
}

/* ---------------- tests ---------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use rollrig_core::types::{iso, quat_identity, vec3};
    use rollrig_dynamics::BodyDesc;

    const DT: Scalar = 1.0 / 60.0;

    fn ball_and_hand(hand_at: Vec3) -> (Bodies, BodyId, BodyId) {
        let mut bodies = Bodies::default();
        let mut ball = BodyDesc::dynamic_at(iso(vec3(0.0, 0.0, 0.0), quat_identity()), 1.0);
        ball.gravity_on = false;
        let ball_id = BodyId(bodies.add(ball));
        let hand_id = BodyId(bodies.add(BodyDesc::kinematic_at(iso(hand_at, quat_identity()))));
        (bodies, ball_id, hand_id)
    }

    #[test]
    fn spring_pulls_ball_toward_target() {
        let (mut bodies, ball, hand) = ball_and_hand(vec3(2.0, 0.0, 0.0));
        let mut springs = Springs::new();
        let id = springs.attach(AnchorSpring {
            ball,
            target: hand,
            anchor_ball: Vec3::ZERO,
            anchor_target: Vec3::ZERO,
            strength: 50.0,
        });

        assert_eq!(springs.solve(&mut bodies, DT), 1);
        bodies.integrate_all(Vec3::ZERO, DT);

        assert!(bodies.vel(ball.0).lin.x > 0.0);
        assert!((springs.separation(id, &bodies).unwrap() - 2.0).abs() < 0.1);
    }

    #[test]
    fn kinematic_target_takes_no_recoil() {
        let (mut bodies, ball, hand) = ball_and_hand(vec3(0.0, 0.0, -3.0));
        let mut springs = Springs::new();
        springs.attach(AnchorSpring {
            ball,
            target: hand,
            anchor_ball: Vec3::ZERO,
            anchor_target: Vec3::ZERO,
            strength: 10.0,
        });
        springs.solve(&mut bodies, DT);
        bodies.integrate_all(Vec3::ZERO, DT);
        assert_eq!(bodies.pose(hand.0).pos, vec3(0.0, 0.0, -3.0));
        assert_eq!(bodies.vel(hand.0).lin, Vec3::ZERO);
    }

    #[test]
    fn zero_strength_spring_is_inert() {
        let (mut bodies, ball, hand) = ball_and_hand(vec3(1.0, 1.0, 0.0));
        let mut springs = Springs::new();
        springs.attach(AnchorSpring {
            ball,
            target: hand,
            anchor_ball: Vec3::ZERO,
            anchor_target: Vec3::ZERO,
            strength: 0.0,
        });
        assert_eq!(springs.solve(&mut bodies, DT), 0);
        bodies.integrate_all(Vec3::ZERO, DT);
        assert_eq!(bodies.vel(ball.0).lin, Vec3::ZERO);
    }

    #[test]
    fn detach_frees_slot_for_reuse() {
        let (_, ball, hand) = ball_and_hand(vec3(1.0, 0.0, 0.0));
        let spring = AnchorSpring {
            ball,
            target: hand,
            anchor_ball: Vec3::ZERO,
            anchor_target: Vec3::ZERO,
            strength: 1.0,
        };
        let mut springs = Springs::new();
        let a = springs.attach(spring);
        springs.detach(a);
        assert_eq!(springs.live_count(), 0);
        let b = springs.attach(spring);
        assert_eq!(a, b);
        assert_eq!(springs.live_count(), 1);
    }

    #[test]
    fn retarget_moves_both_anchors() {
        let (bodies, ball, hand) = ball_and_hand(vec3(2.0, 0.0, 0.0));
        let mut springs = Springs::new();
        let id = springs.attach(AnchorSpring {
            ball,
            target: hand,
            anchor_ball: vec3(0.5, 0.0, 0.0),
            anchor_target: Vec3::ZERO,
            strength: 1.0,
        });
        springs.retarget(id, vec3(0.0, 0.5, 0.0), hand, vec3(0.0, 0.1, 0.0));
        let s = springs.get(id).unwrap();
        assert_eq!(s.anchor_ball, vec3(0.0, 0.5, 0.0));
        assert_eq!(s.anchor_target, vec3(0.0, 0.1, 0.0));
        let (a, b) = s.world_anchors(&bodies);
        assert_eq!(a, vec3(0.0, 0.5, 0.0));
        assert_eq!(b, vec3(2.0, 0.1, 0.0));
    }
}
