mod det_harness;
pub use det_harness::{InputEvent, Inputs, SimWorld, StepReport};

use anyhow::{bail, Context, Result};
use rollrig_constraint::{AnchorSpring, Springs};
use rollrig_controllers::{FadeAnim, FadeDir, RollCtrl, RollParams};
use rollrig_core::{
    hash_f32, hash_quat, hash_vec3, iso, quat_identity, vec3, BodyId, ColliderId, CtrlId, HandId,
    Isometry, Quat, Scalar, SpringId, StepHasher, StepStage, TickStats, Vec3, Velocity,
};
use rollrig_dynamics::{Bodies, BodyDesc};
use rollrig_geom::{aabb_of, grab_point, Aabb, MassProps, Shape};
use rollrig_input::{ButtonEdge, GrabBinding, GrabSignal, GrabTrigger};
use rollrig_viz::{DebugSettings, Ledger, LedgerEvent, ScheduleRecorder};

/* ---------------- Collider ---------------- */
#[derive(Copy, Clone, Debug)]
pub struct Collider {
    pub body: BodyId,
    pub shape: Shape,
    pub aabb: Aabb,
}

/// Host-side sink for the ball's presentation alpha (a material handle,
/// usually). Absent target means the fade runs invisibly.
pub trait FadeTarget {
    fn set_alpha(&mut self, alpha: Scalar);
}

/// Everything a ball-locomotion instance needs, checked at registration.
#[derive(Copy, Clone, Debug)]
pub struct BallLocomotionDesc {
    pub ball: BodyId,
    pub params: RollParams,
    pub trigger: GrabTrigger,
}

struct BallLoco {
    ball: BodyId,
    radius: Scalar,
    // |aabb half extents| of the ball collider; the rig hangs half this below center.
    bound_half_mag: Scalar,
    binding: GrabBinding,
    ctrl: RollCtrl,
    fade: FadeAnim,
    spring: Option<SpringId>,
    rig_pose: Isometry,
}

/* ---------------- Builder ---------------- */
pub struct WorldBuilder {
    pub bodies: usize,
    pub colliders: usize,
}
impl WorldBuilder {
    pub fn new() -> Self { Self { bodies: 32, colliders: 32 } }

    pub fn with_capacity(mut self, bodies: usize, colliders: usize) -> Self {
        self.bodies = bodies;
        self.colliders = colliders;
        self
    }

    pub fn build(self) -> World {
        World::with_capacity(self.bodies, self.colliders)
    }
}

impl Default for WorldBuilder {
    fn default() -> Self { Self::new() }
}

/* ---------------- World ---------------- */
pub struct World {
    pub gravity: Vec3,
    schedule: ScheduleRecorder,

    bodies: Bodies,
    colliders: Vec<Collider>,
    springs: Springs,

    locos: Vec<BallLoco>,
    // Two kinematic tracker proxies, created with the first locomotion instance.
    hands: Option<[BodyId; 2]>,
    fade_target: Option<Box<dyn FadeTarget>>,

    // Edges and pose writes queued for the next tick boundary.
    pending: Vec<InputEvent>,

    tick: u64,
    debug: DebugSettings,
    ledger: Ledger,
}

impl World {
    pub fn with_capacity(bodies: usize, colliders: usize) -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            schedule: ScheduleRecorder::new(),
            bodies: Bodies::with_capacity(bodies),
            colliders: Vec::with_capacity(colliders),
            springs: Springs::new(),
            locos: Vec::new(),
            hands: None,
            fade_target: None,
            pending: Vec::new(),
            tick: 0,
            debug: DebugSettings::default(),
            ledger: Ledger::new(4096),
        }
    }

    /* ---------- World composition ---------- */
    pub fn add_body(&mut self, pose: Isometry, vel: Velocity, mass: MassProps, dynamic: bool) -> BodyId {
        let inv_mass = if dynamic { mass.inv_mass } else { 0.0 };
        let id = self.bodies.add(BodyDesc {
            pose,
            vel,
            inv_mass,
            dynamic,
            kinematic: false,
            gravity_on: dynamic,
        });
        BodyId(id)
    }

    pub fn add_collider(&mut self, body: BodyId, shape: Shape) -> ColliderId {
        let pose = self.bodies.pose(body.0);
        let aabb = aabb_of(&shape, &pose);
        let id = self.colliders.len() as u32;
        self.colliders.push(Collider { body, shape, aabb });
        ColliderId(id)
    }

    /// Register ball locomotion on an existing dynamic sphere body. All the
    /// required pieces are checked here, once; a bad setup never gets to run.
    pub fn add_ball_locomotion(&mut self, desc: BallLocomotionDesc) -> Result<CtrlId> {
        let p = desc.params;
        if !(p.push_strength > 0.0) {
            bail!("push_strength must be > 0 (got {})", p.push_strength);
        }
        if !(p.brake_strength >= 0.0) {
            bail!("brake_strength must be >= 0 (got {})", p.brake_strength);
        }
        if !(p.idle_timeout >= 0.0) {
            bail!("idle_timeout must be >= 0 (got {})", p.idle_timeout);
        }
        if !(p.fade_duration > 0.0) {
            bail!("fade_duration must be > 0 (got {})", p.fade_duration);
        }

        if desc.ball.0 as usize >= self.bodies.len() {
            bail!("ball body {} does not exist", desc.ball);
        }
        if !self.bodies.is_dynamic(desc.ball.0) {
            bail!("ball body {} must be dynamic", desc.ball);
        }
        let radius = self
            .sphere_radius_of(desc.ball)
            .with_context(|| format!("ball body {} has no sphere collider", desc.ball))?;

        self.ensure_hand_proxies();

        let pose = self.bodies.pose(desc.ball.0);
        let bound_half_mag = aabb_of(&Shape::Sphere { r: radius }, &pose).half_extents_magnitude();
        let id = CtrlId(self.locos.len() as u32);
        self.locos.push(BallLoco {
            ball: desc.ball,
            radius,
            bound_half_mag,
            binding: GrabBinding::new(desc.trigger),
            ctrl: RollCtrl::new(p),
            fade: FadeAnim::new(p.fade_duration),
            spring: None,
            rig_pose: iso(pose.pos - vec3(0.0, bound_half_mag * 0.5, 0.0), quat_identity()),
        });
        Ok(id)
    }

    fn ensure_hand_proxies(&mut self) {
        if self.hands.is_some() {
            return;
        }
        let l = BodyId(self.bodies.add(BodyDesc::kinematic_at(Isometry::default())));
        let r = BodyId(self.bodies.add(BodyDesc::kinematic_at(Isometry::default())));
        self.hands = Some([l, r]);
    }

    fn sphere_radius_of(&self, body: BodyId) -> Option<Scalar> {
        for c in &self.colliders {
            if c.body == body {
                if let Some(r) = c.shape.sphere_radius() {
                    return Some(r);
                }
            }
        }
        None
    }

    pub fn set_fade_target(&mut self, target: Box<dyn FadeTarget>) {
        self.fade_target = Some(target);
    }

    /* ---------- Debug / helpers ---------- */
    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }
    pub fn set_gravity(&mut self, g: Vec3) { self.gravity = g; }
    #[inline] pub fn tick_index(&self) -> u64 { self.tick }
    pub fn num_bodies(&self) -> u32 { self.bodies.len() as u32 }
    pub fn get_body_pose(&self, id: BodyId) -> Isometry { self.bodies.pose(id.0) }
    pub fn get_body_vel(&self, id: BodyId) -> Velocity { self.bodies.vel(id.0) }
    pub fn ledger(&self) -> &Ledger { &self.ledger }

    /// Deterministically set a body's pose at a tick boundary.
    /// Call only outside `World::step()` to keep hashes stable.
    pub fn set_body_pose(&mut self, id: BodyId, pose: Isometry) {
        self.bodies.set_pose(id.0, pose);
        for c in &mut self.colliders {
            if c.body == id {
                c.aabb = aabb_of(&c.shape, &pose);
            }
        }
    }

    pub fn hand_body(&self, hand: HandId) -> Option<BodyId> {
        self.hands.map(|h| h[hand.index()])
    }

    /// Drive a tracker proxy. No-op until a locomotion instance exists.
    pub fn set_hand_pose(&mut self, hand: HandId, pose: Isometry) {
        if let Some(hands) = self.hands {
            self.bodies.set_pose(hands[hand.index()].0, pose);
        }
    }

    /* ---------- Controller readers ---------- */
    pub fn grab_count(&self, ctrl: CtrlId) -> Option<u32> {
        self.locos.get(ctrl.0 as usize).map(|l| l.ctrl.grab_count())
    }
    pub fn is_rolling(&self, ctrl: CtrlId) -> Option<bool> {
        self.locos.get(ctrl.0 as usize).map(|l| l.ctrl.is_rolling())
    }
    pub fn is_hidden(&self, ctrl: CtrlId) -> Option<bool> {
        self.locos.get(ctrl.0 as usize).map(|l| l.ctrl.is_hidden())
    }
    pub fn ball_alpha(&self, ctrl: CtrlId) -> Option<Scalar> {
        self.locos.get(ctrl.0 as usize).map(|l| l.fade.alpha())
    }
    pub fn rig_pose(&self, ctrl: CtrlId) -> Option<Isometry> {
        self.locos.get(ctrl.0 as usize).map(|l| l.rig_pose)
    }
    pub fn spring_of(&self, ctrl: CtrlId) -> Option<AnchorSpring> {
        let loco = self.locos.get(ctrl.0 as usize)?;
        self.springs.get(loco.spring?).copied()
    }
    pub fn live_springs(&self) -> usize { self.springs.live_count() }

    /* ---------- Inputs ---------- */
    pub fn queue_event(&mut self, ev: InputEvent) {
        self.pending.push(ev);
    }

    pub fn apply_inputs(&mut self, inputs: &Inputs) {
        self.pending.extend(inputs.events.iter().cloned());
    }

    fn apply_event(&mut self, ev: &InputEvent) {
        match *ev {
            InputEvent::Button { hand, trigger, pressed } => {
                let edge = ButtonEdge { hand, trigger, pressed };
                for li in 0..self.locos.len() {
                    let sig = self.locos[li].binding.interpret(edge);
                    match sig {
                        Some(GrabSignal::Begin(h)) => self.begin_grab(li, h),
                        Some(GrabSignal::End(h)) => self.end_grab(li, h),
                        None => {}
                    }
                }
            }
            InputEvent::SetHandPose { hand, pos, rot } => {
                if let Some(hands) = self.hands {
                    let rot = Quat::from_xyzw(rot[0], rot[1], rot[2], rot[3]).normalize();
                    let pose = iso(vec3(pos[0], pos[1], pos[2]), rot);
                    self.bodies.set_pose(hands[hand.index()].0, pose);
                }
            }
            InputEvent::SetVelocity { body, lin, ang } => {
                if (body.0 as usize) < self.bodies.len() {
                    self.bodies.set_vel(body.0, Velocity {
                        lin: vec3(lin[0], lin[1], lin[2]),
                        ang: vec3(ang[0], ang[1], ang[2]),
                    });
                }
            }
        }
    }

    /* ---------- Grab lifecycle ---------- */
    fn begin_grab(&mut self, li: usize, hand: HandId) {
        let hand_body = match self.hands {
            Some(h) => h[hand.index()],
            None => return,
        };
        let loco = &mut self.locos[li];
        let ball_pose = self.bodies.pose(loco.ball.0);
        let hand_pose = self.bodies.pose(hand_body.0);

        // Reach through the wall along the hand's aim, snap back to the surface.
        let contact = grab_point(&hand_pose, ball_pose.pos, loco.radius);
        let anchor_ball = ball_pose.inverse_transform_point(contact);
        let anchor_target = hand_pose.inverse_transform_point(contact);

        let fade_in = loco.ctrl.on_grab_begin();
        let k = loco.ctrl.params.push_strength;
        match loco.spring {
            // Newest grab wins the shared spring outright.
            Some(sid) => {
                self.springs.retarget(sid, anchor_ball, hand_body, anchor_target);
                self.springs.set_strength(sid, k);
            }
            None => {
                loco.spring = Some(self.springs.attach(AnchorSpring {
                    ball: loco.ball,
                    target: hand_body,
                    anchor_ball,
                    anchor_target,
                    strength: k,
                }));
            }
        }

        if fade_in {
            loco.fade.begin(FadeDir::In);
            self.ledger.push(LedgerEvent::FadeStart { ctrl: CtrlId(li as u32), to_visible: true });
        }
        self.ledger.push(LedgerEvent::GrabBegin {
            ctrl: CtrlId(li as u32),
            hand,
            grabs: loco.ctrl.grab_count(),
            anchor_ws: [contact.x, contact.y, contact.z],
        });
    }

    fn end_grab(&mut self, li: usize, hand: HandId) {
        let loco = &mut self.locos[li];
        if loco.ctrl.on_grab_end() {
            if let Some(sid) = loco.spring.take() {
                self.springs.detach(sid);
            }
        }
        self.ledger.push(LedgerEvent::GrabEnd {
            ctrl: CtrlId(li as u32),
            hand,
            grabs: loco.ctrl.grab_count(),
        });
    }

    /* ---------- Step ---------- */
    pub fn step(&mut self, dt: Scalar) -> TickStats {
        self.schedule.clear();
        self.tick = self.tick.wrapping_add(1);
        self.ledger.clear();

        let mut stats = TickStats::default();

        // Queued edges and pose writes land at the tick boundary, in arrival order.
        self.schedule.push(StepStage::ApplyInputs);
        let pending = std::mem::take(&mut self.pending);
        stats.events_applied = pending.len() as u32;
        for ev in &pending {
            self.apply_event(ev);
        }

        self.schedule.push(StepStage::Controllers);
        for li in 0..self.locos.len() {
            let loco = &mut self.locos[li];

            // While held: resnap the target anchor to the wall under the hand's
            // aim and retune stiffness off the rest-to-target gap.
            if let Some(sid) = loco.spring {
                if let Some(s) = self.springs.get(sid).copied() {
                    let ball_pose = self.bodies.pose(loco.ball.0);
                    let hand_pose = self.bodies.pose(s.target.0);
                    let contact = grab_point(&hand_pose, ball_pose.pos, loco.radius);
                    self.springs.set_target_anchor(sid, hand_pose.inverse_transform_point(contact));

                    let rest_ws = ball_pose.transform_point(s.anchor_ball);
                    let dist = (contact - rest_ws).length();
                    let k = loco.ctrl.params.spring_strength(dist);
                    self.springs.set_strength(sid, k);
                    self.ledger.push(LedgerEvent::SpringRetarget {
                        ctrl: CtrlId(li as u32),
                        spring: sid,
                        dist,
                        strength: k,
                    });
                }
            }

            let d = loco.ctrl.step(dt);
            if d.brake > 0.0 {
                let speed = self.bodies.vel(loco.ball.0).lin.length();
                self.bodies.damp_linear(loco.ball.0, d.brake, dt);
                self.ledger.push(LedgerEvent::Brake {
                    ctrl: CtrlId(li as u32),
                    strength: d.brake,
                    speed,
                });
                stats.braking = true;
            }
            if d.begin_fade_out {
                loco.fade.begin(FadeDir::Out);
                self.ledger.push(LedgerEvent::FadeStart { ctrl: CtrlId(li as u32), to_visible: false });
            }
        }

        self.schedule.push(StepStage::SolveSprings);
        stats.springs_solved = self.springs.solve(&mut self.bodies, dt);

        self.schedule.push(StepStage::Integrate);
        let g = self.gravity;
        self.bodies.integrate_all(g, dt);

        self.schedule.push(StepStage::GroundClamp);
        self.resolve_ground();

        for loco in &self.locos {
            stats.grabs_active += loco.ctrl.grab_count();
        }

        // Periodic console dump / JSONL telemetry, each on its own cadence.
        if self.debug.print_every != 0 && (self.tick as u32) % self.debug.print_every == 0 {
            self.print_debug_block();
        }
        if self.debug.json_every != 0 && (self.tick as u32) % self.debug.json_every == 0 {
            let _ = self.ledger.write_jsonl("out", self.tick);
        }

        stats
    }

    /// Keep dynamic spheres out of static box tops and spin them to roll
    /// without slipping. This is the whole contact model: the play space is a
    /// ball on a floor, not a general scene.
    fn resolve_ground(&mut self) {
        for i in 0..self.colliders.len() {
            let ci = self.colliders[i];
            let r = match ci.shape {
                Shape::Sphere { r } => r,
                _ => continue,
            };
            if !self.bodies.is_dynamic(ci.body.0) {
                continue;
            }
            let mut pose = self.bodies.pose(ci.body.0);
            let mut vel = self.bodies.vel(ci.body.0);
            let mut grounded = false;

            for j in 0..self.colliders.len() {
                if i == j {
                    continue;
                }
                let cj = self.colliders[j];
                if !matches!(cj.shape, Shape::Box { .. }) {
                    continue;
                }
                if self.bodies.is_dynamic(cj.body.0) || self.bodies.is_kinematic(cj.body.0) {
                    continue;
                }
                let top = cj.aabb.max.y;
                let in_x = pose.pos.x + r > cj.aabb.min.x && pose.pos.x - r < cj.aabb.max.x;
                let in_z = pose.pos.z + r > cj.aabb.min.z && pose.pos.z - r < cj.aabb.max.z;
                if !(in_x && in_z) {
                    continue;
                }
                if pose.pos.y - r < top && pose.pos.y >= cj.aabb.min.y {
                    pose.pos.y = top + r;
                    if vel.lin.y < 0.0 {
                        vel.lin.y = 0.0;
                    }
                    grounded = true;
                }
            }

            if grounded {
                // omega = up x v / r
                vel.ang = vec3(vel.lin.z / r, 0.0, -vel.lin.x / r);
                self.bodies.set_pose(ci.body.0, pose);
                self.bodies.set_vel(ci.body.0, vel);
            }
        }

        for idx in 0..self.colliders.len() {
            let b = self.colliders[idx].body;
            let shape = self.colliders[idx].shape;
            let pose = self.bodies.pose(b.0);
            self.colliders[idx].aabb = aabb_of(&shape, &pose);
        }
    }

    /* ---------- Present (render-rate) ---------- */
    /// Once per render frame, after `step`: sample fades, follow the rig.
    /// The rig hangs below the ball center by half the collider's bounding-box
    /// extents so the user's feet stay on the bottom interior of the ball.
    pub fn present(&mut self, dt: Scalar) {
        for li in 0..self.locos.len() {
            let loco = &mut self.locos[li];
            let alpha = loco.fade.sample(dt);
            if let Some(t) = self.fade_target.as_mut() {
                t.set_alpha(alpha);
            }

            let ball_pos = self.bodies.pose(loco.ball.0).pos;
            let rig = ball_pos - vec3(0.0, loco.bound_half_mag * 0.5, 0.0);
            loco.rig_pose = iso(rig, quat_identity());
            self.ledger.push(LedgerEvent::RigFollow {
                ctrl: CtrlId(li as u32),
                rig_pos: [rig.x, rig.y, rig.z],
            });
        }
    }

    /* ---------- Hash ---------- */
    pub fn step_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.update_bytes(&self.schedule.digest());
        for i in self.bodies.indices() {
            let pose = self.bodies.pose(i);
            let vel = self.bodies.vel(i);
            h.update_bytes(&i.to_le_bytes());
            hash_vec3(&mut h, &pose.pos);
            hash_quat(&mut h, &pose.rot);
            hash_vec3(&mut h, &vel.lin);
            hash_vec3(&mut h, &vel.ang);
        }
        for (li, loco) in self.locos.iter().enumerate() {
            h.update_bytes(&(li as u32).to_le_bytes());
            h.update_bytes(&loco.ctrl.grab_count().to_le_bytes());
            hash_f32(&mut h, loco.ctrl.idle_left());
            h.update_bytes(&[loco.ctrl.is_hidden() as u8]);
            hash_f32(&mut h, loco.fade.alpha());
            match loco.spring.and_then(|sid| self.springs.get(sid)) {
                Some(s) => {
                    h.update_bytes(&[1u8]);
                    h.update_bytes(&s.target.0.to_le_bytes());
                    hash_vec3(&mut h, &s.anchor_ball);
                    hash_vec3(&mut h, &s.anchor_target);
                    hash_f32(&mut h, s.strength);
                }
                None => h.update_bytes(&[0u8]),
            }
        }
        h.finalize()
    }

    fn print_debug_block(&self) {
        println!("--- debug @ tick {} ---", self.tick);

        if self.debug.show_bodies {
            let mut lines = 0usize;
            for i in self.bodies.indices() {
                let p = self.bodies.pose(i).pos;
                let v = self.bodies.vel(i).lin;
                println!("body {:3}  pos=({:+.3},{:+.3},{:+.3})  vel=({:+.3},{:+.3},{:+.3})",
                         i, p.x,p.y,p.z, v.x,v.y,v.z);
                lines += 1; if lines >= self.debug.max_lines { break; }
            }
        }

        if self.debug.show_springs {
            for (li, loco) in self.locos.iter().enumerate() {
                let live = loco.spring.and_then(|sid| self.springs.get(sid));
                match live {
                    Some(s) => {
                        let (a, b) = s.world_anchors(&self.bodies);
                        println!("spring {li}  ball={} target={}  k={:.3}  gap={:.4}",
                                 s.ball.0, s.target.0, s.strength, (b - a).length());
                    }
                    None => println!("spring {li}  (detached)"),
                }
            }
        }

        if self.debug.show_ctrl {
            for (li, loco) in self.locos.iter().enumerate() {
                println!("ctrl {li}  grabs={}  idle_left={:+.2}s  hidden={}  alpha={:.3}",
                         loco.ctrl.grab_count(), loco.ctrl.idle_left(),
                         loco.ctrl.is_hidden(), loco.fade.alpha());
            }
        }
    }
}

// ---- glue: adapt World to the harness surface ----
impl SimWorld for World {
    fn step_dt(&mut self, dt: f32) -> StepReport {
        let stats = self.step(dt);
        StepReport {
            dt,
            hash: self.step_hash(),
            events_applied: stats.events_applied,
            grabs_active: stats.grabs_active,
            springs_solved: stats.springs_solved,
            braking: stats.braking,
        }
    }

    fn step_hash(&self) -> [u8; 32] {
        World::step_hash(self)
    }

    fn apply_inputs(&mut self, inputs: &Inputs) {
        World::apply_inputs(self, inputs)
    }
}

/* ---------------- tests ---------------- */
