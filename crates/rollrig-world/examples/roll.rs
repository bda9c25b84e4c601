use rollrig_world::*;
use rollrig_core::{vec3, iso, quat_identity, HandId, Quat, Velocity};
use rollrig_geom::{Shape, MassProps};
use rollrig_input::GrabTrigger;
use rollrig_controllers::RollParams;

fn main() -> anyhow::Result<()> {
    let mut w = WorldBuilder::new().with_capacity(64, 64).build();

    // Floor (static)
    let floor = w.add_body(iso(vec3(0.0, -0.5, 0.0), quat_identity()), Velocity::default(), MassProps::infinite(), false);
    w.add_collider(floor, Shape::Box { hx: 50.0, hy: 0.5, hz: 50.0 });

    // Hamster ball resting on it
    let ball = w.add_body(iso(vec3(0.0, 2.5, 0.0), quat_identity()), Velocity::default(),
                          MassProps::from_hollow_sphere(2.5, 40.0), true);
    w.add_collider(ball, Shape::Sphere { r: 2.5 });

    let params = RollParams { idle_timeout: 1.0, fade_duration: 0.5, ..RollParams::default() };
    let ctrl = w.add_ball_locomotion(BallLocomotionDesc { ball, params, trigger: GrabTrigger::Trigger })?;

    // Scripted session: grab the wall, swing the aim, let go, idle out.
    let dt = 1.0 / 60.0;
    for step in 0..240u32 {
        match step {
            10 => {
                w.set_hand_pose(HandId::Right, iso(vec3(0.0, 2.5, 0.5), quat_identity()));
                w.queue_event(InputEvent::Button { hand: HandId::Right, trigger: GrabTrigger::Trigger, pressed: true });
            }
            30 => w.set_hand_pose(HandId::Right, iso(vec3(0.0, 2.5, 0.5), Quat::from_rotation_y(1.2))),
            120 => w.queue_event(InputEvent::Button { hand: HandId::Right, trigger: GrabTrigger::Trigger, pressed: false }),
            _ => {}
        }

        let stats = w.step(dt);
        w.present(dt);
        if step % 20 == 0 {
            let p = w.get_body_pose(ball).pos;
            println!("step {step:03}  grabs={}  springs={}  braking={}  ball=({:+.2},{:+.2},{:+.2})  alpha={:.2}",
                     stats.grabs_active, stats.springs_solved, stats.braking,
                     p.x, p.y, p.z, w.ball_alpha(ctrl).unwrap_or(1.0));
        }
    }
    println!("final hash={:02x?}", w.step_hash());
    Ok(())
}
