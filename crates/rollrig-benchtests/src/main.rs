// Scripted hamster-ball locomotion bench: grab, stir, release, idle out.
// Optionally runs a twin world in lockstep to pin down determinism breaks.

mod lockstep;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use lockstep::Lockstep;
use rollrig_controllers::RollParams;
use rollrig_core::{iso, quat_identity, vec3, BodyId, CtrlId, Velocity};
use rollrig_geom::{MassProps, Shape};
use rollrig_input::GrabTrigger;
use rollrig_viz::DebugSettings;
use rollrig_world::{BallLocomotionDesc, SimWorld, World, WorldBuilder};
use std::{fs, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name="rollrig_bench", version, about="Scripted sphere-interior locomotion bench with lockstep determinism check")]
struct Opts {
    /// Fixed tick rate in Hz
    #[arg(long, default_value_t = 60)]
    hz: u32,

    /// Scripted ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Console debug-block cadence (0 = off)
    #[arg(long, default_value_t = 60)]
    print_every: u32,

    /// Ledger JSONL cadence (0 = off)
    #[arg(long, default_value_t = 0)]
    json_every: u32,

    /// Controller tuning as a RollParams JSON file (defaults when absent)
    #[arg(long)]
    params: Option<PathBuf>,

    /// Run a hash-compared twin world in lockstep
    #[arg(long)]
    lockstep: bool,
}

fn load_params(path: &Option<PathBuf>) -> Result<RollParams> {
    match path {
        Some(p) => {
            let s = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_str(&s).with_context(|| format!("parsing {}", p.display()))
        }
        // Short idle so the scripted session reaches hide + fade-back-in.
        None => Ok(RollParams { idle_timeout: 2.0, ..RollParams::default() }),
    }
}

fn build_scene(params: RollParams, dbg: DebugSettings) -> Result<(World, BodyId, CtrlId)> {
    let mut w = WorldBuilder::new().with_capacity(64, 64).build();
    w.set_debug(dbg);

    let floor = w.add_body(
        iso(vec3(0.0, -0.5, 0.0), quat_identity()),
        Velocity::default(),
        MassProps::infinite(),
        false,
    );
    w.add_collider(floor, Shape::Box { hx: 50.0, hy: 0.5, hz: 50.0 });

    let ball = w.add_body(
        iso(vec3(0.0, 2.5, 0.0), quat_identity()),
        Velocity::default(),
        MassProps::from_hollow_sphere(2.5, 40.0),
        true,
    );
    w.add_collider(ball, Shape::Sphere { r: 2.5 });

    // Loose props to keep the ground pass honest under load.
    for i in 0..6 {
        let x = -12.5 + 5.0 * i as f32;
        let b = w.add_body(
            iso(vec3(x, 4.0, -8.0), quat_identity()),
            Velocity::default(),
            MassProps::from_hollow_sphere(1.0, 10.0),
            true,
        );
        w.add_collider(b, Shape::Sphere { r: 1.0 });
    }

    let ctrl = w.add_ball_locomotion(BallLocomotionDesc {
        ball,
        params,
        trigger: GrabTrigger::Trigger,
    })?;
    Ok((w, ball, ctrl))
}

fn main() -> Result<()> {
    let opt = Opts::parse();
    let hz = opt.hz.max(1);
    let dt = 1.0 / hz as f32;
    let params = load_params(&opt.params)?;

    if opt.lockstep {
        let quiet = DebugSettings { print_every: 0, json_every: 0, ..DebugSettings::default() };
        let (wa, ball, _) = build_scene(params, quiet)?;
        let (wb, _, _) = build_scene(params, quiet)?;
        let mut sim = Lockstep::new(wa, wb);

        for t in 0..opt.ticks {
            let inputs = script::inputs_for_tick(t, hz);
            let ok = sim.step(&inputs, dt);
            if opt.print_every != 0 && t % opt.print_every == 0 {
                let v = sim.a.get_body_vel(ball).lin;
                println!("tick {t:4}  |v|={:.2}  agree={}", v.length(), ok);
            }
        }
        match sim.first_divergence() {
            None => println!("lockstep OK: {} equal ticks", sim.eq_ticks()),
            Some(at) => println!("lockstep DIVERGED at tick {at}"),
        }
        println!("final hash = {:02x?}", sim.a.step_hash());
        return Ok(());
    }

    let dbg = DebugSettings {
        print_every: opt.print_every,
        json_every: opt.json_every,
        ..DebugSettings::default()
    };
    let (mut w, ball, ctrl) = build_scene(params, dbg)?;

    for t in 0..opt.ticks {
        let inputs = script::inputs_for_tick(t, hz);
        w.apply_inputs(&inputs);
        let report = w.step_dt(dt);
        w.present(dt);

        if opt.print_every != 0 && t % opt.print_every == 0 {
            let v = w.get_body_vel(ball).lin;
            println!(
                "tick {t:4}  grabs={}  springs={}  braking={}  |v|={:.2}  alpha={:.2}",
                report.grabs_active,
                report.springs_solved,
                report.braking,
                v.length(),
                w.ball_alpha(ctrl).unwrap_or(1.0),
            );
        }
    }

    if opt.json_every != 0 {
        // Post-present flush so the last tick's rig-follow events reach disk too.
        let path = w.ledger().write_jsonl("out", w.tick_index())?;
        println!("ledger -> {}", path.display());
    }
    println!("final hash = {:02x?}", w.step_hash());
    Ok(())
}
