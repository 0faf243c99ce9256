//! Fixed-step scenario runner: drives the full pipeline against flat ground
//! with a free-body chassis and prints a telemetry line every N ticks.

mod rig;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use axledyn_core::VehicleInput;
use axledyn_specs::{load_vehicle_spec, VehicleSpec};
use axledyn_viz::DebugSettings;
use rig::Rig;

#[derive(Parser, Debug)]
#[command(name = "axledyn-bench", version, about = "Fixed-step vehicle scenarios")]
struct Opts {
    #[arg(value_enum)]
    scenario: Scenario,

    /// Ticks to simulate (determinism replay runs this twice).
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Fixed step rate in Hz.
    #[arg(long, default_value_t = 60.0)]
    hz: f32,

    /// Vehicle spec JSON; the built-in test hatch when omitted.
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Dump the telemetry ledger every N ticks (0 = off).
    #[arg(long, default_value_t = 0)]
    json_every: u32,

    /// Telemetry output directory.
    #[arg(long, default_value = "out")]
    out: PathBuf,

    /// Print a status line every N ticks (0 = off).
    #[arg(long, default_value_t = 60)]
    print_every: u32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Scenario {
    /// Full throttle from rest in first gear.
    Launch,
    /// Steer + handbrake at speed; reports peak yaw rate.
    HandbrakeTurn,
    /// Hold the brake until the automatic box engages reverse.
    BrakeToReverse,
    /// Run the launch twice and compare state hashes tick-for-tick.
    DeterminismReplay,
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let spec = match &opts.spec {
        Some(path) => load_vehicle_spec(path)?,
        None => VehicleSpec::test_hatch(),
    };
    let dt = 1.0 / opts.hz.max(1.0);

    match opts.scenario {
        Scenario::Launch => launch(&opts, &spec, dt),
        Scenario::HandbrakeTurn => handbrake_turn(&opts, &spec, dt),
        Scenario::BrakeToReverse => brake_to_reverse(&opts, &spec, dt),
        Scenario::DeterminismReplay => determinism_replay(&opts, &spec, dt),
    }
}

fn debug_cfg(opts: &Opts) -> DebugSettings {
    DebugSettings { print_every: opts.print_every, json_every: opts.json_every }
}

fn launch(opts: &Opts, spec: &VehicleSpec, dt: f32) -> Result<()> {
    let mut rig = Rig::new(spec.clone(), debug_cfg(opts), &opts.out);
    rig.vehicle.force_gear(1);
    rig.settle(dt);

    let input = VehicleInput::new(1.0, 0.0, 0.0, 0.0);
    for t in 0..opts.ticks {
        rig.step(input, dt);
        rig.maybe_print(t, opts.print_every);
    }
    let s = rig.vehicle.state();
    println!(
        "launch: {:.1} m/s after {} ticks, gear {}, {:.0} rpm",
        s.forward_speed, opts.ticks, s.gear, s.engine_rpm
    );
    Ok(())
}

fn handbrake_turn(opts: &Opts, spec: &VehicleSpec, dt: f32) -> Result<()> {
    let mut rig = Rig::new(spec.clone(), debug_cfg(opts), &opts.out);
    rig.vehicle.force_gear(3);
    rig.settle(dt);
    rig.set_forward_speed(10.0);

    let input = VehicleInput::new(0.0, 0.0, 1.0, 1.0);
    let mut peak_yaw: f32 = 0.0;
    for t in 0..opts.ticks {
        rig.step(input, dt);
        peak_yaw = peak_yaw.max(rig.vehicle.state().yaw_rate.abs());
        rig.maybe_print(t, opts.print_every);
    }
    println!("handbrake turn: peak |yaw rate| {peak_yaw:.3} rad/s");
    Ok(())
}

fn brake_to_reverse(opts: &Opts, spec: &VehicleSpec, dt: f32) -> Result<()> {
    let mut rig = Rig::new(spec.clone(), debug_cfg(opts), &opts.out);
    rig.vehicle.force_gear(1);
    rig.settle(dt);
    rig.set_forward_speed(3.0);

    let input = VehicleInput::new(0.0, 1.0, 0.0, 0.0);
    for t in 0..opts.ticks {
        rig.step(input, dt);
        rig.maybe_print(t, opts.print_every);
        if rig.vehicle.state().gear == -1 {
            println!("brake-to-reverse: reverse engaged at tick {t}");
            return Ok(());
        }
    }
    bail!("reverse never engaged within {} ticks", opts.ticks);
}

fn determinism_replay(opts: &Opts, spec: &VehicleSpec, dt: f32) -> Result<()> {
    let run = |spec: &VehicleSpec| -> Vec<[u8; 32]> {
        let mut rig = Rig::new(spec.clone(), DebugSettings::default(), &opts.out);
        rig.vehicle.force_gear(1);
        rig.settle(dt);
        let input = VehicleInput::new(1.0, 0.0, 0.3, 0.0);
        let mut hashes = Vec::with_capacity(opts.ticks as usize);
        for _ in 0..opts.ticks {
            rig.step(input, dt);
            hashes.push(rig.vehicle.state_hash());
        }
        hashes
    };

    let a = run(spec);
    let b = run(spec);
    for (t, (ha, hb)) in a.iter().zip(&b).enumerate() {
        if ha != hb {
            bail!("state hash diverged at tick {t}");
        }
    }
    println!("determinism replay: {} ticks, hashes identical", opts.ticks);
    Ok(())
}
