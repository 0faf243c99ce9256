//! Per-tick orchestration.
//!
//! `Vehicle` owns the shared `VehicleState` and invokes the stage modules in
//! fixed order, threading the state by mutable reference through each. The
//! ordering contract is load-bearing: contact loads gate powertrain torque
//! distribution, torques feed the tire solve, and steering reads the
//! forward speed captured before any stage ran.

pub mod collision;
pub mod drag;
pub mod stage;

pub use collision::{CollisionEvent, CollisionSink};
pub use drag::DragResolver;
pub use stage::VehicleStage;

use axledyn_contact::ContactResolver;
use axledyn_core::{
    hash_vec3, quantize, StepCtx, StepHasher, VehicleInput, VehicleState, WHEEL_COUNT,
};
use axledyn_dynamics::ChassisBody;
use axledyn_ground::Ground;
use axledyn_powertrain::{Braking, Powertrain};
use axledyn_specs::VehicleSpec;
use axledyn_steering::SteeringController;
use axledyn_tire::TireResolver;
use axledyn_viz::{DebugSettings, Ledger, LedgerEvent, ScheduleRecorder};
use std::path::PathBuf;

pub struct Vehicle {
    stages: Vec<VehicleStage>,
    contact: ContactResolver,
    powertrain: Powertrain,
    braking: Braking,
    tire: TireResolver,
    steering: SteeringController,
    drag: Option<DragResolver>,

    state: VehicleState,
    last_steer_torque: Option<f32>,

    schedule: ScheduleRecorder,
    ledger: Ledger,
    debug: DebugSettings,
    log_dir: PathBuf,
    sinks: Vec<Box<dyn CollisionSink>>,
    tick: u64,
}

impl Vehicle {
    pub fn from_spec(spec: VehicleSpec) -> Self {
        let mounts = spec.wheel_mounts.map(|m| axledyn_core::vec3(m[0], m[1], m[2]));
        let state = VehicleState::new(spec.wheel.radius_m);
        Self {
            stages: VehicleStage::ALL.to_vec(),
            contact: ContactResolver::new(spec.suspension, mounts),
            powertrain: Powertrain::new(spec.engine.clone(), spec.gearbox.clone(), spec.layout),
            braking: Braking::new(spec.brakes),
            tire: TireResolver::new(spec.wheel, spec.steering.max_steer_angle_rad),
            steering: SteeringController::new(spec.steering, spec.mass_kg),
            drag: spec.drag.map(DragResolver::new),
            state,
            last_steer_torque: None,
            schedule: ScheduleRecorder::new(),
            ledger: Ledger::new(4096),
            debug: DebugSettings::default(),
            log_dir: PathBuf::from("out"),
            sinks: Vec::new(),
            tick: 0,
        }
    }

    /// Restrict the pipeline to a subset of stages. Order is normalized to
    /// the fixed stage order regardless of the order given.
    pub fn with_stages(mut self, stages: &[VehicleStage]) -> Self {
        self.stages = VehicleStage::ALL
            .into_iter()
            .filter(|s| stages.contains(s))
            .collect();
        self
    }

    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }
    pub fn set_log_dir(&mut self, dir: impl Into<PathBuf>) { self.log_dir = dir.into(); }
    pub fn add_collision_sink(&mut self, sink: Box<dyn CollisionSink>) {
        self.sinks.push(sink);
    }

    pub fn state(&self) -> &VehicleState { &self.state }
    pub fn tick_count(&self) -> u64 { self.tick }
    pub fn last_steer_torque(&self) -> Option<f32> { self.last_steer_torque }
    pub fn ledger(&self) -> &Ledger { &self.ledger }

    /// Scenario setup only; not part of the tick contract.
    pub fn force_gear(&mut self, gear: i8) {
        self.powertrain.force_gear(gear);
        self.state.gear = gear;
    }

    /// Advance one fixed step. Forces and torques are accumulated on `body`;
    /// the host integrates afterwards. `input` is mutable because the shift
    /// flags are edge-triggered: the powertrain stage consumes them, and the
    /// caller sees the cleared flags, so replaying the same snapshot cannot
    /// shift twice.
    pub fn step<B: ChassisBody>(
        &mut self,
        body: &mut B,
        ground: &dyn Ground,
        input: &mut VehicleInput,
        dt: f32,
    ) {
        let ctx = StepCtx::new(dt, self.tick);
        self.fill_kinematics(body);
        self.schedule.clear();
        self.last_steer_torque = None;

        let prev_gear = self.state.gear;
        for stage in self.stages.clone() {
            self.run_stage(stage, body, ground, input, ctx);
            self.schedule.push(stage.step_stage());
        }
        if self.state.gear != prev_gear {
            self.ledger.push(LedgerEvent::GearChange { from: prev_gear, to: self.state.gear });
        }

        let print_hit =
            self.debug.print_every != 0 && (self.tick as u32) % self.debug.print_every == 0;
        let json_hit =
            self.debug.json_every != 0 && (self.tick as u32) % self.debug.json_every == 0;
        if print_hit {
            self.print_debug_block();
        }
        // One dump even when both cadences land on the same tick; the dump
        // drains the ledger, so a second write would leave an empty file.
        if print_hit || json_hit {
            let _ = self.ledger.write_jsonl(&self.log_dir, self.tick);
        }
        self.tick += 1;
    }

    fn print_debug_block(&self) {
        let s = &self.state;
        println!(
            "[{:6}] v={:6.2} m/s yaw={:6.3} gear={:2} rpm={:5.0} grounded={}",
            self.tick, s.forward_speed, s.yaw_rate, s.gear, s.engine_rpm,
            s.grounded_wheels(),
        );
        for (i, w) in s.wheels.iter().enumerate() {
            if w.grounded {
                println!(
                    "  w{i} fz={:7.1} omega={:7.2} fx={:8.1} fy={:8.1} sr={:6.3}",
                    w.normal_force, w.omega, w.force_long, w.force_lat, w.slip_ratio,
                );
            }
        }
    }

    fn run_stage<B: ChassisBody>(
        &mut self,
        stage: VehicleStage,
        body: &mut B,
        ground: &dyn Ground,
        input: &mut VehicleInput,
        ctx: StepCtx,
    ) {
        match stage {
            VehicleStage::Contact => {
                self.contact.tick(&*body, ground, &mut self.state, ctx);
                for (i, w) in self.state.wheels.iter().enumerate() {
                    if w.grounded {
                        self.ledger.push(LedgerEvent::Contact {
                            wheel: i,
                            fz: w.normal_force,
                            compression: w.compression,
                        });
                    }
                }
            }
            VehicleStage::Powertrain => {
                self.powertrain.tick(input, &mut self.state, ctx);
                self.ledger.push(LedgerEvent::EngineSample {
                    rpm: self.state.engine_rpm,
                    gear: self.state.gear,
                });
            }
            VehicleStage::Braking => {
                self.braking.tick(input, &mut self.state);
            }
            VehicleStage::Tire => {
                self.tire.tick(body, input, &mut self.state, ctx);
                for (i, w) in self.state.wheels.iter().enumerate() {
                    if w.grounded {
                        self.ledger.push(LedgerEvent::TireSolve {
                            wheel: i,
                            fx: w.force_long,
                            fy: w.force_lat,
                            slip_ratio: w.slip_ratio,
                            slip_angle: w.slip_angle,
                        });
                    }
                }
            }
            VehicleStage::Steering => {
                self.last_steer_torque = self.steering.tick(body, input, &self.state, ctx);
                if let Some(nm) = self.last_steer_torque {
                    self.ledger.push(LedgerEvent::SteerTorque { nm });
                }
            }
            VehicleStage::Aux => {
                if let Some(drag) = &self.drag {
                    drag.tick(body, &self.state);
                }
            }
        }
    }

    /// Snapshot the host body's kinematics into the shared state before any
    /// stage runs, so every stage sees the same pre-step view.
    fn fill_kinematics<B: ChassisBody>(&mut self, body: &B) {
        let lin = body.linear_velocity();
        let inv_rot = body.pose().rot.conjugate();
        self.state.velocity_world = lin;
        self.state.velocity_local = inv_rot * lin;
        self.state.speed = lin.length();
        self.state.forward_speed = lin.dot(body.forward());
        self.state.yaw_rate = body.angular_velocity().dot(body.up());
    }

    /// Forward a host collision notification to the ledger and registered
    /// sinks.
    pub fn notify_collision(&mut self, event: CollisionEvent) {
        self.ledger.push(LedgerEvent::Collision {
            impulse: event.impulse,
            point: [event.point.x, event.point.y, event.point.z],
        });
        for sink in &mut self.sinks {
            sink.on_collision(&event);
        }
    }

    pub fn schedule_digest(&self) -> [u8; 32] {
        self.schedule.digest()
    }

    /// Quantized digest of the simulation-visible state; equal inputs and
    /// equal histories must produce equal hashes.
    pub fn state_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.update_bytes(&self.tick.to_le_bytes());
        hash_vec3(&mut h, &self.state.velocity_world);
        for v in [
            self.state.speed,
            self.state.forward_speed,
            self.state.yaw_rate,
            self.state.engine_rpm,
            self.state.avg_drive_omega,
        ] {
            h.update_bytes(&quantize(v).to_le_bytes());
        }
        h.update_bytes(&[self.state.gear as u8]);
        for i in 0..WHEEL_COUNT {
            let w = &self.state.wheels[i];
            h.update_bytes(&[w.grounded as u8]);
            for v in [w.normal_force, w.omega, w.force_long, w.force_lat] {
                h.update_bytes(&quantize(v).to_le_bytes());
            }
        }
        h.finalize()
    }
}
