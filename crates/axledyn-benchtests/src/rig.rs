//! Scenario rig: vehicle + free-body chassis + flat ground, stepped with
//! explicit gravity so the suspension carries a realistic load.

use std::path::Path;

use axledyn_core::{iso, quat_identity, vec3, Vec3, VehicleInput, Velocity};
use axledyn_dynamics::{Chassis, ChassisBody};
use axledyn_ground::FlatGround;
use axledyn_specs::VehicleSpec;
use axledyn_vehicle::Vehicle;
use axledyn_viz::DebugSettings;

const GRAVITY: f32 = 9.81;

pub struct Rig {
    pub vehicle: Vehicle,
    pub body: Chassis,
    pub ground: FlatGround,
}

impl Rig {
    pub fn new(spec: VehicleSpec, debug: DebugSettings, out: &Path) -> Self {
        let body = Chassis::new_box(
            iso(vec3(0.0, 0.5, 0.0), quat_identity()),
            spec.mass_kg,
            vec3(1.9, 0.55, 0.85),
        );
        let mut vehicle = Vehicle::from_spec(spec);
        vehicle.set_debug(debug);
        vehicle.set_log_dir(out);
        Self { vehicle, body, ground: FlatGround::new(0.0) }
    }

    /// Let the suspension and compression filter converge under gravity.
    pub fn settle(&mut self, dt: f32) {
        for _ in 0..120 {
            self.step(VehicleInput::default(), dt);
        }
    }

    pub fn set_forward_speed(&mut self, speed: f32) {
        let lin = self.body.forward() * speed;
        let ang = self.body.vel.ang;
        self.body.set_velocity(Velocity { lin, ang });
    }

    /// One tick with a fresh control snapshot; shift edges consumed inside
    /// the step stay consumed.
    pub fn step(&mut self, mut input: VehicleInput, dt: f32) {
        let mass = self.body.mass();
        let com = self.body.world_com();
        self.body.apply_force_at_point(vec3(0.0, -GRAVITY * mass, 0.0), com);
        self.vehicle.step(&mut self.body, &self.ground, &mut input, dt);
        self.body.integrate(dt);
    }

    pub fn maybe_print(&self, tick: u32, every: u32) {
        if every == 0 || tick % every != 0 {
            return;
        }
        let s = self.vehicle.state();
        let pos: Vec3 = self.body.pose.pos;
        println!(
            "t={tick:5} pos=({:6.2},{:5.2},{:6.2}) v={:5.2} m/s yaw={:6.3} rad/s gear={} rpm={:5.0} grounded={}",
            pos.x, pos.y, pos.z,
            s.forward_speed, s.yaw_rate, s.gear, s.engine_rpm,
            s.grounded_wheels(),
        );
    }
}
