//! Engine + gearbox controller and the brake-torque request stage.
//!
//! Owns the smoothed display RPM and the gearbox timers as private state;
//! writes `engine_rpm`, `gear`, `avg_drive_omega` and per-wheel
//! `drive_torque` into the shared `VehicleState`.

pub mod braking;
pub mod engine;
pub mod gearbox;

pub use braking::Braking;
pub use gearbox::{Gearbox, GEAR_NEUTRAL, GEAR_REVERSE};

use axledyn_core::{StepCtx, VehicleInput, VehicleState, WHEEL_COUNT};
use axledyn_specs::{DrivetrainLayout, EngineSpec, GearboxSpec};

pub struct Powertrain {
    engine: Option<EngineSpec>,
    gearbox_spec: Option<GearboxSpec>,
    layout: DrivetrainLayout,
    gearbox: Gearbox,
    /// Smoothed display RPM; the limiter never reads this.
    rpm: f32,
}

impl Powertrain {
    pub fn new(
        engine: Option<EngineSpec>,
        gearbox_spec: Option<GearboxSpec>,
        layout: DrivetrainLayout,
    ) -> Self {
        let rpm = engine.as_ref().map(|e| e.idle_rpm).unwrap_or(0.0);
        Self { engine, gearbox_spec, layout, gearbox: Gearbox::new(), rpm }
    }

    /// Scenario setup: force an initial gear with no shift in flight.
    /// Out-of-range requests clamp to the configured gear set.
    pub fn force_gear(&mut self, gear: i8) {
        let top = self
            .gearbox_spec
            .as_ref()
            .map(|s| s.top_gear())
            .unwrap_or(GEAR_NEUTRAL);
        self.gearbox = Gearbox::with_gear(gear.clamp(GEAR_REVERSE, top));
    }

    pub fn gearbox(&self) -> &Gearbox { &self.gearbox }

    pub fn tick(&mut self, input: &mut VehicleInput, state: &mut VehicleState, ctx: StepCtx) {
        // Shift flags are edge-triggered: consume them exactly once per tick
        // even when no gearbox is configured.
        let want_up = input.take_shift_up();
        let want_down = input.take_shift_down();

        // Missing configuration degrades to zero drive torque, nothing else.
        let (Some(engine), Some(gb_spec)) = (self.engine.as_ref(), self.gearbox_spec.as_ref())
        else {
            for w in &mut state.wheels {
                w.drive_torque = 0.0;
            }
            return;
        };

        self.gearbox.tick_timers(gb_spec, ctx.dt);

        if want_up {
            let _ = self.gearbox.shift_up(gb_spec);
        }
        if want_down {
            let _ = self.gearbox.shift_down(gb_spec);
        }

        // Averaged driven wheel spin; NaN (never-grounded) wheels don't vote.
        let driven = self.layout.driven_wheels();
        let mut omega_sum = 0.0;
        let mut omega_n = 0u32;
        for &i in driven {
            let o = state.wheels[i].omega;
            if o.is_finite() {
                omega_sum += o;
                omega_n += 1;
            }
        }
        let avg_omega = if omega_n > 0 { omega_sum / omega_n as f32 } else { 0.0 };
        state.avg_drive_omega = avg_omega;

        // Mechanical RPM through the engaged gear (zero path while shifting).
        let ratio = self.gearbox.current_ratio(gb_spec);
        let connected = self.gearbox.is_engaged();
        let mech_rpm = engine::omega_to_rpm(avg_omega.abs() * ratio.abs());

        if gb_spec.automatic {
            Self::auto_shift(&mut self.gearbox, gb_spec, input, state.forward_speed, mech_rpm);
        }

        // Ratio may have changed under an automatic shift.
        let ratio = self.gearbox.current_ratio(gb_spec);

        let target_rpm = if connected {
            mech_rpm
        } else {
            engine.idle_rpm + input.throttle * (engine.max_rpm - engine.idle_rpm)
        };
        self.rpm = engine::smooth_rpm(engine, self.rpm, target_rpm, ctx.dt);
        state.engine_rpm = self.rpm;
        state.gear = self.gearbox.gear();

        let shaft = engine::shaft_torque(engine, self.rpm, mech_rpm, input.throttle);
        let wheel_torque_total = shaft * ratio;

        let grounded_driven =
            driven.iter().filter(|&&i| state.wheels[i].grounded).count() as f32;
        for i in 0..WHEEL_COUNT {
            state.wheels[i].drive_torque = 0.0;
        }
        if grounded_driven > 0.0 && wheel_torque_total != 0.0 {
            let per_wheel = wheel_torque_total / grounded_driven;
            for &i in driven {
                if state.wheels[i].grounded {
                    state.wheels[i].drive_torque = per_wheel;
                }
            }
        }
    }

    // Free of `self` so the caller can keep the spec borrows alive while the
    // gearbox mutates.
    fn auto_shift(
        gearbox: &mut Gearbox,
        spec: &GearboxSpec,
        input: &VehicleInput,
        forward_speed: f32,
        mech_rpm: f32,
    ) {
        let gear = gearbox.gear();
        let near_stop = forward_speed.abs() < spec.low_speed_engage;

        if gear >= GEAR_NEUTRAL && near_stop && input.brake > 0.1 && input.throttle <= 0.1 {
            let _ = gearbox.shift_to_reverse(spec);
            return;
        }
        if gear == GEAR_REVERSE && near_stop && input.throttle > 0.1 {
            // Walk back up through neutral into first.
            let _ = gearbox.shift_up(spec);
            return;
        }
        if gear == GEAR_NEUTRAL && input.throttle > 0.1 {
            let _ = gearbox.shift_up(spec);
            return;
        }
        if gear >= 1 {
            if mech_rpm >= spec.auto_up_rpm
                && forward_speed >= spec.min_upshift_speed
                && gear < spec.top_gear()
            {
                let _ = gearbox.shift_up(spec);
            } else if mech_rpm <= spec.auto_down_rpm && gear > 1 && input.throttle > 0.1 {
                let _ = gearbox.shift_down(spec);
            }
        }
    }
}
