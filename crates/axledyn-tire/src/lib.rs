//! Tire force resolution: slip decomposition, saturating lateral force,
//! impulse-consistent longitudinal stick/slip solve, wheel spin update.
//!
//! The longitudinal channel is solved as a single-point rigid-body impulse:
//! find the contact impulse J that drives the slip velocity `omega*R - v_long`
//! to zero this step, bounded by the friction-ellipse budget left over after
//! lateral usage, with a static/kinetic hysteresis band deciding stick vs
//! slide. This is the only stage that writes `WheelRuntime.omega`.

pub mod frame;

use axledyn_core::{StepCtx, Vec3, VehicleInput, VehicleState, WheelRuntime, WHEEL_COUNT};
use axledyn_dynamics::ChassisBody;
use axledyn_specs::WheelSpec;
use frame::ContactFrame;

pub struct TireResolver {
    wheel: WheelSpec,
    max_steer_angle: f32,
}

/// Everything one wheel's solve produced; applied only if finite.
struct WheelSolve {
    force: Vec3,
    omega: f32,
    slip_angle: f32,
    slip_ratio: f32,
    fx: f32,
    fy: f32,
}

impl TireResolver {
    pub fn new(wheel: WheelSpec, max_steer_angle: f32) -> Self {
        Self { wheel, max_steer_angle }
    }

    pub fn tick(
        &self,
        body: &mut (impl ChassisBody + ?Sized),
        input: &VehicleInput,
        state: &mut VehicleState,
        ctx: StepCtx,
    ) {
        let steer_angle = input.steer * self.max_steer_angle;
        for i in 0..WHEEL_COUNT {
            // Zero budget or no contact: no force, no spin update.
            if !state.wheels[i].grounded || state.wheels[i].normal_force <= 0.0 {
                continue;
            }
            let front = WheelRuntime::is_front(i);
            let steer = if front { steer_angle } else { 0.0 };
            let Some(frame) = ContactFrame::build(body, state.wheels[i].surface_normal, steer)
            else {
                continue;
            };

            let gear_engaged = state.gear != 0;
            let Some(solve) = self.solve_wheel(
                body,
                &state.wheels[i],
                &frame,
                front,
                input,
                gear_engaged,
                ctx.dt,
            ) else {
                continue;
            };

            body.apply_force_at_point(solve.force, state.wheels[i].contact_point);
            let w = &mut state.wheels[i];
            w.omega = solve.omega;
            w.slip_angle = solve.slip_angle;
            w.slip_ratio = solve.slip_ratio;
            w.force_long = solve.fx;
            w.force_lat = solve.fy;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn solve_wheel(
        &self,
        body: &(impl ChassisBody + ?Sized),
        wheel: &WheelRuntime,
        frame: &ContactFrame,
        front: bool,
        input: &VehicleInput,
        gear_engaged: bool,
        dt: f32,
    ) -> Option<WheelSolve> {
        let spec = &self.wheel;
        let fz = wheel.normal_force;
        let (mu_long, mu_lat) = self.scaled_friction(front);
        let lat_budget = mu_lat * fz;
        let long_budget = mu_long * fz;
        if lat_budget <= 0.0 || long_budget <= 0.0 {
            return None;
        }

        let v_c = body.velocity_at_point(wheel.contact_point);
        let v_long = v_c.dot(frame.forward);
        let v_lat = v_c.dot(frame.lateral);

        // Slip angle, zeroed at standstill to avoid force injection.
        let planar = (v_long * v_long + v_lat * v_lat).sqrt();
        let alpha = if planar < spec.min_slip_speed {
            0.0
        } else {
            v_lat.atan2(spec.ref_speed_alpha.max(v_long.abs()))
        };

        let fy = -lat_budget
            * (spec.cornering_stiffness * alpha + spec.lateral_damping * v_lat).tanh();

        // Wheel spin after this tick's torques, before the contact impulse.
        let inertia = spec.inertia().max(1.0e-4);
        let radius = spec.radius_m;
        let omega0 = if wheel.omega.is_finite() {
            wheel.omega
        } else {
            // Ungrounded->grounded with uninitialized spin: seed from ground
            // speed so the first solve doesn't see a phantom lockup.
            v_long / radius.max(1.0e-3)
        };
        let torque = self.net_torque(wheel, omega0, v_long);
        let omega_pred = omega0 + dt * torque / inertia;

        // Effective inverse mass along the wheel-forward axis at the contact
        // point: 1/m + (r x d) . I^-1_world (r x d).
        let r_arm = wheel.contact_point - body.world_com();
        let rn = r_arm.cross(frame.forward);
        let k_body =
            (1.0 / body.mass().max(1.0e-3) + rn.dot(body.inv_inertia_world() * rn)).max(1.0e-6);

        let slip = omega_pred * radius - v_long;
        let denom = (radius * radius / inertia + k_body).max(1.0e-6);
        let j_unconstrained = slip / denom;

        // Friction ellipse: lateral usage eats the longitudinal budget.
        let fy_frac = (fy.abs() / lat_budget).min(1.0);
        let fx_max = long_budget * (1.0 - fy_frac * fy_frac).max(0.0).sqrt();
        let j_kinetic = fx_max * dt;
        let j_static = j_kinetic * spec.stick_hysteresis.max(1.0);

        let j = if j_unconstrained.abs() <= j_static {
            j_unconstrained // stick: slip fully removed this step
        } else {
            j_kinetic.copysign(j_unconstrained) // slide
        };

        let fx = j / dt.max(1.0e-6);
        let force = frame.forward * fx + frame.lateral * fy;
        if !force.is_finite() {
            return None;
        }

        let mut omega = omega_pred - (radius / inertia) * j;
        if gear_engaged && input.throttle <= 1.0e-3 {
            omega /= 1.0 + spec.engine_brake_damping * dt;
        }
        omega = omega.clamp(-spec.max_omega, spec.max_omega);
        if !omega.is_finite() {
            return None;
        }

        // Diagnostics from post-solve predicted velocities.
        let v_long_post = v_long + k_body * j;
        let slip_post = omega * radius - v_long_post;
        let slip_ratio = slip_post / v_long_post.abs().max(spec.ref_speed_alpha);

        Some(WheelSolve { force, omega, slip_angle: alpha, slip_ratio, fx, fy })
    }

    /// Drive + signed brake + rolling resistance at the wheel.
    fn net_torque(&self, wheel: &WheelRuntime, omega: f32, v_long: f32) -> f32 {
        let spec = &self.wheel;
        // Brake opposes spin; near-standstill spin falls back to the motion
        // direction so a held brake can't reverse the wheel.
        let spin_ref = if omega.abs() > 0.5 { omega } else { v_long };
        let mut torque = wheel.drive_torque;
        if spin_ref.abs() > 1.0e-3 {
            torque -= wheel.brake_torque.copysign(spin_ref);
            torque -= spec.rolling_resistance_nm.copysign(spin_ref);
        }
        torque
    }

    fn scaled_friction(&self, front: bool) -> (f32, f32) {
        let spec = &self.wheel;
        if front {
            (spec.mu_long * spec.front_long_scale, spec.mu_lat * spec.front_lat_scale)
        } else {
            (spec.mu_long * spec.rear_long_scale, spec.mu_lat * spec.rear_lat_scale)
        }
    }
}
