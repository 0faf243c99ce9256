//! Yaw-rate steering controller.
//!
//! Bicycle-model yaw-rate target, grip-limited by a friction circle fed from
//! pedal usage, tracked by a clamped rate controller that outputs a torque
//! about the chassis up axis. The controller never writes wheel state; its
//! only output is the torque handed to the host body.

use axledyn_core::{StepCtx, VehicleInput, VehicleState};
use axledyn_dynamics::ChassisBody;
use axledyn_specs::SteeringSpec;

const GRAVITY: f32 = 9.81;
const STEER_DEADZONE: f32 = 1.0e-3;

pub struct SteeringController {
    spec: SteeringSpec,
    vehicle_mass: f32,
}

impl SteeringController {
    pub fn new(spec: SteeringSpec, vehicle_mass: f32) -> Self {
        Self { spec, vehicle_mass }
    }

    /// Returns the applied yaw torque, or `None` when steering is inactive
    /// (dead zone, below the speed threshold, or a non-finite result).
    pub fn tick(
        &self,
        body: &mut (impl ChassisBody + ?Sized),
        input: &VehicleInput,
        state: &VehicleState,
        _ctx: StepCtx,
    ) -> Option<f32> {
        let spec = &self.spec;
        let v_fwd = state.forward_speed;
        if input.steer.abs() < STEER_DEADZONE || v_fwd.abs() < spec.min_forward_speed {
            return None;
        }

        let steer_angle = input.steer * spec.max_steer_angle_rad;
        let speed = v_fwd.abs().max(0.1);
        let target = (speed / spec.wheelbase_m.max(0.1)) * steer_angle.tan();

        // Grip-limited yaw rate, shrunk by longitudinal pedal usage on the
        // friction circle, then by the handbrake penalty.
        let base_limit = spec.mu_base * GRAVITY / speed;
        let long_usage =
            (input.brake + input.throttle * spec.throttle_friction_effect).clamp(0.0, 1.0);
        let circle = long_usage * spec.friction_circle_strength;
        let lat_grip = (1.0 - circle * circle).max(0.0).sqrt();
        let handbrake_grip = 1.0 + (spec.handbrake_grip_mul - 1.0) * input.handbrake;
        let limit = base_limit * lat_grip * handbrake_grip;

        let target = target.clamp(-limit, limit);
        let yaw_accel = ((target - state.yaw_rate) / spec.yaw_response_s.max(1.0e-3))
            .clamp(-spec.max_yaw_accel, spec.max_yaw_accel);

        // Flat-plate yaw inertia estimate; good enough for a rate controller.
        let yaw_inertia = self.vehicle_mass * spec.wheelbase_m * spec.wheelbase_m;
        let torque = (yaw_accel * yaw_inertia)
            .clamp(-spec.torque_bound_nm, spec.torque_bound_nm);
        if !torque.is_finite() {
            return None;
        }

        body.apply_torque(body.up() * torque);
        Some(torque)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axledyn_core::{iso, quat_identity, vec3};
    use axledyn_dynamics::Chassis;
    use axledyn_specs::VehicleSpec;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (SteeringController, Chassis, VehicleState) {
        let spec = VehicleSpec::test_hatch();
        let ctrl = SteeringController::new(spec.steering, spec.mass_kg);
        let body = Chassis::new_box(
            iso(vec3(0.0, 0.55, 0.0), quat_identity()),
            spec.mass_kg,
            vec3(1.9, 0.55, 0.85),
        );
        (ctrl, body, VehicleState::new(spec.wheel.radius_m))
    }

    #[test]
    fn inactive_below_speed_threshold() {
        let (ctrl, mut body, mut state) = setup();
        state.forward_speed = 0.5; // under min_forward_speed = 1.0
        let input = VehicleInput::new(0.0, 0.0, 1.0, 0.0);
        assert!(ctrl.tick(&mut body, &input, &state, StepCtx::new(DT, 0)).is_none());
        body.integrate(DT);
        assert_eq!(body.vel.ang.y, 0.0);
    }

    #[test]
    fn inactive_in_steer_dead_zone() {
        let (ctrl, mut body, mut state) = setup();
        state.forward_speed = 10.0;
        let input = VehicleInput::new(0.5, 0.0, 0.0, 0.0);
        assert!(ctrl.tick(&mut body, &input, &state, StepCtx::new(DT, 0)).is_none());
    }

    #[test]
    fn positive_steer_yaws_the_nose_right() {
        let (ctrl, mut body, mut state) = setup();
        state.forward_speed = 10.0;
        let input = VehicleInput::new(0.3, 0.0, 1.0, 0.0);
        let torque = ctrl.tick(&mut body, &input, &state, StepCtx::new(DT, 0)).unwrap();
        // Positive yaw rate about +Y carries the +X nose toward -Z, the
        // same right turn the steered contact frame produces.
        assert!(torque > 0.0);
        body.integrate(DT);
        assert!(body.vel.ang.y > 0.0);
    }

    #[test]
    fn handbrake_shrinks_yaw_authority() {
        let (ctrl, mut body, mut state) = setup();
        state.forward_speed = 10.0;
        let plain = VehicleInput::new(0.0, 0.0, 1.0, 0.0);
        let pulled = VehicleInput::new(0.0, 0.0, 1.0, 1.0);
        let t_plain = ctrl.tick(&mut body, &plain, &state, StepCtx::new(DT, 0)).unwrap();
        let t_pulled = ctrl.tick(&mut body, &pulled, &state, StepCtx::new(DT, 0)).unwrap();
        assert!(t_pulled.abs() < t_plain.abs());
    }

    #[test]
    fn braking_shrinks_yaw_authority() {
        let (ctrl, mut body, mut state) = setup();
        state.forward_speed = 10.0;
        let coasting = VehicleInput::new(0.0, 0.0, 1.0, 0.0);
        let braking = VehicleInput::new(0.0, 1.0, 1.0, 0.0);
        let t_coast = ctrl.tick(&mut body, &coasting, &state, StepCtx::new(DT, 0)).unwrap();
        let t_brake = ctrl.tick(&mut body, &braking, &state, StepCtx::new(DT, 0)).unwrap();
        assert!(t_brake.abs() < t_coast.abs());
    }

    #[test]
    fn torque_respects_safety_bound() {
        let (ctrl, mut body, mut state) = setup();
        state.forward_speed = 40.0;
        state.yaw_rate = -5.0; // large tracking error
        let input = VehicleInput::new(0.0, 0.0, 1.0, 0.0);
        let torque = ctrl.tick(&mut body, &input, &state, StepCtx::new(DT, 0)).unwrap();
        let spec = VehicleSpec::test_hatch().steering;
        assert!(torque.abs() <= spec.torque_bound_nm);
    }
}
