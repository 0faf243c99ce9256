use axledyn_core::{VehicleInput, VehicleState, WheelRuntime, WHEEL_COUNT};
use axledyn_specs::BrakeSpec;

/// Brake-torque request stage. Writes `brake_torque` for every wheel;
/// the tire stage turns the request into a signed spin-opposing torque.
pub struct Braking {
    spec: BrakeSpec,
}

impl Braking {
    pub fn new(spec: BrakeSpec) -> Self {
        Self { spec }
    }

    pub fn tick(&self, input: &VehicleInput, state: &mut VehicleState) {
        for i in 0..WHEEL_COUNT {
            let axle_share = if WheelRuntime::is_front(i) {
                self.spec.front_bias
            } else {
                1.0 - self.spec.front_bias
            };
            let mut torque = input.brake * self.spec.max_brake_torque_nm * axle_share;
            if !WheelRuntime::is_front(i) {
                torque += input.handbrake * self.spec.handbrake_torque_nm;
            }
            state.wheels[i].brake_torque = torque;
        }
    }
}
