//! Shared per-vehicle state threaded through every pipeline stage.
//!
//! Ownership contract (single writer per field):
//! - contact stage writes `grounded`, `contact_point`, `surface_normal`,
//!   `normal_force`, `compression`
//! - powertrain stage writes `drive_torque`, `engine_rpm`, `gear`,
//!   `avg_drive_omega`
//! - braking stage writes `brake_torque`
//! - tire stage writes `omega` and the diagnostic slip/force fields
//! - steering stage writes `yaw_rate` diagnostics only via the orchestrator
//!
//! `omega` is the only wheel field with cross-tick memory.

use crate::types::Vec3;

pub const WHEEL_FL: usize = 0;
pub const WHEEL_RL: usize = 1;
pub const WHEEL_FR: usize = 2;
pub const WHEEL_RR: usize = 3;
pub const WHEEL_COUNT: usize = 4;

pub const FRONT_WHEELS: [usize; 2] = [WHEEL_FL, WHEEL_FR];
pub const REAR_WHEELS: [usize; 2] = [WHEEL_RL, WHEEL_RR];

/// Driver input snapshot, immutable for the tick apart from the shift flags,
/// which are edge-triggered and must be consumed exactly once.
#[derive(Copy, Clone, Debug, Default)]
pub struct VehicleInput {
    pub throttle: f32,
    pub brake: f32,
    pub steer: f32,
    pub handbrake: f32,
    shift_up: bool,
    shift_down: bool,
}

impl VehicleInput {
    pub fn new(throttle: f32, brake: f32, steer: f32, handbrake: f32) -> Self {
        Self {
            throttle: throttle.clamp(0.0, 1.0),
            brake: brake.clamp(0.0, 1.0),
            steer: steer.clamp(-1.0, 1.0),
            handbrake: handbrake.clamp(0.0, 1.0),
            shift_up: false,
            shift_down: false,
        }
    }

    pub fn with_shift_up(mut self) -> Self { self.shift_up = true; self }
    pub fn with_shift_down(mut self) -> Self { self.shift_down = true; self }

    /// Consume the shift-up edge. Returns true at most once per snapshot.
    pub fn take_shift_up(&mut self) -> bool {
        std::mem::take(&mut self.shift_up)
    }

    pub fn take_shift_down(&mut self) -> bool {
        std::mem::take(&mut self.shift_down)
    }
}

/// Per-wheel runtime record. Contact-derived fields are rewritten every tick;
/// losing ground contact zeroes them immediately.
#[derive(Copy, Clone, Debug)]
pub struct WheelRuntime {
    pub grounded: bool,
    pub contact_point: Vec3,
    pub surface_normal: Vec3,
    pub normal_force: f32,
    pub compression: f32,

    /// Wheel spin rate (rad/s). NaN until the first grounded tick seeds it.
    pub omega: f32,

    pub drive_torque: f32,
    pub brake_torque: f32,

    // Diagnostics only; nothing downstream reads these back.
    pub slip_angle: f32,
    pub slip_ratio: f32,
    pub force_long: f32,
    pub force_lat: f32,
}

impl Default for WheelRuntime {
    fn default() -> Self {
        Self {
            grounded: false,
            contact_point: Vec3::ZERO,
            surface_normal: Vec3::Y,
            normal_force: 0.0,
            compression: 0.0,
            omega: f32::NAN,
            drive_torque: 0.0,
            brake_torque: 0.0,
            slip_angle: 0.0,
            slip_ratio: 0.0,
            force_long: 0.0,
            force_lat: 0.0,
        }
    }
}

impl WheelRuntime {
    /// Clear the per-tick contact fields. `omega` is deliberately untouched.
    pub fn clear_contact(&mut self) {
        self.grounded = false;
        self.contact_point = Vec3::ZERO;
        self.surface_normal = Vec3::Y;
        self.normal_force = 0.0;
    }

    pub fn is_front(index: usize) -> bool {
        index == WHEEL_FL || index == WHEEL_FR
    }
}

/// Mutable vehicle state owned by the orchestrator and passed by reference
/// into each stage in pipeline order.
#[derive(Clone, Debug)]
pub struct VehicleState {
    pub velocity_world: Vec3,
    pub velocity_local: Vec3,
    pub speed: f32,
    pub forward_speed: f32,
    pub yaw_rate: f32,

    pub engine_rpm: f32,
    /// Averaged spin of the driven wheel set (rad/s), powertrain-owned.
    pub avg_drive_omega: f32,
    /// -1 reverse, 0 neutral, 1..N forward.
    pub gear: i8,
    pub wheel_radius: f32,

    pub wheels: [WheelRuntime; WHEEL_COUNT],
}

impl VehicleState {
    pub fn new(wheel_radius: f32) -> Self {
        Self {
            velocity_world: Vec3::ZERO,
            velocity_local: Vec3::ZERO,
            speed: 0.0,
            forward_speed: 0.0,
            yaw_rate: 0.0,
            engine_rpm: 0.0,
            avg_drive_omega: 0.0,
            gear: 0,
            wheel_radius,
            wheels: [WheelRuntime::default(); WHEEL_COUNT],
        }
    }

    pub fn grounded_wheels(&self) -> usize {
        self.wheels.iter().filter(|w| w.grounded).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_flags_consume_once() {
        let mut input = VehicleInput::new(0.0, 0.0, 0.0, 0.0).with_shift_up();
        assert!(input.take_shift_up());
        assert!(!input.take_shift_up());
        assert!(!input.take_shift_down());
    }

    #[test]
    fn fresh_wheel_omega_is_nan() {
        let w = WheelRuntime::default();
        assert!(w.omega.is_nan());
    }

    #[test]
    fn front_rear_index_convention() {
        assert!(WheelRuntime::is_front(WHEEL_FL));
        assert!(WheelRuntime::is_front(WHEEL_FR));
        assert!(!WheelRuntime::is_front(WHEEL_RL));
        assert!(!WheelRuntime::is_front(WHEEL_RR));
    }
}
