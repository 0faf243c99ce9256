//! Read-only vehicle configuration records.
//!
//! Specs are loaded once (JSON via serde) and referenced for the lifetime of
//! the simulation; nothing in the tick path mutates them. Hot-reload is out
//! of scope.

pub mod curve;

pub use curve::Curve;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine model parameters. Curves run over normalized RPM:
/// `t = clamp01((rpm - idle) / (max - idle))`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSpec {
    pub idle_rpm: f32,
    pub max_rpm: f32,
    pub max_torque_nm: f32,
    /// Constant torque when coasting near idle (keeps the engine turning).
    pub idle_torque_nm: f32,
    /// RPM band around idle inside which idle torque applies at zero throttle.
    pub idle_band_rpm: f32,
    /// First-order smoothing rate for display RPM (1/s).
    pub rpm_inertia: f32,
    pub torque_curve: Curve,
    pub power_curve: Curve,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GearboxSpec {
    pub forward_ratios: Vec<f32>,
    pub reverse_ratio: f32,
    pub final_drive: f32,
    /// Shift blackout duration (s); ratio is forced to zero while it runs.
    pub shift_time_s: f32,
    /// Lockout after a completed shift before the next may begin (s).
    pub shift_cooldown_s: f32,
    pub auto_up_rpm: f32,
    pub auto_down_rpm: f32,
    /// Minimum forward speed (m/s) before an automatic upshift is allowed.
    pub min_upshift_speed: f32,
    /// |forward speed| below which the automatic box may swap between
    /// reverse and first.
    pub low_speed_engage: f32,
    pub automatic: bool,
}

impl GearboxSpec {
    pub fn top_gear(&self) -> i8 {
        self.forward_ratios.len() as i8
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WheelSpec {
    pub radius_m: f32,
    pub mu_long: f32,
    pub mu_lat: f32,
    pub rolling_resistance_nm: f32,
    pub mass_kg: f32,
    /// I = k * m * r^2; ~0.8 for a tire+rim assembly.
    pub inertia_coeff: f32,
    /// Slip-angle stiffness inside the tanh saturation.
    pub cornering_stiffness: f32,
    /// Small linear v_lat damping folded in before saturation.
    pub lateral_damping: f32,
    pub front_long_scale: f32,
    pub front_lat_scale: f32,
    pub rear_long_scale: f32,
    pub rear_lat_scale: f32,
    /// Static bound = hysteresis * kinetic bound in the stick/slip solve.
    pub stick_hysteresis: f32,
    /// Floor for |v_long| in the slip-angle atan2.
    pub ref_speed_alpha: f32,
    /// Below this planar contact speed the slip angle is zeroed.
    pub min_slip_speed: f32,
    pub max_omega: f32,
    /// Spin damping when a gear is engaged and the throttle is closed (1/s).
    pub engine_brake_damping: f32,
}

impl WheelSpec {
    pub fn inertia(&self) -> f32 {
        self.inertia_coeff * self.mass_kg * self.radius_m * self.radius_m
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SuspensionSpec {
    pub rest_length_m: f32,
    pub max_compression_m: f32,
    pub max_droop_m: f32,
    pub spring_n_per_m: f32,
    pub damper_ns_per_m: f32,
    pub max_force_n: f32,
    pub damper_force_limit_n: f32,
    /// Low-pass rate for compression (1/s); 0 disables filtering.
    pub compression_filter: f32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SteeringSpec {
    pub wheelbase_m: f32,
    pub max_steer_angle_rad: f32,
    pub mu_base: f32,
    pub friction_circle_strength: f32,
    /// How much throttle counts toward longitudinal pedal usage.
    pub throttle_friction_effect: f32,
    pub yaw_response_s: f32,
    pub max_yaw_accel: f32,
    pub handbrake_grip_mul: f32,
    pub min_forward_speed: f32,
    pub torque_bound_nm: f32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BrakeSpec {
    pub max_brake_torque_nm: f32,
    /// Fraction of brake torque routed to the front axle.
    pub front_bias: f32,
    /// Handbrake torque, rear wheels only.
    pub handbrake_torque_nm: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrivetrainLayout {
    Front,
    Rear,
    All,
}

impl DrivetrainLayout {
    /// Indices of driven wheels under the fixed FL,RL,FR,RR convention.
    pub fn driven_wheels(&self) -> &'static [usize] {
        match self {
            DrivetrainLayout::Front => &[0, 2],
            DrivetrainLayout::Rear => &[1, 3],
            DrivetrainLayout::All => &[0, 1, 2, 3],
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DragSpec {
    pub air_density: f32,
    pub drag_coeff: f32,
    pub frontal_area_m2: f32,
}

/// Full vehicle description. Engine/gearbox are optional: absence degrades
/// to zero drive torque rather than a fault.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub mass_kg: f32,
    pub engine: Option<EngineSpec>,
    pub gearbox: Option<GearboxSpec>,
    pub wheel: WheelSpec,
    pub suspension: SuspensionSpec,
    pub steering: SteeringSpec,
    pub brakes: BrakeSpec,
    pub layout: DrivetrainLayout,
    pub drag: Option<DragSpec>,
    /// Wheel mount offsets in chassis space, FL,RL,FR,RR. +X forward, +Y up.
    pub wheel_mounts: [[f32; 3]; 4],
}

impl VehicleSpec {
    /// Small test hatchback; numbers match the launch scenario used across
    /// the test suites.
    pub fn test_hatch() -> Self {
        Self {
            mass_kg: 1200.0,
            engine: Some(EngineSpec {
                idle_rpm: 800.0,
                max_rpm: 6500.0,
                max_torque_nm: 155.0,
                idle_torque_nm: 20.0,
                idle_band_rpm: 150.0,
                rpm_inertia: 6.0,
                torque_curve: Curve::from_samples(vec![0.55, 0.85, 1.0, 0.95, 0.78]),
                power_curve: Curve::from_samples(vec![0.10, 0.45, 0.80, 1.0, 0.92]),
            }),
            gearbox: Some(GearboxSpec {
                forward_ratios: vec![3.5, 2.0, 1.4, 1.0, 0.8],
                reverse_ratio: 3.2,
                final_drive: 3.9,
                shift_time_s: 0.25,
                shift_cooldown_s: 0.35,
                auto_up_rpm: 5800.0,
                auto_down_rpm: 1600.0,
                min_upshift_speed: 4.0,
                low_speed_engage: 0.5,
                automatic: true,
            }),
            wheel: WheelSpec {
                radius_m: 0.3,
                mu_long: 1.0,
                mu_lat: 0.95,
                rolling_resistance_nm: 8.0,
                mass_kg: 18.0,
                inertia_coeff: 0.8,
                cornering_stiffness: 8.0,
                lateral_damping: 0.02,
                front_long_scale: 1.0,
                front_lat_scale: 1.0,
                rear_long_scale: 1.0,
                rear_lat_scale: 0.95,
                stick_hysteresis: 1.15,
                ref_speed_alpha: 1.0,
                min_slip_speed: 0.3,
                max_omega: 1000.0,
                engine_brake_damping: 0.6,
            },
            suspension: SuspensionSpec {
                rest_length_m: 0.35,
                max_compression_m: 0.18,
                max_droop_m: 0.12,
                spring_n_per_m: 42_000.0,
                damper_ns_per_m: 3_800.0,
                max_force_n: 14_000.0,
                damper_force_limit_n: 5_000.0,
                compression_filter: 30.0,
            },
            steering: SteeringSpec {
                wheelbase_m: 2.55,
                max_steer_angle_rad: 0.55,
                mu_base: 0.95,
                friction_circle_strength: 0.85,
                throttle_friction_effect: 0.4,
                yaw_response_s: 0.22,
                max_yaw_accel: 6.0,
                handbrake_grip_mul: 0.45,
                min_forward_speed: 1.0,
                torque_bound_nm: 60_000.0,
            },
            brakes: BrakeSpec {
                max_brake_torque_nm: 1_400.0,
                front_bias: 0.62,
                handbrake_torque_nm: 900.0,
            },
            layout: DrivetrainLayout::Front,
            drag: Some(DragSpec {
                air_density: 1.225,
                drag_coeff: 0.32,
                frontal_area_m2: 2.1,
            }),
            wheel_mounts: [
                [1.25, -0.25, 0.78],
                [-1.30, -0.25, 0.78],
                [1.25, -0.25, -0.78],
                [-1.30, -0.25, -0.78],
            ],
        }
    }
}

pub fn load_vehicle_spec(path: &Path) -> Result<VehicleSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read vehicle spec: {}", path.display()))?;
    let spec: VehicleSpec = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse vehicle spec: {}", path.display()))?;
    Ok(spec)
}

pub fn write_vehicle_spec(spec: &VehicleSpec, path: &Path, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(spec)?
    } else {
        serde_json::to_string(spec)?
    };
    std::fs::write(path, json)
        .with_context(|| format!("failed to write vehicle spec: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let spec = VehicleSpec::test_hatch();
        let json = serde_json::to_string(&spec).unwrap();
        let back: VehicleSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gearbox.as_ref().unwrap().forward_ratios.len(), 5);
        assert!((back.wheel.radius_m - 0.3).abs() < 1e-6);
        assert_eq!(back.layout, DrivetrainLayout::Front);
    }

    #[test]
    fn driven_wheel_sets() {
        assert_eq!(DrivetrainLayout::Front.driven_wheels(), &[0, 2]);
        assert_eq!(DrivetrainLayout::Rear.driven_wheels(), &[1, 3]);
        assert_eq!(DrivetrainLayout::All.driven_wheels().len(), 4);
    }

    #[test]
    fn wheel_inertia_matches_coefficient() {
        let w = VehicleSpec::test_hatch().wheel;
        let expect = 0.8 * 18.0 * 0.3 * 0.3;
        assert!((w.inertia() - expect).abs() < 1e-4);
    }
}
