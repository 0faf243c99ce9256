use axledyn_core::VehicleState;
use axledyn_dynamics::ChassisBody;
use axledyn_specs::DragSpec;

/// Quadratic aerodynamic drag applied at the center of mass. Cosmetic, so it
/// never torques the body.
pub struct DragResolver {
    spec: DragSpec,
}

impl DragResolver {
    pub fn new(spec: DragSpec) -> Self {
        Self { spec }
    }

    pub fn tick(&self, body: &mut (impl ChassisBody + ?Sized), state: &VehicleState) {
        let v = state.velocity_world;
        let speed = state.speed;
        if speed < 0.1 {
            return;
        }
        let q = 0.5 * self.spec.air_density * self.spec.drag_coeff * self.spec.frontal_area_m2;
        let force = -v * (q * speed);
        if force.is_finite() {
            body.apply_force_at_point(force, body.world_com());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axledyn_core::{iso, quat_identity, vec3, Vec3, VehicleState, Velocity};
    use axledyn_dynamics::Chassis;
    use axledyn_specs::VehicleSpec;

    #[test]
    fn drag_opposes_motion_without_spin() {
        let spec = VehicleSpec::test_hatch();
        let drag = DragResolver::new(spec.drag.unwrap());
        let mut body = Chassis::new_box(
            iso(vec3(0.0, 0.5, 0.0), quat_identity()),
            spec.mass_kg,
            vec3(1.9, 0.55, 0.85),
        );
        body.set_velocity(Velocity { lin: vec3(30.0, 0.0, 0.0), ang: Vec3::ZERO });
        let mut state = VehicleState::new(spec.wheel.radius_m);
        state.velocity_world = vec3(30.0, 0.0, 0.0);
        state.speed = 30.0;
        drag.tick(&mut body, &state);
        body.integrate(1.0 / 60.0);
        assert!(body.vel.lin.x < 30.0);
        assert!(body.vel.ang.length() < 1e-6);
    }

    #[test]
    fn no_drag_near_standstill() {
        let spec = VehicleSpec::test_hatch();
        let drag = DragResolver::new(spec.drag.unwrap());
        let mut body = Chassis::new_box(
            iso(vec3(0.0, 0.5, 0.0), quat_identity()),
            spec.mass_kg,
            vec3(1.9, 0.55, 0.85),
        );
        let state = VehicleState::new(spec.wheel.radius_m);
        drag.tick(&mut body, &state);
        body.integrate(1.0 / 60.0);
        assert_eq!(body.vel.lin.x, 0.0);
    }
}
