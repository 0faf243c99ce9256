//! Wheel contact resolution: suspension cast, spring/damper normal load.
//!
//! Pure function of geometry plus the resolver's private filtered-compression
//! memory; writes only the contact-owned fields of each `WheelRuntime`.

use axledyn_core::{StepCtx, Vec3, VehicleState, WHEEL_COUNT};
use axledyn_dynamics::ChassisBody;
use axledyn_ground::Ground;
use axledyn_specs::SuspensionSpec;

pub struct ContactResolver {
    susp: SuspensionSpec,
    mounts: [Vec3; WHEEL_COUNT],
    // Low-pass state; private, never exposed through VehicleState.
    filtered: [f32; WHEEL_COUNT],
}

impl ContactResolver {
    pub fn new(susp: SuspensionSpec, mounts: [Vec3; WHEEL_COUNT]) -> Self {
        Self { susp, mounts, filtered: [0.0; WHEEL_COUNT] }
    }

    pub fn tick(
        &mut self,
        body: &impl ChassisBody,
        ground: &dyn Ground,
        state: &mut VehicleState,
        ctx: StepCtx,
    ) {
        let down = -body.up();
        let cast_len =
            self.susp.rest_length_m + self.susp.max_compression_m + self.susp.max_droop_m;
        let droop_limit = self.susp.rest_length_m + self.susp.max_droop_m;

        for i in 0..WHEEL_COUNT {
            let wheel = &mut state.wheels[i];
            wheel.clear_contact();

            let origin = body.to_world(self.mounts[i]);
            let Some(hit) = ground.cast_down(origin, down, cast_len) else {
                self.filtered[i] = 0.0;
                continue;
            };
            if hit.distance > droop_limit {
                self.filtered[i] = 0.0;
                continue;
            }

            let raw = (self.susp.rest_length_m - hit.distance)
                .clamp(0.0, self.susp.max_compression_m);
            let x = if self.susp.compression_filter > 0.0 {
                let a = (self.susp.compression_filter * ctx.dt).clamp(0.0, 1.0);
                self.filtered[i] += (raw - self.filtered[i]) * a;
                self.filtered[i]
            } else {
                self.filtered[i] = raw;
                raw
            };

            let v_rel = body.velocity_at_point(hit.point).dot(hit.normal);
            let damper = (self.susp.damper_ns_per_m * -v_rel)
                .clamp(-self.susp.damper_force_limit_n, self.susp.damper_force_limit_n);
            let fz = (self.susp.spring_n_per_m * x + damper).clamp(0.0, self.susp.max_force_n);

            wheel.grounded = true;
            wheel.contact_point = hit.point;
            wheel.surface_normal = hit.normal;
            wheel.compression = x;
            wheel.normal_force = fz;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axledyn_core::{iso, quat_identity, vec3, Velocity};
    use axledyn_dynamics::Chassis;
    use axledyn_ground::FlatGround;
    use axledyn_specs::VehicleSpec;

    fn setup(ride_height: f32) -> (Chassis, ContactResolver, VehicleState) {
        let spec = VehicleSpec::test_hatch();
        let mounts = spec.wheel_mounts.map(|m| vec3(m[0], m[1], m[2]));
        let body = Chassis::new_box(
            iso(vec3(0.0, ride_height, 0.0), quat_identity()),
            spec.mass_kg,
            vec3(1.9, 0.55, 0.85),
        );
        let resolver = ContactResolver::new(spec.suspension, mounts);
        let state = VehicleState::new(spec.wheel.radius_m);
        (body, resolver, state)
    }

    #[test]
    fn resting_wheels_ground_with_positive_load() {
        // Mounts sit at y = ride - 0.25; rest length 0.35 -> compression at
        // ride height 0.5 is 0.35 - 0.25 = 0.10.
        let (body, mut resolver, mut state) = setup(0.5);
        let ground = FlatGround::new(0.0);
        // Let the compression filter converge.
        for _ in 0..120 {
            resolver.tick(&body, &ground, &mut state, StepCtx::new(1.0 / 60.0, 0));
        }
        for w in &state.wheels {
            assert!(w.grounded);
            assert!(w.normal_force > 0.0);
            assert!((w.compression - 0.10).abs() < 1e-3);
        }
    }

    #[test]
    fn airborne_wheels_report_zero_immediately() {
        let (body, mut resolver, mut state) = setup(5.0);
        let ground = FlatGround::new(0.0);
        resolver.tick(&body, &ground, &mut state, StepCtx::new(1.0 / 60.0, 0));
        for w in &state.wheels {
            assert!(!w.grounded);
            assert_eq!(w.normal_force, 0.0);
        }
    }

    #[test]
    fn droop_window_bounds_grounding() {
        // Hang the chassis so the cast hits past rest+droop: ungrounded.
        let (body, mut resolver, mut state) = setup(0.85);
        let ground = FlatGround::new(0.0);
        resolver.tick(&body, &ground, &mut state, StepCtx::new(1.0 / 60.0, 0));
        assert!(state.wheels.iter().all(|w| !w.grounded));
    }

    #[test]
    fn downward_motion_adds_damper_force() {
        let (mut body_still, mut resolver_a, mut state_a) = setup(0.5);
        let (mut body_moving, mut resolver_b, mut state_b) = setup(0.5);
        body_still.set_velocity(Velocity::default());
        body_moving.set_velocity(Velocity { lin: vec3(0.0, -1.0, 0.0), ang: Vec3::ZERO });
        let ground = FlatGround::new(0.0);
        let ctx = StepCtx::new(1.0 / 60.0, 0);
        for _ in 0..120 {
            resolver_a.tick(&body_still, &ground, &mut state_a, ctx);
            resolver_b.tick(&body_moving, &ground, &mut state_b, ctx);
        }
        assert!(state_b.wheels[0].normal_force > state_a.wheels[0].normal_force);
    }

    #[test]
    fn normal_force_respects_cap() {
        let spec = VehicleSpec::test_hatch();
        let (mut body, mut resolver, mut state) = setup(0.5);
        body.set_velocity(Velocity { lin: vec3(0.0, -50.0, 0.0), ang: Vec3::ZERO });
        let ground = FlatGround::new(0.0);
        for _ in 0..3 {
            resolver.tick(&body, &ground, &mut state, StepCtx::new(1.0 / 60.0, 0));
        }
        for w in &state.wheels {
            assert!(w.normal_force <= spec.suspension.max_force_n + 1e-3);
        }
    }
}
