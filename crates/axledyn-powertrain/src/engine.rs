use axledyn_specs::EngineSpec;

const RADS_TO_RPM: f32 = 60.0 / (2.0 * std::f32::consts::PI);

#[inline]
pub fn omega_to_rpm(omega: f32) -> f32 {
    omega * RADS_TO_RPM
}

#[inline]
pub fn normalized_rpm(spec: &EngineSpec, rpm: f32) -> f32 {
    let range = (spec.max_rpm - spec.idle_rpm).max(1.0);
    ((rpm - spec.idle_rpm) / range).clamp(0.0, 1.0)
}

/// Engine shaft torque.
///
/// The hard-cut limiter keys on `mech_rpm` — the RPM implied by actual wheel
/// speed through the gear — not the smoothed display RPM, so a spinning wheel
/// cannot sneak past the cut during the smoothing lag.
pub fn shaft_torque(spec: &EngineSpec, display_rpm: f32, mech_rpm: f32, throttle: f32) -> f32 {
    if mech_rpm >= spec.max_rpm {
        return 0.0;
    }
    if throttle <= 1.0e-3 {
        // Idle keep-alive only inside the band; anywhere else is coast.
        if (display_rpm - spec.idle_rpm).abs() <= spec.idle_band_rpm {
            return spec.idle_torque_nm;
        }
        return 0.0;
    }
    spec.max_torque_nm * spec.torque_curve.eval(normalized_rpm(spec, display_rpm)) * throttle
}

/// First-order display-RPM smoothing toward `target`, clamped to the
/// [idle, max] operating band.
pub fn smooth_rpm(spec: &EngineSpec, current: f32, target: f32, dt: f32) -> f32 {
    let alpha = (spec.rpm_inertia * dt).clamp(0.0, 1.0);
    let next = current + (target - current) * alpha;
    next.clamp(spec.idle_rpm, spec.max_rpm)
}
