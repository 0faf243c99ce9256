use axledyn_specs::GearboxSpec;

pub const GEAR_REVERSE: i8 = -1;
pub const GEAR_NEUTRAL: i8 = 0;

/// Gearbox state machine: Reverse(-1) / Neutral(0) / Forward(1..N).
///
/// Every accepted transition starts the shift timer; while it runs the box
/// reports "shifting" and the combined ratio is forced to zero. A separate
/// cooldown starts when a shift completes and blocks the next request until
/// it expires. Requests mid-shift are allowed (they restart the timer);
/// requests during cooldown are refused.
#[derive(Clone, Debug)]
pub struct Gearbox {
    gear: i8,
    shift_timer: f32,
    cooldown: f32,
}

impl Gearbox {
    pub fn new() -> Self {
        Self { gear: GEAR_NEUTRAL, shift_timer: 0.0, cooldown: 0.0 }
    }

    /// Start in a given gear with no shift in flight (test/scenario setup).
    pub fn with_gear(gear: i8) -> Self {
        Self { gear, shift_timer: 0.0, cooldown: 0.0 }
    }

    #[inline] pub fn gear(&self) -> i8 { self.gear }
    #[inline] pub fn is_shifting(&self) -> bool { self.shift_timer > 0.0 }
    #[inline] pub fn in_cooldown(&self) -> bool { self.cooldown > 0.0 }

    /// Engaged = a ratio exists and no shift is in flight.
    pub fn is_engaged(&self) -> bool {
        self.gear != GEAR_NEUTRAL && !self.is_shifting()
    }

    pub fn shift_up(&mut self, spec: &GearboxSpec) -> bool {
        if self.cooldown > 0.0 || self.gear >= spec.top_gear() {
            return false;
        }
        self.begin_shift(spec, self.gear + 1);
        true
    }

    pub fn shift_down(&mut self, spec: &GearboxSpec) -> bool {
        if self.cooldown > 0.0 || self.gear <= GEAR_REVERSE {
            return false;
        }
        self.begin_shift(spec, self.gear - 1);
        true
    }

    pub fn shift_to_reverse(&mut self, spec: &GearboxSpec) -> bool {
        if self.cooldown > 0.0 || self.gear == GEAR_REVERSE {
            return false;
        }
        self.begin_shift(spec, GEAR_REVERSE);
        true
    }

    pub fn shift_to_neutral(&mut self, spec: &GearboxSpec) -> bool {
        if self.cooldown > 0.0 || self.gear == GEAR_NEUTRAL {
            return false;
        }
        self.begin_shift(spec, GEAR_NEUTRAL);
        true
    }

    fn begin_shift(&mut self, spec: &GearboxSpec, target: i8) {
        self.gear = target;
        self.shift_timer = spec.shift_time_s.max(0.0);
        if self.shift_timer == 0.0 {
            self.cooldown = spec.shift_cooldown_s.max(0.0);
        }
    }

    /// Advance the shift and cooldown timers. Time left over after a shift
    /// completes carries into the cooldown, so a single large `dt` can retire
    /// both.
    pub fn tick_timers(&mut self, spec: &GearboxSpec, dt: f32) {
        if self.shift_timer > 0.0 {
            let leftover = dt - self.shift_timer;
            self.shift_timer -= dt;
            if self.shift_timer <= 0.0 {
                self.shift_timer = 0.0;
                self.cooldown = (spec.shift_cooldown_s.max(0.0) - leftover.max(0.0)).max(0.0);
            }
        } else if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
        }
    }

    /// Base ratio of the selected gear, unsigned, zero in neutral. A gear
    /// with no configured ratio reports zero rather than indexing out of
    /// the ratio table.
    pub fn base_ratio(&self, spec: &GearboxSpec) -> f32 {
        match self.gear {
            GEAR_NEUTRAL => 0.0,
            GEAR_REVERSE => spec.reverse_ratio,
            g if g > 0 => spec
                .forward_ratios
                .get((g - 1) as usize)
                .copied()
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Signed combined ratio (base x final drive): negative in reverse,
    /// exactly zero in neutral or while a shift is in flight.
    pub fn current_ratio(&self, spec: &GearboxSpec) -> f32 {
        if self.is_shifting() || self.gear == GEAR_NEUTRAL {
            return 0.0;
        }
        let sign = if self.gear == GEAR_REVERSE { -1.0 } else { 1.0 };
        sign * self.base_ratio(spec) * spec.final_drive
    }
}

impl Default for Gearbox {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axledyn_specs::VehicleSpec;

    fn spec() -> GearboxSpec {
        VehicleSpec::test_hatch().gearbox.unwrap()
    }

    #[test]
    fn shift_up_is_monotone_to_top_then_fails() {
        let spec = spec();
        let mut gb = Gearbox::with_gear(1);
        for expect in 2..=spec.top_gear() {
            assert!(gb.shift_up(&spec));
            assert_eq!(gb.gear(), expect);
        }
        assert!(!gb.shift_up(&spec));
        assert_eq!(gb.gear(), spec.top_gear());
    }

    #[test]
    fn ratio_is_zero_while_shifting() {
        let spec = spec();
        let mut gb = Gearbox::with_gear(1);
        assert!(gb.current_ratio(&spec) > 0.0);
        assert!(gb.shift_up(&spec));
        assert!(gb.is_shifting());
        assert_eq!(gb.current_ratio(&spec), 0.0);
        gb.tick_timers(&spec, spec.shift_time_s + 1e-3);
        assert!(!gb.is_shifting());
        assert!((gb.current_ratio(&spec) - 2.0 * spec.final_drive).abs() < 1e-5);
    }

    #[test]
    fn cooldown_blocks_next_shift() {
        let spec = spec();
        let mut gb = Gearbox::with_gear(1);
        assert!(gb.shift_up(&spec));
        gb.tick_timers(&spec, spec.shift_time_s + 1e-3);
        assert!(gb.in_cooldown());
        assert!(!gb.shift_up(&spec));
        gb.tick_timers(&spec, spec.shift_cooldown_s + 1e-3);
        assert!(gb.shift_up(&spec));
        assert_eq!(gb.gear(), 3);
    }

    #[test]
    fn walks_reverse_neutral_first() {
        let spec = spec();
        let mut gb = Gearbox::with_gear(GEAR_REVERSE);
        assert!(gb.shift_up(&spec));
        assert_eq!(gb.gear(), GEAR_NEUTRAL);
        gb.tick_timers(&spec, spec.shift_time_s + spec.shift_cooldown_s + 1e-2);
        assert!(gb.shift_up(&spec));
        assert_eq!(gb.gear(), 1);
    }

    #[test]
    fn lumped_timer_advance_spills_into_cooldown() {
        let spec = spec();
        let mut gb = Gearbox::with_gear(1);
        assert!(gb.shift_up(&spec));
        // Shift plus half the cooldown in one call.
        gb.tick_timers(&spec, spec.shift_time_s + 0.5 * spec.shift_cooldown_s);
        assert!(!gb.is_shifting());
        assert!(gb.in_cooldown());
        gb.tick_timers(&spec, 0.5 * spec.shift_cooldown_s + 1e-3);
        assert!(!gb.in_cooldown());
        assert!(gb.shift_up(&spec));
    }

    #[test]
    fn unconfigured_gear_reports_zero_ratio() {
        let spec = spec();
        let gb = Gearbox::with_gear(9);
        assert_eq!(gb.base_ratio(&spec), 0.0);
        assert_eq!(gb.current_ratio(&spec), 0.0);
    }

    #[test]
    fn reverse_ratio_is_negative() {
        let spec = spec();
        let gb = Gearbox::with_gear(GEAR_REVERSE);
        assert!(gb.current_ratio(&spec) < 0.0);
    }

    #[test]
    fn neutral_has_no_torque_path() {
        let spec = spec();
        let gb = Gearbox::new();
        assert_eq!(gb.current_ratio(&spec), 0.0);
        assert!(!gb.is_engaged());
    }
}
