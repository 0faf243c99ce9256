#[derive(Copy, Clone, Debug)]
pub struct DeterminismContract {
    pub fixed_dt: f32,
    pub float: &'static str,
    pub fma: bool,
    pub stable_wheel_order: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct Units {
    pub length: &'static str,
    pub mass:   &'static str,
    pub time:   &'static str,
}

impl DeterminismContract {
    pub fn default_contract() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            float: "f32",
            fma: false,
            stable_wheel_order: true,
        }
    }
}
