/// Simulation scalar. Everything runs in f32; keep one alias so a future
/// f64 build is a one-line change.
pub type Scalar = f32;
