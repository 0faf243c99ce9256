use serde::{Deserialize, Serialize};

/// Uniformly sampled curve over a normalized [0,1] input, linear interp
/// between samples. Two samples make it a ramp, one a constant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Curve {
    samples: Vec<f32>,
}

impl Curve {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        assert!(!samples.is_empty(), "curve needs at least one sample");
        Self { samples }
    }

    pub fn flat(value: f32) -> Self {
        Self { samples: vec![value] }
    }

    pub fn eval(&self, t: f32) -> f32 {
        let n = self.samples.len();
        if n == 1 {
            return self.samples[0];
        }
        let t = t.clamp(0.0, 1.0);
        let f = t * (n - 1) as f32;
        let i0 = (f.floor() as usize).min(n - 2);
        let frac = f - i0 as f32;
        self.samples[i0] * (1.0 - frac) + self.samples[i0 + 1] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint() {
        let c = Curve::from_samples(vec![0.0, 1.0, 0.5]);
        assert!((c.eval(0.0) - 0.0).abs() < 1e-6);
        assert!((c.eval(0.5) - 1.0).abs() < 1e-6);
        assert!((c.eval(1.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        let c = Curve::from_samples(vec![2.0, 4.0]);
        assert!((c.eval(-1.0) - 2.0).abs() < 1e-6);
        assert!((c.eval(9.0) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn flat_is_constant() {
        let c = Curve::flat(3.0);
        assert!((c.eval(0.33) - 3.0).abs() < 1e-6);
    }
}
