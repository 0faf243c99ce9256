use crate::StepHasher;

/// Fixed per-tick stage order. The orchestrator records what actually ran;
/// the digest lets a harness assert the pipeline never reordered.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepStage {
    Contact = 1,
    Powertrain = 2,
    Braking = 3,
    Tire = 4,
    Steering = 5,
    Aux = 6,
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_order_sensitive() {
        let a = schedule_digest(&[StepStage::Contact, StepStage::Powertrain]);
        let b = schedule_digest(&[StepStage::Powertrain, StepStage::Contact]);
        assert_ne!(a, b);
    }
}
