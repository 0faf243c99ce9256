use axledyn_core::StepStage;

/// Closed set of pipeline stages. The active set is resolved at construction
/// from configuration; order within the set is always the declaration order
/// below, matching `StepStage`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VehicleStage {
    Contact,
    Powertrain,
    Braking,
    Tire,
    Steering,
    Aux,
}

impl VehicleStage {
    pub const ALL: [VehicleStage; 6] = [
        VehicleStage::Contact,
        VehicleStage::Powertrain,
        VehicleStage::Braking,
        VehicleStage::Tire,
        VehicleStage::Steering,
        VehicleStage::Aux,
    ];

    pub fn step_stage(self) -> StepStage {
        match self {
            VehicleStage::Contact => StepStage::Contact,
            VehicleStage::Powertrain => StepStage::Powertrain,
            VehicleStage::Braking => StepStage::Braking,
            VehicleStage::Tire => StepStage::Tire,
            VehicleStage::Steering => StepStage::Steering,
            VehicleStage::Aux => StepStage::Aux,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_matches_step_stage_ranks() {
        let ranks: Vec<u8> = VehicleStage::ALL.iter().map(|s| s.step_stage() as u8).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        assert_eq!(ranks, sorted);
    }
}
