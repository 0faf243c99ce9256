pub mod scalar;
pub mod types;
pub mod hash;
pub mod schedule;
pub mod step_ctx;
pub mod determinism;
pub mod state;

pub use scalar::Scalar;
pub use types::{Vec3, Mat3, Isometry, Velocity, vec3, iso, quat_identity};
pub use hash::{StepHasher, hash_vec3, hash_quat, quantize};
pub use schedule::{StepStage, schedule_digest};
pub use step_ctx::StepCtx;
pub use determinism::{DeterminismContract, Units};
pub use state::{
    VehicleInput, VehicleState, WheelRuntime,
    WHEEL_FL, WHEEL_RL, WHEEL_FR, WHEEL_RR, WHEEL_COUNT,
    FRONT_WHEELS, REAR_WHEELS,
};
pub use glam::Quat;
