pub mod scalar;
pub mod ids;
pub mod types;
pub mod hash;
pub mod time;
pub mod schedule;

pub use scalar::Scalar;
pub use ids::{BodyId, ColliderId, SpringId, CtrlId, HandId};
pub use types::{Vec3, Mat3, Isometry, Velocity, vec3, iso, quat_identity};
pub use hash::{StepHasher, hash_vec3, hash_quat, hash_f32};
pub use time::TickStats;
pub use schedule::{StepStage, schedule_digest};
pub use glam::Quat;
