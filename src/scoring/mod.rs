pub mod angle;
pub mod config;
pub mod scorer;

pub use angle::joint_angle;
pub use config::ScoringConfig;
pub use scorer::{score, Score};
