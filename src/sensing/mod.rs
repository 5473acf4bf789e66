pub mod controller;
pub mod loop_worker;
pub mod source;

pub use controller::SamplingController;
pub use loop_worker::{perform_sample, sample_frame, SamplerContext};
pub use source::{PoseSource, ScriptedPoseSource};
