pub mod frame;
pub mod pose;
pub mod session;

pub use frame::{ExerciseMode, Feedback, FrameSample, LiveReading};
pub use pose::{Joint, JointSet, Keypoint};
pub use session::{SessionPhase, SessionRecord};
