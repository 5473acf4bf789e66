use serde::{Deserialize, Serialize};

use super::{ExerciseMode, Feedback, FrameSample};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Idle,
    Active,
    Finalizing,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::Idle
    }
}

/// Summary handed to the persistence collaborator when a session stops.
/// Serializes as the `POST /sessions` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: i64,
    pub exercise: ExerciseMode,
    /// Most recent samples only; see `SessionState::finish`.
    pub frames: Vec<FrameSample>,
    pub average_completion: u8,
    pub feedback: Feedback,
}
