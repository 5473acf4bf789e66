//! Stored exercise sessions as read back for history and dashboards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ExerciseMode, Feedback};

/// A persisted session row without its frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: String,
    pub user_id: i64,
    pub exercise: ExerciseMode,
    pub average_completion: u8,
    pub feedback: Feedback,
    pub frame_count: usize,
    pub timestamp: DateTime<Utc>,
}
