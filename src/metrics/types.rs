use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CycleOutcome {
    Scored,
    NoPose,
    Failed,
    /// The session stopped while the estimate was pending.
    Discarded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleMetrics {
    pub timestamp: DateTime<Utc>,
    pub estimate_ms: u64,
    pub total_ms: u64,
    pub outcome: CycleOutcome,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub recent_cycles: Vec<CycleMetrics>,
    pub cycle_count: u64,
    pub scored_count: u64,
    pub no_pose_count: u64,
    pub error_count: u64,
}

impl MetricsSnapshot {
    /// Share of cycles in which a body was found, 0.0 before the first cycle.
    pub fn detection_rate(&self) -> f64 {
        if self.cycle_count == 0 {
            return 0.0;
        }
        self.scored_count as f64 / self.cycle_count as f64
    }
}
