mod types;

pub use types::{CycleMetrics, CycleOutcome, MetricsSnapshot};

use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_RECENT_CYCLES: usize = 20;

/// Counters for the sampling loop, shared between the loop and its owner.
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

#[derive(Default)]
struct MetricsState {
    recent_cycles: VecDeque<CycleMetrics>,
    cycle_count: u64,
    scored_count: u64,
    no_pose_count: u64,
    error_count: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsState {
                recent_cycles: VecDeque::with_capacity(MAX_RECENT_CYCLES),
                ..MetricsState::default()
            })),
        }
    }

    pub async fn record_cycle(&self, metrics: CycleMetrics) {
        let mut state = self.inner.lock().await;

        match metrics.outcome {
            CycleOutcome::Scored => state.scored_count += 1,
            CycleOutcome::NoPose => state.no_pose_count += 1,
            CycleOutcome::Failed => state.error_count += 1,
            CycleOutcome::Discarded => return,
        }
        state.cycle_count += 1;

        state.recent_cycles.push_back(metrics);
        if state.recent_cycles.len() > MAX_RECENT_CYCLES {
            state.recent_cycles.pop_front();
        }
    }

    pub async fn get_snapshot(&self) -> MetricsSnapshot {
        let state = self.inner.lock().await;
        MetricsSnapshot {
            recent_cycles: state.recent_cycles.iter().cloned().collect(),
            cycle_count: state.cycle_count,
            scored_count: state.scored_count,
            no_pose_count: state.no_pose_count,
            error_count: state.error_count,
        }
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        state.recent_cycles.clear();
        state.cycle_count = 0;
        state.scored_count = 0;
        state.no_pose_count = 0;
        state.error_count = 0;
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MetricsCollector {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
