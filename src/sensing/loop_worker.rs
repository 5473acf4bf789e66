use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    error::EngineError,
    metrics::{CycleMetrics, CycleOutcome, MetricsCollector},
    models::{ExerciseMode, FrameSample, JointSet, Keypoint, LiveReading},
    scoring::{score, ScoringConfig},
    session::SessionState,
};

use super::source::PoseSource;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything one sampling task needs. Cloned out of the session controller
/// when a session starts.
#[derive(Clone)]
pub struct SamplerContext {
    pub source: Arc<dyn PoseSource>,
    pub state: Arc<Mutex<SessionState>>,
    pub metrics: MetricsCollector,
    pub live: Arc<watch::Sender<LiveReading>>,
    pub scoring: ScoringConfig,
    pub interval: Duration,
    pub trace_cycles: bool,
}

/// Runs analysis cycles back to back on a fixed tick until cancelled.
///
/// Cancellation is checked before each cycle and again once the estimate
/// returns. There is no timeout on the estimator; a cycle that outlives its
/// session drops its result.
pub async fn sampling_loop(ctx: SamplerContext, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(ctx.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("sampling loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                run_cycle(&ctx, &cancel_token).await;
            }
        }
    }
}

async fn run_cycle(ctx: &SamplerContext, cancel_token: &CancellationToken) {
    let cycle_start = Instant::now();
    let timestamp = Utc::now();

    let estimate = ctx.source.estimate().await;
    let estimate_ms = cycle_start.elapsed().as_millis() as u64;

    if cancel_token.is_cancelled() {
        log_debug!("dropping estimate that arrived after stop ({}ms)", estimate_ms);
        return;
    }

    let outcome = match estimate {
        Ok(keypoints) => match perform_sample(ctx, &keypoints, timestamp, cancel_token).await {
            Ok(outcome) => outcome,
            Err(err) => {
                log_error!("frame sampling failed: {err:?}");
                CycleOutcome::Failed
            }
        },
        Err(err) => {
            log_warn!("pose estimate failed after {}ms: {err:?}", estimate_ms);
            CycleOutcome::Failed
        }
    };

    if outcome == CycleOutcome::Discarded {
        return;
    }

    let total_ms = cycle_start.elapsed().as_millis() as u64;
    if ctx.trace_cycles {
        log_debug!(
            "cycle {:?} in {}ms (estimate: {}ms)",
            outcome,
            total_ms,
            estimate_ms
        );
    }

    ctx.metrics
        .record_cycle(CycleMetrics {
            timestamp,
            estimate_ms,
            total_ms,
            outcome,
        })
        .await;
}

/// One capture/score/emit step for an estimate that has already arrived.
///
/// No pose: the overlay gets the alignment prompt at 0% and nothing is
/// buffered. Otherwise the frame is scored with the exercise selected right
/// now, appended to the session, and published to the overlay. Once
/// `cancel_token` fires nothing is buffered or published.
pub async fn perform_sample(
    ctx: &SamplerContext,
    keypoints: &[Keypoint],
    timestamp: DateTime<Utc>,
    cancel_token: &CancellationToken,
) -> Result<CycleOutcome> {
    let timestamp_ms = timestamp.timestamp_millis();

    if keypoints.is_empty() {
        if cancel_token.is_cancelled() {
            return Ok(CycleOutcome::Discarded);
        }
        ctx.live.send_replace(LiveReading::no_pose(timestamp_ms));
        return Ok(CycleOutcome::NoPose);
    }

    let mut state = ctx.state.lock().await;
    // Stop cancels before it takes this lock to finalize.
    if cancel_token.is_cancelled() {
        return Ok(CycleOutcome::Discarded);
    }
    let mode = state.exercise().ok_or(EngineError::MissingExerciseMode)?;
    let sample = sample_frame(keypoints, mode, &ctx.scoring, timestamp_ms);
    let reading = LiveReading::from(&sample);
    state.record(sample)?;
    // Published under the lock so stop's idle reading always lands last.
    ctx.live.send_replace(reading);
    Ok(CycleOutcome::Scored)
}

/// Scores one detected pose into a sample.
pub fn sample_frame(
    keypoints: &[Keypoint],
    mode: ExerciseMode,
    config: &ScoringConfig,
    timestamp_ms: i64,
) -> FrameSample {
    let joints = JointSet::from_keypoints(keypoints);
    let scored = score(&joints, mode, config);
    FrameSample {
        timestamp: timestamp_ms,
        completion: scored.completion,
        feedback: scored.feedback,
        joints,
        angles: scored.angles,
    }
}
