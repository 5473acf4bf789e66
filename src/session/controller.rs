use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono::Utc;
use log::{error, info};
use serde::Serialize;
use tokio::sync::{watch, Mutex};

use crate::{
    error::EngineError,
    metrics::{MetricsCollector, MetricsSnapshot},
    models::{ExerciseMode, LiveReading, SessionPhase, SessionRecord},
    scoring::ScoringConfig,
    sensing::{PoseSource, SamplerContext, SamplingController},
};

use super::{SessionSink, SessionSnapshot, SessionState};

/// What `stop_session` produced. `record` is `None` for a session without
/// frames; `stored_id` is `None` when nothing was stored or the sink failed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub record: Option<SessionRecord>,
    pub stored_id: Option<String>,
}

/// Drives one exercise session at a time: starts the sampling loop, collects
/// frames into the session state, and hands the summary to the sink on stop.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<SessionState>>,
    source: Arc<dyn PoseSource>,
    sink: Arc<dyn SessionSink>,
    sampling: Arc<Mutex<SamplingController>>,
    metrics: MetricsCollector,
    live: Arc<watch::Sender<LiveReading>>,
    scoring: ScoringConfig,
    sample_interval: Duration,
    trace_cycles: bool,
}

impl SessionController {
    pub fn new(
        source: Arc<dyn PoseSource>,
        sink: Arc<dyn SessionSink>,
        sample_interval: Duration,
    ) -> Self {
        let trace_cycles = std::env::var("FORMTRACK_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let (live_tx, _) = watch::channel(LiveReading::idle());

        Self {
            state: Arc::new(Mutex::new(SessionState::new())),
            source,
            sink,
            sampling: Arc::new(Mutex::new(SamplingController::new())),
            metrics: MetricsCollector::new(),
            live: Arc::new(live_tx),
            scoring: ScoringConfig::default(),
            sample_interval,
            trace_cycles,
        }
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub async fn get_snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Live completion and feedback, updated after every cycle.
    pub fn subscribe(&self) -> watch::Receiver<LiveReading> {
        self.live.subscribe()
    }

    pub async fn get_metrics(&self) -> MetricsSnapshot {
        self.metrics.get_snapshot().await
    }

    /// Switches the scoring rules for the following cycles.
    pub async fn select_exercise(&self, exercise: ExerciseMode) {
        self.state.lock().await.select_exercise(exercise);
    }

    pub async fn start_session(
        &self,
        user_id: i64,
        exercise: ExerciseMode,
    ) -> Result<SessionSnapshot> {
        let mut sampling = self.sampling.lock().await;

        {
            let mut state = self.state.lock().await;
            state.start(user_id, exercise, Utc::now())?;
        }

        self.metrics.reset().await;
        self.live.send_replace(LiveReading::idle());

        let ctx = SamplerContext {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            metrics: self.metrics.clone(),
            live: Arc::clone(&self.live),
            scoring: self.scoring.clone(),
            interval: self.sample_interval,
            trace_cycles: self.trace_cycles,
        };

        if let Err(err) = sampling.start_sampling(ctx) {
            self.state.lock().await.settle();
            return Err(err);
        }

        info!("Started {} session for user {}", exercise, user_id);
        Ok(self.get_snapshot().await)
    }

    /// Stops sampling, summarises the frames buffered so far and hands the
    /// record to the sink. Does not wait for an estimate still in flight.
    /// Sink failures are logged and not retried.
    pub async fn stop_session(&self) -> Result<SessionOutcome> {
        let mut sampling = self.sampling.lock().await;

        if self.state.lock().await.phase() != SessionPhase::Active {
            return Err(EngineError::NoActiveSession.into());
        }

        sampling.stop_sampling();

        let record = self.state.lock().await.finish()?;

        let stored_id = match &record {
            Some(record) => match self.sink.persist(record).await {
                Ok(id) => {
                    info!(
                        "Stored {} session {} ({} frames, {}% average)",
                        record.exercise,
                        id,
                        record.frames.len(),
                        record.average_completion
                    );
                    Some(id)
                }
                Err(err) => {
                    error!("Failed to persist session: {err:?}");
                    None
                }
            },
            None => {
                info!("Session stopped without frames; nothing to store");
                None
            }
        };

        self.state.lock().await.settle();
        self.live.send_replace(LiveReading::idle());

        Ok(SessionOutcome { record, stored_id })
    }
}
