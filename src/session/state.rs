use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineError;
use crate::models::{ExerciseMode, Feedback, FrameSample, SessionPhase, SessionRecord};

/// Number of trailing samples kept in the persisted record.
pub const PERSISTED_FRAME_LIMIT: usize = 120;

/// Buffer and lifecycle of the one exercise session the engine tracks.
///
/// The buffer grows without bound while active. `finish` averages over all of
/// it but only hands the last [`PERSISTED_FRAME_LIMIT`] samples downstream.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: SessionPhase,
    user_id: Option<i64>,
    exercise: Option<ExerciseMode>,
    started_at: Option<DateTime<Utc>>,
    frames: Vec<FrameSample>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub user_id: Option<i64>,
    pub exercise: Option<ExerciseMode>,
    pub started_at: Option<DateTime<Utc>>,
    pub frame_count: usize,
    pub last_completion: Option<u8>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn exercise(&self) -> Option<ExerciseMode> {
        self.exercise
    }

    pub fn frames(&self) -> &[FrameSample] {
        &self.frames
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            user_id: self.user_id,
            exercise: self.exercise,
            started_at: self.started_at,
            frame_count: self.frames.len(),
            last_completion: self.frames.last().map(|frame| frame.completion),
        }
    }

    /// `Idle -> Active`. Drops whatever the previous session left behind.
    pub fn start(
        &mut self,
        user_id: i64,
        exercise: ExerciseMode,
        started_at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        if self.phase != SessionPhase::Idle {
            return Err(EngineError::SessionAlreadyActive);
        }

        *self = Self {
            phase: SessionPhase::Active,
            user_id: Some(user_id),
            exercise: Some(exercise),
            started_at: Some(started_at),
            frames: Vec::new(),
        };
        Ok(())
    }

    pub fn select_exercise(&mut self, exercise: ExerciseMode) {
        self.exercise = Some(exercise);
    }

    pub fn record(&mut self, sample: FrameSample) -> Result<(), EngineError> {
        if self.phase != SessionPhase::Active {
            return Err(EngineError::NotRecording);
        }
        self.frames.push(sample);
        Ok(())
    }

    /// `Active -> Finalizing`. Returns `None` when nothing was recorded.
    pub fn finish(&mut self) -> Result<Option<SessionRecord>, EngineError> {
        let (user_id, exercise) = match (self.phase, self.user_id, self.exercise) {
            (SessionPhase::Active, Some(user_id), Some(exercise)) => (user_id, exercise),
            _ => return Err(EngineError::NoActiveSession),
        };
        self.phase = SessionPhase::Finalizing;

        let average_completion = match average_completion(&self.frames) {
            Some(average) => average,
            None => return Ok(None),
        };

        let feedback = self
            .frames
            .last()
            .map(|frame| frame.feedback)
            .unwrap_or(Feedback::GreatJob);

        Ok(Some(SessionRecord {
            user_id,
            exercise,
            frames: retained_frames(&self.frames).to_vec(),
            average_completion,
            feedback,
        }))
    }

    /// `Finalizing -> Idle`. The buffer stays until the next `start`.
    pub fn settle(&mut self) {
        self.phase = SessionPhase::Idle;
    }
}

/// Rounded mean completion over every sample, or `None` for an empty session.
pub fn average_completion(frames: &[FrameSample]) -> Option<u8> {
    if frames.is_empty() {
        return None;
    }
    let total: u64 = frames.iter().map(|frame| u64::from(frame.completion)).sum();
    let mean = total as f64 / frames.len() as f64;
    Some(mean.round().clamp(0.0, 100.0) as u8)
}

pub fn retained_frames(frames: &[FrameSample]) -> &[FrameSample] {
    let start = frames.len().saturating_sub(PERSISTED_FRAME_LIMIT);
    &frames[start..]
}
