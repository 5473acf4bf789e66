use thiserror::Error;

/// Conditions the engine reports explicitly instead of degrading silently.
///
/// These travel inside `anyhow::Error` through the controller and database
/// layers; callers that need to branch on them can `downcast_ref::<EngineError>()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("session already active")]
    SessionAlreadyActive,

    #[error("no active session")]
    NoActiveSession,

    #[error("cannot record frames outside an active session")]
    NotRecording,

    #[error("exercise mode is not set")]
    MissingExerciseMode,

    #[error("unknown exercise mode '{0}'")]
    UnknownExerciseMode(String),

    #[error("group size must be greater than zero")]
    InvalidGroupSize,

    #[error("series length mismatch: {labels} labels, {values} values")]
    SeriesLengthMismatch { labels: usize, values: usize },
}
