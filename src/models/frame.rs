use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::JointSet;

/// Selects the scoring rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseMode {
    HandRaises,
    /// Hip-hinge style movements.
    Default,
}

impl ExerciseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseMode::HandRaises => "hand_raises",
            ExerciseMode::Default => "default",
        }
    }

    /// Resolves the selector value. An unset selector is reported separately
    /// from an unrecognised one; neither falls back to `Default`.
    pub fn from_selector(value: Option<&str>) -> Result<Self, EngineError> {
        match value.map(str::trim) {
            None | Some("") => Err(EngineError::MissingExerciseMode),
            Some(raw) => raw.parse(),
        }
    }
}

impl FromStr for ExerciseMode {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "hand_raises" => Ok(ExerciseMode::HandRaises),
            "default" => Ok(ExerciseMode::Default),
            other => Err(EngineError::UnknownExerciseMode(other.to_string())),
        }
    }
}

impl fmt::Display for ExerciseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feedback {
    #[serde(rename = "Lift arms higher")]
    LiftArmsHigher,
    #[serde(rename = "Hold steady at the top")]
    HoldSteadyAtTop,
    #[serde(rename = "Good posture")]
    GoodPosture,
    #[serde(rename = "Lower torso further")]
    LowerTorsoFurther,
    #[serde(rename = "Raise torso slowly")]
    RaiseTorsoSlowly,
    #[serde(rename = "Align your body within the frame")]
    AlignBody,
    #[serde(rename = "Great job!")]
    GreatJob,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feedback::LiftArmsHigher => "Lift arms higher",
            Feedback::HoldSteadyAtTop => "Hold steady at the top",
            Feedback::GoodPosture => "Good posture",
            Feedback::LowerTorsoFurther => "Lower torso further",
            Feedback::RaiseTorsoSlowly => "Raise torso slowly",
            Feedback::AlignBody => "Align your body within the frame",
            Feedback::GreatJob => "Great job!",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored analysis cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub completion: u8,
    pub feedback: Feedback,
    pub joints: JointSet,
    pub angles: BTreeMap<String, u32>,
}

/// What the overlay shows after each cycle, detected or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveReading {
    pub timestamp: i64,
    pub completion: u8,
    pub feedback: Feedback,
    pub pose_detected: bool,
}

impl LiveReading {
    pub fn idle() -> Self {
        Self {
            timestamp: 0,
            completion: 0,
            feedback: Feedback::AlignBody,
            pose_detected: false,
        }
    }

    pub fn no_pose(timestamp: i64) -> Self {
        Self {
            timestamp,
            completion: 0,
            feedback: Feedback::AlignBody,
            pose_detected: false,
        }
    }
}

impl From<&FrameSample> for LiveReading {
    fn from(sample: &FrameSample) -> Self {
        Self {
            timestamp: sample.timestamp,
            completion: sample.completion,
            feedback: sample.feedback,
            pose_detected: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_distinguishes_unset_from_unknown() {
        assert_eq!(
            ExerciseMode::from_selector(None),
            Err(EngineError::MissingExerciseMode)
        );
        assert_eq!(
            ExerciseMode::from_selector(Some("  ")),
            Err(EngineError::MissingExerciseMode)
        );
        assert_eq!(
            ExerciseMode::from_selector(Some("squats")),
            Err(EngineError::UnknownExerciseMode("squats".into()))
        );
        assert_eq!(
            ExerciseMode::from_selector(Some("default")),
            Ok(ExerciseMode::Default)
        );
        assert_eq!(
            ExerciseMode::from_selector(Some("hand_raises")),
            Ok(ExerciseMode::HandRaises)
        );
    }

    #[test]
    fn feedback_serializes_as_message() {
        let json = serde_json::to_string(&Feedback::HoldSteadyAtTop).unwrap();
        assert_eq!(json, "\"Hold steady at the top\"");
        assert_eq!(Feedback::GreatJob.to_string(), "Great job!");
    }
}
