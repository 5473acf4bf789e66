use std::collections::BTreeMap;

use crate::models::{ExerciseMode, Feedback, Joint, JointSet};
use crate::scoring::angle::joint_angle;
use crate::scoring::config::ScoringConfig;

/// Result of scoring one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub completion: u8,
    pub feedback: Feedback,
    pub angles: BTreeMap<String, u32>,
}

/// Score a frame for the given exercise.
///
/// Absent joints come through as angle 0, which lands on the "needs
/// correction" side of each rule.
pub fn score(joints: &JointSet, mode: ExerciseMode, config: &ScoringConfig) -> Score {
    match mode {
        ExerciseMode::HandRaises => {
            let left = joint_angle(
                joints.get(Joint::LeftShoulder),
                joints.get(Joint::LeftElbow),
                joints.get(Joint::LeftWrist),
            );
            let right = joint_angle(
                joints.get(Joint::RightShoulder),
                joints.get(Joint::RightElbow),
                joints.get(Joint::RightWrist),
            );
            let (completion, feedback) = score_arm_angles(left, right, config);

            let mut angles = BTreeMap::new();
            angles.insert("leftArm".to_string(), left);
            angles.insert("rightArm".to_string(), right);
            Score {
                completion,
                feedback,
                angles,
            }
        }
        ExerciseMode::Default => {
            let hip = joint_angle(
                joints.get(Joint::LeftShoulder),
                joints.get(Joint::LeftHip),
                joints.get(Joint::LeftKnee),
            );
            let (completion, feedback) = score_hip_angle(hip, config);

            let mut angles = BTreeMap::new();
            angles.insert("hip".to_string(), hip);
            Score {
                completion,
                feedback,
                angles,
            }
        }
    }
}

/// Hand raises score extension: the straighter the arms, the higher the score.
pub fn score_arm_angles(left: u32, right: u32, config: &ScoringConfig) -> (u8, Feedback) {
    let avg = (f64::from(left) + f64::from(right)) / 2.0;
    let completion = to_percent(avg / config.reference_angle_deg);

    let feedback = if avg < config.arms_low_deg {
        Feedback::LiftArmsHigher
    } else if avg > config.arms_high_deg {
        Feedback::HoldSteadyAtTop
    } else {
        Feedback::GoodPosture
    };

    (completion, feedback)
}

/// Hip hinges score flexion: the further the torso folds, the higher the score.
pub fn score_hip_angle(hip: u32, config: &ScoringConfig) -> (u8, Feedback) {
    let hip = f64::from(hip);
    let completion = to_percent((config.reference_angle_deg - hip) / config.reference_angle_deg);

    let feedback = if hip > config.hip_upright_deg {
        Feedback::LowerTorsoFurther
    } else if hip < config.hip_folded_deg {
        Feedback::RaiseTorsoSlowly
    } else {
        Feedback::GoodPosture
    };

    (completion, feedback)
}

fn to_percent(ratio: f64) -> u8 {
    let percent = (ratio * 100.0).round();
    if percent.is_nan() {
        return 0;
    }
    percent.clamp(0.0, 100.0) as u8
}
