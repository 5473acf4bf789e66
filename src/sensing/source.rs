use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::models::Keypoint;

/// The pose-estimation service. One call per analysis cycle; an empty vector
/// means no body was detected. Calls may take arbitrarily long.
#[async_trait]
pub trait PoseSource: Send + Sync {
    async fn estimate(&self) -> Result<Vec<Keypoint>>;
}

/// Plays back a fixed list of poses, one per call. When the script runs out
/// it either loops or keeps reporting no pose.
pub struct ScriptedPoseSource {
    frames: Mutex<VecDeque<Vec<Keypoint>>>,
    looping: bool,
}

impl ScriptedPoseSource {
    pub fn new(frames: Vec<Vec<Keypoint>>) -> Self {
        Self {
            frames: Mutex::new(frames.into()),
            looping: false,
        }
    }

    pub fn looping(frames: Vec<Vec<Keypoint>>) -> Self {
        Self {
            frames: Mutex::new(frames.into()),
            looping: true,
        }
    }

    pub async fn remaining(&self) -> usize {
        self.frames.lock().await.len()
    }
}

#[async_trait]
impl PoseSource for ScriptedPoseSource {
    async fn estimate(&self) -> Result<Vec<Keypoint>> {
        let mut frames = self.frames.lock().await;
        let next = frames.pop_front().unwrap_or_default();
        if self.looping && !next.is_empty() {
            frames.push_back(next.clone());
        }
        Ok(next)
    }
}

/// Keypoints for a person raising both arms so that each elbow sits at
/// `elbow_deg` degrees. Used by the demo binary and tests.
pub fn arms_pose(elbow_deg: f64) -> Vec<Keypoint> {
    let theta = elbow_deg.to_radians();
    // Elbow hangs below the shoulder; the forearm opens theta away from the upper arm.
    let forearm = (theta.sin(), -theta.cos());
    vec![
        Keypoint::new("left_shoulder", 0.40, 0.30, 0.95),
        Keypoint::new("left_elbow", 0.40, 0.45, 0.93),
        Keypoint::new("left_wrist", 0.40 - forearm.0 * 0.15, 0.45 + forearm.1 * 0.15, 0.90),
        Keypoint::new("right_shoulder", 0.60, 0.30, 0.95),
        Keypoint::new("right_elbow", 0.60, 0.45, 0.93),
        Keypoint::new("right_wrist", 0.60 + forearm.0 * 0.15, 0.45 + forearm.1 * 0.15, 0.90),
    ]
}

/// Keypoints for a hip hinge with the hip at `hip_deg` degrees.
pub fn hinge_pose(hip_deg: f64) -> Vec<Keypoint> {
    let theta = hip_deg.to_radians();
    vec![
        Keypoint::new("left_hip", 0.50, 0.55, 0.92),
        Keypoint::new("left_knee", 0.50, 0.75, 0.90),
        Keypoint::new("left_ankle", 0.50, 0.95, 0.88),
        Keypoint::new(
            "left_shoulder",
            0.50 + theta.sin() * 0.25,
            0.55 + theta.cos() * 0.25,
            0.94,
        ),
    ]
}
