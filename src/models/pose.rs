//! Pose data as delivered by the pose-estimation service.
//!
//! A pose estimate is an ordered list of [`Keypoint`]s; an empty list means no
//! body was detected. Each frame the keypoints are folded into a [`JointSet`],
//! a fixed-size table indexed by [`Joint`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single landmark estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Estimator name, e.g. `left_shoulder`.
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Detection confidence (0-1).
    pub confidence: f64,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f64, y: f64, confidence: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            confidence,
        }
    }
}

/// Joints the scoring rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    LeftShoulder,
    LeftElbow,
    LeftWrist,
    RightShoulder,
    RightElbow,
    RightWrist,
    LeftHip,
    LeftKnee,
    LeftAnkle,
}

impl Joint {
    pub const COUNT: usize = 9;

    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::LeftShoulder,
        Joint::LeftElbow,
        Joint::LeftWrist,
        Joint::RightShoulder,
        Joint::RightElbow,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::LeftKnee,
        Joint::LeftAnkle,
    ];

    /// Name used by the pose estimator for this joint.
    pub fn keypoint_name(&self) -> &'static str {
        match self {
            Joint::LeftShoulder => "left_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightShoulder => "right_shoulder",
            Joint::RightElbow => "right_elbow",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::LeftKnee => "left_knee",
            Joint::LeftAnkle => "left_ankle",
        }
    }

    pub fn from_keypoint_name(name: &str) -> Option<Joint> {
        Joint::ALL
            .iter()
            .copied()
            .find(|joint| joint.keypoint_name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-frame joint table. A slot is `None` when the estimator did not report
/// that joint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Joint, Keypoint>", into = "BTreeMap<Joint, Keypoint>")]
pub struct JointSet {
    slots: [Option<Keypoint>; Joint::COUNT],
}

impl JointSet {
    /// Builds the table by name lookup. Names that are not tracked joints are
    /// ignored; if a name repeats, the later keypoint wins.
    pub fn from_keypoints(keypoints: &[Keypoint]) -> Self {
        let mut set = Self::default();
        for keypoint in keypoints {
            if let Some(joint) = Joint::from_keypoint_name(&keypoint.name) {
                set.slots[joint.index()] = Some(keypoint.clone());
            }
        }
        set
    }

    pub fn get(&self, joint: Joint) -> Option<&Keypoint> {
        self.slots[joint.index()].as_ref()
    }

    pub fn insert(&mut self, joint: Joint, keypoint: Keypoint) {
        self.slots[joint.index()] = Some(keypoint);
    }

    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }
}

impl From<BTreeMap<Joint, Keypoint>> for JointSet {
    fn from(map: BTreeMap<Joint, Keypoint>) -> Self {
        let mut set = Self::default();
        for (joint, keypoint) in map {
            set.insert(joint, keypoint);
        }
        set
    }
}

impl From<JointSet> for BTreeMap<Joint, Keypoint> {
    fn from(set: JointSet) -> Self {
        Joint::ALL
            .iter()
            .zip(set.slots)
            .filter_map(|(joint, slot)| slot.map(|keypoint| (*joint, keypoint)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_joint_set_by_name() {
        let keypoints = vec![
            Keypoint::new("left_shoulder", 1.0, 2.0, 0.9),
            Keypoint::new("nose", 5.0, 5.0, 0.9),
            Keypoint::new("left_knee", 3.0, 4.0, 0.8),
        ];

        let joints = JointSet::from_keypoints(&keypoints);

        assert_eq!(joints.present_count(), 2);
        assert_eq!(joints.get(Joint::LeftShoulder).map(|k| k.x), Some(1.0));
        assert_eq!(joints.get(Joint::LeftKnee).map(|k| k.y), Some(4.0));
        assert!(joints.get(Joint::RightWrist).is_none());
    }

    #[test]
    fn serializes_present_joints_with_camel_case_keys() {
        let joints =
            JointSet::from_keypoints(&[Keypoint::new("right_elbow", 10.0, 20.0, 0.7)]);

        let json = serde_json::to_value(&joints).unwrap();
        assert_eq!(json["rightElbow"]["name"], "right_elbow");
        assert!(json.get("leftShoulder").is_none());

        let back: JointSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, joints);
    }
}
