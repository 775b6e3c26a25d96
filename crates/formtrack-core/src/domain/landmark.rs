//! Joint landmarks and frames.
//!
//! A [`Frame`] carries one observed [`Skeleton`]: the ten lower-body and
//! shoulder joints the squat analysis needs, each as a named field rather than
//! a positional index.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{FormError, Result};

/// Joints tracked for form analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftFootIndex,
    RightFootIndex,
}

impl Joint {
    /// Every joint a frame must carry.
    pub const ALL: [Joint; 10] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftFootIndex,
        Joint::RightFootIndex,
    ];

    /// Position of this joint in the 33-point MediaPipe Pose landmark list.
    pub fn mediapipe_index(self) -> usize {
        match self {
            Joint::LeftShoulder => 11,
            Joint::RightShoulder => 12,
            Joint::LeftHip => 23,
            Joint::RightHip => 24,
            Joint::LeftKnee => 25,
            Joint::RightKnee => 26,
            Joint::LeftAnkle => 27,
            Joint::RightAnkle => 28,
            Joint::LeftFootIndex => 31,
            Joint::RightFootIndex => 32,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
            Joint::LeftKnee => "left_knee",
            Joint::RightKnee => "right_knee",
            Joint::LeftAnkle => "left_ankle",
            Joint::RightAnkle => "right_ankle",
            Joint::LeftFootIndex => "left_foot_index",
            Joint::RightFootIndex => "right_foot_index",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_visibility() -> f64 {
    1.0
}

/// A single joint position in normalized image coordinates.
///
/// `x` and `y` lie in 0–1 with `y` growing downward. `visibility` is the
/// estimator's confidence; it is carried through but never used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self { x, y, visibility }
    }

    /// Planar position as an `(x, y)` pair.
    pub fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// All required joints observed at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    pub left_shoulder: Landmark,
    pub right_shoulder: Landmark,
    pub left_hip: Landmark,
    pub right_hip: Landmark,
    pub left_knee: Landmark,
    pub right_knee: Landmark,
    pub left_ankle: Landmark,
    pub right_ankle: Landmark,
    pub left_foot_index: Landmark,
    pub right_foot_index: Landmark,
}

impl Skeleton {
    /// Look up a joint by name.
    pub fn get(&self, joint: Joint) -> Landmark {
        match joint {
            Joint::LeftShoulder => self.left_shoulder,
            Joint::RightShoulder => self.right_shoulder,
            Joint::LeftHip => self.left_hip,
            Joint::RightHip => self.right_hip,
            Joint::LeftKnee => self.left_knee,
            Joint::RightKnee => self.right_knee,
            Joint::LeftAnkle => self.left_ankle,
            Joint::RightAnkle => self.right_ankle,
            Joint::LeftFootIndex => self.left_foot_index,
            Joint::RightFootIndex => self.right_foot_index,
        }
    }

    pub fn xy(&self, joint: Joint) -> (f64, f64) {
        self.get(joint).xy()
    }

    /// Build a skeleton from a MediaPipe index map of `[x, y, visibility]`.
    ///
    /// Indices outside the required set are ignored.
    pub fn from_indexed(timestamp: f64, landmarks: &BTreeMap<usize, [f64; 3]>) -> Result<Self> {
        let lookup = |joint: Joint| -> Result<Landmark> {
            landmarks
                .get(&joint.mediapipe_index())
                .map(|[x, y, v]| Landmark::new(*x, *y, *v))
                .ok_or(FormError::MissingJoint { timestamp, joint })
        };

        Ok(Self {
            left_shoulder: lookup(Joint::LeftShoulder)?,
            right_shoulder: lookup(Joint::RightShoulder)?,
            left_hip: lookup(Joint::LeftHip)?,
            right_hip: lookup(Joint::RightHip)?,
            left_knee: lookup(Joint::LeftKnee)?,
            right_knee: lookup(Joint::RightKnee)?,
            left_ankle: lookup(Joint::LeftAnkle)?,
            right_ankle: lookup(Joint::RightAnkle)?,
            left_foot_index: lookup(Joint::LeftFootIndex)?,
            right_foot_index: lookup(Joint::RightFootIndex)?,
        })
    }
}

/// One observed pose with its video timestamp in seconds.
///
/// Timestamps are expected to be non-decreasing across a sequence; nothing
/// here re-sorts or validates ordering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: f64,
    pub landmarks: Skeleton,
}

impl Frame {
    pub fn new(timestamp: f64, landmarks: Skeleton) -> Self {
        Self {
            timestamp,
            landmarks,
        }
    }

    /// Build a frame from a MediaPipe index map, failing on the first
    /// required joint that is absent.
    pub fn from_indexed(timestamp: f64, landmarks: &BTreeMap<usize, [f64; 3]>) -> Result<Self> {
        Ok(Self::new(
            timestamp,
            Skeleton::from_indexed(timestamp, landmarks)?,
        ))
    }

    pub fn xy(&self, joint: Joint) -> (f64, f64) {
        self.landmarks.xy(joint)
    }
}
