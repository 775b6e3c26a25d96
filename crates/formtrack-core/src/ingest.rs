//! Conversion from pose-estimator output to [`Frame`]s.
//!
//! The estimator reports, per sampled video frame, either nothing (no person
//! found) or the full MediaPipe landmark list keyed by index. Frames without
//! a pose are skipped; frames with a pose must carry every required joint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{FormError, Frame, Result};
use crate::obs;

/// One sampled video frame as reported by the pose estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    pub timestamp: f64,

    /// MediaPipe landmark index → `[x, y, visibility]`; `None` when no pose
    /// was detected in this frame.
    #[serde(default)]
    pub landmarks: Option<BTreeMap<usize, [f64; 3]>>,
}

impl PoseSample {
    pub fn has_pose(&self) -> bool {
        self.landmarks.is_some()
    }
}

/// Convert estimator samples into frames, preserving order.
///
/// An empty input is not an error. A non-empty input in which no sample has
/// a pose is reported as [`FormError::NoPoseDetected`].
pub fn frames_from_samples(samples: &[PoseSample]) -> Result<Vec<Frame>> {
    let frames = samples
        .iter()
        .filter_map(|s| s.landmarks.as_ref().map(|lm| (s.timestamp, lm)))
        .map(|(timestamp, landmarks)| Frame::from_indexed(timestamp, landmarks))
        .collect::<Result<Vec<_>>>()?;

    obs::emit_frames_ingested(samples.len(), frames.len());

    if !samples.is_empty() && frames.is_empty() {
        return Err(FormError::NoPoseDetected {
            samples: samples.len(),
        });
    }
    Ok(frames)
}
