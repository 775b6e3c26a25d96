//! Squat form metrics.
//!
//! Five independent, stateless scorers. Each maps one geometric feature of a
//! rep to a [`ScoreResult`] using a fixed tier table; the tables are the
//! scoring contract and are not configurable. The
//! [`SQUAT_SCORERS`] registry is what the aggregator iterates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Frame, Joint, ScoreResult, Skeleton};
use crate::geometry::{angle_from_vertical, avg_knee_angle, hip_angle, joint_midpoint};
use crate::segmenter::Rep;

/// Scoring category. Declaration order is the tie-break order for feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Depth,
    KneeTracking,
    TorsoAngle,
    StanceWidth,
    HipHinge,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Depth,
        Category::KneeTracking,
        Category::TorsoAngle,
        Category::StanceWidth,
        Category::HipHinge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Depth => "depth",
            Category::KneeTracking => "knee_tracking",
            Category::TorsoAngle => "torso_angle",
            Category::StanceWidth => "stance_width",
            Category::HipHinge => "hip_hinge",
        }
    }

    /// Whether a low per-rep score in this category is pinned as a key point.
    pub fn raises_key_points(self) -> bool {
        matches!(
            self,
            Category::Depth | Category::KneeTracking | Category::TorsoAngle
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scores one completed rep in a single category.
pub type RepScorer = fn(&Rep) -> ScoreResult;

/// The squat scorer set, in feedback tie-break order.
pub const SQUAT_SCORERS: [(Category, RepScorer); 5] = [
    (Category::Depth, depth_of),
    (Category::KneeTracking, knee_tracking_of),
    (Category::TorsoAngle, torso_angle_of),
    (Category::StanceWidth, stance_width_of),
    (Category::HipHinge, hip_hinge_of),
];

fn depth_of(rep: &Rep) -> ScoreResult {
    score_depth(rep.min_knee_angle())
}

fn knee_tracking_of(rep: &Rep) -> ScoreResult {
    score_knee_tracking(rep.bottom_landmarks())
}

fn torso_angle_of(rep: &Rep) -> ScoreResult {
    score_torso_angle(rep.bottom_landmarks())
}

fn stance_width_of(rep: &Rep) -> ScoreResult {
    score_stance_width(rep.bottom_landmarks())
}

fn hip_hinge_of(rep: &Rep) -> ScoreResult {
    score_hip_hinge(rep.frames())
}

/// Depth from the smallest knee angle reached. At or under 90° is parallel.
pub fn score_depth(min_knee_angle: f64) -> ScoreResult {
    if min_knee_angle <= 90.0 {
        ScoreResult::new(1.0, "Good depth — hips below parallel")
    } else if min_knee_angle <= 100.0 {
        ScoreResult::new(0.7, "Nearly parallel — try to go slightly deeper")
    } else if min_knee_angle <= 115.0 {
        ScoreResult::new(0.4, "Partial squat — aim for hips at or below knee level")
    } else {
        ScoreResult::new(0.1, "Shallow squat — significantly more depth needed")
    }
}

/// Knee valgus at the bottom: how far either knee has drifted inward of its
/// ankle, in normalized x.
pub fn knee_valgus(bottom: &Skeleton) -> f64 {
    let left = bottom.get(Joint::LeftKnee).x - bottom.get(Joint::LeftAnkle).x;
    let right = bottom.get(Joint::RightAnkle).x - bottom.get(Joint::RightKnee).x;
    left.max(right)
}

pub fn score_knee_tracking(bottom: &Skeleton) -> ScoreResult {
    let valgus = knee_valgus(bottom);
    if valgus < 0.01 {
        ScoreResult::new(1.0, "Knees tracking well over toes")
    } else if valgus < 0.03 {
        ScoreResult::new(0.7, "Slight knee valgus — focus on pushing knees outward")
    } else if valgus < 0.05 {
        ScoreResult::new(0.4, "Knees caving inward — strengthen hip abductors")
    } else {
        ScoreResult::new(0.1, "Significant knee valgus — reduce weight and work on form")
    }
}

/// Lean of the shoulder-midpoint → hip-midpoint segment from vertical.
pub fn torso_angle(bottom: &Skeleton) -> f64 {
    angle_from_vertical(
        joint_midpoint(bottom, Joint::LeftShoulder, Joint::RightShoulder),
        joint_midpoint(bottom, Joint::LeftHip, Joint::RightHip),
    )
}

pub fn score_torso_angle(bottom: &Skeleton) -> ScoreResult {
    let angle = torso_angle(bottom);
    if angle < 30.0 {
        ScoreResult::new(1.0, "Good torso angle — staying upright")
    } else if angle < 45.0 {
        ScoreResult::new(0.7, "Slight forward lean — work on thoracic mobility")
    } else if angle < 60.0 {
        ScoreResult::new(0.4, "Excessive forward lean — strengthen core and upper back")
    } else {
        ScoreResult::new(0.1, "Very excessive forward lean — risk of lower back strain")
    }
}

/// Shoulder width below which the stance ratio is not trusted.
const MIN_SHOULDER_WIDTH: f64 = 0.01;

/// Foot spread over shoulder spread, or `None` when the shoulders are too
/// close together to measure against.
pub fn stance_ratio(bottom: &Skeleton) -> Option<f64> {
    let foot_width =
        (bottom.get(Joint::RightFootIndex).x - bottom.get(Joint::LeftFootIndex).x).abs();
    let shoulder_width =
        (bottom.get(Joint::RightShoulder).x - bottom.get(Joint::LeftShoulder).x).abs();

    if shoulder_width < MIN_SHOULDER_WIDTH {
        return None;
    }
    Some(foot_width / shoulder_width)
}

pub fn score_stance_width(bottom: &Skeleton) -> ScoreResult {
    let Some(ratio) = stance_ratio(bottom) else {
        return ScoreResult::new(0.5, "Could not reliably measure stance width");
    };

    if (0.9..=1.5).contains(&ratio) {
        ScoreResult::new(1.0, "Good stance width")
    } else if (0.7..0.9).contains(&ratio) {
        ScoreResult::new(0.6, "Stance slightly narrow — try shoulder width or wider")
    } else if ratio > 1.5 && ratio <= 2.0 {
        ScoreResult::new(0.6, "Wide stance — acceptable but may limit depth for some")
    } else {
        ScoreResult::new(
            0.3,
            "Stance width is unusual — aim for shoulder to 1.5x shoulder width",
        )
    }
}

/// Whether the hips break before the knees at the start of the descent.
///
/// Compares the first frame of the window against the third: the change in
/// shoulder-hip-knee angle must keep up with the change in knee angle.
pub fn score_hip_hinge(frames: &[Frame]) -> ScoreResult {
    if frames.len() < 3 {
        return ScoreResult::new(0.5, "Not enough frames to evaluate hip hinge");
    }

    let start = &frames[0].landmarks;
    let early = &frames[2].landmarks;

    let hip_change = (hip_angle(start) - hip_angle(early)).abs();
    let knee_change = (avg_knee_angle(start) - avg_knee_angle(early)).abs();

    if hip_change >= knee_change {
        ScoreResult::new(1.0, "Good hip hinge — hips initiate the movement")
    } else if hip_change >= knee_change * 0.5 {
        ScoreResult::new(0.6, "Try to initiate the squat more with the hips")
    } else {
        ScoreResult::new(0.2, "Knee-dominant descent — push hips back first")
    }
}
