//! Rep segmentation over the average knee angle.
//!
//! A four-phase machine (`Standing → Descending → Bottom → Ascending →
//! Standing`) consumes frames once, in order. The thresholds form hysteresis
//! bands so a noisy angle estimate does not flap between phases.
//!
//! Each phase owns its accumulator, so a transition is a pure function of
//! `(phase, frame, angle)` and can be exercised without the driving loop.

use crate::config::PhaseThresholds;
use crate::domain::{Frame, Skeleton};
use crate::geometry::avg_knee_angle;
use crate::obs;

/// One completed squat repetition.
///
/// Only produced by [`RepSegmenter`]; `frames` runs from the descent-start
/// frame through the frame that returned to standing, inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Rep {
    descent_start_timestamp: f64,
    min_knee_angle: f64,
    bottom_index: usize,
    frames: Vec<Frame>,
}

impl Rep {
    /// Timestamp of the frame with the smallest average knee angle.
    pub fn bottom_timestamp(&self) -> f64 {
        self.bottom_frame().timestamp
    }

    /// The frame with the smallest average knee angle.
    pub fn bottom_frame(&self) -> &Frame {
        &self.frames[self.bottom_index]
    }

    pub fn bottom_landmarks(&self) -> &Skeleton {
        &self.bottom_frame().landmarks
    }

    pub fn min_knee_angle(&self) -> f64 {
        self.min_knee_angle
    }

    pub fn descent_start_timestamp(&self) -> f64 {
        self.descent_start_timestamp
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Frames and running minimum collected since the descent began.
#[derive(Debug, Clone, PartialEq)]
pub struct RepWindow {
    descent_start_timestamp: f64,
    min_knee_angle: f64,
    min_index: usize,
    frames: Vec<Frame>,
}

impl RepWindow {
    fn start(frame: &Frame, angle: f64) -> Self {
        Self {
            descent_start_timestamp: frame.timestamp,
            min_knee_angle: angle,
            min_index: 0,
            frames: vec![*frame],
        }
    }

    fn observe(&mut self, frame: &Frame, angle: f64) {
        self.frames.push(*frame);
        if angle < self.min_knee_angle {
            self.min_knee_angle = angle;
            self.min_index = self.frames.len() - 1;
        }
    }

    fn finish(self) -> Rep {
        Rep {
            descent_start_timestamp: self.descent_start_timestamp,
            min_knee_angle: self.min_knee_angle,
            bottom_index: self.min_index,
            frames: self.frames,
        }
    }

    pub fn descent_start_timestamp(&self) -> f64 {
        self.descent_start_timestamp
    }

    pub fn min_knee_angle(&self) -> f64 {
        self.min_knee_angle
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Segmentation phase, carrying the in-progress rep when not standing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RepPhase {
    #[default]
    Standing,
    Descending(RepWindow),
    Bottom(RepWindow),
    Ascending(RepWindow),
}

/// Side effect of a single transition.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Nothing to report.
    Continue,
    /// The lifter returned upright after reaching the bottom.
    Completed(Rep),
    /// The lifter returned upright without reaching the bottom.
    Discarded(RepWindow),
}

impl RepPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RepPhase::Standing => "STANDING",
            RepPhase::Descending(_) => "DESCENDING",
            RepPhase::Bottom(_) => "BOTTOM",
            RepPhase::Ascending(_) => "ASCENDING",
        }
    }

    /// Advance by one frame whose average knee angle is `angle`.
    pub fn step(
        self,
        frame: &Frame,
        angle: f64,
        thresholds: &PhaseThresholds,
    ) -> (RepPhase, StepOutcome) {
        match self {
            RepPhase::Standing => from_standing(frame, angle, thresholds),
            RepPhase::Descending(window) => from_descending(window, frame, angle, thresholds),
            RepPhase::Bottom(window) => from_bottom(window, frame, angle, thresholds),
            RepPhase::Ascending(window) => from_ascending(window, frame, angle, thresholds),
        }
    }
}

fn from_standing(frame: &Frame, angle: f64, t: &PhaseThresholds) -> (RepPhase, StepOutcome) {
    if angle < t.descending {
        (
            RepPhase::Descending(RepWindow::start(frame, angle)),
            StepOutcome::Continue,
        )
    } else {
        (RepPhase::Standing, StepOutcome::Continue)
    }
}

fn from_descending(
    mut window: RepWindow,
    frame: &Frame,
    angle: f64,
    t: &PhaseThresholds,
) -> (RepPhase, StepOutcome) {
    window.observe(frame, angle);
    if angle <= t.bottom {
        (RepPhase::Bottom(window), StepOutcome::Continue)
    } else if angle > t.standing {
        (RepPhase::Standing, StepOutcome::Discarded(window))
    } else {
        (RepPhase::Descending(window), StepOutcome::Continue)
    }
}

fn from_bottom(
    mut window: RepWindow,
    frame: &Frame,
    angle: f64,
    t: &PhaseThresholds,
) -> (RepPhase, StepOutcome) {
    window.observe(frame, angle);
    if angle > t.descending {
        (RepPhase::Ascending(window), StepOutcome::Continue)
    } else {
        (RepPhase::Bottom(window), StepOutcome::Continue)
    }
}

fn from_ascending(
    mut window: RepWindow,
    frame: &Frame,
    angle: f64,
    t: &PhaseThresholds,
) -> (RepPhase, StepOutcome) {
    window.observe(frame, angle);
    if angle > t.standing {
        (RepPhase::Standing, StepOutcome::Completed(window.finish()))
    } else {
        (RepPhase::Ascending(window), StepOutcome::Continue)
    }
}

/// Splits a frame sequence into completed reps.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepSegmenter {
    thresholds: PhaseThresholds,
}

impl RepSegmenter {
    pub fn new(thresholds: PhaseThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PhaseThresholds {
        &self.thresholds
    }

    /// Run the phase machine over `frames` in a single forward pass.
    ///
    /// A rep still in progress when the input ends is dropped.
    pub fn segment(&self, frames: &[Frame]) -> Vec<Rep> {
        let mut phase = RepPhase::Standing;
        let mut reps = Vec::new();

        for frame in frames {
            let angle = avg_knee_angle(&frame.landmarks);
            let (next, outcome) = phase.step(frame, angle, &self.thresholds);
            match outcome {
                StepOutcome::Continue => {}
                StepOutcome::Completed(rep) => {
                    obs::emit_rep_detected(
                        reps.len() + 1,
                        rep.bottom_timestamp(),
                        rep.min_knee_angle(),
                    );
                    reps.push(rep);
                }
                StepOutcome::Discarded(window) => {
                    obs::emit_rep_discarded(window.descent_start_timestamp(), window.len());
                }
            }
            phase = next;
        }

        if let RepPhase::Descending(w) | RepPhase::Bottom(w) | RepPhase::Ascending(w) = &phase {
            obs::emit_rep_discarded(w.descent_start_timestamp(), w.len());
        }

        reps
    }
}
