//! Exercise resolution and the end-to-end analysis entry points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate_reps;
use crate::config::AnalysisConfig;
use crate::domain::{FormAnalysis, FormError, Frame, Result};
use crate::obs;
use crate::segmenter::RepSegmenter;

/// Exercises with a scorer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exercise {
    Squat,
}

impl Exercise {
    /// Resolve a free-text exercise name such as "Barbell Back Squat".
    ///
    /// Matching is a case-insensitive substring test.
    pub fn from_name(name: &str) -> Result<Self> {
        if name.to_lowercase().contains("squat") {
            Ok(Exercise::Squat)
        } else {
            Err(FormError::UnsupportedExercise(name.to_string()))
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Exercise::Squat => "squat",
        }
    }

    /// Run the full pipeline for this exercise.
    pub fn analyze(self, frames: &[Frame], config: &AnalysisConfig) -> FormAnalysis {
        match self {
            Exercise::Squat => analyze_squat(frames, config),
        }
    }
}

impl FromStr for Exercise {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Segment, score and aggregate a squat video's frames.
///
/// Never fails: input without a completed rep yields the zero-score result.
pub fn analyze_squat(frames: &[Frame], config: &AnalysisConfig) -> FormAnalysis {
    let _span = obs::AnalysisSpan::enter(Exercise::Squat.name());
    obs::emit_analysis_started(Exercise::Squat.name(), frames.len());

    let reps = RepSegmenter::new(config.phases).segment(frames);
    let analysis = aggregate_reps(&reps, config);

    obs::emit_analysis_finished(reps.len(), analysis.score, analysis.key_points.len());
    analysis
}

/// Resolve `exercise_name` and analyse `frames` with it.
pub fn analyze_exercise(
    exercise_name: &str,
    frames: &[Frame],
    config: &AnalysisConfig,
) -> Result<FormAnalysis> {
    let exercise = Exercise::from_name(exercise_name)?;
    Ok(exercise.analyze(frames, config))
}
