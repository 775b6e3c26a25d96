//! FormTrack Core Library
//!
//! Turns a time-ordered sequence of body-joint observations from one exercise
//! video into a scored [`FormAnalysis`]: a 0–100 score, ranked feedback and
//! timestamped key points.
//!
//! The pipeline runs strictly one way:
//! frames → [`RepSegmenter`] → reps → [`SQUAT_SCORERS`] → [`aggregate_reps`].
//! Nothing in it holds state beyond a single call, so independent analyses
//! can run on separate threads without coordination.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod exercise;
pub mod geometry;
pub mod ingest;
pub mod obs;
pub mod reporting;
pub mod scorers;
pub mod segmenter;
pub mod telemetry;

pub use domain::{
    FormAnalysis, FormError, Frame, Joint, KeyPoint, Landmark, Result, ScoreResult, Severity,
    Skeleton, NO_REPS_MESSAGE,
};

pub use aggregate::aggregate_reps;
pub use config::{AnalysisConfig, CategoryWeights, KeyPointPolicy, PhaseThresholds};
pub use exercise::{analyze_exercise, analyze_squat, Exercise};
pub use geometry::{angle_from_vertical, avg_knee_angle, vertex_angle};
pub use ingest::{frames_from_samples, PoseSample};
pub use reporting::{
    content_digest, read_analysis_artifact, render_analysis_md, write_analysis_artifact,
    write_analysis_md, AnalysisArtifact,
};
pub use scorers::{
    score_depth, score_hip_hinge, score_knee_tracking, score_stance_width, score_torso_angle,
    Category, RepScorer, SQUAT_SCORERS,
};
pub use segmenter::{Rep, RepPhase, RepSegmenter, RepWindow, StepOutcome};

pub use obs::{
    emit_analysis_finished, emit_analysis_started, emit_artifact_written, emit_frames_ingested,
    emit_rep_detected, emit_rep_discarded, AnalysisSpan,
};
pub use telemetry::init_tracing;

/// FormTrack version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
