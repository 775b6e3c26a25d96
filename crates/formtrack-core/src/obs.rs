//! Structured observability hooks for the analysis lifecycle.
//!
//! This module provides:
//! - Analysis-scoped tracing spans via the `AnalysisSpan` RAII guard
//! - Emission functions for key lifecycle events: ingest, rep detection,
//!   analysis completion and artifact persistence
//!
//! Lifecycle events are emitted at `info!`; per-rep events at `debug!`.
//! Filtering follows `RUST_LOG` once a subscriber is installed (see
//! [`crate::telemetry::init_tracing`]).

use std::path::Path;

use tracing::{debug, info};

/// RAII guard that enters an analysis-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = AnalysisSpan::enter("squat");
/// // Every event until the guard drops carries exercise = "squat".
/// ```
pub struct AnalysisSpan {
    _span: tracing::span::EnteredSpan,
}

impl AnalysisSpan {
    /// Create and enter a span tagged with the exercise name.
    pub fn enter(exercise: &str) -> Self {
        let span = tracing::info_span!("formtrack.analysis", exercise = %exercise);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: analysis started over `frame_count` frames.
pub fn emit_analysis_started(exercise: &str, frame_count: usize) {
    info!(
        event = "analysis.started",
        exercise = %exercise,
        frame_count = frame_count,
    );
}

/// Emit event: pose samples converted to frames.
pub fn emit_frames_ingested(samples: usize, with_pose: usize) {
    info!(
        event = "frames.ingested",
        samples = samples,
        with_pose = with_pose,
    );
}

/// Emit event: a rep completed.
pub fn emit_rep_detected(index: usize, bottom_timestamp: f64, min_knee_angle: f64) {
    debug!(
        event = "rep.detected",
        index = index,
        bottom_timestamp = bottom_timestamp,
        min_knee_angle = min_knee_angle,
    );
}

/// Emit event: an in-progress rep was dropped before completion.
pub fn emit_rep_discarded(descent_start_timestamp: f64, frames: usize) {
    debug!(
        event = "rep.discarded",
        descent_start_timestamp = descent_start_timestamp,
        frames = frames,
    );
}

/// Emit event: analysis finished with the final score.
pub fn emit_analysis_finished(reps: usize, score: u8, key_points: usize) {
    info!(
        event = "analysis.finished",
        reps = reps,
        score = score,
        key_points = key_points,
    );
}

/// Emit event: result artifact persisted.
pub fn emit_artifact_written(run_id: &str, path: &Path) {
    info!(
        event = "artifact.written",
        run_id = %run_id,
        path = %path.display(),
    );
}
