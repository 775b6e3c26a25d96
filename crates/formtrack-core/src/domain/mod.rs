//! Domain models for FormTrack.
//!
//! Canonical definitions for the core entities:
//! - `Frame`: Joint landmarks observed at one timestamp
//! - `FormAnalysis`: Score, feedback and key points for one video
//! - `FormError`: Failures at the ingestion, config and artifact boundaries

pub mod analysis;
pub mod error;
pub mod landmark;

// Re-export main types and errors
pub use analysis::{FormAnalysis, KeyPoint, ScoreResult, Severity, NO_REPS_MESSAGE};
pub use error::{FormError, Result};
pub use landmark::{Frame, Joint, Landmark, Skeleton};
