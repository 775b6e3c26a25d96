//! Error taxonomy for FormTrack boundary operations.
//!
//! The analysis pipeline itself never fails; these errors only come from
//! ingesting landmarks, loading configuration and persisting artifacts.

use super::landmark::Joint;

/// FormTrack errors.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("frame at {timestamp}s is missing required joint {joint}")]
    MissingJoint { timestamp: f64, joint: Joint },

    #[error("no pose detected in any of {samples} frames; ensure the full body is visible")]
    NoPoseDetected { samples: usize },

    #[error("analysis not supported for '{0}'. Currently supported: squats.")]
    UnsupportedExercise(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config decode error: {0}")]
    ConfigDecode(#[from] toml::de::Error),

    #[error("config encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for FormTrack boundary operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_joint_display() {
        let err = FormError::MissingJoint {
            timestamp: 1.5,
            joint: Joint::LeftKnee,
        };
        let msg = err.to_string();
        assert!(msg.contains("1.5s"));
        assert!(msg.contains("left_knee"));
    }

    #[test]
    fn test_unsupported_exercise_lists_supported() {
        let err = FormError::UnsupportedExercise("Bench Press".to_string());
        let msg = err.to_string();
        assert!(msg.contains("'Bench Press'"));
        assert!(msg.contains("Currently supported: squats."));
    }

    #[test]
    fn test_digest_mismatch_error() {
        let err = FormError::DigestMismatch {
            expected: "abc123".to_string(),
            actual: "def456".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("def456"));
    }
}
