//! Scoring outputs: per-metric results, key points and the final analysis.

use serde::{Deserialize, Serialize};

/// Feedback returned when no completed rep is found.
pub const NO_REPS_MESSAGE: &str = "No complete squat reps detected in the video.";

/// Outcome of one metric scorer: a score in 0.0–1.0 plus the coaching message
/// for the tier it landed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    pub feedback: &'static str,
}

impl ScoreResult {
    pub const fn new(score: f64, feedback: &'static str) -> Self {
        Self { score, feedback }
    }
}

/// Key point severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// A form issue pinned to the moment it was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub timestamp: f64,
    pub issue: String,
    pub severity: Severity,
}

/// Final assessment for one analysed video.
///
/// # Invariants
///
/// `score` is within 0–100. When at least one rep was detected the first
/// feedback line is `"Detected N rep(s)"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAnalysis {
    pub score: u8,
    pub feedback: Vec<String>,
    #[serde(rename = "keyPoints")]
    pub key_points: Vec<KeyPoint>,
}

impl FormAnalysis {
    /// The zero-score result for input without any completed rep.
    pub fn no_reps() -> Self {
        Self {
            score: 0,
            feedback: vec![NO_REPS_MESSAGE.to_string()],
            key_points: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_analysis_wire_shape() {
        let analysis = FormAnalysis {
            score: 72,
            feedback: vec!["Detected 1 rep(s)".to_string()],
            key_points: vec![KeyPoint {
                timestamp: 1.4,
                issue: "Knees caving inward".to_string(),
                severity: Severity::Medium,
            }],
        };

        let raw = serde_json::to_value(&analysis).expect("serialize");
        assert_eq!(
            raw,
            json!({
                "score": 72,
                "feedback": ["Detected 1 rep(s)"],
                "keyPoints": [
                    {"timestamp": 1.4, "issue": "Knees caving inward", "severity": "medium"}
                ]
            })
        );
    }

    #[test]
    fn test_severity_names() {
        assert_eq!(Severity::Low.as_str(), "low");
        assert_eq!(Severity::High.as_str(), "high");
        let parsed: Severity = serde_json::from_str("\"high\"").expect("deserialize");
        assert_eq!(parsed, Severity::High);
    }

    #[test]
    fn test_no_reps_result() {
        let analysis = FormAnalysis::no_reps();
        assert_eq!(analysis.score, 0);
        assert_eq!(analysis.feedback, vec![NO_REPS_MESSAGE.to_string()]);
        assert!(analysis.key_points.is_empty());
    }
}
