//! Analysis configuration: phase thresholds, category weights and key-point
//! policy.
//!
//! Defaults reproduce the squat scoring contract. A config file may override
//! any subset; missing tables fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{FormError, Result};
use crate::scorers::Category;

/// Knee-angle hysteresis bands (degrees) driving rep segmentation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Above this the lifter is upright: ends a rep or aborts a descent.
    pub standing: f64,

    /// Below this a descent begins; above it the ascent begins.
    pub descending: f64,

    /// At or below this the bottom of the squat is reached.
    pub bottom: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            standing: 160.0,
            descending: 140.0,
            bottom: 110.0,
        }
    }
}

/// Weight of each scoring category in the final score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CategoryWeights {
    pub depth: f64,
    pub knee_tracking: f64,
    pub torso_angle: f64,
    pub stance_width: f64,
    pub hip_hinge: f64,
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Depth => self.depth,
            Category::KneeTracking => self.knee_tracking,
            Category::TorsoAngle => self.torso_angle,
            Category::StanceWidth => self.stance_width,
            Category::HipHinge => self.hip_hinge,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            depth: 0.30,
            knee_tracking: 0.25,
            torso_angle: 0.25,
            stance_width: 0.10,
            hip_hinge: 0.10,
        }
    }
}

/// When a per-rep score becomes a key point, and how severe it is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyPointPolicy {
    /// Scores strictly below this produce a key point.
    pub attention_below: f64,

    /// Scores at or below this are `high` severity; the rest are `medium`.
    pub high_at_or_below: f64,
}

impl Default for KeyPointPolicy {
    fn default() -> Self {
        Self {
            attention_below: 0.7,
            high_at_or_below: 0.1,
        }
    }
}

/// Complete configuration for one analysis run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub phases: PhaseThresholds,
    pub weights: CategoryWeights,
    pub key_points: KeyPointPolicy,
}

impl AnalysisConfig {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        let p = &self.phases;
        let values = [
            p.standing,
            p.descending,
            p.bottom,
            self.key_points.attention_below,
            self.key_points.high_at_or_below,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FormError::InvalidConfig(
                "thresholds must be finite numbers".to_string(),
            ));
        }

        if !(p.bottom < p.descending && p.descending < p.standing) {
            return Err(FormError::InvalidConfig(format!(
                "phase thresholds must satisfy bottom < descending < standing (got {} / {} / {})",
                p.bottom, p.descending, p.standing
            )));
        }

        for category in Category::ALL {
            let w = self.weights.get(category);
            if !w.is_finite() || w < 0.0 {
                return Err(FormError::InvalidConfig(format!(
                    "weight for {} must be a non-negative number (got {})",
                    category, w
                )));
            }
        }

        let total = self.weights.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(FormError::InvalidConfig(format!(
                "category weights must sum to 1.0 (got {:.6})",
                total
            )));
        }

        let kp = &self.key_points;
        if kp.high_at_or_below >= kp.attention_below {
            return Err(FormError::InvalidConfig(format!(
                "key point high_at_or_below ({}) must be below attention_below ({})",
                kp.high_at_or_below, kp.attention_below
            )));
        }

        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from disk: TOML when the extension is `.toml`, JSON otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let config = if is_toml {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        tracing::debug!(path = %path.display(), "analysis config loaded");
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scoring_contract() {
        let config = AnalysisConfig::default();
        assert_eq!(config.phases.standing, 160.0);
        assert_eq!(config.phases.descending, 140.0);
        assert_eq!(config.phases.bottom, 110.0);
        assert_eq!(config.weights.depth, 0.30);
        assert_eq!(config.weights.knee_tracking, 0.25);
        assert_eq!(config.weights.torso_angle, 0.25);
        assert_eq!(config.weights.stance_width, 0.10);
        assert_eq!(config.weights.hip_hinge, 0.10);
        assert_eq!(config.key_points.attention_below, 0.7);
        assert_eq!(config.key_points.high_at_or_below, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            [phases]
            bottom = 100.0
            "#,
        )
        .expect("parse");

        assert_eq!(config.phases.bottom, 100.0);
        assert_eq!(config.phases.standing, 160.0);
        assert_eq!(config.weights, CategoryWeights::default());
    }

    #[test]
    fn test_rejects_unordered_phases() {
        let err = AnalysisConfig::from_toml_str(
            r#"
            [phases]
            descending = 170.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bottom < descending < standing"));
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let err = AnalysisConfig::from_toml_str(
            r#"
            [weights]
            depth = 0.5
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut config = AnalysisConfig::default();
        config.weights.depth = 0.5;
        config.weights.hip_hinge = -0.1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("hip_hinge"));
    }

    #[test]
    fn test_rejects_inverted_key_point_policy() {
        let mut config = AnalysisConfig::default();
        config.key_points.high_at_or_below = 0.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        let mut config = AnalysisConfig::default();
        config.phases.standing = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn test_toml_output_parses_back() {
        let config = AnalysisConfig::default();
        let text = config.to_toml_string().expect("encode");
        assert!(text.contains("[phases]"));
        assert!(text.contains("[weights]"));
        let parsed = AnalysisConfig::from_toml_str(&text).expect("decode");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_json_and_toml_files() {
        let dir = tempfile::tempdir().expect("tempdir");

        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, r#"{"phases": {"bottom": 105.0}}"#).expect("write json");
        let from_json = AnalysisConfig::load(&json_path).expect("load json");
        assert_eq!(from_json.phases.bottom, 105.0);

        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "[key_points]\nattention_below = 0.6\n").expect("write toml");
        let from_toml = AnalysisConfig::load(&toml_path).expect("load toml");
        assert_eq!(from_toml.key_points.attention_below, 0.6);
    }
}
