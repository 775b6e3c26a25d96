//! Persisted analysis artifacts and human-readable summaries.
//!
//! An artifact wraps the deterministic [`FormAnalysis`] with run metadata and
//! is written next to a SHA-256 digest so later reads can detect tampering.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::{FormAnalysis, FormError, Result};
use crate::exercise::Exercise;
use crate::obs;

pub const SCHEMA_VERSION: &str = "1.0";

const ANALYSIS_FILE: &str = "analysis.json";
const DIGEST_FILE: &str = "analysis.digest";

/// Analysis result plus the metadata of the run that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisArtifact {
    pub schema_version: String,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub exercise: Exercise,
    pub frame_count: usize,
    pub analysis: FormAnalysis,
}

impl AnalysisArtifact {
    /// Wrap an analysis under a fresh run id.
    pub fn new(exercise: Exercise, frame_count: usize, analysis: FormAnalysis) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            exercise,
            frame_count,
            analysis,
        }
    }
}

/// Hex-encoded SHA-256 of `data`.
pub fn content_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Persist `<dir>/<run_id>/analysis.json` and `<dir>/<run_id>/analysis.digest`.
pub fn write_analysis_artifact(artifact: &AnalysisArtifact, dir: &Path) -> Result<PathBuf> {
    let run_id = artifact.run_id.to_string();
    let run_dir = dir.join(&run_id);
    std::fs::create_dir_all(&run_dir)?;

    let path = run_dir.join(ANALYSIS_FILE);
    let json = serde_json::to_vec_pretty(artifact)?;
    let digest = content_digest(&json);

    std::fs::write(&path, &json)?;
    std::fs::write(run_dir.join(DIGEST_FILE), digest.as_bytes())?;

    obs::emit_artifact_written(&run_id, &path);
    Ok(path)
}

/// Read `<dir>/<run_id>/analysis.json`, verifying it against its digest.
pub fn read_analysis_artifact(run_id: &str, dir: &Path) -> Result<AnalysisArtifact> {
    let run_dir = dir.join(run_id);

    let json = std::fs::read(run_dir.join(ANALYSIS_FILE))?;
    let expected = std::fs::read_to_string(run_dir.join(DIGEST_FILE))?;
    let actual = content_digest(&json);
    if expected.trim() != actual {
        return Err(FormError::DigestMismatch {
            expected: expected.trim().to_string(),
            actual,
        });
    }

    Ok(serde_json::from_slice(&json)?)
}

/// Render a Markdown summary of an artifact.
pub fn render_analysis_md(artifact: &AnalysisArtifact) -> String {
    let analysis = &artifact.analysis;
    let mut out = String::new();
    out.push_str("# Form Analysis\n\n");
    out.push_str(&format!(
        "- exercise: {}\n- run: `{}`\n- frames: {}\n- score: **{}/100**\n\n",
        artifact.exercise, artifact.run_id, artifact.frame_count, analysis.score
    ));

    out.push_str("## Feedback\n");
    for line in &analysis.feedback {
        out.push_str(&format!("- {}\n", line));
    }

    if !analysis.key_points.is_empty() {
        out.push_str("\n## Key Points\n\n");
        out.push_str("| time (s) | severity | issue |\n");
        out.push_str("|---|---|---|\n");
        for kp in &analysis.key_points {
            out.push_str(&format!(
                "| {:.2} | {} | {} |\n",
                kp.timestamp,
                kp.severity.as_str(),
                kp.issue
            ));
        }
    }
    out
}

/// Write the Markdown summary to `path`.
pub fn write_analysis_md(path: &Path, artifact: &AnalysisArtifact) -> Result<()> {
    std::fs::write(path, render_analysis_md(artifact))?;
    Ok(())
}
