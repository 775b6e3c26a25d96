//! Combines per-rep scores into one [`FormAnalysis`].
//!
//! Every rep is run through every scorer in [`SQUAT_SCORERS`]. Scores are
//! averaged within each category first, then weighted. Feedback keeps only the
//! worst message seen per category, ordered worst first. Low depth, knee and
//! torso scores are pinned to the rep's bottom timestamp as key points.

use crate::config::{AnalysisConfig, KeyPointPolicy};
use crate::domain::{FormAnalysis, KeyPoint, ScoreResult, Severity};
use crate::scorers::{Category, SQUAT_SCORERS};
use crate::segmenter::Rep;

/// Running totals for one category across reps.
#[derive(Debug, Clone, Copy)]
struct CategoryTally {
    category: Category,
    sum: f64,
    worst: ScoreResult,
}

impl CategoryTally {
    fn new(category: Category, first: ScoreResult) -> Self {
        Self {
            category,
            sum: first.score,
            worst: first,
        }
    }

    fn add(&mut self, result: ScoreResult) {
        self.sum += result.score;
        // Strictly lower only: on a tie the earliest rep's message stays.
        if result.score < self.worst.score {
            self.worst = result;
        }
    }
}

fn key_point(policy: &KeyPointPolicy, timestamp: f64, result: &ScoreResult) -> Option<KeyPoint> {
    if result.score >= policy.attention_below {
        return None;
    }
    let severity = if result.score <= policy.high_at_or_below {
        Severity::High
    } else {
        Severity::Medium
    };
    Some(KeyPoint {
        timestamp,
        issue: result.feedback.to_string(),
        severity,
    })
}

/// Score a list of completed reps.
pub fn aggregate_reps(reps: &[Rep], config: &AnalysisConfig) -> FormAnalysis {
    if reps.is_empty() {
        return FormAnalysis::no_reps();
    }

    let mut tallies: Vec<CategoryTally> = Vec::with_capacity(SQUAT_SCORERS.len());
    let mut key_points = Vec::new();

    for (rep_index, rep) in reps.iter().enumerate() {
        for (slot, (category, scorer)) in SQUAT_SCORERS.iter().enumerate() {
            let result = scorer(rep);

            if rep_index == 0 {
                tallies.push(CategoryTally::new(*category, result));
            } else {
                tallies[slot].add(result);
            }

            if category.raises_key_points() {
                key_points.extend(key_point(
                    &config.key_points,
                    rep.bottom_timestamp(),
                    &result,
                ));
            }
        }
    }

    let rep_count = reps.len() as f64;
    let weighted: f64 = tallies
        .iter()
        .map(|t| (t.sum / rep_count) * config.weights.get(t.category))
        .sum();
    // Half-way cases round to even.
    let score = (weighted * 100.0).round_ties_even().clamp(0.0, 100.0) as u8;

    let mut worst: Vec<ScoreResult> = tallies.iter().map(|t| t.worst).collect();
    worst.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut feedback = Vec::with_capacity(worst.len() + 1);
    feedback.push(format!("Detected {} rep(s)", reps.len()));
    feedback.extend(worst.iter().map(|r| r.feedback.to_string()));

    FormAnalysis {
        score,
        feedback,
        key_points,
    }
}
