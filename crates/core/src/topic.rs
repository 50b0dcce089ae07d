// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result records produced by the topic-modeling pipeline and the
//! experiment driver. Persisted as one JSON file per project+column
//! (see `loom_storage::paths`).

use serde::{Deserialize, Serialize};

/// One discovered topic: its top-weighted terms and document frequency.
/// `children` forms the hierarchy produced by the Postprocess stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i32,
    pub label: String,
    pub words: Vec<(String, f64)>,
    pub frequency: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Topic>,
}

impl Topic {
    /// The conventional label: the three top-weighted terms joined with
    /// `", "`, unless an override was supplied.
    pub fn default_label(words: &[(String, f64)]) -> String {
        words
            .iter()
            .take(3)
            .map(|(term, _)| term.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Full result of a topic-modeling run for one project+column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicModelingResult {
    pub topics: Vec<Topic>,
    pub hierarchy: Option<Topic>,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub outlier_count: usize,
    pub total_count: usize,
    pub created_at_ms: u64,
}

/// Alias kept distinct from [`TopicModelingResult`] so that `TaskData`'s
/// `Topics` variant reads naturally at call sites.
pub type TopicResult = TopicModelingResult;

/// Coherence/diversity metrics produced by the evaluation collaborator
/// (`loom_pipeline::stages::TopicEvaluator`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub coherence: f64,
    pub diversity: f64,
    pub topic_count: usize,
}

/// One hyperparameter candidate's outcome within an experiment run.
/// `metrics` and `error` are mutually exclusive in practice: a trial that
/// raises is recorded with `error` set and `metrics: None` rather than
/// aborting the whole experiment (`original_source`'s driver re-raises
/// per-trial but `optuna.create_study`'s `catch=Exception` keeps the study
/// alive — mirrored here by the driver continuing to the next trial).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialResult {
    pub index: usize,
    pub hyperparameters: serde_json::Value,
    pub metrics: Option<EvaluationMetrics>,
    #[serde(default)]
    pub error: Option<String>,
    pub started_at_ms: u64,
    pub ended_at_ms: Option<u64>,
}

/// Incrementally-persisted record of an experiment run: one entry per
/// trial, saved to disk after each trial completes so partial progress
/// survives cancellation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperimentResult {
    #[serde(default)]
    pub start_at_ms: u64,
    #[serde(default)]
    pub end_at_ms: Option<u64>,
    #[serde(default)]
    pub last_updated_at_ms: u64,
    pub trials: Vec<TrialResult>,
}

impl ExperimentResult {
    /// Starts a fresh run with no trials yet, `end_at_ms` unset.
    pub fn started(now_ms: u64) -> Self {
        Self {
            start_at_ms: now_ms,
            end_at_ms: None,
            last_updated_at_ms: now_ms,
            trials: Vec::new(),
        }
    }

    /// Appends one trial's outcome and bumps `last_updated_at_ms`, so the
    /// persisted record is always timestamped as of its most recent
    /// write — a cancelled run's on-disk file reflects exactly the trials
    /// that finished before cancellation.
    pub fn push_trial(&mut self, trial: TrialResult) {
        self.last_updated_at_ms = trial.ended_at_ms.unwrap_or(trial.started_at_ms);
        self.trials.push(trial);
    }

    /// Marks the run finished. Skipped entirely by a cancelled driver —
    /// `end_at_ms` staying `None` is how a reader tells "cancelled with
    /// partial trials" from "ran to completion".
    pub fn complete(&mut self, now_ms: u64) {
        self.end_at_ms = Some(now_ms);
        self.last_updated_at_ms = now_ms;
    }
}

#[cfg(test)]
#[path = "topic_tests.rs"]
mod tests;
