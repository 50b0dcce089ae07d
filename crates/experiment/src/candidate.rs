// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hyperparameter candidates, the ranges an experiment searches them over,
//! and the sampler that turns a trial index into a candidate.
//!
//! `topic_confidence_threshold` in `original_source`'s
//! `BERTopicHyperparameterCandidate` has no counterpart in
//! [`loom_core::TopicModelingConfig`]; `clustering_conservativeness` is the
//! closest analogue (both govern how readily a document joins a cluster
//! rather than being marked an outlier), so the search space is expressed
//! over that field instead.

use loom_core::SchemaColumn;

/// One hyperparameter assignment. Every field is optional so a candidate
/// can leave a dimension at the schema's configured default.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct HyperparameterCandidate {
    pub min_topic_size: Option<u32>,
    pub max_topics: Option<u32>,
    pub clustering_conservativeness: Option<f64>,
}

impl HyperparameterCandidate {
    /// Returns a textual `column` with this candidate's fields written
    /// into its `topic_modeling` block, leaving every other column field
    /// untouched. `None` if `column` isn't textual.
    pub fn apply(&self, column: &SchemaColumn) -> Option<SchemaColumn> {
        let mut column = column.clone();
        let topic_modeling = column.topic_modeling_mut()?;
        if let Some(min_topic_size) = self.min_topic_size {
            topic_modeling.min_topic_size = min_topic_size;
        }
        if let Some(max_topics) = self.max_topics {
            topic_modeling.max_topics = Some(max_topics);
        }
        if let Some(clustering_conservativeness) = self.clustering_conservativeness {
            topic_modeling.clustering_conservativeness = clustering_conservativeness;
        }
        Some(column)
    }
}

/// An inclusive `[low, high]` bound on a search dimension. `None` leaves
/// the dimension unsearched — the candidate never sets that field.
#[derive(Debug, Clone, Copy)]
pub struct IntRange {
    pub low: u32,
    pub high: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct FloatRange {
    pub low: f64,
    pub high: f64,
}

/// The search space for one experiment run. Mirrors
/// `BERTopicHyperparameterConstraint`: each field names a dimension the
/// sampler is free to vary, `None` meaning "don't search this one".
#[derive(Debug, Clone, Default)]
pub struct HyperparameterConstraint {
    pub min_topic_size: Option<IntRange>,
    pub max_topics: Option<IntRange>,
    pub clustering_conservativeness: Option<FloatRange>,
}

/// Turns a trial index into a [`HyperparameterCandidate`] within a
/// [`HyperparameterConstraint`]. `original_source` delegates this to
/// `optuna`'s Bayesian sampler; that dependency has no counterpart
/// anywhere in this codebase's stack, so [`GridSampler`] instead walks
/// each bounded dimension deterministically, which keeps the driver
/// reproducible without a new external dependency.
pub trait CandidateSampler {
    fn suggest(&mut self, constraint: &HyperparameterConstraint, trial_index: usize) -> HyperparameterCandidate;
}

/// Steps every bounded dimension linearly over `[low, high]` as
/// `trial_index` increases, wrapping each dimension independently so a
/// short run still varies every searched field at least once.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridSampler {
    pub steps: usize,
}

impl GridSampler {
    /// `steps` is the number of distinct values a bounded dimension takes
    /// across the run before it starts repeating; `0` is treated as `1`.
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }
}

impl CandidateSampler for GridSampler {
    fn suggest(&mut self, constraint: &HyperparameterConstraint, trial_index: usize) -> HyperparameterCandidate {
        let steps = self.steps.max(1);
        HyperparameterCandidate {
            min_topic_size: constraint.min_topic_size.map(|r| step_u32(r, trial_index, steps)),
            max_topics: constraint.max_topics.map(|r| step_u32(r, trial_index, steps)),
            clustering_conservativeness: constraint
                .clustering_conservativeness
                .map(|r| step_f64(r, trial_index, steps)),
        }
    }
}

fn step_u32(range: IntRange, trial_index: usize, steps: usize) -> u32 {
    if range.high <= range.low {
        return range.low;
    }
    let phase = trial_index % steps;
    let span = range.high - range.low;
    range.low + (span as u64 * phase as u64 / steps.max(1) as u64) as u32
}

fn step_f64(range: FloatRange, trial_index: usize, steps: usize) -> f64 {
    if range.high <= range.low {
        return range.low;
    }
    let phase = (trial_index % steps) as f64;
    range.low + (range.high - range.low) * phase / steps.max(1) as f64
}

#[cfg(test)]
#[path = "candidate_tests.rs"]
mod tests;
