// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs one experiment: the shared Load/Preprocess prefix once, then
//! stages 3–7 once per hyperparameter candidate with `can_save = false`,
//! scoring and persisting each trial as it finishes.

use loom_cache::ProjectCache;
use loom_core::{now_ms, CoreError, CoreResult, ExperimentResult, ProjectConfig, TaskData, TrialResult};
use loom_pipeline::{run_prefix_stages, run_trial_stages, PipelineState, ProgressReporter, TopicEvaluator};

use crate::candidate::{CandidateSampler, HyperparameterConstraint};

/// Runs `trial_count` candidates of `constraint` over `column`, returning
/// the experiment's [`TaskData::Experiment`] payload on completion.
///
/// Cancellation (via `reporter.check_stop`) is checked at the top of every
/// trial, never mid-trial: a trial that has started always finishes (or
/// fails and is recorded) before the loop can stop. The
/// [`ExperimentResult`] already persisted up to that point is left on disk
/// — `end_at_ms` stays `None`, which is how a reader tells a cancelled run
/// from one that finished every trial (`SPEC_FULL.md` §8, scenario S6).
#[allow(clippy::too_many_arguments, clippy::expect_used)]
pub fn run_experiment(
    cache: &ProjectCache,
    config: ProjectConfig,
    column: String,
    constraint: HyperparameterConstraint,
    trial_count: usize,
    sampler: &mut dyn CandidateSampler,
    evaluator: &dyn TopicEvaluator,
    reporter: &dyn ProgressReporter,
) -> CoreResult<TaskData> {
    reporter.check_stop()?;
    reporter.report("loading shared preprocessing prefix");
    let mut prefix_state = PipelineState::new(config, column.clone());
    run_prefix_stages(&mut prefix_state, cache, reporter)?;

    let base_column = prefix_state
        .schema_column()
        .cloned()
        .ok_or_else(|| CoreError::MissingColumn(column.clone()))?;

    let mut experiment = ExperimentResult::started(now_ms());

    for trial_index in 0..trial_count {
        reporter.check_stop()?;

        let candidate = sampler.suggest(&constraint, trial_index);
        reporter.report(&format!("trial {trial_index}: running candidate"));

        let trial_column = candidate
            .apply(&base_column)
            .ok_or_else(|| CoreError::WrongColumnType {
                column: column.clone(),
                expected: "textual",
                actual: "non-textual".to_string(),
            })?;

        let mut trial_config = prefix_state.config.clone();
        *trial_config
            .data_schema
            .column_mut(&column)
            .expect("column present in base_column must be present in its own schema") = trial_column;

        let mut trial_state = PipelineState::new(trial_config, column.clone());
        trial_state.workspace = prefix_state.workspace.clone();
        trial_state.mask = prefix_state.mask.clone();
        trial_state.preprocessed_docs = prefix_state.preprocessed_docs.clone();
        trial_state.embedding_docs = prefix_state.embedding_docs.clone();

        let started_at_ms = now_ms();
        let trial = match run_trial_stages(&mut trial_state, cache, reporter, false) {
            Err(CoreError::TaskStop) => return Err(CoreError::TaskStop),
            Err(e) => TrialResult {
                index: trial_index,
                hyperparameters: serde_json::to_value(&candidate).unwrap_or(serde_json::Value::Null),
                metrics: None,
                error: Some(e.to_string()),
                started_at_ms,
                ended_at_ms: Some(now_ms()),
            },
            Ok(()) => {
                let result = trial_state
                    .result
                    .take()
                    .expect("postprocess stage always populates result on success");
                match evaluator.score(&result) {
                    Ok(metrics) => TrialResult {
                        index: trial_index,
                        hyperparameters: serde_json::to_value(&candidate).unwrap_or(serde_json::Value::Null),
                        metrics: Some(metrics),
                        error: None,
                        started_at_ms,
                        ended_at_ms: Some(now_ms()),
                    },
                    Err(e) => TrialResult {
                        index: trial_index,
                        hyperparameters: serde_json::to_value(&candidate).unwrap_or(serde_json::Value::Null),
                        metrics: None,
                        error: Some(e.to_string()),
                        started_at_ms,
                        ended_at_ms: Some(now_ms()),
                    },
                }
            }
        };

        experiment.push_trial(trial);
        cache.save_experiment(&column, &experiment)?;
        reporter.report(&format!("trial {trial_index}: saved"));
    }

    experiment.complete(now_ms());
    cache.save_experiment(&column, &experiment)?;
    Ok(TaskData::Experiment(experiment))
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
