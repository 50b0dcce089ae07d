// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runs the seven topic-discovery stages over one project column in
//! order, checking cancellation at every stage boundary. The closure this
//! produces is what a caller hands to `loom_engine::TaskEngine::add_task`
//! once it's wrapped a `&TaskProxy` in a `ProgressReporter` impl — this
//! crate only depends on the trait, not on `loom-engine` itself.

use loom_cache::ProjectCache;
use loom_core::{CoreResult, ProjectConfig, TaskData};

use crate::stages::{self, ProgressReporter};
use crate::state::PipelineState;

/// Runs a full topic-modeling job for `column` and returns the
/// [`TaskData::Topics`] variant a task handler returns to the engine.
/// `can_save = false` is how the experiment driver reuses these stages
/// without writing persistent artifacts.
#[allow(clippy::expect_used)]
pub fn run_topic_modeling(
    config: ProjectConfig,
    column: String,
    cache: &ProjectCache,
    reporter: &dyn ProgressReporter,
    can_save: bool,
) -> CoreResult<TaskData> {
    let mut state = PipelineState::new(config, column);
    run_stages(&mut state, cache, reporter, can_save)?;
    let result = state.result.expect("postprocess stage always populates result");
    let total_count = state.workspace.row_count();
    // Rows the Load stage excluded from `state.mask` (empty/missing
    // `column` values) never reach a cluster assignment at all — neither
    // valid nor outlier — so they only show up as the gap between the
    // workspace's total row count and the modeled document count.
    let invalid_count = total_count.saturating_sub(state.mask.len());
    Ok(TaskData::Topics(loom_core::TopicModelingResult {
        topics: result.topics,
        hierarchy: result.hierarchy,
        valid_count: result.document_topic_assignments.iter().filter(|&&t| t >= 0).count(),
        invalid_count,
        outlier_count: result.document_topic_assignments.iter().filter(|&&t| t < 0).count(),
        total_count,
        created_at_ms: loom_core::now_ms(),
    }))
}

/// Runs stages 1–7 against `state` in place, leaving `state.result`
/// populated on success. The top-level job entry point; the experiment
/// driver (`loom-experiment`) instead calls [`run_prefix_stages`] once per
/// column and [`run_trial_stages`] once per hyperparameter candidate, so
/// the expensive Load/Preprocess pair is never repeated per trial.
pub fn run_stages(
    state: &mut PipelineState,
    cache: &ProjectCache,
    reporter: &dyn ProgressReporter,
    can_save: bool,
) -> CoreResult<()> {
    run_prefix_stages(state, cache, reporter)?;
    run_trial_stages(state, cache, reporter, can_save)
}

/// Stages 1–2 (Load, Preprocess): the prefix every hyperparameter
/// candidate in an experiment run shares. Always persists the
/// `(Preprocessed)` companion column on a cache miss regardless of
/// `can_save` downstream — preprocessing is reused across runs and
/// across trials precisely because it is written once, per
/// `SPEC_FULL.md` §9's documented partial-write behavior.
pub fn run_prefix_stages(
    state: &mut PipelineState,
    cache: &ProjectCache,
    reporter: &dyn ProgressReporter,
) -> CoreResult<()> {
    reporter.check_stop()?;
    reporter.report("loading workspace");
    stages::load(state, cache).map_err(loom_core::CoreError::from)?;

    reporter.check_stop()?;
    reporter.report("preprocessing documents");
    stages::preprocess(state, cache).map_err(loom_core::CoreError::from)?;

    Ok(())
}

/// Stages 3–7 (Model builder through Postprocess), run against a `state`
/// that already carries a populated prefix (either from [`run_prefix_stages`]
/// or from a trial's own clone of one). `can_save = false` is how the
/// experiment driver reuses these stages without writing any persistent
/// artifact.
pub fn run_trial_stages(
    state: &mut PipelineState,
    cache: &ProjectCache,
    reporter: &dyn ProgressReporter,
    can_save: bool,
) -> CoreResult<()> {
    reporter.check_stop()?;
    reporter.report("building model collaborators");
    stages::build_model(state).map_err(loom_core::CoreError::from)?;

    reporter.check_stop()?;
    reporter.report("embedding documents");
    stages::embed(state, cache, can_save).map_err(loom_core::CoreError::from)?;

    reporter.check_stop()?;
    reporter.report("modeling topics");
    stages::model_topics(state, cache, can_save).map_err(loom_core::CoreError::from)?;

    reporter.check_stop()?;
    reporter.report("embedding visualization coordinates");
    stages::embed_visualization(state, cache, can_save).map_err(loom_core::CoreError::from)?;

    reporter.check_stop()?;
    reporter.report("building topic hierarchy");
    stages::postprocess(state, cache, can_save).map_err(loom_core::CoreError::from)?;

    Ok(())
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
