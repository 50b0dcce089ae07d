// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The seven ordered topic-discovery stages. Each is a small function of
//! `(state, cache, reporter)`; the orchestrator (`crate::orchestrator`)
//! calls them in order and checks cancellation between each.

mod embed;
mod load;
mod model_builder;
mod postprocess;
mod preprocess;
mod topic_modeling;
mod visualization;

pub use embed::embed;
pub use load::load;
pub use model_builder::build_model;
pub use postprocess::postprocess;
pub use preprocess::preprocess;
pub use topic_modeling::model_topics;
pub use visualization::embed_visualization;

use loom_core::CoreResult;

/// What a stage needs from its caller: a cancellation check and somewhere
/// to put progress messages. Implemented for `loom_engine::TaskProxy` by
/// whatever wires a pipeline run to the task engine; decoupled here so this
/// crate doesn't need to depend on `loom-engine`.
pub trait ProgressReporter {
    fn check_stop(&self) -> CoreResult<()>;
    fn report(&self, message: &str);
}

/// A reporter that never cancels and discards messages. Used by the
/// experiment driver's inner trials, which run under one outer task's
/// cancellation rather than their own.
#[derive(Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn check_stop(&self) -> CoreResult<()> {
        Ok(())
    }

    fn report(&self, _message: &str) {}
}
