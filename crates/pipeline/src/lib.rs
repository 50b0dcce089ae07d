// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! loom-pipeline: the seven-stage topic-discovery orchestrator (Load,
//! Preprocess, Model builder, Embed, Topic modeling, Visualization
//! embedding, Postprocess) and the numeric collaborator traits it calls
//! out to. No clustering, embedding, or dimensionality-reduction math
//! lives here beyond the deterministic default collaborators — a real
//! deployment plugs production implementations in behind
//! [`collaborators::EmbeddingTransformer`], [`collaborators::DimensionalityReducer`],
//! [`collaborators::Clusterer`], [`collaborators::TopicRepresenter`], and
//! [`collaborators::TopicEvaluator`].

pub mod collaborators;
pub mod error;
pub mod hierarchy;
pub mod orchestrator;
pub mod postprocess;
pub mod stages;
pub mod state;
pub mod text;

pub use collaborators::{
    Clusterer, CosineThresholdClusterer, DimensionalityReducer, EmbeddingTransformer,
    FrequencyTopicRepresenter, HashingEmbeddingTransformer, HeuristicTopicEvaluator,
    TopicEvaluator, TopicRepresenter, TruncatingDimensionalityReducer,
};
pub use error::{StageError, StageResult};
pub use orchestrator::{run_prefix_stages, run_stages, run_topic_modeling, run_trial_stages};
pub use postprocess::PostprocessResult;
pub use stages::{ProgressReporter, SilentReporter};
pub use state::{ModelBundle, PipelineState};
