// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 3: build the configured collaborator set (embedding transformer,
//! UMAP reducer, clusterer, representer) from the column's hyperparameters.

use loom_core::TopicModelingConfig;

use crate::collaborators::{
    CosineThresholdClusterer, FrequencyTopicRepresenter, HashingEmbeddingTransformer,
    TruncatingDimensionalityReducer,
};
use crate::error::StageResult;
use crate::state::{ModelBundle, PipelineState};

/// Default embedding width for the hashing embedder. Unrelated to
/// `config.embedding_method`, which selects a model a real deployment would
/// plug in behind [`crate::collaborators::EmbeddingTransformer`].
const EMBEDDING_DIMS: usize = 32;

/// Target width of the modeling-space UMAP reduction consumed by the
/// Topic modeling stage. The Visualization stage builds its own, separate
/// reducer at a fixed 2 dimensions — see `crate::stages::visualization`.
const UMAP_DIMS: usize = 5;

#[allow(clippy::expect_used)]
pub fn build_model(state: &mut PipelineState) -> StageResult<()> {
    let cfg = state.config.data_schema.column(&state.column).and_then(|c| match c {
        loom_core::SchemaColumn::Textual { topic_modeling, .. } => Some(topic_modeling.clone()),
        _ => None,
    });
    let cfg: TopicModelingConfig = cfg.expect("load stage already confirmed this is a textual column");

    let similarity_threshold = 1.0 - cfg.clustering_conservativeness.clamp(0.0, 1.0) * 0.5;

    state.model = Some(ModelBundle {
        embedding: Box::new(HashingEmbeddingTransformer { dims: EMBEDDING_DIMS }),
        reducer: Box::new(TruncatingDimensionalityReducer { target_dims: UMAP_DIMS }),
        clusterer: Box::new(CosineThresholdClusterer {
            similarity_threshold: similarity_threshold as f32,
            min_size: cfg.min_topic_size.max(1) as usize,
        }),
        representer: Box::new(FrequencyTopicRepresenter { top_n: cfg.top_n_words as usize }),
    });
    Ok(())
}

#[cfg(test)]
#[path = "model_builder_tests.rs"]
mod tests;
