// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The mutable state threaded through the seven topic-discovery stages.
//! Each stage reads only fields a prior stage populated and writes only
//! fields a later stage will read; nothing here is persisted directly —
//! a stage that wants a field durable also writes it through
//! [`loom_cache::ProjectCache`] on the same call.

use loom_core::{DocumentVectors, ProjectConfig, Workspace};

use crate::collaborators::{Clusterer, DimensionalityReducer, EmbeddingTransformer, TopicRepresenter};
use crate::postprocess::PostprocessResult;

/// The configured numeric collaborators for one run, built once by the
/// Model builder stage and consulted by every stage downstream of it.
pub struct ModelBundle {
    pub embedding: Box<dyn EmbeddingTransformer>,
    pub reducer: Box<dyn DimensionalityReducer>,
    pub clusterer: Box<dyn Clusterer>,
    pub representer: Box<dyn TopicRepresenter>,
}

pub struct PipelineState {
    pub config: ProjectConfig,
    pub column: String,
    pub workspace: Workspace,
    /// Indices (into `workspace.rows`) of the rows this run actually models —
    /// populated by Load, the non-empty rows of `column`.
    pub mask: Vec<usize>,
    /// One entry per `mask` index: the heavily-preprocessed document used
    /// for topic modeling and representation.
    pub preprocessed_docs: Vec<String>,
    /// One entry per `mask` index: the lightly-preprocessed document used
    /// as embedding input.
    pub embedding_docs: Vec<String>,
    pub model: Option<ModelBundle>,
    pub document_vectors: Option<DocumentVectors>,
    pub umap_vectors: Option<DocumentVectors>,
    pub visualization_vectors: Option<DocumentVectors>,
    pub document_topic_assignments: Option<Vec<i32>>,
    /// Per-topic centroids in `document_vectors` space, keyed by topic id
    /// (`-1` excluded). Computed by Topic modeling, consumed by
    /// Visualization embedding and by Postprocess's hierarchy builder.
    pub topic_centroids: Option<Vec<(i32, Vec<f32>)>>,
    pub result: Option<PostprocessResult>,
}

impl PipelineState {
    /// Starts a run for `column`. `workspace` is populated by the Load
    /// stage, not here — the state exists before the first cache read so
    /// stages share one mutable handle from the start of the run.
    pub fn new(config: ProjectConfig, column: String) -> Self {
        Self {
            config,
            column,
            workspace: Workspace::default(),
            mask: Vec::new(),
            preprocessed_docs: Vec::new(),
            embedding_docs: Vec::new(),
            model: None,
            document_vectors: None,
            umap_vectors: None,
            visualization_vectors: None,
            document_topic_assignments: None,
            topic_centroids: None,
            result: None,
        }
    }

    pub fn schema_column(&self) -> Option<&loom_core::SchemaColumn> {
        self.config.data_schema.column(&self.column)
    }
}
