use super::*;
use loom_cache::ProjectCacheManager;
use loom_core::{
    ColumnCommon, DataSchema, DataSource, DocumentVectors, ProjectConfig, ProjectId, ProjectMetadata,
    SchemaColumn, TopicModelingConfig,
};
use loom_storage::{LockManager, PathManager};
use std::sync::Arc;
use tempfile::TempDir;

use crate::collaborators::{
    CosineThresholdClusterer, FrequencyTopicRepresenter, HashingEmbeddingTransformer,
    TruncatingDimensionalityReducer,
};
use crate::state::ModelBundle;

fn harness() -> (TempDir, Arc<ProjectCache>) {
    let dir = TempDir::new().unwrap();
    let paths = Arc::new(PathManager::new(dir.path()));
    let locks = Arc::new(LockManager::new());
    let mgr = ProjectCacheManager::new(paths, locks);
    let cache = mgr.get(&ProjectId::new("p1"));
    (dir, cache)
}

fn state_with(topic_modeling: TopicModelingConfig) -> PipelineState {
    let config = ProjectConfig {
        version: 1,
        project_id: ProjectId::new("p1"),
        metadata: ProjectMetadata {
            name: "demo".into(),
            description: String::new(),
            tags: vec![],
        },
        source: DataSource::Csv { path: "in.csv".into() },
        data_schema: DataSchema {
            columns: vec![SchemaColumn::Textual {
                common: ColumnCommon::new("review"),
                preprocessing: Default::default(),
                topic_modeling,
            }],
        },
    };
    let mut state = PipelineState::new(config, "review".to_string());
    state.model = Some(ModelBundle {
        embedding: Box::new(HashingEmbeddingTransformer::default()),
        reducer: Box::new(TruncatingDimensionalityReducer { target_dims: 2 }),
        clusterer: Box::new(CosineThresholdClusterer {
            similarity_threshold: 0.99,
            min_size: 1,
        }),
        representer: Box::new(FrequencyTopicRepresenter::default()),
    });
    state.document_vectors = Some(
        DocumentVectors::new(3, 2, vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0]).unwrap(),
    );
    state
}

#[test]
fn model_topics_caches_the_umap_reduction_and_clusters_it() {
    let (_dir, cache) = harness();
    let mut state = state_with(TopicModelingConfig::default());

    model_topics(&mut state, &cache, true).unwrap();

    assert!(state.umap_vectors.is_some());
    assert_eq!(state.document_topic_assignments.unwrap().len(), 3);
    assert!(cache.load_vectors("review", loom_cache::VectorKind::Umap).is_ok());
    assert!(cache.load_model("review").is_ok());
}

#[test]
fn model_topics_computes_centroids_in_document_vector_space() {
    let (_dir, cache) = harness();
    let mut state = state_with(TopicModelingConfig::default());

    model_topics(&mut state, &cache, true).unwrap();

    let centroids = state.topic_centroids.unwrap();
    for (_, centroid) in &centroids {
        assert_eq!(centroid.len(), 2);
    }
}

#[test]
fn model_topics_reassigns_outliers_when_no_outliers_is_set() {
    let (_dir, cache) = harness();
    let mut cfg = TopicModelingConfig::default();
    cfg.no_outliers = true;
    let mut state = state_with(cfg);
    // Force one document far enough away to start as its own singleton
    // cluster, then get demoted to an outlier by min_topic_size before
    // reassignment runs.
    state.model.as_mut().unwrap().clusterer = Box::new(CosineThresholdClusterer {
        similarity_threshold: 0.99,
        min_size: 2,
    });

    model_topics(&mut state, &cache, true).unwrap();

    let assignments = state.document_topic_assignments.unwrap();
    assert!(assignments.iter().all(|&t| t >= 0), "no_outliers must reassign every document: {assignments:?}");
}

#[test]
fn model_topics_does_not_persist_when_can_save_is_false() {
    let (_dir, cache) = harness();
    let mut state = state_with(TopicModelingConfig::default());

    model_topics(&mut state, &cache, false).unwrap();

    assert!(cache.load_vectors("review", loom_cache::VectorKind::Umap).is_err());
    assert!(cache.load_model("review").is_err());
}
