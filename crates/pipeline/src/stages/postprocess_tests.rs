use super::*;
use loom_cache::ProjectCacheManager;
use loom_core::{ColumnCommon, DataSchema, DataSource, ProjectConfig, ProjectId, ProjectMetadata, SchemaColumn, Workspace};
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

fn ready_state() -> PipelineState {
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
                topic_modeling: Default::default(),
            }],
        },
    };
    let mut state = PipelineState::new(config, "review".to_string());
    state.workspace = Workspace::new(
        vec!["review".to_string()],
        vec![
            vec![serde_json::Value::String("great cheap fast".into())],
            vec![serde_json::Value::String("great cheap fast".into())],
            vec![serde_json::Value::String("slow expensive bad".into())],
        ],
    );
    state.mask = vec![0, 1, 2];
    state.preprocessed_docs = vec!["great cheap fast".into(), "great cheap fast".into(), "slow expensive bad".into()];
    state.document_topic_assignments = Some(vec![0, 0, 1]);
    state.topic_centroids = Some(vec![(0, vec![1.0, 0.0]), (1, vec![0.0, 1.0])]);
    state.model = Some(ModelBundle {
        embedding: Box::new(HashingEmbeddingTransformer::default()),
        reducer: Box::new(TruncatingDimensionalityReducer { target_dims: 2 }),
        clusterer: Box::new(CosineThresholdClusterer::default()),
        representer: Box::new(FrequencyTopicRepresenter { top_n: 5 }),
    });
    state
}

#[test]
fn postprocess_builds_one_topic_per_cluster_with_its_document_frequency() {
    let (_dir, cache) = harness();
    let mut state = ready_state();

    postprocess(&mut state, &cache, true).unwrap();

    let result = state.result.unwrap();
    assert_eq!(result.topics.len(), 2);
    let topic0 = result.topics.iter().find(|t| t.id == 0).unwrap();
    assert_eq!(topic0.frequency, 2);
    let topic1 = result.topics.iter().find(|t| t.id == 1).unwrap();
    assert_eq!(topic1.frequency, 1);
}

#[test]
fn postprocess_persists_topics_and_updates_the_topic_column() {
    let (_dir, cache) = harness();
    let mut state = ready_state();

    postprocess(&mut state, &cache, true).unwrap();

    let saved = cache.load_topics("review").unwrap();
    assert_eq!(saved.topics.len(), 2);
    assert_eq!(saved.valid_count, 3);

    let reloaded = cache.load_workspace().unwrap();
    assert!(reloaded.has_column("review (Topic)"));
}

#[test]
fn postprocess_builds_a_two_topic_hierarchy_with_a_single_root() {
    let (_dir, cache) = harness();
    let mut state = ready_state();

    postprocess(&mut state, &cache, true).unwrap();

    let hierarchy = state.result.unwrap().hierarchy.unwrap();
    // Two leaf topics collapse into one synthetic root whose id continues
    // past the highest existing topic id.
    assert!(hierarchy.id > 1);
    assert_eq!(hierarchy.frequency, 3);
}

#[test]
fn postprocess_does_not_persist_when_can_save_is_false() {
    let (_dir, cache) = harness();
    let mut state = ready_state();

    postprocess(&mut state, &cache, false).unwrap();

    assert!(state.result.is_some());
    assert!(cache.load_topics("review").is_err());
}
