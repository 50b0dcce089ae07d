use super::*;
use loom_cache::ProjectCacheManager;
use loom_core::{ColumnCommon, DataSchema, DataSource, ProjectId, ProjectMetadata, SchemaColumn, TopicModelingConfig, Workspace};
use loom_storage::{LockManager, PathManager};
use std::sync::Arc;
use tempfile::TempDir;

use crate::stages::SilentReporter;

fn harness() -> (TempDir, Arc<ProjectCache>) {
    let dir = TempDir::new().unwrap();
    let paths = Arc::new(PathManager::new(dir.path()));
    let locks = Arc::new(LockManager::new());
    let mgr = ProjectCacheManager::new(paths, locks);
    let cache = mgr.get(&ProjectId::new("p1"));
    (dir, cache)
}

fn config_with(min_topic_size: u32) -> ProjectConfig {
    ProjectConfig {
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
                topic_modeling: TopicModelingConfig {
                    min_topic_size,
                    ..Default::default()
                },
            }],
        },
    }
}

/// Mirrors `SPEC_FULL.md` §8 scenario S1: three documents, two of which
/// share vocabulary, modeled with a `min_topic_size` low enough to form a
/// real (non-outlier) cluster.
#[test]
fn run_topic_modeling_end_to_end_produces_topics_and_companion_columns() {
    let (_dir, cache) = harness();
    let ws = Workspace::new(
        vec!["review".to_string()],
        vec![
            vec![serde_json::Value::String("the cat sat".into())],
            vec![serde_json::Value::String("a dog ran".into())],
            vec![serde_json::Value::String("the cat".into())],
        ],
    );
    cache.save_workspace(&ws).unwrap();

    let config = config_with(2);
    let data = run_topic_modeling(config, "review".to_string(), &cache, &SilentReporter, true).unwrap();

    let TaskData::Topics(result) = data else {
        panic!("expected a Topics payload");
    };
    assert_eq!(result.total_count, 3);
    assert!(!result.topics.is_empty(), "expected at least one topic");

    let ws_after = cache.load_workspace().unwrap();
    assert!(ws_after.has_column("review (Preprocessed)"));
    assert!(ws_after.has_column("review (Topic)"));

    let topics_on_disk = cache.load_topics("review").unwrap();
    assert_eq!(topics_on_disk.topics.len(), result.topics.len());

    for kind in [
        loom_cache::VectorKind::Document,
        loom_cache::VectorKind::Umap,
        loom_cache::VectorKind::Visualization,
    ] {
        let vectors = cache.load_vectors("review", kind).unwrap();
        assert_eq!(vectors.rows, 3);
    }
}

#[test]
fn run_stages_rejects_a_non_textual_column() {
    let (_dir, cache) = harness();
    let ws = Workspace::new(vec!["review".to_string()], vec![vec![serde_json::Value::String("hi".into())]]);
    cache.save_workspace(&ws).unwrap();

    let config = config_with(2);
    let err = run_topic_modeling(config, "missing".to_string(), &cache, &SilentReporter, true).unwrap_err();
    assert!(matches!(err, loom_core::CoreError::MissingColumn(_) | loom_core::CoreError::WrongColumnType { .. }));
}

/// `run_prefix_stages` followed by `run_trial_stages` must produce the
/// same topics a single `run_stages` call would, for the experiment
/// driver's reuse of the shared Load/Preprocess prefix to be sound.
#[test]
fn split_prefix_and_trial_stages_match_run_stages() {
    let (_dir, cache_a) = harness();
    let ws = Workspace::new(
        vec!["review".to_string()],
        vec![
            vec![serde_json::Value::String("great cheap fast".into())],
            vec![serde_json::Value::String("great cheap fast".into())],
            vec![serde_json::Value::String("slow expensive bad".into())],
        ],
    );
    cache_a.save_workspace(&ws).unwrap();
    let mut direct_state = PipelineState::new(config_with(1), "review".to_string());
    run_stages(&mut direct_state, &cache_a, &SilentReporter, false).unwrap();

    let dir_b = tempfile::TempDir::new().unwrap();
    let paths_b = Arc::new(loom_storage::PathManager::new(dir_b.path()));
    let locks_b = Arc::new(LockManager::new());
    let mgr_b = ProjectCacheManager::new(paths_b, locks_b);
    let cache_b = mgr_b.get(&ProjectId::new("p1"));
    cache_b.save_workspace(&ws).unwrap();
    let mut split_state = PipelineState::new(config_with(1), "review".to_string());
    run_prefix_stages(&mut split_state, &cache_b, &SilentReporter).unwrap();
    run_trial_stages(&mut split_state, &cache_b, &SilentReporter, false).unwrap();

    let direct = direct_state.result.unwrap();
    let split = split_state.result.unwrap();
    assert_eq!(direct.topics.len(), split.topics.len());
    assert_eq!(direct.document_topic_assignments, split.document_topic_assignments);
}
