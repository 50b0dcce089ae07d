use std::sync::Arc;

use loom_cache::ProjectCacheManager;
use loom_core::{ColumnCommon, CoreError, DataSchema, DataSource, ProjectConfig, ProjectId, ProjectMetadata, SchemaColumn, TopicModelingConfig, Workspace};
use loom_pipeline::{HeuristicTopicEvaluator, SilentReporter};
use loom_storage::{LockManager, PathManager};
use tempfile::TempDir;

use super::run_experiment;
use crate::candidate::{FloatRange, GridSampler, HyperparameterConstraint, IntRange};

fn harness() -> (TempDir, Arc<loom_cache::ProjectCache>) {
    let dir = TempDir::new().unwrap();
    let paths = Arc::new(PathManager::new(dir.path()));
    let locks = Arc::new(LockManager::new());
    let mgr = ProjectCacheManager::new(paths, locks);
    let cache = mgr.get(&ProjectId::new("p1"));
    (dir, cache)
}

fn config() -> ProjectConfig {
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
                    min_topic_size: 1,
                    ..Default::default()
                },
            }],
        },
    }
}

fn workspace() -> Workspace {
    Workspace::new(
        vec!["review".to_string()],
        vec![
            vec![serde_json::Value::String("great cheap fast".into())],
            vec![serde_json::Value::String("great cheap fast".into())],
            vec![serde_json::Value::String("slow expensive bad".into())],
        ],
    )
}

/// Mirrors `SPEC_FULL.md` §8 scenario S6's happy path: every trial
/// completes, the experiment record is marked finished, and no persistent
/// topic/vector artifacts are written (the driver always runs with
/// `can_save = false`).
#[test]
fn runs_every_trial_and_marks_the_run_complete() {
    let (_dir, cache) = harness();
    cache.save_workspace(&workspace()).unwrap();

    let constraint = HyperparameterConstraint {
        min_topic_size: Some(IntRange { low: 1, high: 2 }),
        max_topics: None,
        clustering_conservativeness: Some(FloatRange { low: 0.0, high: 1.0 }),
    };
    let mut sampler = GridSampler::new(3);
    let evaluator = HeuristicTopicEvaluator;

    let data = run_experiment(
        &cache,
        config(),
        "review".to_string(),
        constraint,
        3,
        &mut sampler,
        &evaluator,
        &SilentReporter,
    )
    .unwrap();

    let loom_core::TaskData::Experiment(result) = data else {
        panic!("expected an Experiment payload");
    };
    assert_eq!(result.trials.len(), 3);
    assert!(result.end_at_ms.is_some());
    assert!(result.trials.iter().all(|t| t.metrics.is_some() && t.error.is_none()));

    let on_disk = cache.load_experiment("review").unwrap();
    assert_eq!(on_disk.trials.len(), 3);
    assert!(on_disk.end_at_ms.is_some());

    assert!(cache.load_topics("review").is_err(), "trials must not persist a topic result");
}

/// Scenario S6: a cancellation observed at the top of the third trial
/// leaves exactly two completed trials on disk with `end_at_ms` unset.
#[test]
fn cancellation_between_trials_leaves_partial_progress_and_no_end_time() {
    let (_dir, cache) = harness();
    cache.save_workspace(&workspace()).unwrap();

    struct StopAfter {
        calls: std::sync::atomic::AtomicUsize,
        limit: usize,
    }
    impl loom_pipeline::ProgressReporter for StopAfter {
        fn check_stop(&self) -> loom_core::CoreResult<()> {
            let n = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n >= self.limit {
                Err(CoreError::TaskStop)
            } else {
                Ok(())
            }
        }
        fn report(&self, _message: &str) {}
    }

    // Each trial's run_trial_stages calls check_stop 5 times (once per
    // stage) plus one call at the top of the driver's loop. The prefix
    // itself calls check_stop twice (load, preprocess) plus one entry
    // check. Allow exactly two trials to run to completion before the
    // third's loop-top check raises.
    let calls_per_trial = 6; // 1 loop-top + 5 stage entries
    let prefix_calls = 3; // 1 entry + load + preprocess
    let reporter = StopAfter {
        calls: std::sync::atomic::AtomicUsize::new(0),
        limit: prefix_calls + 2 * calls_per_trial,
    };

    let constraint = HyperparameterConstraint {
        min_topic_size: Some(IntRange { low: 1, high: 2 }),
        max_topics: None,
        clustering_conservativeness: None,
    };
    let mut sampler = GridSampler::new(3);
    let evaluator = HeuristicTopicEvaluator;

    let err = run_experiment(
        &cache,
        config(),
        "review".to_string(),
        constraint,
        3,
        &mut sampler,
        &evaluator,
        &reporter,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::TaskStop));

    let on_disk = cache.load_experiment("review").unwrap();
    assert_eq!(on_disk.trials.len(), 2);
    assert!(on_disk.end_at_ms.is_none());
}

/// Zero requested trials still runs the shared prefix and leaves a
/// completed, empty experiment record — the degenerate case of "no search
/// space" should not be mistaken for cancellation.
#[test]
fn zero_trials_still_completes_the_run_with_no_trials_recorded() {
    let (_dir, cache) = harness();
    cache.save_workspace(&workspace()).unwrap();

    let constraint = HyperparameterConstraint::default();
    let mut sampler = GridSampler::new(1);
    let evaluator = HeuristicTopicEvaluator;

    let data = run_experiment(
        &cache,
        config(),
        "review".to_string(),
        constraint,
        0,
        &mut sampler,
        &evaluator,
        &SilentReporter,
    )
    .unwrap();

    let loom_core::TaskData::Experiment(result) = data else {
        panic!("expected an Experiment payload");
    };
    assert!(result.trials.is_empty());
    assert!(result.end_at_ms.is_some());
}
