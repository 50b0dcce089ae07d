use super::*;
use loom_core::{ColumnCommon, DataSchema, DataSource, ProjectMetadata, SchemaColumn};
use tempfile::TempDir;

fn config(project_id: &ProjectId) -> ProjectConfig {
    ProjectConfig {
        version: loom_core::CONFIG_VERSION,
        project_id: project_id.clone(),
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
    }
}

fn manager(dir: &TempDir) -> ProjectCacheManager {
    let paths = Arc::new(PathManager::new(dir.path()));
    let locks = Arc::new(LockManager::new());
    ProjectCacheManager::new(paths, locks)
}

#[test]
fn get_hands_out_the_same_handle_for_a_project_id() {
    let dir = TempDir::new().unwrap();
    let mgr = manager(&dir);
    let project_id = ProjectId::new("p1");
    let a = mgr.get(&project_id);
    let b = mgr.get(&project_id);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn save_then_load_round_trips_without_touching_disk_again() {
    let dir = TempDir::new().unwrap();
    let mgr = manager(&dir);
    let project_id = ProjectId::new("p1");
    let cache = mgr.get(&project_id);
    let cfg = config(&project_id);
    cache.save_config(&cfg).unwrap();

    // Remove the on-disk file; a cache hit must not need it.
    std::fs::remove_file(dir.path().join("p1/config.json")).unwrap();
    let loaded = cache.load_config().unwrap();
    assert_eq!(loaded.metadata.name, "demo");
}

#[test]
fn forget_drops_the_handle_and_clears_its_entries() {
    let dir = TempDir::new().unwrap();
    let mgr = manager(&dir);
    let project_id = ProjectId::new("p1");
    let cache = mgr.get(&project_id);
    cache.save_config(&config(&project_id)).unwrap();

    mgr.forget(&project_id);
    std::fs::remove_file(dir.path().join("p1/config.json")).unwrap();

    let fresh = mgr.get(&project_id);
    assert!(fresh.load_config().is_err());
}

#[test]
fn invalidate_all_for_a_column_clears_only_that_columns_caches() {
    let dir = TempDir::new().unwrap();
    let mgr = manager(&dir);
    let project_id = ProjectId::new("p1");
    let cache = mgr.get(&project_id);

    let topics = loom_core::TopicResult {
        topics: vec![],
        hierarchy: None,
        valid_count: 0,
        invalid_count: 0,
        outlier_count: 0,
        total_count: 0,
        created_at_ms: 0,
    };
    cache.save_topics("review", &topics).unwrap();
    cache.save_config(&config(&project_id)).unwrap();

    cache.invalidate_all(Some("review"));
    // config (project-wide) survives; we only asked to clear "review".
    assert!(cache.load_config().is_ok());
}
