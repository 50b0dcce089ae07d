// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project cache handles and the manager that hands them out.
//!
//! The underlying [`crate::adapters`] caches are shared across every
//! project (each keyed internally by project id), so memory limits apply
//! to the whole data root rather than being duplicated per project.
//! [`ProjectCache`] is a thin, project-bound view over that shared state;
//! [`ProjectCacheManager`] owns it and lazily hands out one [`ProjectCache`]
//! per project id, mirroring a save-then-reseed cache-of-caches pattern.

use std::collections::HashMap;
use std::sync::Arc;

use loom_core::{
    CoreResult, DocumentVectors, EvaluationMetrics, ExperimentResult, ProjectConfig, ProjectId,
    TopicResult, Workspace,
};
use loom_storage::{LockManager, PathManager};
use parking_lot::Mutex;

use crate::adapters::{
    ConfigAdapter, EvaluationAdapter, ExperimentAdapter, ModelAdapter, TopicAdapter, VectorKind,
    VectorsAdapter, WorkspaceAdapter,
};

struct AdapterSet {
    config: ConfigAdapter,
    workspace: WorkspaceAdapter,
    topics: TopicAdapter,
    vectors: VectorsAdapter,
    model: ModelAdapter,
    evaluation: EvaluationAdapter,
    experiment: ExperimentAdapter,
}

impl AdapterSet {
    fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            config: ConfigAdapter::new(paths.clone(), locks.clone()),
            workspace: WorkspaceAdapter::new(paths.clone(), locks.clone()),
            topics: TopicAdapter::new(paths.clone(), locks.clone()),
            vectors: VectorsAdapter::new(paths.clone(), locks.clone()),
            model: ModelAdapter::new(paths.clone(), locks.clone()),
            evaluation: EvaluationAdapter::new(paths.clone(), locks.clone()),
            experiment: ExperimentAdapter::new(paths, locks),
        }
    }
}

/// A project-bound view over the shared adapter set. Cheap to clone-by-handle
/// (it only carries a project id and an `Arc`), so callers can hold one per
/// in-flight request without re-resolving it from the manager each time.
pub struct ProjectCache {
    project_id: ProjectId,
    adapters: Arc<AdapterSet>,
}

impl ProjectCache {
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn load_config(&self) -> CoreResult<Arc<ProjectConfig>> {
        self.adapters.config.load(&self.project_id)
    }

    pub fn save_config(&self, config: &ProjectConfig) -> CoreResult<()> {
        self.adapters.config.save(&self.project_id, config)
    }

    pub fn load_workspace(&self) -> CoreResult<Arc<Workspace>> {
        self.adapters.workspace.load(&self.project_id)
    }

    pub fn save_workspace(&self, ws: &Workspace) -> CoreResult<()> {
        self.adapters.workspace.save(&self.project_id, ws)
    }

    pub fn cache_workspace_variant(&self, filter_key: &str, ws: Arc<Workspace>) {
        self.adapters.workspace.cache_variant(&self.project_id, filter_key, ws)
    }

    pub fn load_workspace_variant(&self, filter_key: &str) -> Option<Arc<Workspace>> {
        self.adapters.workspace.load_variant(&self.project_id, filter_key)
    }

    pub fn load_topics(&self, column: &str) -> CoreResult<Arc<TopicResult>> {
        self.adapters.topics.load(&self.project_id, column)
    }

    pub fn save_topics(&self, column: &str, result: &TopicResult) -> CoreResult<()> {
        self.adapters.topics.save(&self.project_id, column, result)
    }

    pub fn load_vectors(&self, column: &str, kind: VectorKind) -> CoreResult<Arc<DocumentVectors>> {
        self.adapters.vectors.load(&self.project_id, column, kind)
    }

    pub fn save_vectors(&self, column: &str, kind: VectorKind, vectors: &DocumentVectors) -> CoreResult<()> {
        self.adapters.vectors.save(&self.project_id, column, kind, vectors)
    }

    pub fn load_model(&self, column: &str) -> CoreResult<Arc<Vec<u8>>> {
        self.adapters.model.load(&self.project_id, column)
    }

    pub fn save_model(&self, column: &str, blob: &[u8]) -> CoreResult<()> {
        self.adapters.model.save(&self.project_id, column, blob)
    }

    pub fn load_evaluation(&self, column: &str) -> CoreResult<Arc<EvaluationMetrics>> {
        self.adapters.evaluation.load(&self.project_id, column)
    }

    pub fn save_evaluation(&self, column: &str, metrics: &EvaluationMetrics) -> CoreResult<()> {
        self.adapters.evaluation.save(&self.project_id, column, metrics)
    }

    pub fn load_experiment(&self, column: &str) -> CoreResult<Arc<ExperimentResult>> {
        self.adapters.experiment.load(&self.project_id, column)
    }

    pub fn save_experiment(&self, column: &str, result: &ExperimentResult) -> CoreResult<()> {
        self.adapters.experiment.save(&self.project_id, column, result)
    }

    /// Clears the cached `config.json` entry for this project. The
    /// targeted counterpart to a watcher event on that one path.
    pub fn invalidate_config(&self) {
        self.adapters.config.invalidate(&self.project_id);
    }

    /// Clears every cached workspace variant for this project. The
    /// targeted counterpart to a watcher event on `workspace.parquet`.
    pub fn invalidate_workspace(&self) {
        self.adapters.workspace.invalidate(&self.project_id);
    }

    /// Clears every cached entry for one column (topics, vectors, model,
    /// evaluation, experiment) — the targeted counterpart to a watcher
    /// event under a per-column artifact directory.
    pub fn invalidate_column(&self, column: &str) {
        self.adapters.topics.invalidate(&self.project_id, column);
        self.adapters.vectors.invalidate_column(&self.project_id, column);
        self.adapters.model.invalidate(&self.project_id, column);
        self.adapters.evaluation.invalidate(&self.project_id, column);
        self.adapters.experiment.invalidate(&self.project_id, column);
    }

    /// Clears every cached entry for this project, across every artifact
    /// kind, without touching disk. Called after an out-of-band write (a
    /// file-watcher event, or a task that bypassed this cache) when the
    /// exact artifact touched isn't known, or when a project is deleted.
    pub fn invalidate_all(&self, column: Option<&str>) {
        match column {
            Some(column) => self.invalidate_column(column),
            None => {
                self.invalidate_config();
                self.invalidate_workspace();
                self.adapters.topics.invalidate_project(&self.project_id);
                self.adapters.vectors.invalidate_project(&self.project_id);
                self.adapters.model.invalidate_project(&self.project_id);
                self.adapters.evaluation.invalidate_project(&self.project_id);
                self.adapters.experiment.invalidate_project(&self.project_id);
            }
        }
    }
}

/// Lazily creates and hands out one [`ProjectCache`] per project id,
/// sharing a single adapter set (and therefore a single set of LRU/TTL
/// policies) across all of them.
pub struct ProjectCacheManager {
    adapters: Arc<AdapterSet>,
    handles: Mutex<HashMap<ProjectId, Arc<ProjectCache>>>,
}

impl ProjectCacheManager {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            adapters: Arc::new(AdapterSet::new(paths, locks)),
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, project_id: &ProjectId) -> Arc<ProjectCache> {
        self.handles
            .lock()
            .entry(project_id.clone())
            .or_insert_with(|| {
                Arc::new(ProjectCache {
                    project_id: project_id.clone(),
                    adapters: self.adapters.clone(),
                })
            })
            .clone()
    }

    /// Drops the cached handle and clears every in-memory entry for
    /// `project_id`. Used when a project is deleted, so a later reuse of
    /// the same id never resurrects stale cache state.
    pub fn forget(&self, project_id: &ProjectId) {
        if let Some(cache) = self.handles.lock().remove(project_id) {
            cache.invalidate_all(None);
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
