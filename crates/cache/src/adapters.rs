// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed save/load/invalidate wrappers, one per artifact kind, each
//! composing a [`crate::policy_cache::PolicyCache`] (in-memory tier) with
//! `loom_storage` (on-disk tier + locking).
//!
//! Every adapter implements the same contract: `save` writes through and
//! seeds the in-memory cache with a fresh entry; `load` returns the cached
//! value if fresh, otherwise reads from disk under the project's lock and
//! caches the result; `invalidate` clears matching in-memory entries
//! without touching disk.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use loom_core::{CoreError, CoreResult, DocumentVectors, EvaluationMetrics, ExperimentResult, ProjectConfig, ProjectId, TopicResult, Workspace};
use loom_storage::{LockManager, PathManager};

use crate::policy_cache::PolicyCache;

const FIVE_MINUTES: Duration = Duration::from_secs(300);

fn corrupted(path: &std::path::Path, cause: impl std::fmt::Display) -> CoreError {
    CoreError::CorruptedFile(format!("{}: {}", path.display(), cause))
}

/// Caches a project's `config.json`. One entry, persistent, refreshed by
/// every `save`.
pub struct ConfigAdapter {
    cache: PolicyCache<ProjectId, Arc<ProjectConfig>>,
    paths: Arc<PathManager>,
    locks: Arc<LockManager>,
}

impl ConfigAdapter {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            cache: PolicyCache::new(Some(1), Some(FIVE_MINUTES)),
            paths,
            locks,
        }
    }

    pub fn load(&self, project_id: &ProjectId) -> CoreResult<Arc<ProjectConfig>> {
        if let Some(config) = self.cache.get(project_id) {
            return Ok(config);
        }
        let path = self.paths.config_path(project_id);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.assert_exists(&path)?;
        let bytes = fs::read(&path)?;
        let config: ProjectConfig =
            serde_json::from_slice(&bytes).map_err(|e| corrupted(&path, e))?;
        let config = Arc::new(config);
        self.cache.set(project_id.clone(), config.clone(), true);
        Ok(config)
    }

    pub fn save(&self, project_id: &ProjectId, config: &ProjectConfig) -> CoreResult<()> {
        let path = self.paths.config_path(project_id);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        let bytes = serde_json::to_vec_pretty(config)?;
        self.paths.atomic_write(&path, &bytes)?;
        self.cache.set(project_id.clone(), Arc::new(config.clone()), true);
        Ok(())
    }

    pub fn invalidate(&self, project_id: &ProjectId) {
        self.cache.invalidate(project_id);
    }
}

/// Caches workspace variants keyed by an opaque filter/sort key; the
/// empty key represents the raw, unfiltered workspace and is the only
/// one seeded persistently after a save — filtered variants are always
/// recomputed from it.
pub struct WorkspaceAdapter {
    cache: PolicyCache<(ProjectId, String), Arc<Workspace>>,
    paths: Arc<PathManager>,
    locks: Arc<LockManager>,
}

impl WorkspaceAdapter {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            cache: PolicyCache::new(Some(20), Some(FIVE_MINUTES)),
            paths,
            locks,
        }
    }

    /// Loads the raw (unfiltered) workspace, reading through to disk on a
    /// cache miss. Filtered variants are the caller's concern: compute
    /// them from this value and cache them under a non-empty key via
    /// [`Self::cache_variant`].
    pub fn load(&self, project_id: &ProjectId) -> CoreResult<Arc<Workspace>> {
        let key = (project_id.clone(), String::new());
        if let Some(ws) = self.cache.get(&key) {
            return Ok(ws);
        }
        let path = self.paths.workspace_path(project_id);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.assert_exists(&path)?;
        let bytes = fs::read(&path)?;
        let ws: Workspace = serde_json::from_slice(&bytes).map_err(|e| corrupted(&path, e))?;
        let ws = Arc::new(ws);
        self.cache.set(key, ws.clone(), true);
        Ok(ws)
    }

    /// Caches a pre-computed filtered/sorted variant under a non-empty
    /// key. Never persistent: a later `save` of the raw workspace clears
    /// every variant.
    pub fn cache_variant(&self, project_id: &ProjectId, filter_key: &str, ws: Arc<Workspace>) {
        self.cache.set((project_id.clone(), filter_key.to_string()), ws, false);
    }

    pub fn load_variant(&self, project_id: &ProjectId, filter_key: &str) -> Option<Arc<Workspace>> {
        self.cache.get(&(project_id.clone(), filter_key.to_string()))
    }

    /// Persists `ws` as the raw workspace, then drops every cached
    /// variant (they no longer reflect it) and reseeds the empty key.
    pub fn save(&self, project_id: &ProjectId, ws: &Workspace) -> CoreResult<()> {
        let path = self.paths.workspace_path(project_id);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        let bytes = serde_json::to_vec(ws)?;
        self.paths.atomic_write(&path, &bytes)?;
        self.cache
            .invalidate_matching(|(p, _)| p == project_id);
        self.cache.set(
            (project_id.clone(), String::new()),
            Arc::new(ws.clone()),
            true,
        );
        Ok(())
    }

    pub fn invalidate(&self, project_id: &ProjectId) {
        let project_id = project_id.clone();
        self.cache.invalidate_matching(move |(p, _)| *p == project_id);
    }
}

/// Caches topic-modeling results keyed by `(project, column)`.
pub struct TopicAdapter {
    cache: PolicyCache<(ProjectId, String), Arc<TopicResult>>,
    paths: Arc<PathManager>,
    locks: Arc<LockManager>,
}

impl TopicAdapter {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            cache: PolicyCache::new(None, Some(FIVE_MINUTES)),
            paths,
            locks,
        }
    }

    pub fn load(&self, project_id: &ProjectId, column: &str) -> CoreResult<Arc<TopicResult>> {
        let key = (project_id.clone(), column.to_string());
        if let Some(result) = self.cache.get(&key) {
            return Ok(result);
        }
        let path = self.paths.topics_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.assert_exists(&path)?;
        let bytes = fs::read(&path)?;
        let result: TopicResult = serde_json::from_slice(&bytes).map_err(|e| corrupted(&path, e))?;
        let result = Arc::new(result);
        self.cache.set(key, result.clone(), false);
        Ok(result)
    }

    /// Writes the result to disk, then seeds the in-memory cache with a
    /// fresh (non-persistent) entry so the next load is free.
    pub fn save(&self, project_id: &ProjectId, column: &str, result: &TopicResult) -> CoreResult<()> {
        let path = self.paths.topics_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        let bytes = serde_json::to_vec(result)?;
        self.paths.atomic_write(&path, &bytes)?;
        self.cache
            .set((project_id.clone(), column.to_string()), Arc::new(result.clone()), false);
        Ok(())
    }

    pub fn invalidate(&self, project_id: &ProjectId, column: &str) {
        self.cache.invalidate(&(project_id.clone(), column.to_string()));
    }

    pub fn invalidate_project(&self, project_id: &ProjectId) {
        let project_id = project_id.clone();
        self.cache.invalidate_matching(move |(p, _)| *p == project_id);
    }
}

/// The three vector artifacts a textual column can have: raw document
/// embeddings, the UMAP projection used for clustering, and the 2D
/// projection used for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    Document,
    Umap,
    Visualization,
}

/// Caches vector matrices keyed by `(project, column, kind)`.
pub struct VectorsAdapter {
    cache: PolicyCache<(ProjectId, String, VectorKind), Arc<DocumentVectors>>,
    paths: Arc<PathManager>,
    locks: Arc<LockManager>,
}

impl VectorsAdapter {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            cache: PolicyCache::new(Some(5), Some(FIVE_MINUTES)),
            paths,
            locks,
        }
    }

    fn path(&self, project_id: &ProjectId, column: &str, kind: VectorKind) -> std::path::PathBuf {
        match kind {
            VectorKind::Document => self.paths.document_vectors_path(project_id, column),
            VectorKind::Umap => self.paths.umap_vectors_path(project_id, column),
            VectorKind::Visualization => self.paths.visualization_vectors_path(project_id, column),
        }
    }

    pub fn load(
        &self,
        project_id: &ProjectId,
        column: &str,
        kind: VectorKind,
    ) -> CoreResult<Arc<DocumentVectors>> {
        let key = (project_id.clone(), column.to_string(), kind);
        if let Some(v) = self.cache.get(&key) {
            return Ok(v);
        }
        let path = self.path(project_id, column, kind);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.assert_exists(&path)?;
        let bytes = fs::read(&path)?;
        let vectors = DocumentVectors::from_bytes(&bytes)?;
        let vectors = Arc::new(vectors);
        self.cache.set(key, vectors.clone(), false);
        Ok(vectors)
    }

    pub fn save(
        &self,
        project_id: &ProjectId,
        column: &str,
        kind: VectorKind,
        vectors: &DocumentVectors,
    ) -> CoreResult<()> {
        let path = self.path(project_id, column, kind);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.atomic_write(&path, &vectors.to_bytes())?;
        self.cache.set(
            (project_id.clone(), column.to_string(), kind),
            Arc::new(vectors.clone()),
            false,
        );
        Ok(())
    }

    pub fn invalidate(&self, project_id: &ProjectId, column: &str, kind: VectorKind) {
        self.cache
            .invalidate(&(project_id.clone(), column.to_string(), kind));
    }

    pub fn invalidate_column(&self, project_id: &ProjectId, column: &str) {
        let project_id = project_id.clone();
        let column = column.to_string();
        self.cache
            .invalidate_matching(move |(p, c, _)| *p == project_id && *c == column);
    }

    pub fn invalidate_project(&self, project_id: &ProjectId) {
        let project_id = project_id.clone();
        self.cache.invalidate_matching(move |(p, _, _)| *p == project_id);
    }
}

/// Caches the opaque fitted-model blob a model-builder collaborator
/// serializes. This crate never deserializes the blob itself.
pub struct ModelAdapter {
    cache: PolicyCache<(ProjectId, String), Arc<Vec<u8>>>,
    paths: Arc<PathManager>,
    locks: Arc<LockManager>,
}

impl ModelAdapter {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            cache: PolicyCache::new(Some(5), Some(FIVE_MINUTES)),
            paths,
            locks,
        }
    }

    fn model_path(&self, project_id: &ProjectId, column: &str) -> std::path::PathBuf {
        self.paths.bertopic_dir(project_id, column).join("model.bin")
    }

    pub fn load(&self, project_id: &ProjectId, column: &str) -> CoreResult<Arc<Vec<u8>>> {
        let key = (project_id.clone(), column.to_string());
        if let Some(blob) = self.cache.get(&key) {
            return Ok(blob);
        }
        let path = self.model_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.assert_exists(&path)?;
        let blob = Arc::new(fs::read(&path)?);
        self.cache.set(key, blob.clone(), false);
        Ok(blob)
    }

    pub fn save(&self, project_id: &ProjectId, column: &str, blob: &[u8]) -> CoreResult<()> {
        let path = self.model_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.atomic_write(&path, blob)?;
        self.cache
            .set((project_id.clone(), column.to_string()), Arc::new(blob.to_vec()), false);
        Ok(())
    }

    pub fn invalidate(&self, project_id: &ProjectId, column: &str) {
        self.cache.invalidate(&(project_id.clone(), column.to_string()));
    }

    pub fn invalidate_project(&self, project_id: &ProjectId) {
        let project_id = project_id.clone();
        self.cache.invalidate_matching(move |(p, _)| *p == project_id);
    }
}

/// Caches evaluation-metric results keyed by `(project, column)`.
pub struct EvaluationAdapter {
    cache: PolicyCache<(ProjectId, String), Arc<EvaluationMetrics>>,
    paths: Arc<PathManager>,
    locks: Arc<LockManager>,
}

impl EvaluationAdapter {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            cache: PolicyCache::new(None, Some(FIVE_MINUTES)),
            paths,
            locks,
        }
    }

    pub fn load(&self, project_id: &ProjectId, column: &str) -> CoreResult<Arc<EvaluationMetrics>> {
        let key = (project_id.clone(), column.to_string());
        if let Some(v) = self.cache.get(&key) {
            return Ok(v);
        }
        let path = self.paths.evaluation_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.assert_exists(&path)?;
        let bytes = fs::read(&path)?;
        let metrics: EvaluationMetrics = serde_json::from_slice(&bytes).map_err(|e| corrupted(&path, e))?;
        let metrics = Arc::new(metrics);
        self.cache.set(key, metrics.clone(), false);
        Ok(metrics)
    }

    pub fn save(&self, project_id: &ProjectId, column: &str, metrics: &EvaluationMetrics) -> CoreResult<()> {
        let path = self.paths.evaluation_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        let bytes = serde_json::to_vec(metrics)?;
        self.paths.atomic_write(&path, &bytes)?;
        self.cache
            .set((project_id.clone(), column.to_string()), Arc::new(metrics.clone()), false);
        Ok(())
    }

    pub fn invalidate(&self, project_id: &ProjectId, column: &str) {
        self.cache.invalidate(&(project_id.clone(), column.to_string()));
    }

    pub fn invalidate_project(&self, project_id: &ProjectId) {
        let project_id = project_id.clone();
        self.cache.invalidate_matching(move |(p, _)| *p == project_id);
    }
}

/// Caches experiment-run results keyed by `(project, column)`. Saved
/// after every trial, so `save` is called far more often than the other
/// adapters'.
pub struct ExperimentAdapter {
    cache: PolicyCache<(ProjectId, String), Arc<ExperimentResult>>,
    paths: Arc<PathManager>,
    locks: Arc<LockManager>,
}

impl ExperimentAdapter {
    pub fn new(paths: Arc<PathManager>, locks: Arc<LockManager>) -> Self {
        Self {
            cache: PolicyCache::new(None, Some(FIVE_MINUTES)),
            paths,
            locks,
        }
    }

    pub fn load(&self, project_id: &ProjectId, column: &str) -> CoreResult<Arc<ExperimentResult>> {
        let key = (project_id.clone(), column.to_string());
        if let Some(v) = self.cache.get(&key) {
            return Ok(v);
        }
        let path = self.paths.experiment_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        self.paths.assert_exists(&path)?;
        let bytes = fs::read(&path)?;
        let result: ExperimentResult = serde_json::from_slice(&bytes).map_err(|e| corrupted(&path, e))?;
        let result = Arc::new(result);
        self.cache.set(key, result.clone(), false);
        Ok(result)
    }

    pub fn save(&self, project_id: &ProjectId, column: &str, result: &ExperimentResult) -> CoreResult<()> {
        let path = self.paths.experiment_path(project_id, column);
        let _guard = self.locks.acquire(project_id, &path, None)?;
        let _held = _guard.lock();
        let bytes = serde_json::to_vec(result)?;
        self.paths.atomic_write(&path, &bytes)?;
        self.cache
            .set((project_id.clone(), column.to_string()), Arc::new(result.clone()), false);
        Ok(())
    }

    pub fn invalidate(&self, project_id: &ProjectId, column: &str) {
        self.cache.invalidate(&(project_id.clone(), column.to_string()));
    }

    pub fn invalidate_project(&self, project_id: &ProjectId) {
        let project_id = project_id.clone();
        self.cache.invalidate_matching(move |(p, _)| *p == project_id);
    }
}

#[cfg(test)]
#[path = "adapters_tests.rs"]
mod tests;
