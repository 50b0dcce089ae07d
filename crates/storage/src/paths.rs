// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic path derivation under `data/<project_id>/…`, atomic
//! writes, and project cleanup.

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use loom_core::{CoreError, CoreResult, ProjectId};
use tracing::warn;

/// Encodes a column name into a filesystem-safe path segment. Base64
/// (URL-safe, unpadded) rather than the raw name, so a column literally
/// named `"../../etc"` cannot escape the project directory.
pub fn encode_column(column: &str) -> String {
    URL_SAFE_NO_PAD.encode(column.as_bytes())
}

/// Reverses [`encode_column`]. Used by `loom_watcher` to recover the
/// column name a watcher event's path segment refers to; returns `None`
/// for any segment that isn't valid base64 or valid UTF-8 (e.g. a stray
/// non-managed file dropped into a column's artifact directory).
pub fn decode_column(encoded: &str) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// Resolves paths for one project's artifacts. Pure and deterministic:
/// never touches the filesystem except through [`PathManager::allocate`],
/// [`PathManager::atomic_write`], and [`PathManager::cleanup`].
#[derive(Debug, Clone)]
pub struct PathManager {
    data_root: PathBuf,
}

impl PathManager {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    pub fn project_dir(&self, project_id: &ProjectId) -> PathBuf {
        self.data_root.join(project_id.as_str())
    }

    pub fn full(&self, project_id: &ProjectId, relative: impl AsRef<Path>) -> PathBuf {
        self.project_dir(project_id).join(relative)
    }

    pub fn config_path(&self, project_id: &ProjectId) -> PathBuf {
        self.full(project_id, "config.json")
    }

    /// Named `workspace.parquet` per the on-disk layout this system is
    /// part of; the columnar encoder itself is out of scope here
    /// (`SPEC_FULL.md` §1 Non-goals), so `loom_cache::WorkspaceAdapter`
    /// writes JSON bytes under this name rather than real Parquet.
    pub fn workspace_path(&self, project_id: &ProjectId) -> PathBuf {
        self.full(project_id, "workspace.parquet")
    }

    pub fn topics_path(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.full(project_id, format!("topics/{}.json", encode_column(column)))
    }

    pub fn bertopic_dir(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.full(project_id, format!("bertopic/{}", encode_column(column)))
    }

    fn embedding_dir(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.full(project_id, format!("embedding/{}", encode_column(column)))
    }

    pub fn document_vectors_path(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.embedding_dir(project_id, column).join("document_vectors.npy")
    }

    pub fn umap_vectors_path(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.embedding_dir(project_id, column).join("umap_embeddings.npy")
    }

    pub fn visualization_vectors_path(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.embedding_dir(project_id, column)
            .join("visualization_embeddings.npy")
    }

    pub fn evaluation_path(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.full(
            project_id,
            format!("evaluation/topic_evaluation_{}.json", encode_column(column)),
        )
    }

    pub fn experiment_path(&self, project_id: &ProjectId, column: &str) -> PathBuf {
        self.full(
            project_id,
            format!("evaluation/topic_experiment_{}.json", encode_column(column)),
        )
    }

    pub fn userdata_dir(&self, project_id: &ProjectId) -> PathBuf {
        self.full(project_id, "userdata")
    }

    /// Errors with [`CoreError::FileNotExists`] if `path` is missing.
    pub fn assert_exists(&self, path: &Path) -> CoreResult<()> {
        if path.exists() {
            Ok(())
        } else {
            Err(CoreError::FileNotExists(path.display().to_string()))
        }
    }

    /// Creates `path`'s parent directories and returns it unchanged.
    pub fn allocate(&self, path: PathBuf) -> CoreResult<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Writes `bytes` to `path` by writing a temp sibling then renaming
    /// over the target, so no reader ever observes a half-written file.
    /// On any error the temp file is removed.
    pub fn atomic_write(&self, path: &Path, bytes: &[u8]) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = tmp_sibling(path);
        let result = (|| -> CoreResult<()> {
            fs::write(&tmp_path, bytes)?;
            fs::rename(&tmp_path, path)?;
            Ok(())
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    /// Removes `dirs` and `files` (relative to the project root) if
    /// present. When `soft` is false and the project directory becomes
    /// empty of managed entries, the directory itself is removed;
    /// unmanaged leftovers block removal and are logged by name rather
    /// than deleted.
    pub fn cleanup(
        &self,
        project_id: &ProjectId,
        dirs: &[&str],
        files: &[&str],
        soft: bool,
    ) -> CoreResult<()> {
        let root = self.project_dir(project_id);
        for dir in dirs {
            let path = root.join(dir);
            if path.exists() {
                fs::remove_dir_all(&path)?;
            }
        }
        for file in files {
            let path = root.join(file);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        if soft || !root.exists() {
            return Ok(());
        }
        match fs::read_dir(&root) {
            Ok(mut entries) => {
                if entries.next().is_none() {
                    fs::remove_dir(&root)?;
                } else {
                    let remaining: Vec<String> = fs::read_dir(&root)?
                        .filter_map(|e| e.ok())
                        .map(|e| e.file_name().to_string_lossy().into_owned())
                        .collect();
                    warn!(
                        project_id = project_id.as_str(),
                        remaining = ?remaining,
                        "refusing to remove project directory: unmanaged files remain"
                    );
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{file_name}.tmp"))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
