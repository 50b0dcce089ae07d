// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed error kinds shared across the path, cache, engine, and pipeline crates.

use thiserror::Error;

/// A column named in a schema or filter expression does not exist in the workspace.
#[derive(Debug, Error)]
#[error("column not found: {0}")]
pub struct MissingColumn(pub String);

/// Errors surfaced by the project execution and state plane.
///
/// These are *kinds*, not transport-level response codes; translating them
/// into an HTTP status or CLI exit code is the caller's concern.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("column not found: {0}")]
    MissingColumn(String),

    #[error("column {column} has type {actual}, expected {expected}")]
    WrongColumnType {
        column: String,
        expected: &'static str,
        actual: String,
    },

    #[error("schema for project {0} is out of sync with the stored workspace")]
    UnsyncedSchema(String),

    #[error("file does not exist: {0}")]
    FileNotExists(String),

    #[error("file is corrupted and could not be read: {0}")]
    CorruptedFile(String),

    #[error("cached vectors for {column} have {cached} rows but the workspace has {expected}")]
    UnsyncedVectors {
        column: String,
        cached: usize,
        expected: usize,
    },

    #[error("operation on {0} timed out waiting for a file lock")]
    UnallowedFileOperation(String),

    #[error("operation on column {0} timed out waiting for a project lock")]
    UnallowedColumnOperation(String),

    /// Cooperative cancellation sentinel. Never surfaced to callers outside
    /// a task proxy's scoped block; always mapped to a `Failed` task status.
    #[error("task was cancelled")]
    TaskStop,

    #[error("invalid value for {field}: {reason}")]
    InvalidValueType { field: String, reason: String },

    #[error("external collaborator {0} is unavailable")]
    DependencyImport(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// True for the cancellation sentinel, used by proxy scoped-blocks to
    /// distinguish "cancelled" from "failed" without downcasting.
    pub fn is_task_stop(&self) -> bool {
        matches!(self, CoreError::TaskStop)
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
