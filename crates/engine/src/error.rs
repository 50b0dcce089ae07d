// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds specific to task submission and scheduling. Stage and cache
//! failures surface as [`loom_core::CoreError`] and pass through unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] loom_core::CoreError),

    /// A job body panicked instead of returning an error. The panic
    /// payload is captured as a string where possible.
    #[error("task {task_id} panicked: {message}")]
    JobPanicked { task_id: String, message: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
