// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Core(#[from] loom_core::CoreError),

    #[error("column {0} is not a textual column")]
    NotTextual(String),

    #[error("column {0} has no non-empty rows to model")]
    EmptyColumn(String),

    #[error("external collaborator {0} is unavailable")]
    DependencyImport(String),
}

pub type StageResult<T> = Result<T, StageError>;

impl From<StageError> for loom_core::CoreError {
    fn from(err: StageError) -> Self {
        match err {
            StageError::Core(e) => e,
            StageError::NotTextual(column) => loom_core::CoreError::WrongColumnType {
                column,
                expected: "textual",
                actual: "non-textual".to_string(),
            },
            StageError::EmptyColumn(column) => loom_core::CoreError::MissingColumn(column),
            StageError::DependencyImport(what) => loom_core::CoreError::DependencyImport(what),
        }
    }
}
