// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 1: read the project's workspace via the cache and confirm the
//! requested column is modelable.

use loom_cache::ProjectCache;
use loom_core::ColumnType;

use crate::error::{StageError, StageResult};
use crate::state::PipelineState;

pub fn load(state: &mut PipelineState, cache: &ProjectCache) -> StageResult<()> {
    let schema_column = state
        .schema_column()
        .ok_or_else(|| StageError::NotTextual(state.column.clone()))?;
    if schema_column.column_type() != ColumnType::Textual {
        return Err(StageError::NotTextual(state.column.clone()));
    }

    let workspace = cache.load_workspace()?;
    state.mask = workspace.non_empty_row_indices(&state.column);
    state.workspace = (*workspace).clone();

    if state.mask.is_empty() {
        return Err(StageError::EmptyColumn(state.column.clone()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
