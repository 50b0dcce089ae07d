// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 4: request document vectors from the embedding transformer. The
//! vectors themselves are a cached unit keyed by the column's
//! document-vectors path — a resubmitted run reuses them if present.

use loom_cache::{ProjectCache, VectorKind};
use loom_core::CoreError;

use crate::error::{StageError, StageResult};
use crate::state::PipelineState;

#[allow(clippy::expect_used)]
pub fn embed(state: &mut PipelineState, cache: &ProjectCache, can_save: bool) -> StageResult<()> {
    if let Ok(cached) = cache.load_vectors(&state.column, VectorKind::Document) {
        if cached.rows != state.embedding_docs.len() {
            return Err(StageError::Core(CoreError::UnsyncedVectors {
                column: state.column.clone(),
                cached: cached.rows,
                expected: state.embedding_docs.len(),
            }));
        }
        state.document_vectors = Some((*cached).clone());
        return Ok(());
    }

    let model = state.model.as_ref().expect("model builder stage already ran");
    let vectors = model.embedding.embed(&state.embedding_docs)?;
    if can_save {
        cache
            .save_vectors(&state.column, VectorKind::Document, &vectors)
            .map_err(StageError::Core)?;
    }
    state.document_vectors = Some(vectors);
    Ok(())
}

#[cfg(test)]
#[path = "embed_tests.rs"]
mod tests;
