// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 6: project the document vectors and the per-topic centroids
//! jointly into a 2D scatter, via a second, independently cached UMAP
//! reducer (distinct from the modeling-space one the Topic modeling stage
//! uses). Joint reduction keeps the documents and their topic markers in a
//! shared coordinate space for plotting.

use loom_cache::{ProjectCache, VectorKind};
use loom_core::{CoreError, DocumentVectors};

use crate::collaborators::{DimensionalityReducer, TruncatingDimensionalityReducer};
use crate::error::{StageError, StageResult};
use crate::state::PipelineState;

const VISUALIZATION_DIMS: usize = 2;

#[allow(clippy::expect_used)]
pub fn embed_visualization(state: &mut PipelineState, cache: &ProjectCache, can_save: bool) -> StageResult<()> {
    let document_vectors = state
        .document_vectors
        .as_ref()
        .expect("embed stage already ran");

    if let Ok(cached) = cache.load_vectors(&state.column, VectorKind::Visualization) {
        if cached.rows != document_vectors.rows {
            return Err(StageError::Core(CoreError::UnsyncedVectors {
                column: state.column.clone(),
                cached: cached.rows,
                expected: document_vectors.rows,
            }));
        }
        state.visualization_vectors = Some((*cached).clone());
        return Ok(());
    }

    let centroids = state
        .topic_centroids
        .as_ref()
        .expect("topic modeling stage already ran");

    let reducer = TruncatingDimensionalityReducer { target_dims: VISUALIZATION_DIMS };
    let joint = concat_rows(document_vectors, centroids.iter().map(|(_, c)| c.as_slice()))?;
    let reduced = reducer.reduce(&joint)?;

    let visualization = reduced.slice_rows(0, document_vectors.rows)?;
    if can_save {
        cache
            .save_vectors(&state.column, VectorKind::Visualization, &visualization)
            .map_err(StageError::Core)?;
    }
    state.visualization_vectors = Some(visualization);
    Ok(())
}

fn concat_rows<'a>(
    base: &DocumentVectors,
    extra: impl Iterator<Item = &'a [f32]>,
) -> StageResult<DocumentVectors> {
    let mut data = base.data.clone();
    let mut rows = base.rows;
    for row in extra {
        data.extend_from_slice(row);
        rows += 1;
    }
    DocumentVectors::new(rows, base.dims, data).map_err(StageError::Core)
}

#[cfg(test)]
#[path = "visualization_tests.rs"]
mod tests;
