// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 2: reuse a cached `(Preprocessed)` companion column if present,
//! otherwise compute it; always compute the separate "light" embedding-input
//! view, which is never persisted.

use loom_cache::ProjectCache;

use crate::error::StageResult;
use crate::state::PipelineState;
use crate::text::{heavy_preprocess_corpus, light_preprocess};

#[allow(clippy::expect_used)]
pub fn preprocess(state: &mut PipelineState, cache: &ProjectCache) -> StageResult<()> {
    let preprocessed_column = state
        .schema_column()
        .and_then(|c| c.preprocessed_column_name())
        .expect("load stage already confirmed this is a textual column");

    let raw_docs: Vec<String> = state
        .mask
        .iter()
        .map(|&i| raw_text(&state.workspace, &state.column, i))
        .collect();

    if state.workspace.has_column(&preprocessed_column) {
        let values = state
            .workspace
            .column_values(&preprocessed_column)
            .unwrap_or_default();
        state.preprocessed_docs = state
            .mask
            .iter()
            .map(|&i| values.get(i).and_then(|v| v.as_str()).unwrap_or("").to_string())
            .collect();
    } else {
        let preprocessing = match state.schema_column() {
            Some(loom_core::SchemaColumn::Textual { preprocessing, .. }) => preprocessing.clone(),
            _ => unreachable!("load stage already confirmed this is a textual column"),
        };
        let heavy = heavy_preprocess_corpus(&raw_docs, &preprocessing);

        let mut full_column = vec![serde_json::Value::String(String::new()); state.workspace.row_count()];
        for (&row, doc) in state.mask.iter().zip(&heavy) {
            full_column[row] = serde_json::Value::String(doc.clone());
        }
        state.workspace.set_column(&preprocessed_column, full_column);
        cache.save_workspace(&state.workspace)?;

        state.preprocessed_docs = heavy;
    }

    state.embedding_docs = raw_docs.iter().map(|d| light_preprocess(d)).collect();
    Ok(())
}

fn raw_text(workspace: &loom_core::Workspace, column: &str, row: usize) -> String {
    workspace
        .column_values(column)
        .and_then(|values| values.get(row).and_then(|v| v.as_str()).map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "preprocess_tests.rs"]
mod tests;
