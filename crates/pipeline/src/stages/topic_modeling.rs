// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 5: reduce document vectors to the modeling-space UMAP embedding
//! (a cached unit, same as the document vectors themselves), fit the
//! clusterer over it, optionally fold outliers into their nearest cluster,
//! and persist the fitted model as a serialized snapshot of the
//! hyperparameters that produced it (this crate carries no real model
//! weights — the clusterer itself is a deterministic function of its
//! configuration, see `crate::collaborators`).

use std::collections::HashMap;

use loom_cache::{ProjectCache, VectorKind};
use loom_core::{CoreError, DocumentVectors};

use crate::error::{StageError, StageResult};
use crate::state::PipelineState;

#[allow(clippy::expect_used)]
pub fn model_topics(state: &mut PipelineState, cache: &ProjectCache, can_save: bool) -> StageResult<()> {
    let model = state.model.as_ref().expect("model builder stage already ran");
    let document_vectors = state
        .document_vectors
        .as_ref()
        .expect("embed stage already ran");

    let umap_vectors = if let Ok(cached) = cache.load_vectors(&state.column, VectorKind::Umap) {
        if cached.rows != document_vectors.rows {
            return Err(StageError::Core(CoreError::UnsyncedVectors {
                column: state.column.clone(),
                cached: cached.rows,
                expected: document_vectors.rows,
            }));
        }
        (*cached).clone()
    } else {
        let reduced = model.reducer.reduce(document_vectors)?;
        if can_save {
            cache
                .save_vectors(&state.column, VectorKind::Umap, &reduced)
                .map_err(StageError::Core)?;
        }
        reduced
    };

    let mut assignments = model.clusterer.fit(&umap_vectors)?;

    let topic_modeling_cfg = match state.schema_column() {
        Some(loom_core::SchemaColumn::Textual { topic_modeling, .. }) => topic_modeling.clone(),
        _ => unreachable!("load stage already confirmed this is a textual column"),
    };
    if topic_modeling_cfg.no_outliers {
        reassign_outliers(&mut assignments, &umap_vectors);
    }

    if can_save {
        let blob = serde_json::to_vec(&topic_modeling_cfg).map_err(loom_core::CoreError::from)?;
        cache.save_model(&state.column, &blob).map_err(StageError::Core)?;
    }

    state.topic_centroids = Some(centroids_by_topic(document_vectors, &assignments));
    state.umap_vectors = Some(umap_vectors);
    state.document_topic_assignments = Some(assignments);
    Ok(())
}

/// Averages `document_vectors` rows per assigned topic id, skipping
/// outliers (`-1`). Used by Visualization embedding and by Postprocess's
/// hierarchy builder, both of which reason about topics in the full
/// embedding space rather than the lossy 2D projection.
fn centroids_by_topic(vectors: &DocumentVectors, assignments: &[i32]) -> Vec<(i32, Vec<f32>)> {
    let mut sums: HashMap<i32, (Vec<f32>, usize)> = HashMap::new();
    for (i, &topic) in assignments.iter().enumerate() {
        if topic < 0 {
            continue;
        }
        let entry = sums
            .entry(topic)
            .or_insert_with(|| (vec![0f32; vectors.dims], 0));
        for (c, v) in entry.0.iter_mut().zip(vectors.row(i)) {
            *c += v;
        }
        entry.1 += 1;
    }
    let mut result: Vec<(i32, Vec<f32>)> = sums
        .into_iter()
        .map(|(topic, (sum, n))| {
            let n = n.max(1) as f32;
            (topic, sum.into_iter().map(|v| v / n).collect())
        })
        .collect();
    result.sort_by_key(|(topic, _)| *topic);
    result
}

/// Reassigns every outlier (`-1`) to the cluster whose centroid it's
/// closest to by cosine similarity. A no-op if every document is already
/// an outlier (there is nothing to reassign to).
fn reassign_outliers(assignments: &mut [i32], vectors: &DocumentVectors) {
    let max_id = assignments.iter().filter(|&&t| t >= 0).max().copied();
    let Some(max_id) = max_id else { return };

    let mut sums = vec![vec![0f32; vectors.dims]; (max_id + 1) as usize];
    let mut counts = vec![0usize; (max_id + 1) as usize];
    for (i, &topic) in assignments.iter().enumerate() {
        if topic >= 0 {
            let centroid = &mut sums[topic as usize];
            for (c, v) in centroid.iter_mut().zip(vectors.row(i)) {
                *c += v;
            }
            counts[topic as usize] += 1;
        }
    }
    let centroids: Vec<Vec<f32>> = sums
        .into_iter()
        .zip(&counts)
        .map(|(sum, &n)| {
            let n = n.max(1) as f32;
            sum.into_iter().map(|v| v / n).collect()
        })
        .collect();

    for (i, topic) in assignments.iter_mut().enumerate() {
        if *topic == -1 {
            let row = vectors.row(i);
            if let Some((best, _)) = centroids
                .iter()
                .enumerate()
                .map(|(id, centroid)| (id, cosine_similarity(row, centroid)))
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            {
                *topic = best as i32;
            }
        }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
#[path = "topic_modeling_tests.rs"]
mod tests;
