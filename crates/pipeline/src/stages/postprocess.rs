// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 7: turn cluster assignments into labeled [`Topic`] records, fold
//! them into a hierarchy via `crate::hierarchy`, and — when `can_save` —
//! persist the result and update the workspace's `(Topic)` companion
//! column.

use std::cmp::Ordering;
use std::collections::HashMap;

use loom_cache::ProjectCache;
use loom_core::{Topic, TopicModelingResult};

use crate::error::StageResult;
use crate::hierarchy::build_layers;
use crate::postprocess::PostprocessResult;
use crate::state::PipelineState;

#[allow(clippy::expect_used)]
pub fn postprocess(state: &mut PipelineState, cache: &ProjectCache, can_save: bool) -> StageResult<()> {
    let model = state.model.as_ref().expect("model builder stage already ran");
    let assignments = state
        .document_topic_assignments
        .clone()
        .expect("topic modeling stage already ran");
    let centroids = state
        .topic_centroids
        .clone()
        .expect("topic modeling stage already ran");
    let top_n_words = match state.schema_column() {
        Some(loom_core::SchemaColumn::Textual { topic_modeling, .. }) => topic_modeling.top_n_words as usize,
        _ => unreachable!("load stage already confirmed this is a textual column"),
    };

    let mut docs_by_topic: HashMap<i32, Vec<String>> = HashMap::new();
    for (&topic, doc) in assignments.iter().zip(&state.preprocessed_docs) {
        if topic >= 0 {
            docs_by_topic.entry(topic).or_default().push(doc.clone());
        }
    }
    let labels = model.representer.label(&docs_by_topic)?;

    let mut topics: Vec<Topic> = centroids
        .iter()
        .map(|(id, _)| {
            let words = labels.get(id).cloned().unwrap_or_default();
            let frequency = docs_by_topic.get(id).map(Vec::len).unwrap_or(0);
            Topic {
                id: *id,
                label: Topic::default_label(&words),
                words,
                frequency,
                children: Vec::new(),
            }
        })
        .collect();
    topics.sort_by_key(|t| t.id);

    let hierarchy = if topics.len() >= 2 {
        let topic_vectors: Vec<Vec<f32>> = centroids.into_iter().map(|(_, v)| v).collect();
        let layers = build_layers(&topic_vectors);
        Some(build_hierarchy_tree(&topics, &layers, top_n_words))
    } else {
        None
    };

    let valid_count = assignments.iter().filter(|&&t| t >= 0).count();
    let outlier_count = assignments.iter().filter(|&&t| t < 0).count();
    let total_count = state.workspace.row_count();

    if can_save {
        let topic_result = TopicModelingResult {
            topics: topics.clone(),
            hierarchy: hierarchy.clone(),
            valid_count,
            invalid_count: 0,
            outlier_count,
            total_count,
            created_at_ms: loom_core::now_ms(),
        };
        cache.save_topics(&state.column, &topic_result)?;

        let topic_column = state
            .schema_column()
            .and_then(|c| c.topic_column_name())
            .expect("load stage already confirmed this is a textual column");
        let mut full_column = vec![serde_json::Value::Null; state.workspace.row_count()];
        for (&row, &topic) in state.mask.iter().zip(&assignments) {
            full_column[row] = serde_json::Value::from(topic);
        }
        state.workspace.set_column(&topic_column, full_column);
        cache.save_workspace(&state.workspace)?;
    }

    state.result = Some(PostprocessResult {
        topics,
        hierarchy,
        document_topic_assignments: assignments,
    });
    Ok(())
}

/// Folds `layers` (as produced by [`build_layers`]) into a nested [`Topic`]
/// tree rooted at the last layer's sole community. A community of one
/// passes its member through unchanged rather than wrapping it in a
/// single-child parent, mirroring the elision pass `original_source`
/// applies via `nx.bfs_layers`.
fn build_hierarchy_tree(topics: &[Topic], layers: &[Vec<Vec<usize>>], top_n_words: usize) -> Topic {
    let mut next_id = topics.iter().map(|t| t.id).max().unwrap_or(-1) + 1;
    let mut nodes: Vec<Topic> = topics.to_vec();

    for layer in layers.iter().skip(1) {
        let mut next_nodes = Vec::with_capacity(layer.len());
        for community in layer {
            if community.len() == 1 {
                next_nodes.push(nodes[community[0]].clone());
                continue;
            }
            let children: Vec<Topic> = community.iter().map(|&i| nodes[i].clone()).collect();
            let frequency: usize = children.iter().map(|c| c.frequency).sum();
            let words = merge_words(&children, top_n_words);
            let id = next_id;
            next_id += 1;
            next_nodes.push(Topic {
                id,
                label: Topic::default_label(&words),
                words,
                frequency,
                children,
            });
        }
        nodes = next_nodes;
    }

    nodes.into_iter().next().unwrap_or(Topic {
        id: next_id,
        label: String::new(),
        words: Vec::new(),
        frequency: 0,
        children: Vec::new(),
    })
}

/// Merges children's weighted terms into one ranked list, each child's
/// contribution scaled by its share of the parent's total document
/// frequency.
fn merge_words(children: &[Topic], top_n_words: usize) -> Vec<(String, f64)> {
    let total_frequency = children.iter().map(|c| c.frequency as f64).sum::<f64>().max(1.0);
    let mut weights: HashMap<String, f64> = HashMap::new();
    for child in children {
        let share = child.frequency as f64 / total_frequency;
        for (term, score) in &child.words {
            *weights.entry(term.clone()).or_insert(0.0) += score * share;
        }
    }
    let mut merged: Vec<(String, f64)> = weights.into_iter().collect();
    merged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
    merged.truncate(top_n_words.max(1));
    merged
}

#[cfg(test)]
#[path = "postprocess_tests.rs"]
mod tests;
