// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trait boundaries for the numeric collaborators the pipeline stages call
//! out to (embedding, dimensionality reduction, clustering, term
//! representation, evaluation) — mirroring how `original_source`'s
//! `BERTopicModelBuilder` hands off to the `bertopic`/`sentence-transformers`
//! libraries. This crate defines the seams and a deterministic in-memory
//! default for each; it does not implement the numerics a production
//! deployment would plug in behind them.

use std::collections::HashMap;

use loom_core::DocumentVectors;

use crate::error::{StageError, StageResult};
use crate::postprocess::PostprocessResult;

/// Turns raw documents into dense vectors.
pub trait EmbeddingTransformer: Send + Sync {
    fn embed(&self, docs: &[String]) -> StageResult<DocumentVectors>;
}

/// Projects vectors into a lower dimensionality. The Model builder stage
/// constructs one instance for UMAP (modeling-space reduction) and the
/// Visualization stage constructs a second, independently cached instance
/// at a lower target dimensionality — same trait, different configured
/// width per call site.
pub trait DimensionalityReducer: Send + Sync {
    fn reduce(&self, vectors: &DocumentVectors) -> StageResult<DocumentVectors>;
}

/// Assigns each document a cluster id, `-1` for outliers.
pub trait Clusterer: Send + Sync {
    fn fit(&self, vectors: &DocumentVectors) -> StageResult<Vec<i32>>;
}

/// Extracts weighted representative terms per topic (c-TF-IDF-style).
pub trait TopicRepresenter: Send + Sync {
    fn label(
        &self,
        docs_by_topic: &HashMap<i32, Vec<String>>,
    ) -> StageResult<HashMap<i32, Vec<(String, f64)>>>;
}

/// Scores a finished topic-modeling result for coherence and diversity.
pub trait TopicEvaluator: Send + Sync {
    fn score(&self, result: &PostprocessResult) -> StageResult<loom_core::EvaluationMetrics>;
}

/// Deterministic bag-of-hash-buckets embedding. Every word hashes into one
/// of `dims` buckets; a document's vector is its bucket histogram,
/// L2-normalized. No training, no vocabulary persisted — stands in for a
/// real sentence-transformers model in tests and as a shipped fallback.
pub struct HashingEmbeddingTransformer {
    pub dims: usize,
}

impl Default for HashingEmbeddingTransformer {
    fn default() -> Self {
        Self { dims: 32 }
    }
}

impl EmbeddingTransformer for HashingEmbeddingTransformer {
    fn embed(&self, docs: &[String]) -> StageResult<DocumentVectors> {
        let dims = self.dims.max(1);
        let mut data = Vec::with_capacity(docs.len() * dims);
        for doc in docs {
            let mut bucket = vec![0f32; dims];
            for word in doc.split_whitespace() {
                let h = fnv1a(word.as_bytes());
                bucket[(h as usize) % dims] += 1.0;
            }
            let norm = bucket.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in &mut bucket {
                    *v /= norm;
                }
            }
            data.extend(bucket);
        }
        DocumentVectors::new(docs.len(), dims, data).map_err(StageError::Core)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Truncates or zero-pads every row to `target_dims`. A real deployment
/// would plug in UMAP here; this keeps the pipeline runnable end to end
/// without a numerics dependency.
pub struct TruncatingDimensionalityReducer {
    pub target_dims: usize,
}

impl DimensionalityReducer for TruncatingDimensionalityReducer {
    fn reduce(&self, vectors: &DocumentVectors) -> StageResult<DocumentVectors> {
        let target_dims = self.target_dims.max(1);
        let mut data = Vec::with_capacity(vectors.rows * target_dims);
        for i in 0..vectors.rows {
            let row = vectors.row(i);
            for d in 0..target_dims {
                data.push(row.get(d).copied().unwrap_or(0.0));
            }
        }
        DocumentVectors::new(vectors.rows, target_dims, data).map_err(StageError::Core)
    }
}

/// Greedy single-linkage clustering by cosine similarity threshold.
/// Deterministic and dependency-free: walks documents in order, joining
/// each into the first existing cluster whose centroid is within
/// `threshold` cosine similarity, else starting a new one. Clusters
/// smaller than `min_size` are relabeled as outliers (`-1`).
pub struct CosineThresholdClusterer {
    pub similarity_threshold: f32,
    pub min_size: usize,
}

impl Default for CosineThresholdClusterer {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.6,
            min_size: 2,
        }
    }
}

impl Clusterer for CosineThresholdClusterer {
    fn fit(&self, vectors: &DocumentVectors) -> StageResult<Vec<i32>> {
        let mut centroids: Vec<Vec<f32>> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut assignments = vec![-1i32; vectors.rows];

        for i in 0..vectors.rows {
            let row = vectors.row(i);
            let mut best: Option<(usize, f32)> = None;
            for (ci, centroid) in centroids.iter().enumerate() {
                let sim = cosine_similarity(row, centroid);
                if sim >= self.similarity_threshold && best.is_none_or(|(_, b)| sim > b) {
                    best = Some((ci, sim));
                }
            }
            match best {
                Some((ci, _)) => {
                    let centroid = &mut centroids[ci];
                    let n = counts[ci] as f32;
                    for (c, v) in centroid.iter_mut().zip(row) {
                        *c = (*c * n + v) / (n + 1.0);
                    }
                    counts[ci] += 1;
                    assignments[i] = ci as i32;
                }
                None => {
                    centroids.push(row.to_vec());
                    counts.push(1);
                    assignments[i] = (centroids.len() - 1) as i32;
                }
            }
        }

        let keep: Vec<bool> = counts.iter().map(|&c| c >= self.min_size).collect();
        let mut remap = vec![-1i32; centroids.len()];
        let mut next_id = 0i32;
        for (ci, kept) in keep.iter().enumerate() {
            if *kept {
                remap[ci] = next_id;
                next_id += 1;
            }
        }
        for a in &mut assignments {
            *a = if *a >= 0 { remap[*a as usize] } else { -1 };
        }
        Ok(assignments)
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

/// Term-frequency-weighted representer: counts word occurrences within a
/// topic's documents, normalized by document count, and keeps the top
/// `top_n` by weight. A deterministic stand-in for c-TF-IDF.
pub struct FrequencyTopicRepresenter {
    pub top_n: usize,
}

impl Default for FrequencyTopicRepresenter {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl TopicRepresenter for FrequencyTopicRepresenter {
    fn label(
        &self,
        docs_by_topic: &HashMap<i32, Vec<String>>,
    ) -> StageResult<HashMap<i32, Vec<(String, f64)>>> {
        let mut out = HashMap::new();
        for (topic_id, docs) in docs_by_topic {
            let mut counts: HashMap<String, usize> = HashMap::new();
            for doc in docs {
                for word in doc.split_whitespace() {
                    *counts.entry(word.to_string()).or_insert(0) += 1;
                }
            }
            let doc_count = docs.len().max(1) as f64;
            let mut weighted: Vec<(String, f64)> = counts
                .into_iter()
                .map(|(word, count)| (word, count as f64 / doc_count))
                .collect();
            weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
            weighted.truncate(self.top_n);
            out.insert(*topic_id, weighted);
        }
        Ok(out)
    }
}

/// Heuristic coherence/diversity scorer: diversity is the fraction of
/// unique top-words across all topics; coherence is the mean pairwise word
/// overlap within a topic's own word list, both cheap proxies for the real
/// metrics a `gensim`/`bertopic` evaluator would compute.
#[derive(Default)]
pub struct HeuristicTopicEvaluator;

impl TopicEvaluator for HeuristicTopicEvaluator {
    fn score(&self, result: &PostprocessResult) -> StageResult<loom_core::EvaluationMetrics> {
        let all_words: Vec<&str> = result
            .topics
            .iter()
            .flat_map(|t| t.words.iter().map(|(w, _)| w.as_str()))
            .collect();
        let diversity = if all_words.is_empty() {
            0.0
        } else {
            let unique: std::collections::HashSet<&str> = all_words.iter().copied().collect();
            unique.len() as f64 / all_words.len() as f64
        };
        let coherence = if result.topics.is_empty() {
            0.0
        } else {
            result
                .topics
                .iter()
                .map(|t| topic_self_overlap(&t.words))
                .sum::<f64>()
                / result.topics.len() as f64
        };
        Ok(loom_core::EvaluationMetrics {
            coherence,
            diversity,
            topic_count: result.topics.len(),
        })
    }
}

fn topic_self_overlap(words: &[(String, f64)]) -> f64 {
    if words.len() < 2 {
        return 0.0;
    }
    let weights: Vec<f64> = words.iter().map(|(_, w)| *w).collect();
    let mean = weights.iter().sum::<f64>() / weights.len() as f64;
    let above_mean = weights.iter().filter(|&&w| w >= mean).count();
    above_mean as f64 / weights.len() as f64
}

#[cfg(test)]
#[path = "collaborators_tests.rs"]
mod tests;
