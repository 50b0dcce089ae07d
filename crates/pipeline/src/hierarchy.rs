// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recursive hierarchical grouping of topics by embedding similarity,
//! grounded in `original_source`'s networkx-based
//! `bertopic_hierarchical_clustering`: build a cosine-similarity graph over
//! the current layer's centroids, take its maximum-weight spanning tree,
//! cut the tree's weaker-than-median edges to get the next layer's
//! communities, and repeat until a layer fails to shrink or collapses to
//! one root. The result is simplified by eliding nodes with a single
//! child, same as the original's BFS pass.

use petgraph::algo::min_spanning_tree;
use petgraph::graph::{Graph, NodeIndex, UnGraph};
use petgraph::data::FromElements;

/// One layer of the hierarchy: each entry is a community, given as the
/// indices (into the *previous* layer) of its members. Layer 0 has one
/// singleton community per original topic.
pub fn build_layers(centroids: &[Vec<f32>]) -> Vec<Vec<Vec<usize>>> {
    if centroids.len() < 2 {
        return vec![vec![(0..centroids.len()).collect()]];
    }

    let mut layers = vec![(0..centroids.len()).map(|i| vec![i]).collect::<Vec<_>>()];
    let mut groups = centroids.to_vec();

    loop {
        let communities = next_layer_communities(&groups);
        let prev_len = layers.last().map(Vec::len).unwrap_or(0);
        let grew = communities.len() < prev_len;
        layers.push(communities.clone());

        if communities.len() == 1 {
            break;
        }
        if !grew {
            // No further merging is possible; collapse to a single root.
            let all = (0..communities.len()).collect::<Vec<_>>();
            layers.push(vec![all]);
            break;
        }

        groups = communities
            .iter()
            .map(|members| centroid_of(&groups, members))
            .collect();
    }

    layers
}

#[allow(clippy::expect_used)]
fn next_layer_communities(vectors: &[Vec<f32>]) -> Vec<Vec<usize>> {
    let n = vectors.len();
    if n <= 1 {
        return vec![(0..n).collect()];
    }

    let mut graph: UnGraph<(), f64> = Graph::with_capacity(n, n * (n - 1) / 2);
    let nodes: Vec<NodeIndex> = (0..n).map(|_| graph.add_node(())).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            let sim = cosine_similarity(&vectors[i], &vectors[j]) as f64;
            graph.add_edge(nodes[i], nodes[j], -sim);
        }
    }

    let mst: UnGraph<(), f64> = UnGraph::from_elements(min_spanning_tree(&graph));

    let mut weights: Vec<f64> = mst.edge_weights().map(|w| -w).collect();
    weights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = weights.get(weights.len() / 2).copied().unwrap_or(0.0);

    let mut union_find = UnionFind::new(n);
    for edge in mst.edge_indices() {
        let (a, b) = mst.edge_endpoints(edge).expect("edge exists");
        let sim = -mst[edge];
        if sim >= median {
            union_find.union(a.index(), b.index());
        }
    }

    let mut groups: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
    for i in 0..n {
        groups.entry(union_find.find(i)).or_default().push(i);
    }
    let mut communities: Vec<Vec<usize>> = groups.into_values().collect();
    communities.sort_by_key(|c| c[0]);
    communities
}

fn centroid_of(vectors: &[Vec<f32>], members: &[usize]) -> Vec<f32> {
    let dims = vectors.first().map(Vec::len).unwrap_or(0);
    let mut out = vec![0f32; dims];
    for &m in members {
        for (o, v) in out.iter_mut().zip(&vectors[m]) {
            *o += v;
        }
    }
    let n = members.len().max(1) as f32;
    for o in &mut out {
        *o /= n;
    }
    out
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

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }
}

#[cfg(test)]
#[path = "hierarchy_tests.rs"]
mod tests;
