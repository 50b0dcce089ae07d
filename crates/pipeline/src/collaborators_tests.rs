use super::*;

#[test]
fn hashing_embedder_produces_one_row_per_document() {
    let embedder = HashingEmbeddingTransformer::default();
    let docs = vec!["great product".to_string(), "terrible support".to_string()];
    let vectors = embedder.embed(&docs).unwrap();
    assert_eq!(vectors.rows, 2);
    assert_eq!(vectors.dims, embedder.dims);
}

#[test]
fn hashing_embedder_is_deterministic_across_calls() {
    let embedder = HashingEmbeddingTransformer::default();
    let docs = vec!["same input".to_string()];
    let a = embedder.embed(&docs).unwrap();
    let b = embedder.embed(&docs).unwrap();
    assert_eq!(a.data, b.data);
}

#[test]
fn truncating_reducer_matches_requested_dims() {
    let reducer = TruncatingDimensionalityReducer { target_dims: 2 };
    let vectors = DocumentVectors::new(3, 4, vec![0.0; 12]).unwrap();
    let reduced = reducer.reduce(&vectors).unwrap();
    assert_eq!(reduced.dims, 2);
    assert_eq!(reduced.rows, 3);
}

#[test]
fn cosine_threshold_clusterer_groups_near_identical_vectors() {
    let clusterer = CosineThresholdClusterer::default();
    let vectors = DocumentVectors::new(
        4,
        2,
        vec![1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0],
    )
    .unwrap();
    let assignments = clusterer.fit(&vectors).unwrap();
    assert_eq!(assignments[0], assignments[1]);
    assert_eq!(assignments[2], assignments[3]);
    assert_ne!(assignments[0], assignments[2]);
}

#[test]
fn cosine_threshold_clusterer_marks_singletons_as_outliers() {
    let clusterer = CosineThresholdClusterer {
        similarity_threshold: 0.99,
        min_size: 2,
    };
    let vectors = DocumentVectors::new(3, 2, vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();
    let assignments = clusterer.fit(&vectors).unwrap();
    assert!(assignments.iter().all(|&a| a == -1));
}

#[test]
fn frequency_representer_ranks_by_normalized_count() {
    let representer = FrequencyTopicRepresenter::default();
    let mut docs_by_topic = std::collections::HashMap::new();
    docs_by_topic.insert(0, vec!["great great product".to_string(), "great value".to_string()]);
    let labels = representer.label(&docs_by_topic).unwrap();
    let top = &labels[&0][0];
    assert_eq!(top.0, "great");
}

#[test]
fn heuristic_evaluator_reports_topic_count() {
    let evaluator = HeuristicTopicEvaluator;
    let result = PostprocessResult {
        topics: vec![loom_core::Topic {
            id: 0,
            label: "a, b, c".into(),
            words: vec![("a".into(), 1.0), ("b".into(), 0.5)],
            frequency: 2,
            children: vec![],
        }],
        hierarchy: None,
        document_topic_assignments: vec![0, 0],
    };
    let metrics = evaluator.score(&result).unwrap();
    assert_eq!(metrics.topic_count, 1);
}
