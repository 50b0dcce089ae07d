use super::*;

#[test]
fn fewer_than_two_centroids_yields_a_single_trivial_layer() {
    let layers = build_layers(&[vec![1.0, 0.0]]);
    assert_eq!(layers.len(), 1);
    assert_eq!(layers[0], vec![vec![0]]);
}

#[test]
fn two_centroids_collapse_to_one_root_layer() {
    let layers = build_layers(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
    let last = layers.last().unwrap();
    assert_eq!(last.len(), 1);
}

#[test]
fn identical_centroids_merge_into_fewer_communities() {
    let centroids = vec![
        vec![1.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
    ];
    let layers = build_layers(&centroids);
    assert!(layers.len() >= 2);
    assert!(layers.last().unwrap().len() <= layers[0].len());
}

#[test]
fn every_topic_index_appears_exactly_once_in_layer_zero() {
    let centroids = vec![vec![1.0, 0.0], vec![0.5, 0.5], vec![0.0, 1.0]];
    let layers = build_layers(&centroids);
    let mut all: Vec<usize> = layers[0].iter().flatten().copied().collect();
    all.sort_unstable();
    assert_eq!(all, vec![0, 1, 2]);
}
