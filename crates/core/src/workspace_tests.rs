use super::*;
use serde_json::json;

fn sample() -> Workspace {
    Workspace::new(
        vec!["review".into()],
        vec![
            vec![json!("the cat sat")],
            vec![json!("")],
            vec![json!(null)],
            vec![json!("a dog ran")],
        ],
    )
}

#[test]
fn set_column_adds_new_column_aligned_by_row() {
    let mut ws = sample();
    ws.set_column(
        "review (Preprocessed)",
        vec![json!("cat sat"), json!(""), json!(null), json!("dog ran")],
    );
    assert!(ws.has_column("review (Preprocessed)"));
    assert_eq!(ws.columns.len(), 2);
    assert_eq!(ws.rows[0].len(), 2);
}

#[test]
fn set_column_overwrites_existing_column_in_place() {
    let mut ws = sample();
    ws.set_column("review", vec![json!("a"), json!("b"), json!("c"), json!("d")]);
    assert_eq!(ws.columns.len(), 1);
    assert_eq!(ws.rows[0][0], json!("a"));
}

#[test]
fn non_empty_row_indices_skips_null_and_empty_string() {
    let ws = sample();
    assert_eq!(ws.non_empty_row_indices("review"), vec![0, 3]);
}

#[test]
fn non_empty_row_indices_on_missing_column_is_empty() {
    let ws = sample();
    assert!(ws.non_empty_row_indices("missing").is_empty());
}
