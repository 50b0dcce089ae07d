use super::*;
use loom_storage::encode_column;
use std::path::PathBuf;

#[test]
fn config_json_maps_to_config() {
    assert_eq!(classify_relative(&PathBuf::from("config.json")), InvalidationTarget::Config);
}

#[test]
fn workspace_parquet_maps_to_workspace() {
    assert_eq!(
        classify_relative(&PathBuf::from("workspace.parquet")),
        InvalidationTarget::Workspace
    );
}

#[test]
fn topics_file_decodes_the_column_name() {
    let path = PathBuf::from(format!("topics/{}.json", encode_column("review")));
    assert_eq!(classify_relative(&path), InvalidationTarget::Column("review".into()));
}

#[test]
fn bertopic_dir_decodes_the_column_name() {
    let path = PathBuf::from(format!("bertopic/{}/model.bin", encode_column("comments")));
    assert_eq!(classify_relative(&path), InvalidationTarget::Column("comments".into()));
}

#[test]
fn embedding_dir_decodes_the_column_name() {
    let path = PathBuf::from(format!("embedding/{}/document_vectors.npy", encode_column("review")));
    assert_eq!(classify_relative(&path), InvalidationTarget::Column("review".into()));
}

#[test]
fn evaluation_file_decodes_the_column_name() {
    let path = PathBuf::from(format!("evaluation/topic_evaluation_{}.json", encode_column("review")));
    assert_eq!(classify_relative(&path), InvalidationTarget::Column("review".into()));

    let path = PathBuf::from(format!("evaluation/topic_experiment_{}.json", encode_column("review")));
    assert_eq!(classify_relative(&path), InvalidationTarget::Column("review".into()));
}

#[test]
fn userdata_and_lock_files_are_ignored() {
    assert_eq!(classify_relative(&PathBuf::from("userdata/notes.json")), InvalidationTarget::Ignore);
    assert_eq!(classify_relative(&PathBuf::from("config.json.lock")), InvalidationTarget::Ignore);
}

#[test]
fn unrecognized_top_level_entries_are_ignored() {
    assert_eq!(classify_relative(&PathBuf::from("unknown_dir/file")), InvalidationTarget::Ignore);
}

#[test]
fn non_base64_segments_are_ignored_rather_than_panicking() {
    assert_eq!(classify_relative(&PathBuf::from("topics/not-valid-base64!!.json")), InvalidationTarget::Ignore);
}

#[test]
fn empty_relative_path_is_ignored() {
    assert_eq!(classify_relative(&PathBuf::new()), InvalidationTarget::Ignore);
}
