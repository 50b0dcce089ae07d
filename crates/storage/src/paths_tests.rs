use super::*;
use tempfile::tempdir;

fn pm() -> (PathManager, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    (PathManager::new(dir.path()), dir)
}

#[test]
fn column_names_are_base64_encoded_and_path_safe() {
    let encoded = encode_column("../../etc/passwd");
    assert!(!encoded.contains('/'));
    assert!(!encoded.contains(".."));
}

#[test]
fn decode_column_reverses_encode_column() {
    let original = "customer feedback / v2";
    let encoded = encode_column(original);
    assert_eq!(decode_column(&encoded).as_deref(), Some(original));
}

#[test]
fn decode_column_rejects_non_base64_input() {
    assert_eq!(decode_column("not valid base64!!"), None);
}

#[test]
fn artifact_paths_nest_under_project_dir() {
    let (pm, dir) = pm();
    let project = ProjectId::new("reviews");
    let path = pm.topics_path(&project, "comment");
    assert!(path.starts_with(dir.path().join("reviews")));
    assert!(path.to_string_lossy().contains("topics/"));
}

#[test]
fn assert_exists_errors_when_missing() {
    let (pm, _dir) = pm();
    let project = ProjectId::new("reviews");
    let err = pm.assert_exists(&pm.config_path(&project)).unwrap_err();
    assert!(matches!(err, CoreError::FileNotExists(_)));
}

#[test]
fn atomic_write_then_read_round_trips() {
    let (pm, _dir) = pm();
    let project = ProjectId::new("reviews");
    let path = pm.config_path(&project);
    pm.atomic_write(&path, b"{}").unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"{}");
    assert!(pm.assert_exists(&path).is_ok());
}

#[test]
fn atomic_write_leaves_no_tmp_file_behind() {
    let (pm, _dir) = pm();
    let project = ProjectId::new("reviews");
    let path = pm.config_path(&project);
    pm.atomic_write(&path, b"{}").unwrap();
    let tmp = tmp_sibling(&path);
    assert!(!tmp.exists());
}

#[test]
fn cleanup_removes_listed_dirs_and_files_but_keeps_unmanaged() {
    let (pm, dir) = pm();
    let project = ProjectId::new("reviews");
    let root = dir.path().join("reviews");
    fs::create_dir_all(root.join("embedding")).unwrap();
    fs::write(root.join("workspace.parquet"), b"x").unwrap();
    fs::write(root.join("notes.txt"), b"keep me").unwrap();

    pm.cleanup(&project, &["embedding"], &["workspace.parquet"], false)
        .unwrap();

    assert!(!root.join("embedding").exists());
    assert!(!root.join("workspace.parquet").exists());
    assert!(root.exists(), "directory must survive: unmanaged file remains");
    assert!(root.join("notes.txt").exists());
}

#[test]
fn cleanup_removes_project_dir_when_fully_managed_and_not_soft() {
    let (pm, dir) = pm();
    let project = ProjectId::new("reviews");
    let root = dir.path().join("reviews");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("config.json"), b"{}").unwrap();

    pm.cleanup(&project, &[], &["config.json"], false).unwrap();

    assert!(!root.exists());
}

#[test]
fn soft_cleanup_never_removes_the_project_directory() {
    let (pm, dir) = pm();
    let project = ProjectId::new("reviews");
    let root = dir.path().join("reviews");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("config.json"), b"{}").unwrap();

    pm.cleanup(&project, &[], &["config.json"], true).unwrap();

    assert!(root.exists());
}
