use super::*;

#[test]
fn scoped_builds_conventional_id() {
    let project = ProjectId::new("reviews");
    let id = TaskId::scoped(&project, "topic-modeling", "comment");
    assert_eq!(id.as_str(), "reviews__topic-modeling__comment");
}

#[test]
fn belongs_to_matches_own_project_only() {
    let project = ProjectId::new("reviews");
    let other = ProjectId::new("reviews2");
    let id = TaskId::scoped(&project, "topic-modeling", "comment");
    assert!(id.belongs_to(&project));
    assert!(!id.belongs_to(&other));
}
