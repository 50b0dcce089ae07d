use super::*;

#[test]
fn idle_seeds_a_single_log_entry() {
    let record = TaskRecord::idle("queued", 0);
    assert_eq!(record.status, TaskStatus::Idle);
    assert_eq!(record.logs.len(), 1);
    assert_eq!(record.logs[0].message, "queued");
}

#[test]
fn logs_are_appended_not_replaced() {
    let mut record = TaskRecord::idle("queued", 0);
    record.push_log(TaskStatus::Pending, "loading workspace", 1);
    record.push_log(TaskStatus::Pending, "preprocessing", 2);
    assert_eq!(record.logs.len(), 3);
    assert_eq!(record.status, TaskStatus::Pending);
    assert_eq!(record.logs[2].message, "preprocessing");
}

#[test]
fn succeed_attaches_data_and_marks_terminal() {
    let mut record = TaskRecord::idle("queued", 0);
    record.succeed(TaskData::Empty, "done", 5);
    assert!(record.status.is_terminal());
    assert!(record.data.is_some());
}

#[test]
fn fail_marks_terminal_without_data() {
    let mut record = TaskRecord::idle("queued", 0);
    record.fail("cancelled", 3);
    assert_eq!(record.status, TaskStatus::Failed);
    assert!(record.data.is_none());
}
