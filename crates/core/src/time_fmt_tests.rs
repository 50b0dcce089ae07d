use super::*;

#[test]
fn formats_seconds() {
    assert_eq!(format_elapsed(5), "5s");
}

#[test]
fn formats_minutes() {
    assert_eq!(format_elapsed(125), "2m");
}

#[test]
fn formats_hours_with_minutes() {
    assert_eq!(format_elapsed(5400), "1h30m");
    assert_eq!(format_elapsed(3600), "1h");
}

#[test]
fn formats_days() {
    assert_eq!(format_elapsed(3 * 86400), "3d");
}

#[test]
fn formats_milliseconds() {
    assert_eq!(format_elapsed_ms(125_000), "2m");
}

#[test]
fn now_ms_is_monotonically_nondecreasing_across_calls() {
    let a = now_ms();
    let b = now_ms();
    assert!(b >= a);
}
