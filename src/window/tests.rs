//! Tests for window module

use super::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn assert_tiles(windows: &[TimeWindow], start: DateTime<Utc>, now: DateTime<Utc>) {
    assert_eq!(windows.first().unwrap().start, start);
    assert_eq!(windows.last().unwrap().end, now);
    for pair in windows.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "gap or overlap between windows");
    }
    for w in windows {
        assert!(w.start <= w.end, "inverted window {w}");
    }
}

// ============================================================================
// Calendar Gap Tests
// ============================================================================

#[test_case(utc(2023, 1, 1), utc(2023, 3, 1), 0, 2 ; "two months")]
#[test_case(utc(2023, 1, 1), utc(2023, 6, 1), 0, 5 ; "exactly five months")]
#[test_case(utc(2023, 1, 2), utc(2023, 6, 1), 0, 4 ; "one day short of five months")]
#[test_case(utc(2020, 1, 1), utc(2023, 1, 1), 3, 0 ; "three years")]
#[test_case(utc(2022, 8, 15), utc(2023, 9, 14), 1, 0 ; "one year one month minus a day")]
#[test_case(utc(2023, 1, 31), utc(2023, 2, 28), 0, 1 ; "month end clamps")]
#[test_case(utc(2023, 3, 1), utc(2023, 1, 1), 0, 0 ; "reversed span")]
fn test_calendar_gap(start: DateTime<Utc>, end: DateTime<Utc>, years: i32, months: i32) {
    let gap = calendar_gap(start, end);
    assert_eq!(gap, CalendarGap { years, months });
}

#[test]
fn test_calendar_gap_respects_time_of_day() {
    let start = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 6, 1, 11, 59, 59).unwrap();
    assert_eq!(calendar_gap(start, end), CalendarGap { years: 0, months: 4 });
}

#[test]
fn test_gap_threshold() {
    assert!(!CalendarGap { years: 0, months: 4 }.exceeds_window());
    assert!(CalendarGap { years: 0, months: 5 }.exceeds_window());
    assert!(CalendarGap { years: 1, months: 0 }.exceeds_window());
}

// ============================================================================
// Planning Tests
// ============================================================================

#[test]
fn test_window_length_is_152_days_2_hours() {
    assert_eq!(
        Duration::seconds(WINDOW_LENGTH_SECS),
        Duration::days(152) + Duration::hours(2)
    );
}

#[test]
fn test_short_gap_is_single_window() {
    let start = utc(2023, 1, 1);
    let now = utc(2023, 3, 1);

    let windows = plan_windows(start, now);
    assert_eq!(windows, vec![TimeWindow::new(start, now)]);
}

#[test]
fn test_multi_year_backfill_is_chunked() {
    let start = utc(2020, 1, 1);
    let now = utc(2023, 1, 1);

    let windows = plan_windows(start, now);

    assert!(windows.len() > 1);
    assert_tiles(&windows, start, now);

    let step = Duration::seconds(WINDOW_LENGTH_SECS);
    let (last, full) = windows.split_last().unwrap();
    for w in full {
        assert_eq!(w.duration(), step);
    }
    assert!(last.duration() <= step);
    // 1096 days at 152d2h per window: 7 full windows, then the remainder
    assert_eq!(full.len(), 7);
}

#[test]
fn test_exactly_five_months_cuts_one_window() {
    let start = utc(2023, 1, 1);
    let now = utc(2023, 6, 10);

    let windows = plan_windows(start, now);
    assert_eq!(windows.len(), 2);
    assert_eq!(
        windows[0],
        TimeWindow::new(start, start + Duration::seconds(WINDOW_LENGTH_SECS))
    );
    assert_tiles(&windows, start, now);
}

#[test]
fn test_short_calendar_months_never_overshoot_now() {
    // Oct 1 to Mar 1 is five calendar months but only 151 days
    let start = utc(2022, 10, 1);
    let now = utc(2023, 3, 1);

    let windows = plan_windows(start, now);
    assert_eq!(windows, vec![TimeWindow::new(start, now)]);
}

#[test]
fn test_future_start_is_clamped() {
    let now = utc(2023, 3, 1);
    let windows = plan_windows(utc(2023, 4, 1), now);
    assert_eq!(windows, vec![TimeWindow::new(now, now)]);
}

// ============================================================================
// Parsing & Formatting Tests
// ============================================================================

#[test]
fn test_parse_start_date() {
    assert_eq!(parse_start_date("2023-01-01").unwrap(), utc(2023, 1, 1));
    assert_eq!(
        parse_start_date("2023-01-01T06:00:00Z").unwrap(),
        Utc.with_ymd_and_hms(2023, 1, 1, 6, 0, 0).unwrap()
    );
    assert!(parse_start_date("01/01/2023").is_err());
    assert!(parse_start_date("").is_err());
}

#[test]
fn test_parse_bookmark_formats() {
    let expected = Utc.with_ymd_and_hms(2023, 3, 1, 10, 30, 0).unwrap();

    assert_eq!(parse_bookmark("2023-03-01T10:30:00.000").unwrap(), expected);
    assert_eq!(parse_bookmark("2023-03-01T10:30:00").unwrap(), expected);
    assert_eq!(parse_bookmark("2023-03-01T10:30:00Z").unwrap(), expected);
    assert_eq!(
        parse_bookmark("2023-03-01T10:30:00.250")
            .unwrap()
            .timestamp_subsec_millis(),
        250
    );
}

#[test]
fn test_parse_bookmark_rejects_garbage() {
    let err = parse_bookmark("last tuesday").unwrap_err();
    assert!(matches!(err, crate::error::Error::InvalidDate { .. }));
}

#[test]
fn test_resolve_start_prefers_bookmark() {
    let bookmark = json!("2023-02-01T00:00:00.000");
    let start = resolve_start(Some(&bookmark), "2020-01-01").unwrap();
    assert_eq!(start, utc(2023, 2, 1));

    let start = resolve_start(None, "2020-01-01").unwrap();
    assert_eq!(start, utc(2020, 1, 1));
}

#[test]
fn test_resolve_start_bad_bookmark_is_error() {
    assert!(resolve_start(Some(&json!("nope")), "2020-01-01").is_err());
}

#[test_case(json!(1_677_628_800) ; "epoch seconds")]
#[test_case(json!(null) ; "null")]
#[test_case(json!({"at": "2023-03-01"}) ; "object")]
fn test_resolve_start_non_string_bookmark_is_error(bookmark: serde_json::Value) {
    let err = resolve_start(Some(&bookmark), "2020-01-01").unwrap_err();
    assert!(matches!(err, crate::error::Error::InvalidDate { .. }));
}

#[test]
fn test_format_bookmark_millisecond_precision() {
    assert_eq!(format_bookmark(utc(2023, 3, 1)), "2023-03-01T00:00:00.000");

    let dt = Utc.timestamp_millis_opt(1_677_666_000_123).unwrap();
    let formatted = format_bookmark(dt);
    assert!(formatted.ends_with(".123"));
    assert_eq!(parse_bookmark(&formatted).unwrap(), dt);
}

#[test]
fn test_format_query_time() {
    assert_eq!(format_query_time(utc(2023, 1, 1)), "2023-01-01T00:00:00Z");
}

#[test]
fn test_fixed_clock() {
    let clock = FixedClock(utc(2023, 3, 1));
    assert_eq!(clock.now(), utc(2023, 3, 1));
    assert!(SystemClock.now() > utc(2023, 3, 1));
}
