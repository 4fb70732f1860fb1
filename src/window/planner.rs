//! Window planning
//!
//! Calendar gap computation, the window tiling and the timestamp formats
//! used in queries and bookmarks.

use super::types::TimeWindow;
use crate::error::{Error, Result};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Window length: `5 * 365 / 12` days (152 days 2 hours), a fixed-duration
/// stand-in for "five months".
///
/// This is not calendar-accurate. Existing bookmarks only rely on windows
/// tiling correctly, so the approximation is kept as is.
pub const WINDOW_LENGTH_SECS: i64 = 5 * 365 * 86_400 / 12;

/// Bookmark format: ISO-8601, millisecond precision, no zone suffix
const BOOKMARK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Calendar difference between two instants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarGap {
    /// Whole years
    pub years: i32,
    /// Remaining whole months (0..12)
    pub months: i32,
}

impl CalendarGap {
    /// Whether the gap still needs a bounded window before the final one
    pub fn exceeds_window(&self) -> bool {
        self.years > 0 || self.months >= 5
    }
}

/// Whole calendar years and months from `start` to `end`
///
/// Month arithmetic clamps to the end of shorter months, so Jan 31 plus one
/// month is Feb 28/29. A non-positive span yields a zero gap.
pub fn calendar_gap(start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarGap {
    if end <= start {
        return CalendarGap { years: 0, months: 0 };
    }

    let mut total =
        (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32);

    while total > 0 && add_months(start, total) > end {
        total -= 1;
    }

    CalendarGap {
        years: total / 12,
        months: total % 12,
    }
}

fn add_months(dt: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    dt.checked_add_months(Months::new(months.unsigned_abs()))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Tile `[start, now]` into fetch windows
///
/// While the calendar gap to `now` is at least five months, a window of
/// `WINDOW_LENGTH_SECS` is cut and `start` advances to its end. The last
/// window always ends at `now`, and no window extends past it: five
/// calendar months can be shorter than the window length (Oct 1 to Mar 1),
/// in which case the remainder goes to the final window. A start boundary in
/// the future is clamped to `now`.
pub fn plan_windows(start: DateTime<Utc>, now: DateTime<Utc>) -> Vec<TimeWindow> {
    let step = Duration::seconds(WINDOW_LENGTH_SECS);
    let mut windows = Vec::new();
    let mut start = start.min(now);

    while calendar_gap(start, now).exceeds_window() {
        let end = start + step;
        if end >= now {
            break;
        }
        windows.push(TimeWindow::new(start, end));
        start = end;
    }

    windows.push(TimeWindow::new(start, now));
    windows
}

/// Start boundary: the bookmark when present, otherwise the configured start date
///
/// A bookmark that is present but not a string is an error, never a reset.
pub fn resolve_start(bookmark: Option<&Value>, start_date: &str) -> Result<DateTime<Utc>> {
    match bookmark {
        Some(Value::String(value)) => parse_bookmark(value),
        Some(other) => Err(Error::invalid_date(
            other.to_string(),
            "bookmark must be a timestamp string",
        )),
        None => parse_start_date(start_date),
    }
}

/// Parse a `YYYY-MM-DD` start date as midnight UTC
///
/// Full RFC 3339 timestamps are accepted as well.
pub fn parse_start_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(ndt.and_utc());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    Err(Error::invalid_date(s, "expected YYYY-MM-DD"))
}

/// Parse a bookmark timestamp
///
/// Accepts the zone-less bookmark format (`2023-03-01T00:00:00.000`, fraction
/// optional) and RFC 3339.
pub fn parse_bookmark(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| Error::invalid_date(s, e.to_string()))
}

/// Render a bookmark value
pub fn format_bookmark(dt: DateTime<Utc>) -> String {
    dt.format(BOOKMARK_FORMAT).to_string()
}

/// Render a `since` / `until` query value
pub fn format_query_time(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
