//! Time window module
//!
//! Splits an incident backfill into bounded `[since, until]` windows.
//!
//! # Overview
//!
//! PagerDuty rejects incident queries whose date range is too large, so the
//! range from the start boundary to "now" is cut into contiguous windows of
//! `5 * 365 / 12` days while at least five calendar months remain, followed
//! by one final window ending at "now".

mod planner;
mod types;

pub use planner::{
    calendar_gap, format_bookmark, format_query_time, parse_bookmark, parse_start_date,
    plan_windows, resolve_start, CalendarGap, WINDOW_LENGTH_SECS,
};
pub use types::{Clock, FixedClock, SystemClock, TimeWindow};

#[cfg(test)]
mod tests;
