//! PagerDuty API client
//!
//! Two fetch strategies on top of the HTTP transport:
//!
//! - `fetch_all` walks every page of a flat collection (`services`,
//!   `incidents/{id}/alerts`, ...)
//! - `incidents` walks the time-windowed incident backfill from a bookmark
//!   (or the configured start date) up to "now"
//!
//! Both are all-or-nothing: any failed page fails the whole call and no
//! partial result is returned.

mod client;

pub use client::{Collection, IncidentBatch, PagerdutyClient};
