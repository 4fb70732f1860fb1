//! Pagination module
//!
//! PagerDuty "classic" offset pagination: every list response carries the
//! collection array plus `limit` and `more`. The next page is requested with
//! `offset` advanced by `limit` until `more` is false.
//!
//! The types here are pure; the request loop lives in the API client.

mod types;

pub use types::{NextPage, OffsetPaginator, Page, PageCursor, PageMeta, PAGE_SIZE};
