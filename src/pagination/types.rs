//! Pagination types
//!
//! Page decoding, cursor tracking and the offset strategy.

use crate::error::{Error, Result};
use serde_json::Value;

/// Page size requested from every list endpoint
pub const PAGE_SIZE: u32 = 100;

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available at this offset
    Continue {
        /// Offset for the next request
        offset: u32,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Pagination metadata reported by a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageMeta {
    /// Page size the server applied
    pub limit: u32,
    /// Whether more pages exist
    pub more: bool,
}

/// One decoded page of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Items under the collection key, in server order
    pub records: Vec<Value>,
    /// Pagination metadata
    pub meta: PageMeta,
}

impl Page {
    /// Decode a list response body
    ///
    /// Fails with `Error::Decode` when the collection array, `limit` or
    /// `more` is missing or has the wrong type.
    pub fn from_response(body: Value, collection: &str) -> Result<Self> {
        let Value::Object(mut body) = body else {
            return Err(Error::decode(format!(
                "expected an object response for '{collection}'"
            )));
        };

        let more = body
            .get("more")
            .and_then(Value::as_bool)
            .ok_or_else(|| Error::decode(format!("'{collection}' response has no boolean 'more'")))?;

        let limit = body
            .get("limit")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::decode(format!("'{collection}' response has no integer 'limit'")))?;

        let records = match body.remove(collection) {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(Error::decode(format!(
                    "'{collection}' in response is not an array"
                )))
            }
            None => {
                return Err(Error::decode(format!(
                    "response has no '{collection}' collection"
                )))
            }
        };

        Ok(Self {
            records,
            meta: PageMeta {
                limit: u32::try_from(limit).unwrap_or(u32::MAX),
                more,
            },
        })
    }
}

/// Position within one paginated walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Offset of the next request
    pub offset: u32,
    /// Pages fetched so far
    pub pages: u32,
    /// Records fetched so far
    pub total_fetched: u64,
}

impl PageCursor {
    /// Create a cursor at offset zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page
    pub fn add_page(&mut self, records: usize) {
        self.pages += 1;
        self.total_fetched += records as u64;
    }

    /// Advance the offset
    pub fn add_offset(&mut self, amount: u32) {
        self.offset = self.offset.saturating_add(amount);
    }
}

/// Offset-based pagination driven by the `more` flag
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Page size to request
    pub limit: u32,
}

impl Default for OffsetPaginator {
    fn default() -> Self {
        Self { limit: PAGE_SIZE }
    }
}

impl OffsetPaginator {
    /// Query parameters for the request at the cursor position
    ///
    /// The first request carries no `offset`.
    pub fn params(&self, cursor: &PageCursor) -> Vec<(String, String)> {
        let mut params = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("total".to_string(), "true".to_string()),
        ];
        if cursor.offset > 0 {
            params.push(("offset".to_string(), cursor.offset.to_string()));
        }
        params
    }

    /// Advance the cursor past `page` and decide whether to continue
    pub fn process_page(&self, page: &Page, cursor: &mut PageCursor) -> Result<NextPage> {
        cursor.add_page(page.records.len());

        if !page.meta.more {
            return Ok(NextPage::Done);
        }

        // A zero limit with more=true would request the same page forever.
        if page.meta.limit == 0 {
            return Err(Error::decode("response reports more=true with limit=0"));
        }

        cursor.add_offset(page.meta.limit);
        Ok(NextPage::Continue {
            offset: cursor.offset,
        })
    }
}
