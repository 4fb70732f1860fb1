//! PagerDuty client implementation

use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{OffsetPaginator, Page, PageCursor, PageMeta};
use crate::streams::StreamKind;
use crate::window::{format_query_time, plan_windows, resolve_start, TimeWindow};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, info};

/// All items of a paginated collection
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Items from every page, in arrival order
    pub records: Vec<Value>,
    /// Metadata of the last page
    pub meta: PageMeta,
    /// Number of pages fetched
    pub pages: u32,
}

impl Collection {
    fn extend(&mut self, other: Collection) {
        self.records.extend(other.records);
        self.meta = other.meta;
        self.pages += other.pages;
    }
}

/// Result of a windowed incident fetch
#[derive(Debug, Clone, Default)]
pub struct IncidentBatch {
    /// Incidents from every window, in arrival order
    pub incidents: Vec<Value>,
    /// Metadata of the last page of the last window
    pub meta: PageMeta,
    /// Windows that were fetched
    pub windows: Vec<TimeWindow>,
}

/// Client for the PagerDuty REST API
#[derive(Debug)]
pub struct PagerdutyClient {
    http: HttpClient,
    paginator: OffsetPaginator,
}

impl PagerdutyClient {
    /// Create a client over an authenticated HTTP transport
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            paginator: OffsetPaginator::default(),
        }
    }

    /// Verify the credentials with a one-item user listing
    pub async fn check(&self) -> Result<()> {
        let config = RequestConfig::new().query("limit", "1");
        self.http.get_value("users", config).await?;
        Ok(())
    }

    /// Fetch every page of `path`, reading items from `collection`
    pub async fn fetch_all(&self, path: &str, collection: &str) -> Result<Collection> {
        self.fetch_pages(path, collection, &[]).await
    }

    /// Fetch every incident page inside one window
    pub async fn fetch_window(&self, window: &TimeWindow) -> Result<Collection> {
        let scope = [
            ("utc".to_string(), "true".to_string()),
            ("since".to_string(), format_query_time(window.start)),
            ("until".to_string(), format_query_time(window.end)),
        ];
        let collection = StreamKind::Incidents.collection();
        self.fetch_pages(collection, collection, &scope).await
    }

    /// Fetch all incidents from the start boundary up to `now`
    ///
    /// The start boundary is the `since` bookmark when present, otherwise
    /// `start_date` at midnight UTC. The range is cut into windows by
    /// [`plan_windows`]; every window is fetched in full before the next.
    pub async fn incidents(
        &self,
        bookmark: Option<&Value>,
        start_date: &str,
        now: DateTime<Utc>,
    ) -> Result<IncidentBatch> {
        let start = resolve_start(bookmark, start_date)?;
        let windows = plan_windows(start, now);

        let mut merged = Collection::default();
        for window in &windows {
            let page_set = self.fetch_window(window).await?;
            info!(
                "Fetched {} incidents in {} pages for window {}",
                page_set.records.len(),
                page_set.pages,
                window
            );
            merged.extend(page_set);
        }

        Ok(IncidentBatch {
            incidents: merged.records,
            meta: merged.meta,
            windows,
        })
    }

    async fn fetch_pages(
        &self,
        path: &str,
        collection: &str,
        scope: &[(String, String)],
    ) -> Result<Collection> {
        let mut cursor = PageCursor::new();
        let mut result = Collection::default();

        loop {
            let mut request = RequestConfig::new();
            request.query = self.paginator.params(&cursor);
            request.query.extend_from_slice(scope);

            let body = self.http.get_value(path, request).await?;
            let page = Page::from_response(body, collection)?;
            let next = self.paginator.process_page(&page, &mut cursor)?;

            debug!(
                "{}: page {} returned {} items ({} so far, more: {})",
                path,
                cursor.pages,
                page.records.len(),
                cursor.total_fetched,
                page.meta.more
            );

            result.records.extend(page.records);
            result.meta = page.meta;

            if next.is_done() {
                break;
            }
        }

        result.pages = cursor.pages;
        Ok(result)
    }
}
