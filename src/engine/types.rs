//! Engine types
//!
//! Configuration, per-stream outcomes and the run report.

use serde::Serialize;
use serde_json::{json, Value};

/// Configuration for sync operations
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Earliest incident date when no bookmark exists (`YYYY-MM-DD`)
    pub start_date: String,
}

impl SyncConfig {
    /// Create a new config
    pub fn new(start_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
        }
    }
}

/// Final status of one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamStatus {
    /// Everything fetched and emitted
    Success,
    /// Nothing (or only part) of the stream was delivered
    Failed,
}

/// Outcome of syncing one stream
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamOutcome {
    /// Stream name as given by the catalog
    pub stream: String,
    /// Final status
    pub status: StreamStatus,
    /// Records emitted
    pub records_synced: usize,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall time spent on the stream
    pub duration_ms: u64,
}

impl StreamOutcome {
    /// A successful outcome
    pub fn success(stream: impl Into<String>, records_synced: usize, duration_ms: u64) -> Self {
        Self {
            stream: stream.into(),
            status: StreamStatus::Success,
            records_synced,
            error: None,
            duration_ms,
        }
    }

    /// A failed outcome
    pub fn failed(
        stream: impl Into<String>,
        error: impl ToString,
        records_synced: usize,
        duration_ms: u64,
    ) -> Self {
        Self {
            stream: stream.into(),
            status: StreamStatus::Failed,
            records_synced,
            error: Some(error.to_string()),
            duration_ms,
        }
    }

    /// Check if the stream failed
    pub fn is_failed(&self) -> bool {
        self.status == StreamStatus::Failed
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Streams that finished successfully
    pub streams_synced: usize,
    /// Streams that failed
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one stream outcome into the totals
    pub fn add_outcome(&mut self, outcome: &StreamOutcome) {
        self.records_synced += outcome.records_synced;
        if outcome.is_failed() {
            self.errors += 1;
        } else {
            self.streams_synced += 1;
        }
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Result of a full sync run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Per-stream outcomes in catalog order
    pub outcomes: Vec<StreamOutcome>,
    /// Aggregate statistics
    pub stats: SyncStats,
}

impl SyncReport {
    /// Build a report from outcomes
    pub fn new(outcomes: Vec<StreamOutcome>, duration_ms: u64) -> Self {
        let mut stats = SyncStats::new();
        for outcome in &outcomes {
            stats.add_outcome(outcome);
        }
        stats.set_duration(duration_ms);
        Self { outcomes, stats }
    }

    /// Whether every stream succeeded
    pub fn is_success(&self) -> bool {
        self.stats.errors == 0
    }

    /// Names of the failed streams
    pub fn failed_streams(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .map(|o| o.stream.as_str())
            .collect()
    }

    /// Outcome of a stream by name
    pub fn outcome(&self, stream: &str) -> Option<&StreamOutcome> {
        self.outcomes.iter().find(|o| o.stream == stream)
    }

    /// Overall status: SUCCEEDED, PARTIAL or FAILED
    pub fn status(&self) -> &'static str {
        if self.stats.errors == 0 {
            "SUCCEEDED"
        } else if self.stats.streams_synced == 0 {
            "FAILED"
        } else {
            "PARTIAL"
        }
    }

    /// Summary document for programmatic consumption
    pub fn summary(&self) -> Value {
        json!({
            "status": self.status(),
            "total_records": self.stats.records_synced,
            "total_streams": self.outcomes.len(),
            "successful_streams": self.stats.streams_synced,
            "failed_streams": self.stats.errors,
            "duration_ms": self.stats.duration_ms,
            "streams": self.outcomes,
        })
    }
}
