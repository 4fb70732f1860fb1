//! Execution engine module
//!
//! Runs every catalog stream concurrently and aggregates the outcomes.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - spawns one task per stream and collects a `SyncReport`
//! - `SyncConfig` - run configuration (start date)
//! - `StreamOutcome` / `SyncStats` - per-stream and aggregate results
//!
//! Each stream emits its SCHEMA message, then its records. A failed fetch
//! emits no records for that stream; only a fully successful incidents sync
//! advances the `since` bookmark. The alerts stream consumes the incident
//! set produced in the same run.

mod types;

pub use types::{StreamOutcome, StreamStatus, SyncConfig, SyncReport, SyncStats};

use crate::api::PagerdutyClient;
use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::output::{Message, MessageSink};
use crate::state::{StateManager, INCIDENTS_SINCE};
use crate::streams::{alerts_path, StreamKind};
use crate::window::{format_bookmark, Clock, SystemClock};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{error, info, info_span, warn, Instrument};

/// Incident set shared with the alerts stream
type IncidentSet = Arc<Vec<Value>>;

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    client: Arc<PagerdutyClient>,
    state: StateManager,
    sink: Arc<dyn MessageSink>,
    clock: Arc<dyn Clock>,
    config: SyncConfig,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(
        client: PagerdutyClient,
        state: StateManager,
        sink: Arc<dyn MessageSink>,
        config: SyncConfig,
    ) -> Self {
        Self {
            client: Arc::new(client),
            state,
            sink,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Sync every stream in the catalog
    ///
    /// Unknown stream ids are reported as failed without affecting the rest.
    /// The report lists outcomes in catalog order.
    pub async fn run(&self, catalog: &Catalog) -> SyncReport {
        let started = Instant::now();
        let now = self.clock.now();

        let mut resolved = Vec::new();
        let mut outcomes: Vec<(usize, StreamOutcome)> = Vec::new();
        for (index, entry) in catalog.streams.iter().enumerate() {
            match entry.tap_stream_id.parse::<StreamKind>() {
                Ok(kind) => resolved.push((index, kind, entry.schema.clone())),
                Err(e) => {
                    error!("Skipping catalog entry: {}", e);
                    outcomes.push((index, StreamOutcome::failed(&entry.tap_stream_id, e, 0, 0)));
                }
            }
        }

        let has_incidents = resolved.iter().any(|(_, k, _)| *k == StreamKind::Incidents);
        let has_alerts = resolved.iter().any(|(_, k, _)| *k == StreamKind::Alerts);

        let (publisher, subscriber) = watch::channel::<Option<IncidentSet>>(None);
        let mut publisher = (has_incidents && has_alerts).then_some(publisher);

        let mut tasks = Vec::new();
        for (index, kind, schema) in resolved {
            let worker = self.worker();
            let span = info_span!("sync", stream = %kind);
            span.in_scope(|| info!("Starting {:?} sync", kind.sync_mode()));
            let handle = match kind {
                StreamKind::Incidents => {
                    let publish = publisher.take();
                    tokio::spawn(worker.incidents(schema, now, publish).instrument(span))
                }
                StreamKind::Alerts => {
                    let source = if has_incidents {
                        IncidentSource::Published(subscriber.clone())
                    } else {
                        IncidentSource::Fetch(now)
                    };
                    tokio::spawn(worker.alerts(schema, source).instrument(span))
                }
                _ => tokio::spawn(worker.collection(kind, schema).instrument(span)),
            };
            tasks.push((index, kind, handle));
        }
        drop(publisher);

        let handles = tasks.iter_mut().map(|(_, _, handle)| handle);
        let results = join_all(handles).await;
        for ((index, kind, _), result) in tasks.iter().zip(results) {
            let outcome = result.unwrap_or_else(|e| {
                error!("Task for stream {} aborted: {}", kind, e);
                StreamOutcome::failed(kind.name(), Error::stream_failed(kind.name(), e.to_string()), 0, 0)
            });
            outcomes.push((*index, outcome));
        }

        outcomes.sort_by_key(|(index, _)| *index);
        let report = SyncReport::new(
            outcomes.into_iter().map(|(_, o)| o).collect(),
            started.elapsed().as_millis() as u64,
        );

        info!(
            "Sync finished: {} records, {} streams ok, {} failed",
            report.stats.records_synced, report.stats.streams_synced, report.stats.errors
        );
        report
    }

    fn worker(&self) -> StreamWorker {
        StreamWorker {
            client: Arc::clone(&self.client),
            state: self.state.clone(),
            sink: Arc::clone(&self.sink),
            clock: Arc::clone(&self.clock),
            start_date: self.config.start_date.clone(),
        }
    }
}

/// Where the alerts stream gets its incidents from
enum IncidentSource {
    /// The incidents stream of this run
    Published(watch::Receiver<Option<IncidentSet>>),
    /// A windowed fetch of its own, bounded by the run's "now"
    Fetch(DateTime<Utc>),
}

/// Owned handles for one stream task
#[derive(Clone)]
struct StreamWorker {
    client: Arc<PagerdutyClient>,
    state: StateManager,
    sink: Arc<dyn MessageSink>,
    clock: Arc<dyn Clock>,
    start_date: String,
}

impl StreamWorker {
    async fn incidents(
        self,
        schema: Value,
        now: DateTime<Utc>,
        publish: Option<watch::Sender<Option<IncidentSet>>>,
    ) -> StreamOutcome {
        let kind = StreamKind::Incidents;
        let started = Instant::now();
        let mut emitted = 0;

        let result = async {
            self.emit_schema(kind, schema)?;

            let bookmark = self.state.get_bookmark(kind.name(), INCIDENTS_SINCE).await;
            let batch = self
                .client
                .incidents(bookmark.as_ref(), &self.start_date, now)
                .await?;
            info!(
                "Fetched {} incidents across {} windows",
                batch.incidents.len(),
                batch.windows.len()
            );

            let incidents: IncidentSet = Arc::new(batch.incidents);
            emitted = self.emit_records(kind, &incidents)?;

            let next = self
                .state
                .snapshot()
                .await
                .with_bookmark(kind.name(), INCIDENTS_SINCE, format_bookmark(now));
            let committed = self.state.commit(next).await?;
            self.sink.emit(&Message::state(committed))?;

            // Alerts only start once every incident record is out
            if let Some(tx) = &publish {
                tx.send_replace(Some(incidents));
            }
            Ok::<(), Error>(())
        }
        .await;

        // Never leave the alerts stream waiting
        if let Some(tx) = publish {
            tx.send_if_modified(|current| {
                if current.is_none() {
                    *current = Some(IncidentSet::default());
                    true
                } else {
                    false
                }
            });
        }

        finish(kind, emitted, started, result)
    }

    async fn alerts(self, schema: Value, source: IncidentSource) -> StreamOutcome {
        let kind = StreamKind::Alerts;
        let started = Instant::now();
        let mut emitted = 0;

        let result = async {
            self.emit_schema(kind, schema)?;

            let incidents = match source {
                IncidentSource::Published(rx) => wait_for_incidents(rx).await,
                IncidentSource::Fetch(now) => {
                    let bookmark = self
                        .state
                        .get_bookmark(StreamKind::Incidents.name(), INCIDENTS_SINCE)
                        .await;
                    let batch = self
                        .client
                        .incidents(bookmark.as_ref(), &self.start_date, now)
                        .await?;
                    Arc::new(batch.incidents)
                }
            };

            let mut failures = 0usize;
            for incident in incidents.iter() {
                let Some(id) = incident.get("id").and_then(Value::as_str) else {
                    warn!("Incident without an id; skipping its alerts");
                    continue;
                };
                match self.client.fetch_all(&alerts_path(id), kind.collection()).await {
                    Ok(alerts) => emitted += self.emit_records(kind, &alerts.records)?,
                    Err(e) => {
                        error!("Failed to fetch alerts for incident {}: {}", id, e);
                        failures += 1;
                    }
                }
            }

            if failures > 0 {
                return Err(Error::stream_failed(
                    kind.name(),
                    format!("{failures} of {} incident alert fetches failed", incidents.len()),
                ));
            }
            Ok::<(), Error>(())
        }
        .await;

        finish(kind, emitted, started, result)
    }

    async fn collection(self, kind: StreamKind, schema: Value) -> StreamOutcome {
        let started = Instant::now();
        let mut emitted = 0;

        let result = async {
            self.emit_schema(kind, schema)?;
            let fetched = self.client.fetch_all(kind.name(), kind.collection()).await?;
            emitted = self.emit_records(kind, &fetched.records)?;
            Ok::<(), Error>(())
        }
        .await;

        finish(kind, emitted, started, result)
    }

    fn emit_schema(&self, kind: StreamKind, schema: Value) -> Result<()> {
        self.sink
            .emit(&Message::schema(kind.name(), schema, kind.key_properties()))
    }

    fn emit_records(&self, kind: StreamKind, records: &[Value]) -> Result<usize> {
        let extracted = self.clock.now();
        for record in records {
            self.sink
                .emit(&Message::record(kind.name(), record.clone(), extracted))?;
        }
        Ok(records.len())
    }
}

async fn wait_for_incidents(mut rx: watch::Receiver<Option<IncidentSet>>) -> IncidentSet {
    let published = match rx.wait_for(Option::is_some).await {
        Ok(set) => set.as_ref().map(Arc::clone),
        Err(_) => None,
    };
    published.unwrap_or_else(|| {
        warn!("Incidents stream ended without publishing; no alerts to fetch");
        IncidentSet::default()
    })
}

fn finish(kind: StreamKind, emitted: usize, started: Instant, result: Result<()>) -> StreamOutcome {
    let duration_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(()) => {
            info!("Synced {} records", emitted);
            StreamOutcome::success(kind.name(), emitted, duration_ms)
        }
        Err(e) => {
            error!(transport = e.is_transport(), "Stream failed: {}", e);
            StreamOutcome::failed(kind.name(), e, emitted, duration_ms)
        }
    }
}
