//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::connector::{connector_spec, Connector, PagerdutyTap};
use crate::error::{Error, Result, ResultExt};
use crate::output::{MessageSink, StdoutSink};
use crate::state::StateManager;
use crate::streams::StreamKind;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Check => self.check().await,
            Commands::Discover => self.discover().await,
            Commands::Read { streams } => self.read(streams.as_deref()).await,
            Commands::Streams => self.streams(),
            Commands::Spec => self.output(&connector_spec()),
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config("a config is required (--config or --config-json)")),
        }
    }

    /// Load state
    ///
    /// Inline state takes precedence as the starting point; commits still go
    /// to `--state` when it is given.
    fn load_state(&self) -> Result<StateManager> {
        match (&self.cli.state_json, &self.cli.state) {
            (Some(json), Some(path)) => Ok(StateManager::from_json(json)?.persist_to(path)),
            (Some(json), None) => StateManager::from_json(json),
            (None, Some(path)) => StateManager::from_file(path),
            (None, None) => Ok(StateManager::in_memory()),
        }
    }

    /// Load the catalog file, or discover
    async fn load_catalog(&self, tap: &PagerdutyTap) -> Result<Catalog> {
        match &self.cli.catalog {
            Some(path) => Catalog::from_file(path)
                .with_context(|| format!("Failed to load catalog {}", path.display())),
            None => tap.discover().await,
        }
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let tap = PagerdutyTap::new(self.load_config()?);
        let result = tap.check().await?;

        let status = if result.success { "SUCCEEDED" } else { "FAILED" };
        self.output(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": result.message.as_deref().unwrap_or("Connection successful")
            }
        }))?;

        if result.success {
            Ok(())
        } else {
            Err(Error::config(format!(
                "Connection failed: {}",
                result.message.unwrap_or_default()
            )))
        }
    }

    /// Discover streams
    ///
    /// Discovery is offline, so a config is not required.
    async fn discover(&self) -> Result<()> {
        let catalog = crate::catalog::discover()?;
        self.output(&catalog)
    }

    /// List stream names
    fn streams(&self) -> Result<()> {
        let names: Vec<&str> = StreamKind::ALL.iter().map(|k| k.name()).collect();
        self.output(&json!({ "streams": names }))
    }

    /// Read data
    async fn read(&self, streams: Option<&str>) -> Result<()> {
        let tap = PagerdutyTap::new(self.load_config()?);
        let state = self.load_state()?;

        let mut catalog = self.load_catalog(&tap).await?;
        if let Some(names) = Cli::stream_filter(streams) {
            for name in &names {
                if catalog.get(name).is_none() {
                    warn!("Stream '{}' is not in the catalog; ignoring", name);
                }
            }
            catalog = catalog.filter(&names);
        }

        info!("Syncing streams: {}", catalog.stream_ids().join(", "));

        let sink: Arc<dyn MessageSink> = match self.cli.format {
            OutputFormat::Json => Arc::new(StdoutSink::json()),
            OutputFormat::Pretty => Arc::new(StdoutSink::pretty()),
        };

        let report = tap.read(&catalog, state, sink).await?;
        info!("Sync summary: {}", report.summary());

        if report.is_success() {
            Ok(())
        } else {
            let failed = report.failed_streams();
            Err(Error::stream_failed(
                failed.join(", "),
                format!("{} of {} streams failed", failed.len(), report.outcomes.len()),
            ))
        }
    }

    /// Print a document on stdout in the selected format
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}
