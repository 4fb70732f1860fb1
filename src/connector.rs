//! Connector trait and the PagerDuty tap
//!
//! Defines the check / discover / read surface and implements it for
//! PagerDuty on top of the API client and sync engine.

use crate::api::PagerdutyClient;
use crate::catalog::{self, Catalog};
use crate::config::{TapConfig, REQUIRED_KEYS};
use crate::engine::{SyncConfig, SyncEngine, SyncReport};
use crate::error::Result;
use crate::http::HttpClient;
use crate::output::MessageSink;
use crate::state::StateManager;
use crate::window::{Clock, SystemClock};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// Connector Spec
// ============================================================================

/// Connector specification returned by spec()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorSpec {
    /// Connector name
    pub name: String,

    /// Human-readable title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// JSON schema of the config document
    pub config_schema: Value,
}

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Core trait of an extraction connector
#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns the connector specification
    fn spec(&self) -> ConnectorSpec;

    /// Tests if credentials and configuration are valid
    async fn check(&self) -> Result<CheckResult>;

    /// Lists available streams
    async fn discover(&self) -> Result<Catalog>;

    /// Syncs the catalog's streams, writing messages to `sink`
    async fn read(
        &self,
        catalog: &Catalog,
        state: StateManager,
        sink: Arc<dyn MessageSink>,
    ) -> Result<SyncReport>;
}

// ============================================================================
// PagerDuty Tap
// ============================================================================

/// PagerDuty connector
pub struct PagerdutyTap {
    config: TapConfig,
    clock: Arc<dyn Clock>,
}

impl PagerdutyTap {
    /// Create a tap from a validated config
    pub fn new(config: TapConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to bound incident windows
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The tap's config
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    fn client(&self) -> Result<PagerdutyClient> {
        let http = HttpClient::with_auth(self.config.http_config(), self.config.auth_config())?;
        Ok(PagerdutyClient::new(http))
    }
}

/// Spec shared by every tap instance
pub fn connector_spec() -> ConnectorSpec {
    ConnectorSpec {
        name: env!("CARGO_PKG_NAME").to_string(),
        title: "PagerDuty".to_string(),
        description: Some(env!("CARGO_PKG_DESCRIPTION").to_string()),
        config_schema: json!({
            "type": "object",
            "required": REQUIRED_KEYS,
            "properties": {
                "start_date": {"type": "string", "format": "date"},
                "api_token": {"type": "string", "secret": true},
                "token_type": {"type": "string", "enum": ["token", "bearer"], "default": "token"},
                "base_url": {"type": "string", "format": "uri"},
                "user_agent": {"type": "string"},
                "request_timeout_seconds": {"type": "integer", "minimum": 1, "default": 30},
                "requests_per_second": {"type": "integer", "minimum": 0, "default": 16}
            }
        }),
    }
}

#[async_trait]
impl Connector for PagerdutyTap {
    fn spec(&self) -> ConnectorSpec {
        connector_spec()
    }

    async fn check(&self) -> Result<CheckResult> {
        let client = self.client()?;
        match client.check().await {
            Ok(()) => Ok(CheckResult::success()),
            Err(e) => Ok(CheckResult::failure(e.to_string())),
        }
    }

    async fn discover(&self) -> Result<Catalog> {
        catalog::discover()
    }

    async fn read(
        &self,
        catalog: &Catalog,
        state: StateManager,
        sink: Arc<dyn MessageSink>,
    ) -> Result<SyncReport> {
        let engine = SyncEngine::new(
            self.client()?,
            state,
            sink,
            SyncConfig::new(&self.config.start_date),
        )
        .with_clock(Arc::clone(&self.clock));

        Ok(engine.run(catalog).await)
    }
}
