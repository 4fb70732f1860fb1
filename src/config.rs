//! Tap configuration
//!
//! The config document holds the credentials and the backfill start date.
//! It is read from JSON (or YAML, by file extension) and validated once
//! before any request is made.

use crate::auth::{AuthConfig, TokenType};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::OptionStringExt;
use crate::window::parse_start_date;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Keys that must be present and non-empty
pub const REQUIRED_KEYS: [&str; 2] = ["start_date", "api_token"];

/// Validated tap configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct TapConfig {
    /// Earliest incident date when no bookmark exists (`YYYY-MM-DD`)
    pub start_date: String,

    /// PagerDuty API token
    pub api_token: String,

    /// How the token is sent
    #[serde(default)]
    pub token_type: TokenType,

    /// API endpoint override
    #[serde(default)]
    pub base_url: Option<String>,

    /// User-Agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,

    /// Client-side request pacing; 0 disables it
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl TapConfig {
    /// Validate and convert a raw config document
    pub fn from_value(value: Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::config("config must be a JSON object"))?;

        for key in REQUIRED_KEYS {
            let present = obj
                .get(key)
                .and_then(Value::as_str)
                .map(ToString::to_string)
                .none_if_empty()
                .is_some();
            if !present {
                return Err(Error::missing_field(key));
            }
        }

        let config: TapConfig = serde_json::from_value(value)
            .map_err(|e| Error::config(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load config from a file; `.yaml`/`.yml` files are read as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;

        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        if is_yaml {
            let value: Value = serde_yaml::from_str(&content)?;
            Self::from_value(value)
        } else {
            Self::from_json(&content)
        }
    }

    fn validate(&self) -> Result<()> {
        parse_start_date(&self.start_date)
            .map_err(|e| Error::invalid_value("start_date", e.to_string()))?;

        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url)
                .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        }

        if self.request_timeout_seconds == Some(0) {
            return Err(Error::invalid_value(
                "request_timeout_seconds",
                "must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Credentials for the HTTP client
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::from_token(self.token_type, &self.api_token)
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder();

        if let Some(base_url) = self.base_url.clone().none_if_empty() {
            builder = builder.base_url(base_url);
        }
        if let Some(agent) = self.user_agent.clone().none_if_empty() {
            builder = builder.user_agent(agent);
        }
        if let Some(secs) = self.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder = match self.requests_per_second {
            Some(0) => builder.no_rate_limit(),
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)),
            None => builder,
        };

        builder.build()
    }
}

// The token never reaches logs.
impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("start_date", &self.start_date)
            .field("api_token", &"[redacted]")
            .field("token_type", &self.token_type)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("requests_per_second", &self.requests_per_second)
            .finish()
    }
}
