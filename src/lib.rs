// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # PagerDuty tap
//!
//! Extracts incidents, alerts, escalation policies, services, teams, users
//! and vendors from the PagerDuty REST API as a stream of SCHEMA, RECORD
//! and STATE messages.
//!
//! ## Features
//!
//! - **Incremental incidents**: a `since` bookmark resumes where the last run stopped
//! - **Windowed backfill**: long ranges are split into bounded query windows
//! - **Concurrent streams**: one task per stream, alerts fed by the incidents task
//! - **Offline discovery**: schemas are embedded in the binary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tap_pagerduty::connector::{Connector, PagerdutyTap};
//! use tap_pagerduty::config::TapConfig;
//! use tap_pagerduty::output::StdoutSink;
//! use tap_pagerduty::state::StateManager;
//!
//! #[tokio::main]
//! async fn main() -> tap_pagerduty::Result<()> {
//!     let config = TapConfig::from_file("config.json")?;
//!     let tap = PagerdutyTap::new(config);
//!
//!     let catalog = tap.discover().await?;
//!     let state = StateManager::from_file("state.json")?;
//!     let report = tap.read(&catalog, state, Arc::new(StdoutSink::json())).await?;
//!
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Connector Interface                     │
//! │   check() → CheckResult   discover() → Catalog   read()      │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬──────────┬───────┴──────┬──────────┬─────────────┐
//! │  Engine  │   API    │    Window    │  State   │   Output    │
//! ├──────────┼──────────┼──────────────┼──────────┼─────────────┤
//! │ Tasks    │ Fetch-all│ Calendar gap │ Bookmarks│ SCHEMA      │
//! │ Alerts ← │ Windowed │ 152-day span │ Atomic   │ RECORD      │
//! │ Report   │ Check    │ Clock        │ commit   │ STATE       │
//! └──────────┴──────────┴──────────────┴──────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Offset pagination
pub mod pagination;

/// Incident time windows
pub mod window;

/// Stream registry
pub mod streams;

/// PagerDuty API client
pub mod api;

/// Bookmark state
pub mod state;

/// Schemas and discovery
pub mod catalog;

/// Message output
pub mod output;

/// Sync engine
pub mod engine;

/// Tap configuration
pub mod config;

/// Connector trait and the PagerDuty tap
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use connector::{Connector, PagerdutyTap};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
