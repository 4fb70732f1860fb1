//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `check` - Test connection to the API
//! - `discover` - Print the catalog
//! - `read` - Extract data from streams
//! - `streams` - List stream names (lightweight)
//! - `spec` - Print the config specification

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
