//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PagerDuty tap CLI
#[derive(Parser, Debug)]
#[command(name = "tap-pagerduty")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON); updated in place as bookmarks advance
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON; replaces the contents of --state as the starting point
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Catalog file (JSON); defaults to the discovered catalog
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test connection to the API
    Check,

    /// Print the catalog of available streams
    Discover,

    /// Read data from streams
    Read {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,
    },

    /// List available stream names
    Streams,

    /// Show connector specification
    Spec,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

impl Cli {
    /// Stream names given to `read --streams`
    pub fn stream_filter(streams: Option<&str>) -> Option<Vec<String>> {
        let names: Vec<String> = streams?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();
        (!names.is_empty()).then_some(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_read() {
        let cli = Cli::parse_from([
            "tap-pagerduty",
            "-C",
            "config.json",
            "--state",
            "state.json",
            "read",
            "--streams",
            "incidents,alerts",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        assert_eq!(cli.state, Some(PathBuf::from("state.json")));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Read { streams } => assert_eq!(streams.as_deref(), Some("incidents,alerts")),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tap-pagerduty", "discover", "-f", "pretty", "-v"]);
        assert!(matches!(cli.command, Commands::Discover));
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(cli.verbose);
    }

    #[test]
    fn test_stream_filter() {
        assert_eq!(Cli::stream_filter(None), None);
        assert_eq!(Cli::stream_filter(Some(" , ")), None);
        assert_eq!(
            Cli::stream_filter(Some("incidents, teams")),
            Some(vec!["incidents".to_string(), "teams".to_string()])
        );
    }
}
