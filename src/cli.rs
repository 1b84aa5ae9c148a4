//! Command-line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Check that a SQL query service is reachable by running `SELECT 1 AS test_column`
#[derive(Parser, Debug)]
#[command(name = "queryprobe", version, long_about = None)]
pub struct Args {
    /// JSON connection config handed to the connection factory
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = TracingFormat::default())]
    pub tracing: TracingFormat,

    /// Exit non-zero when the probe does not pass (1 failed, 2 empty result)
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TracingFormat {
    /// Human-readable, compact lines
    Pretty,
    /// One JSON object per event
    Json,
}

impl Default for TracingFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}
