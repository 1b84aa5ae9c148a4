//! The connectivity probe: acquire a connection, run one constant query, release, report.

use crate::error::ProbeError;
use crate::factory::{ConnectionFactory, QueryConnection};
use crate::report;
use crate::utils::fmt_duration;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The only statement the probe ever sends.
pub const PROBE_QUERY: &str = "SELECT 1 AS test_column";

/// One row of [`PROBE_QUERY`]: the integer `test_column`, widened to 64 bits.
pub type ProbeRow = (i64,);

/// Result of a single probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The query ran and returned at least one row.
    Passed { rows: Vec<ProbeRow> },
    /// The query ran but returned nothing.
    Empty,
    Failed(ProbeError),
}

impl ProbeOutcome {
    fn from_fetch(fetched: Result<Vec<ProbeRow>, ProbeError>) -> Self {
        match fetched {
            Ok(rows) if rows.is_empty() => Self::Empty,
            Ok(rows) => Self::Passed { rows },
            Err(e) => Self::Failed(e),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Passed { .. } => "passed",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }

    /// Process exit status for this outcome.
    ///
    /// Without `strict` the status is always 0 and the console report is the
    /// only signal. With `strict`: 0 passed, 1 failed, 2 empty.
    pub fn exit_status(&self, strict: bool) -> u8 {
        if !strict {
            return 0;
        }
        match self {
            Self::Passed { .. } => 0,
            Self::Failed(_) => 1,
            Self::Empty => 2,
        }
    }
}

/// Probes one configuration source through a [`ConnectionFactory`].
///
/// Holds no state between runs; the config source is re-read by the factory
/// every time.
pub struct Probe<F> {
    factory: F,
    config_path: PathBuf,
}

impl<F: ConnectionFactory> Probe<F> {
    pub fn new(factory: F, config_path: impl Into<PathBuf>) -> Self {
        Self {
            factory,
            config_path: config_path.into(),
        }
    }

    /// Acquire, query, release. Never fails; errors become [`ProbeOutcome::Failed`].
    ///
    /// Once a connection is acquired it is closed before returning, whatever
    /// the query did. A failed close is logged and does not change the outcome.
    pub async fn execute(&self) -> ProbeOutcome {
        let start = Instant::now();

        let (mut connection, schema) = match self.factory.connect(&self.config_path).await {
            Ok(acquired) => acquired,
            Err(e) => {
                debug!(error = %e, kind = e.kind(), "connection acquisition failed");
                return ProbeOutcome::Failed(e);
            }
        };
        debug!(schema = %schema, "connection acquired");

        let fetched = connection.fetch_all(PROBE_QUERY).await;

        if let Err(e) = connection.close().await {
            warn!(error = %e, "connection did not close cleanly");
        }

        let outcome = ProbeOutcome::from_fetch(fetched);
        info!(
            outcome = outcome.kind(),
            duration = fmt_duration(start.elapsed()),
            "probe finished"
        );
        outcome
    }

    /// Print the starting message, run [`Probe::execute`], and print the report.
    ///
    /// Only a failure to write to `out` is returned as an error.
    pub async fn run<W: Write>(&self, out: &mut W) -> std::io::Result<ProbeOutcome> {
        report::write_start(out, &self.config_path)?;
        let outcome = self.execute().await;
        report::write_outcome(out, &outcome)?;
        Ok(outcome)
    }
}
