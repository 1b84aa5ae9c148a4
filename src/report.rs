//! Console rendering of probe progress and outcome.

use crate::probe::{ProbeOutcome, ProbeRow};
use std::io::{self, Write};
use std::path::Path;
use yansi::Paint;

pub const SUCCESS_TEXT: &str = "Connection and query test passed.";
pub const EMPTY_TEXT: &str = "Query executed but returned no rows.";
pub const FAILURE_PREFIX: &str = "Connection test failed:";

pub fn write_start<W: Write>(out: &mut W, config_path: &Path) -> io::Result<()> {
    writeln!(
        out,
        "{} Testing connection using {}...",
        "..".cyan(),
        config_path.display()
    )
}

pub fn write_outcome<W: Write>(out: &mut W, outcome: &ProbeOutcome) -> io::Result<()> {
    match outcome {
        ProbeOutcome::Passed { rows } => {
            writeln!(
                out,
                "{} Query ran successfully. Result: {}",
                "ok".green().bold(),
                format_rows(rows)
            )?;
            writeln!(out, "{} {SUCCESS_TEXT}", "ok".green().bold())
        }
        ProbeOutcome::Empty => writeln!(out, "{} {EMPTY_TEXT}", "warn".yellow().bold()),
        ProbeOutcome::Failed(e) => {
            writeln!(out, "{} {FAILURE_PREFIX} {e}", "fail".red().bold())
        }
    }
}

/// `[(1,)]` for a single row holding `1`.
pub fn format_rows(rows: &[ProbeRow]) -> String {
    format!("{rows:?}")
}
