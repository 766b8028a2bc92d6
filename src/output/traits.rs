//! Output sink trait and error types
//!
//! A sink consumes a finished [`Report`] one outcome at a time.

use crate::report::{CrawlOutcome, Report};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for report sinks
///
/// Sinks receive outcomes in report order and are finished exactly once.
pub trait ReportSink {
    /// Records one IPT outcome
    fn write_outcome(&mut self, outcome: &CrawlOutcome) -> OutputResult<()>;

    /// Flushes anything buffered
    fn finish(&mut self) -> OutputResult<()>;

    /// Writes every outcome of a report, then finishes
    fn write_report(&mut self, report: &Report) -> OutputResult<()> {
        for outcome in report {
            self.write_outcome(outcome)?;
        }
        self.finish()
    }
}
