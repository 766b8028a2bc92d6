//! Output module for rendering crawl reports
//!
//! This module handles:
//! - Rendering the report as fixed-column CSV
//! - Summarizing crawl statistics for the log

mod csv_report;
pub mod stats;
mod traits;

pub use csv_report::{
    outcome_rows, render_next_publication, render_timestamp, write_report_to_path,
    write_report_to_stdout, CsvReportWriter, CsvRow, COLUMNS,
};
pub use stats::{log_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, ReportSink};
