//! CSV rendering of a crawl report
//!
//! Every row carries the same sixteen columns. A failed IPT produces a
//! single row with only the IPT and Error columns set; a successful one
//! produces one row per resource.

use crate::output::traits::{OutputError, OutputResult, ReportSink};
use crate::report::{CrawlOutcome, Report};
use crate::resource::Resource;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Column headers, in output order
pub const COLUMNS: [&str; 16] = [
    "IPT",
    "Resource Name",
    "Link",
    "Logo",
    "Organization",
    "Type",
    "Subtype",
    "Events",
    "Measurements",
    "Occurrences",
    "LastModified",
    "LastPublication",
    "NextPublication",
    "Visibility",
    "Author",
    "Error",
];

const ERROR_COLUMN: usize = 15;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S +0000 UTC";

/// One rendered CSV line
pub type CsvRow = [String; 16];

/// Writes a report as CSV to any writer
pub struct CsvReportWriter<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvReportWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            header_written: false,
        }
    }

    /// Finishes writing and returns the underlying writer
    pub fn into_inner(mut self) -> OutputResult<W> {
        self.finish()?;
        self.writer
            .into_inner()
            .map_err(|e| OutputError::Write(e.to_string()))
    }

    fn ensure_header(&mut self) -> OutputResult<()> {
        if !self.header_written {
            self.writer.write_record(COLUMNS)?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> ReportSink for CsvReportWriter<W> {
    fn write_outcome(&mut self, outcome: &CrawlOutcome) -> OutputResult<()> {
        self.ensure_header()?;
        for row in outcome_rows(outcome) {
            self.writer.write_record(&row)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.ensure_header()?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Renders the rows for one outcome
///
/// A successful IPT without resources renders no rows at all.
pub fn outcome_rows(outcome: &CrawlOutcome) -> Vec<CsvRow> {
    match &outcome.error {
        Some(error) => {
            let mut row = CsvRow::default();
            row[0] = outcome.alias.clone();
            row[ERROR_COLUMN] = error.clone();
            vec![row]
        }
        None => outcome
            .resources
            .iter()
            .map(|resource| resource_row(&outcome.alias, resource))
            .collect(),
    }
}

fn resource_row(alias: &str, resource: &Resource) -> CsvRow {
    [
        alias.to_string(),
        resource.name.clone(),
        resource.link.clone(),
        resource.logo.clone(),
        resource.organization.clone(),
        resource.resource_type.clone(),
        resource.subtype.clone(),
        resource.events.to_string(),
        resource.measurements.to_string(),
        resource.occurrences.to_string(),
        render_timestamp(resource.last_modified),
        render_timestamp(resource.last_publication),
        render_next_publication(resource.next_publication),
        resource.visibility.clone(),
        resource.author.clone(),
        String::new(),
    ]
}

/// Renders a timestamp, empty when absent
pub fn render_timestamp(timestamp: Option<NaiveDateTime>) -> String {
    timestamp
        .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

/// Renders the next publication, empty unless after `0001-01-01 00:00:00`
pub fn render_next_publication(timestamp: Option<NaiveDateTime>) -> String {
    render_timestamp(timestamp.filter(|t| Some(*t) > zero_instant()))
}

fn zero_instant() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Writes a report to a file
pub fn write_report_to_path(report: &Report, path: &Path) -> OutputResult<()> {
    let file = File::create(path)?;
    let mut sink = CsvReportWriter::new(file);
    sink.write_report(report)
}

/// Writes a report to standard output
pub fn write_report_to_stdout(report: &Report) -> OutputResult<()> {
    let stdout = io::stdout();
    let mut sink = CsvReportWriter::new(stdout.lock());
    sink.write_report(report)
}
