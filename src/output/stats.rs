//! Statistics over a finished crawl report
//!
//! This module summarizes a [`Report`] for the log: how many IPTs answered,
//! how many resources were bound and how many rows had to be dropped.

use crate::report::Report;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of IPTs in the report
    pub total_sources: u64,

    /// IPTs whose table was fetched and decoded
    pub sources_succeeded: u64,

    /// IPTs that failed as a whole
    pub sources_failed: u64,

    /// Rows decoded across all IPTs
    pub rows_received: u64,

    /// Rows bound into resources
    pub resources_bound: u64,

    /// Rows dropped because they failed to bind
    pub rows_dropped: u64,

    /// Sum of occurrence counts over all resources
    pub total_occurrences: u64,

    /// Resource count per resource type
    pub resources_by_type: BTreeMap<String, u64>,

    /// Failing aliases with their error message
    pub failed_sources: Vec<(String, String)>,
}

impl CrawlStatistics {
    /// Computes statistics for a report
    pub fn from_report(report: &Report) -> Self {
        let mut stats = Self::default();

        for outcome in report {
            stats.total_sources += 1;

            match &outcome.error {
                Some(error) => {
                    stats.sources_failed += 1;
                    stats
                        .failed_sources
                        .push((outcome.alias.clone(), error.clone()));
                }
                None => {
                    stats.sources_succeeded += 1;
                    stats.rows_received += outcome.rows_received as u64;
                    stats.rows_dropped += outcome.rows_dropped as u64;
                    stats.resources_bound += outcome.resources.len() as u64;

                    for resource in &outcome.resources {
                        stats.total_occurrences += resource.occurrences;
                        *stats
                            .resources_by_type
                            .entry(resource.resource_type.clone())
                            .or_insert(0) += 1;
                    }
                }
            }
        }

        stats
    }

    /// Returns the share of IPTs that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_sources == 0 {
            return 0.0;
        }
        (self.sources_succeeded as f64 / self.total_sources as f64) * 100.0
    }
}

/// Logs statistics through `tracing`
///
/// Standard output may carry the CSV report, so nothing is printed there.
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "IPTs: {} total, {} succeeded, {} failed ({:.1}% success)",
        stats.total_sources,
        stats.sources_succeeded,
        stats.sources_failed,
        stats.success_rate()
    );
    tracing::info!(
        "Rows: {} received, {} bound, {} dropped",
        stats.rows_received,
        stats.resources_bound,
        stats.rows_dropped
    );
    tracing::info!("Occurrences listed: {}", stats.total_occurrences);

    for (resource_type, count) in &stats.resources_by_type {
        tracing::debug!("  {}: {} resources", resource_type, count);
    }

    for (alias, error) in &stats.failed_sources {
        tracing::warn!("Failed IPT {}: {}", alias, error);
    }
}
