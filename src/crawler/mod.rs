//! Crawler module for IPT fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of IPT home pages and resource pages
//! - Repair and decoding of the embedded resource table
//! - Count extraction from resource pages
//! - Overall crawl coordination

mod coordinator;
mod enricher;
mod fetcher;
mod normalize;
mod parser;

pub use coordinator::{run_crawl, Coordinator, SourceFetch};
pub use enricher::Enricher;
pub use fetcher::{
    build_http_client, decode_rows, extract_data_literal, fetch_page, fetch_source,
};
pub use normalize::escape_json;
pub use parser::{CountExtractor, PartialCounts, SummaryListExtractor};

use crate::config::Config;
use crate::report::Report;
use crate::IptError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client
/// 2. Fetch every configured IPT concurrently
/// 3. Bind and enrich the resource rows
/// 4. Return the report, one outcome per IPT
pub async fn crawl(config: &Config) -> Result<Report, IptError> {
    run_crawl(config).await
}
