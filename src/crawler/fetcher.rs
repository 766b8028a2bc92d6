//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client from configuration
//! - GET requests for IPT home pages and resource pages
//! - Locating and decoding the resource table embedded in a home page
//!
//! There is no retry logic: every failure is reported once, scoped to the
//! source (or row) that caused it.

use crate::config::HttpConfig;
use crate::crawler::normalize::escape_json;
use crate::resource::RawRow;
use crate::IptError;
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;

// First `var aDataSet = [...];` assignment, shortest match across lines
static DATA_SET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)var aDataSet = (\[.*?\]);").expect("hardcoded regex pattern is valid")
});

/// Builds an HTTP client from configuration
///
/// Timeouts are only applied when configured; by default a request waits as
/// long as the server keeps the connection open. Redirects follow the
/// client's default policy.
///
/// # Example
///
/// ```no_run
/// use ipt_report::config::HttpConfig;
/// use ipt_report::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().gzip(true).brotli(true);

    if let Some(agent) = &config.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// Fetches a page and returns its body as text
///
/// The HTTP status is not inspected: an error page is returned like any
/// other body and fails later, when the expected content is not found.
///
/// # Errors
///
/// | Condition | Error |
/// |-----------|-------|
/// | Connection refused, DNS failure, TLS error, timeout | `IptError::Http` |
/// | Body could not be read or decoded | `IptError::Body` |
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, IptError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| IptError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!("GET {} returned HTTP {}", url, status.as_u16());
    }

    response.text().await.map_err(|source| IptError::Body {
        url: url.to_string(),
        source,
    })
}

/// Finds the resource table literal in an IPT home page
///
/// Returns the array literal including its brackets, or `None` if the page
/// carries no `var aDataSet = [...];` assignment.
pub fn extract_data_literal(body: &str) -> Option<&str> {
    DATA_SET_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Normalizes and decodes a resource table literal
pub fn decode_rows(literal: &str, url: &str) -> Result<Vec<RawRow>, IptError> {
    serde_json::from_str(&escape_json(literal)).map_err(|source| IptError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Fetches an IPT home page and returns its raw resource rows
///
/// # Request Flow
///
/// 1. GET the home page and read the body
/// 2. Locate the `var aDataSet = [...];` literal
/// 3. Normalize the literal into JSON and decode it
///
/// A source either yields all of its rows or an error; there is no partial
/// result.
pub async fn fetch_source(client: &Client, url: &str) -> Result<Vec<RawRow>, IptError> {
    let body = fetch_page(client, url).await?;

    let literal = extract_data_literal(&body).ok_or_else(|| IptError::NoDataLiteral {
        url: url.to_string(),
    })?;

    let rows = decode_rows(literal, url)?;
    tracing::debug!("Decoded {} rows from {}", rows.len(), url);

    Ok(rows)
}
