//! ipt-report: a consolidated resource report across many IPT instances
//!
//! This crate crawls a configured set of Integrated Publishing Toolkit (IPT)
//! home pages, decodes the resource table each one embeds in its page source,
//! enriches hyperlinked resources with counts scraped from their own pages,
//! and renders everything into a single CSV report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod report;
pub mod resource;
pub mod state;

use thiserror::Error;

/// Main error type for source-scoped and run-scoped failures
#[derive(Debug, Error)]
pub enum IptError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GET {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },

    #[error("No json found at {url}")]
    NoDataLiteral { url: String },

    #[error("Failed to decode data table at {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::SourceState,
        to: state::SourceState,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Row-scoped errors raised while binding a raw table row into a resource
///
/// A bind error drops the offending row; the rest of the source still
/// processes.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("Row has {found} fields, expected at least {expected}")]
    FieldCount { found: usize, expected: usize },

    #[error("Invalid {field} count '{value}': {source}")]
    InvalidCount {
        field: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("Invalid {field} date '{value}': {source}")]
    InvalidDate {
        field: &'static str,
        value: String,
        source: chrono::ParseError,
    },

    #[error("Enrichment failed: {0}")]
    Enrichment(#[source] Box<IptError>),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for ipt-report operations
pub type Result<T> = std::result::Result<T, IptError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for row binding
pub type BindResult<T> = std::result::Result<T, BindError>;

// Re-export commonly used types
pub use config::Config;
pub use report::{CrawlOutcome, Report};
pub use resource::{RawRow, Resource};
pub use state::SourceState;
