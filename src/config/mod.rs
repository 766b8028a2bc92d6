//! Configuration module for ipt-report
//!
//! This module handles loading, parsing, and validating the TOML file that
//! lists the IPT instances to crawl.
//!
//! # Example
//!
//! ```no_run
//! use ipt_report::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ipts.toml")).unwrap();
//! for source in config.sources() {
//!     println!("{} -> {}", source.alias, source.url);
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, IptEntry, Source};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
