//! State module for tracking per-source crawl progress
//!
//! # Components
//!
//! - `SourceState`: lifecycle of one IPT through fetch, parse and report

mod source_state;

pub use source_state::SourceState;
