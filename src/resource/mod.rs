//! Resource records and the binder that builds them from raw table rows
//!
//! Every IPT home page embeds a table of published resources. Each row of
//! that table arrives as a [`RawRow`] and is bound into a [`Resource`].

mod binder;

pub use binder::{bind, parse_count, parse_date, parse_datetime, ROW_FIELDS};

use chrono::NaiveDateTime;

/// One row of the embedded resource table, positionally defined
///
/// | Index | Content |
/// |-------|---------|
/// | 0 | logo `<img>` fragment |
/// | 1 | name/link `<a>` fragment |
/// | 2 | organization |
/// | 3 | type |
/// | 4 | subtype |
/// | 5 | occurrence cell, plain or tag-wrapped number |
/// | 6 | last modified date or `--` |
/// | 7 | last publication date or `--` |
/// | 8 | next publication date-time or `--` |
/// | 9 | author |
/// | 10 | visibility |
pub type RawRow = Vec<String>;

/// A published resource as listed by one IPT
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub logo: String,
    pub name: String,
    pub link: String,
    pub organization: String,
    pub resource_type: String,
    pub subtype: String,

    pub events: u64,
    pub measurements: u64,
    pub occurrences: u64,

    /// `None` when the IPT lists `--`
    pub last_modified: Option<NaiveDateTime>,
    pub last_publication: Option<NaiveDateTime>,
    pub next_publication: Option<NaiveDateTime>,

    pub author: String,
    pub visibility: String,
}
