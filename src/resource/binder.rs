//! Binds raw table rows into [`Resource`] records
//!
//! Extraction of the HTML fragments is lenient: a missing logo, name or link
//! leaves the field empty. Counts and dates are strict: a malformed value
//! fails the whole row.

use crate::crawler::Enricher;
use crate::resource::Resource;
use crate::{BindError, BindResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

/// Number of positional fields a row must carry
pub const ROW_FIELDS: usize = 11;

/// Marker an IPT uses for an empty date cell
const NO_DATE: &str = "--";

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static LOGO_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src\s*=\s*"([^"]+)"#).expect("hardcoded regex pattern is valid"));

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<if>([^<]+)").expect("hardcoded regex pattern is valid"));

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*"([^"]+)"#).expect("hardcoded regex pattern is valid"));

// Counts rendered as a link to the resource page, e.g. `<a href="...">4,019</a>`
static LINKED_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+?>([^<]+).+").expect("hardcoded regex pattern is valid"));

/// Binds one raw row into a resource
///
/// # Occurrence Cell
///
/// | Cell shape | Action |
/// |------------|--------|
/// | `...>4,019</a>` | parse `4019`, then enrich from the resource page |
/// | `3,537,502` | parse `3537502`, no enrichment |
/// | anything else | `BindError::InvalidCount` |
///
/// Enrichment runs before the dates are parsed, so a row with a linked count
/// and a malformed date still costs one request.
///
/// # Arguments
///
/// * `row` - The raw row, at least [`ROW_FIELDS`] long
/// * `enricher` - Used only for tag-wrapped occurrence cells
///
/// # Returns
///
/// * `Ok(Resource)` - Fully bound resource
/// * `Err(BindError)` - The row must be dropped
pub async fn bind(row: &[String], enricher: &Enricher) -> BindResult<Resource> {
    if row.len() < ROW_FIELDS {
        return Err(BindError::FieldCount {
            found: row.len(),
            expected: ROW_FIELDS,
        });
    }

    let mut resource = Resource {
        logo: first_capture(&LOGO_REGEX, &row[0]),
        name: first_capture(&NAME_REGEX, &row[1]),
        link: first_capture(&LINK_REGEX, &row[1]),
        organization: row[2].clone(),
        resource_type: row[3].clone(),
        subtype: row[4].clone(),
        ..Resource::default()
    };

    let linked_count = LINKED_COUNT_REGEX
        .captures(&row[5])
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    match linked_count {
        Some(count) => {
            resource.occurrences = parse_count("occurrences", count)?;
            enricher
                .enrich(&mut resource)
                .await
                .map_err(|e| BindError::Enrichment(Box::new(e)))?;
        }
        None => {
            resource.occurrences = parse_count("occurrences", &row[5])?;
        }
    }

    resource.last_modified = parse_date("last modified", &row[6])?;
    resource.last_publication = parse_date("last publication", &row[7])?;
    resource.next_publication = parse_datetime("next publication", &row[8])?;

    resource.author = row[9].clone();
    resource.visibility = row[10].clone();

    Ok(resource)
}

/// Parses a thousands-separated count such as `3,537,502`
pub fn parse_count(field: &'static str, value: &str) -> BindResult<u64> {
    value
        .replace(',', "")
        .parse::<u64>()
        .map_err(|source| BindError::InvalidCount {
            field,
            value: value.to_string(),
            source,
        })
}

/// Parses a `YYYY-MM-DD` cell, `--` meaning absent
pub fn parse_date(field: &'static str, value: &str) -> BindResult<Option<NaiveDateTime>> {
    if value == NO_DATE {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| Some(date.and_time(NaiveTime::MIN)))
        .map_err(|source| BindError::InvalidDate {
            field,
            value: value.to_string(),
            source,
        })
}

/// Parses a `YYYY-MM-DD HH:MM:SS` cell, `--` meaning absent
pub fn parse_datetime(field: &'static str, value: &str) -> BindResult<Option<NaiveDateTime>> {
    if value == NO_DATE {
        return Ok(None);
    }

    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map(Some)
        .map_err(|source| BindError::InvalidDate {
            field,
            value: value.to_string(),
            source,
        })
}

fn first_capture(regex: &Regex, haystack: &str) -> String {
    regex
        .captures(haystack)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}
