//! Crawl results, one outcome per IPT
//!
//! A [`Report`] is assembled by the coordinator in the order outcomes arrive
//! and is only read afterwards, by the CSV writer and the statistics.

use crate::resource::Resource;

/// Result of crawling one IPT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    /// Alias from the configuration file
    pub alias: String,

    /// Home page that was fetched
    pub url: String,

    /// Successfully bound resources, empty on failure
    pub resources: Vec<Resource>,

    /// Source-level error message, `None` on success
    pub error: Option<String>,

    /// Rows decoded from the home page
    pub rows_received: usize,

    /// Rows that failed to bind and were left out
    pub rows_dropped: usize,
}

impl CrawlOutcome {
    /// Creates a successful outcome
    pub fn success(
        alias: impl Into<String>,
        url: impl Into<String>,
        resources: Vec<Resource>,
        rows_dropped: usize,
    ) -> Self {
        Self {
            alias: alias.into(),
            url: url.into(),
            rows_received: resources.len() + rows_dropped,
            resources,
            error: None,
            rows_dropped,
        }
    }

    /// Creates a failed outcome carrying the error message
    pub fn failure(alias: impl Into<String>, url: impl Into<String>, error: impl ToString) -> Self {
        Self {
            alias: alias.into(),
            url: url.into(),
            resources: Vec::new(),
            error: Some(error.to_string()),
            rows_received: 0,
            rows_dropped: 0,
        }
    }

    /// Returns true if the source was fetched and decoded
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// All crawl outcomes, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    outcomes: Vec<CrawlOutcome>,
}

impl Report {
    /// Creates an empty report
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: CrawlOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[CrawlOutcome] {
        &self.outcomes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CrawlOutcome> {
        self.outcomes.iter()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Looks up the outcome for an alias
    pub fn get(&self, alias: &str) -> Option<&CrawlOutcome> {
        self.outcomes.iter().find(|outcome| outcome.alias == alias)
    }
}

impl FromIterator<CrawlOutcome> for Report {
    fn from_iter<I: IntoIterator<Item = CrawlOutcome>>(iter: I) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a CrawlOutcome;
    type IntoIter = std::slice::Iter<'a, CrawlOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
