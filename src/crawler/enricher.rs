//! Resource enrichment: precise counts from a resource's own page
//!
//! IPT home pages only show a rounded or linked occurrence figure for some
//! resources. For those, the binder asks the [`Enricher`] to fetch the
//! resource page and read the event, measurement and occurrence counts.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::{CountExtractor, SummaryListExtractor};
use crate::resource::Resource;
use crate::IptError;
use reqwest::Client;
use std::sync::Arc;

/// Fetches resource pages and applies the counts they list
#[derive(Clone)]
pub struct Enricher {
    client: Client,
    extractor: Arc<dyn CountExtractor>,
}

impl Enricher {
    /// Creates an enricher reading the standard IPT summary list
    pub fn new(client: Client) -> Self {
        Self::with_extractor(client, Arc::new(SummaryListExtractor))
    }

    /// Creates an enricher with a custom page extractor
    pub fn with_extractor(client: Client, extractor: Arc<dyn CountExtractor>) -> Self {
        Self { client, extractor }
    }

    /// Fetches `resource.link` and overwrites the counts found there
    ///
    /// Counts the page does not list, or lists unreadably, keep their
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched or read. The resource
    /// is left untouched in that case.
    pub async fn enrich(&self, resource: &mut Resource) -> Result<(), IptError> {
        let body = fetch_page(&self.client, &resource.link).await?;

        let counts = self.extractor.extract_counts(&body);
        if counts.is_empty() {
            tracing::debug!("No counts found on resource page {}", resource.link);
        }
        counts.apply_to(resource);

        Ok(())
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher").finish_non_exhaustive()
    }
}
