//! Crawler coordinator - fan-out/fan-in over all configured IPTs
//!
//! This module contains the crawl orchestration:
//! - Spawning one fetch task per IPT, with no concurrency cap
//! - Collecting exactly one fetch result per task over a channel
//! - Binding the rows of each result into resources
//! - Assembling the report in arrival order

use crate::config::{Config, Source};
use crate::crawler::{build_http_client, fetch_source, Enricher};
use crate::report::{CrawlOutcome, Report};
use crate::resource::{bind, RawRow};
use crate::state::SourceState;
use crate::IptError;
use reqwest::Client;
use tokio::sync::mpsc;

/// Message sent by a fetch task back to the coordinator
#[derive(Debug)]
pub struct SourceFetch {
    /// Index of the task that produced this message
    pub task_id: usize,
    pub alias: String,
    pub url: String,
    pub result: Result<Vec<RawRow>, IptError>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    sources: Vec<Source>,
    client: Client,
    enricher: Enricher,
}

impl Coordinator {
    /// Creates a new coordinator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(IptError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, IptError> {
        let client = build_http_client(&config.http)?;
        Ok(Self::with_client(config.sources(), client))
    }

    /// Creates a coordinator over explicit sources and client
    pub fn with_client(sources: Vec<Source>, client: Client) -> Self {
        let enricher = Enricher::new(client.clone());
        Self {
            sources,
            client,
            enricher,
        }
    }

    /// Replaces the enricher used while binding rows
    pub fn with_enricher(mut self, enricher: Enricher) -> Self {
        self.enricher = enricher;
        self
    }

    /// Runs the crawl and returns the assembled report
    ///
    /// 1. Spawns one task per source with a non-empty alias
    /// 2. Receives exactly as many results as tasks were spawned
    /// 3. Binds each successful result row by row, dropping rows that fail
    ///
    /// There is no timeout: a task stuck on a hung connection holds the run
    /// until the connection ends. A task that dies without replying is
    /// reported as a failed source once every other task has finished.
    pub async fn run(&self) -> Result<Report, IptError> {
        let (tx, rx) = mpsc::channel(self.sources.len().max(1));

        let mut tasks: Vec<(&Source, SourceState)> = Vec::new();
        for source in self.sources.iter().filter(|s| !s.alias.is_empty()) {
            self.spawn_fetch(tasks.len(), source, tx.clone());
            tasks.push((source, SourceState::Pending));
        }
        // Only the tasks hold senders now, so recv() ends once they all have
        drop(tx);

        tracing::info!("Crawling {} IPTs", tasks.len());
        self.collect(rx, &mut tasks).await
    }

    /// Receives one result per task and reports tasks that never replied
    ///
    /// `tasks` is indexed by `SourceFetch::task_id`. Every entry ends in
    /// `SourceState::Reported` and contributes exactly one outcome.
    async fn collect(
        &self,
        mut rx: mpsc::Receiver<SourceFetch>,
        tasks: &mut [(&Source, SourceState)],
    ) -> Result<Report, IptError> {
        let mut report = Report::new();
        for _ in 0..tasks.len() {
            let Some(fetch) = rx.recv().await else {
                break;
            };
            let state = &mut tasks[fetch.task_id].1;
            let outcome = self.process_fetch(fetch, state).await?;
            report.push(outcome);
        }

        for (source, state) in tasks.iter_mut().filter(|(_, s)| s.is_active()) {
            tracing::error!("{}: fetch task ended without reporting", source.alias);
            *state = state
                .transition(SourceState::Failed)?
                .transition(SourceState::Reported)?;
            report.push(CrawlOutcome::failure(
                &source.alias,
                &source.url,
                "fetch task ended without reporting",
            ));
        }

        Ok(report)
    }

    fn spawn_fetch(&self, task_id: usize, source: &Source, tx: mpsc::Sender<SourceFetch>) {
        let client = self.client.clone();
        let alias = source.alias.clone();
        let url = source.url.clone();

        tokio::spawn(async move {
            tracing::debug!("{}: fetching {}", alias, url);
            let result = fetch_source(&client, &url).await;

            let fetch = SourceFetch {
                task_id,
                alias,
                url,
                result,
            };
            if let Err(e) = tx.send(fetch).await {
                tracing::warn!("{}: coordinator stopped listening", e.0.alias);
            }
        });
    }

    /// Turns one fetch result into a report entry
    ///
    /// Row bind failures are logged and the row is dropped; they never fail
    /// the source.
    async fn process_fetch(
        &self,
        fetch: SourceFetch,
        state: &mut SourceState,
    ) -> Result<CrawlOutcome, IptError> {
        let SourceFetch {
            alias, url, result, ..
        } = fetch;

        let outcome = match result {
            Ok(rows) => {
                *state = state.transition(SourceState::Fetched)?;
                tracing::debug!("{}: {} ({} rows)", alias, state, rows.len());

                let mut resources = Vec::with_capacity(rows.len());
                let mut dropped = 0;
                for (index, row) in rows.iter().enumerate() {
                    match bind(row, &self.enricher).await {
                        Ok(resource) => resources.push(resource),
                        Err(e) => {
                            dropped += 1;
                            tracing::warn!("{}: dropping row {}: {}", alias, index, e);
                        }
                    }
                }

                *state = state.transition(SourceState::Parsed)?;
                tracing::info!(
                    "{}: {} resources ({} rows dropped)",
                    alias,
                    resources.len(),
                    dropped
                );
                CrawlOutcome::success(alias, url, resources, dropped)
            }
            Err(e) => {
                *state = state.transition(SourceState::Failed)?;
                tracing::error!("{}: {}", alias, e);
                CrawlOutcome::failure(alias, url, e)
            }
        };

        *state = state.transition(SourceState::Reported)?;
        Ok(outcome)
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use ipt_report::config::load_config;
/// use ipt_report::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("ipts.toml"))?;
/// let report = run_crawl(&config).await?;
/// println!("{} IPTs reported", report.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<Report, IptError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
