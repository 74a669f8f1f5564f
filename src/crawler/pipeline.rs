//! Pipeline driver - crawl orchestration
//!
//! A run moves through three states and never goes back:
//!
//! 1. `Discovering`: the seed page is fetched and its product links collected
//! 2. `Extracting`: one extractor task is launched per link, paced by a fixed
//!    delay and capped by a worker semaphore
//! 3. `Draining`: every launched task is joined, then the aggregated records
//!    are handed to the output sink
//!
//! Only the aggregator is shared between tasks. Records reach the sink in
//! completion order, not discovery order.

use crate::config::Config;
use crate::crawler::aggregator::Aggregator;
use crate::crawler::discoverer::LinkDiscoverer;
use crate::crawler::extractor::{ProductExtractor, ProductSelectors};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::record::{LinkSet, ProductRecord};
use crate::output::RecordSink;
use crate::HarvestError;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Phase of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Discovering,
    Extracting,
    Draining,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovering => "discovering",
            Self::Extracting => "extracting",
            Self::Draining => "draining",
        };
        f.write_str(name)
    }
}

/// What one extractor task did with its URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskOutcome {
    /// Record passed the presence filter and was appended
    Kept,
    /// Page fetched but no name, price or rating found
    Dropped,
    /// Page could not be fetched
    Failed,
}

/// Counts from one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Seed page that was visited
    pub seed_url: String,
    /// Links found on the seed page
    pub links_discovered: usize,
    /// Extractor tasks launched
    pub tasks_launched: usize,
    /// Extractor tasks joined at the barrier (including failed ones)
    pub tasks_completed: usize,
    /// Records handed to the sink
    pub records_collected: usize,
    /// Pages fetched that had no name, price or rating
    pub records_dropped: usize,
    /// Pages that could not be fetched, or whose task panicked
    pub pages_failed: usize,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

/// Two-stage crawl: discover links, then extract every product page
pub struct Pipeline {
    discoverer: LinkDiscoverer,
    extractor: ProductExtractor,
    launch_delay: Duration,
    max_concurrent: usize,
    state: PipelineState,
}

impl Pipeline {
    /// Builds a pipeline from a validated configuration
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = Arc::new(Fetcher::new(&config.crawler, &config.headers)?);
        let discoverer =
            LinkDiscoverer::new(Arc::clone(&fetcher), &config.crawler, &config.selectors)?;
        let extractor =
            ProductExtractor::new(fetcher, ProductSelectors::compile(&config.selectors)?);

        Ok(Self {
            discoverer,
            extractor,
            launch_delay: Duration::from_millis(config.crawler.launch_delay_ms),
            max_concurrent: config.crawler.max_concurrent_extractors.max(1) as usize,
            state: PipelineState::Discovering,
        })
    }

    /// Current phase
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs discovery and extraction, then writes the records to `sink`
    ///
    /// Page-level failures never fail the run. The only error is a sink that
    /// cannot be written, which is logged and returned.
    pub async fn run(
        &mut self,
        seed_url: &str,
        sink: &mut dyn RecordSink,
    ) -> Result<PipelineReport, HarvestError> {
        let (records, report) = self.collect(seed_url).await;

        if let Err(e) = sink.write_records(&records) {
            tracing::error!("Failed to write {}: {}", sink.describe(), e);
            return Err(e.into());
        }

        tracing::info!("Wrote {} records to {}", records.len(), sink.describe());
        Ok(report)
    }

    /// Runs discovery and extraction and returns the aggregated records
    pub async fn collect(&mut self, seed_url: &str) -> (Vec<ProductRecord>, PipelineReport) {
        let start = Instant::now();
        self.transition(PipelineState::Discovering);

        let links = self.discoverer.discover(seed_url).await;
        let mut report = PipelineReport {
            seed_url: self.discoverer.resolve_seed_url(seed_url).to_string(),
            links_discovered: links.len(),
            ..PipelineReport::default()
        };

        self.transition(PipelineState::Extracting);
        let aggregator = Arc::new(Aggregator::new());
        let mut tasks = self.launch_extractors(links, &aggregator, &mut report).await;

        self.transition(PipelineState::Draining);
        while let Some(joined) = tasks.join_next().await {
            report.tasks_completed += 1;
            match joined {
                Ok(TaskOutcome::Kept) => {}
                Ok(TaskOutcome::Dropped) => report.records_dropped += 1,
                Ok(TaskOutcome::Failed) => report.pages_failed += 1,
                Err(e) => {
                    tracing::error!("Extractor task failed: {}", e);
                    report.pages_failed += 1;
                }
            }
        }

        let records = aggregator.snapshot();
        report.records_collected = records.len();
        report.elapsed = start.elapsed();

        tracing::info!(
            "Extraction complete: {}/{} tasks finished, {} records kept, {} dropped, {} failed in {:?}",
            report.tasks_completed,
            report.tasks_launched,
            report.records_collected,
            report.records_dropped,
            report.pages_failed,
            report.elapsed
        );

        (records, report)
    }

    /// Launches one extractor task per link, in link order
    async fn launch_extractors(
        &self,
        links: LinkSet,
        aggregator: &Arc<Aggregator>,
        report: &mut PipelineReport,
    ) -> JoinSet<TaskOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for (index, url) in links.into_iter().enumerate() {
            tokio::time::sleep(self.launch_delay).await;

            // Blocks here while the pool is full.
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Worker pool closed, stopping launches: {}", e);
                    break;
                }
            };

            let extractor = self.extractor.clone();
            let aggregator = Arc::clone(aggregator);
            let number = index + 1;

            tasks.spawn(async move {
                let _permit = permit;
                let outcome = match extractor.extract(&url).await {
                    Some(record) => {
                        if aggregator.append(record) {
                            TaskOutcome::Kept
                        } else {
                            tracing::debug!("No product fields found on {}", url);
                            TaskOutcome::Dropped
                        }
                    }
                    None => TaskOutcome::Failed,
                };
                tracing::info!("Scraping of link {} completed", number);
                outcome
            });
            report.tasks_launched += 1;
        }

        tasks
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!("Pipeline {} -> {}", self.state, next);
        self.state = next;
    }
}
