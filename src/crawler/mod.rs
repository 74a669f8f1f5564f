//! Crawler module for product discovery and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with header rotation and a single allowed domain
//! - Seed page link discovery
//! - Product page field extraction
//! - Concurrent aggregation and overall pipeline coordination

mod aggregator;
mod discoverer;
mod extractor;
mod fetcher;
mod pipeline;
mod record;
mod user_agent;

pub use aggregator::Aggregator;
pub use discoverer::{extract_listing_links, LinkDiscoverer};
pub use extractor::{
    clean, clean_price, clean_product_name, clean_total_ratings, extract_product,
    strip_ratings_suffix, strip_thousands_separators, ProductExtractor, ProductSelectors,
};
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use pipeline::{Pipeline, PipelineReport, PipelineState};
pub use record::{LinkSet, ProductRecord};
pub use user_agent::{UserAgentRotator, DEFAULT_USER_AGENTS};

use crate::config::Config;
use crate::output::CsvSink;
use crate::HarvestError;

/// Runs a complete crawl and writes the CSV configured in `output.csv-path`
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client and pipeline
/// 2. Discover product links on `seed_url`
/// 3. Extract every product page concurrently
/// 4. Write the aggregated records as CSV
///
/// # Returns
///
/// * `Ok(PipelineReport)` - Run completed and the CSV was written
/// * `Err(HarvestError)` - Pipeline could not be built or the CSV could not be written
pub async fn crawl(config: &Config, seed_url: &str) -> Result<PipelineReport, HarvestError> {
    let mut pipeline = Pipeline::new(config)?;
    let mut sink = CsvSink::new(&config.output.csv_path);
    pipeline.run(seed_url, &mut sink).await
}
