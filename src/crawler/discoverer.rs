//! Seed page link discovery
//!
//! Visits one search-results page and collects the product links from its
//! listing thumbnails, in document order.

use crate::config::validation::parse_selector;
use crate::config::{CrawlerConfig, SelectorConfig};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::record::LinkSet;
use crate::url::resolve_listing_href;
use crate::ConfigError;
use scraper::{Html, Selector};
use std::sync::Arc;

/// Collects listing links from a search-results page
///
/// Every anchor matching `selector` contributes its `href`, made absolute
/// against `site_origin`. Anchors without an `href` are skipped; duplicates
/// are kept.
///
/// # Example
///
/// ```
/// use product_harvest::crawler::extract_listing_links;
/// use scraper::Selector;
///
/// let html = r#"<div class="hit"><a href="/p/1">One</a></div>"#;
/// let selector = Selector::parse(".hit a").unwrap();
/// let links = extract_listing_links(html, &selector, "https://example.test");
/// assert_eq!(links.iter().collect::<Vec<_>>(), vec!["https://example.test/p/1"]);
/// ```
pub fn extract_listing_links(html: &str, selector: &Selector, site_origin: &str) -> LinkSet {
    let document = Html::parse_document(html);

    document
        .select(selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_listing_href(site_origin, href))
        .collect()
}

/// Finds product links on a seed page
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    fetcher: Arc<Fetcher>,
    listing_link: Selector,
    site_origin: String,
    default_seed_url: String,
}

impl LinkDiscoverer {
    pub fn new(
        fetcher: Arc<Fetcher>,
        crawler: &CrawlerConfig,
        selectors: &SelectorConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            listing_link: parse_selector("listing-link", &selectors.listing_link)?,
            site_origin: crawler.site_origin.clone(),
            default_seed_url: crawler.default_seed_url.clone(),
        })
    }

    /// The page `discover` will visit for `seed_url`
    ///
    /// A blank seed falls back to the configured default seed.
    pub fn resolve_seed_url<'a>(&'a self, seed_url: &'a str) -> &'a str {
        let seed_url = seed_url.trim();
        if seed_url.is_empty() {
            self.default_seed_url.as_str()
        } else {
            seed_url
        }
    }

    /// Visits the seed page and returns its product links
    ///
    /// An empty `seed_url` falls back to the configured default seed. A fetch
    /// failure is logged and yields an empty set; it does not abort the run.
    pub async fn discover(&self, seed_url: &str) -> LinkSet {
        let seed_url = self.resolve_seed_url(seed_url);

        tracing::info!("Visiting {}", seed_url);

        match self.fetcher.fetch(seed_url).await {
            FetchResult::Success { body, .. } => {
                let links = extract_listing_links(&body, &self.listing_link, &self.site_origin);
                tracing::info!(
                    "Discovery complete: {} product links on {}",
                    links.len(),
                    seed_url
                );
                links
            }
            failure => {
                tracing::warn!("Error while scraping {}: {}", seed_url, failure);
                LinkSet::new()
            }
        }
    }
}
