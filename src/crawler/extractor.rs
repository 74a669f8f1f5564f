//! Product page extraction
//!
//! Field extraction is a pure function over a parsed document: each field
//! selector is applied independently, the first match wins, and a miss leaves
//! the field empty. [`ProductExtractor`] wraps it with a fetch.

use crate::config::SelectorConfig;
use crate::config::validation::parse_selector;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::record::ProductRecord;
use crate::ConfigError;
use scraper::{Html, Selector};
use std::sync::Arc;

/// Trims surrounding whitespace
pub fn clean(raw: &str) -> String {
    raw.trim().to_string()
}

/// Trims a product name and removes embedded newlines
///
/// ```
/// use product_harvest::crawler::clean_product_name;
///
/// assert_eq!(clean_product_name(" Widget\nPro "), "WidgetPro");
/// ```
pub fn clean_product_name(raw: &str) -> String {
    raw.trim().replace('\n', "")
}

/// Removes `,` thousands separators
pub fn strip_thousands_separators(raw: &str) -> String {
    raw.replace(',', "")
}

/// Removes the literal " ratings" suffix wherever it occurs
pub fn strip_ratings_suffix(raw: &str) -> String {
    raw.replace(" ratings", "")
}

/// Cleans a price: separators stripped, then trimmed
pub fn clean_price(raw: &str) -> String {
    clean(&strip_thousands_separators(raw))
}

/// Cleans a rating count: " ratings" and separators stripped, then trimmed
pub fn clean_total_ratings(raw: &str) -> String {
    clean(&strip_thousands_separators(&strip_ratings_suffix(raw)))
}

/// Compiled field selectors for product pages
#[derive(Debug, Clone)]
pub struct ProductSelectors {
    image: Selector,
    title: Selector,
    price: Selector,
    rating: Selector,
    rating_count: Selector,
}

impl ProductSelectors {
    /// Compiles the product-page selectors from configuration
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            image: parse_selector("image", &config.image)?,
            title: parse_selector("title", &config.title)?,
            price: parse_selector("price", &config.price)?,
            rating: parse_selector("rating", &config.rating)?,
            rating_count: parse_selector("rating-count", &config.rating_count)?,
        })
    }
}

/// Extracts a product record from a product page
///
/// Never fails: fields whose selector finds nothing stay empty. The caller
/// decides whether the result is worth keeping via
/// [`ProductRecord::is_present`].
pub fn extract_product(html: &str, selectors: &ProductSelectors) -> ProductRecord {
    let document = Html::parse_document(html);

    let image_url = document
        .select(&selectors.image)
        .next()
        .and_then(|element| element.value().attr("src"))
        .map(clean)
        .unwrap_or_default();

    ProductRecord::new(
        first_text(&document, &selectors.title)
            .map(|text| clean_product_name(&text))
            .unwrap_or_default(),
        image_url,
        first_text(&document, &selectors.price)
            .map(|text| clean_price(&text))
            .unwrap_or_default(),
        first_text(&document, &selectors.rating)
            .map(|text| clean(&text))
            .unwrap_or_default(),
        first_text(&document, &selectors.rating_count)
            .map(|text| clean_total_ratings(&text))
            .unwrap_or_default(),
    )
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Visits one product page and extracts its record
#[derive(Debug, Clone)]
pub struct ProductExtractor {
    fetcher: Arc<Fetcher>,
    selectors: Arc<ProductSelectors>,
}

impl ProductExtractor {
    pub fn new(fetcher: Arc<Fetcher>, selectors: ProductSelectors) -> Self {
        Self {
            fetcher,
            selectors: Arc::new(selectors),
        }
    }

    /// Fetches `url` and extracts its fields
    ///
    /// Returns `None` when the page could not be fetched; the failure is
    /// logged here. A fetched page always yields a record, possibly empty.
    pub async fn extract(&self, url: &str) -> Option<ProductRecord> {
        match self.fetcher.fetch(url).await {
            FetchResult::Success { body, .. } => Some(extract_product(&body, &self.selectors)),
            failure => {
                tracing::warn!("Error while scraping {}: {}", url, failure);
                None
            }
        }
    }
}
