use crate::crawler::DEFAULT_USER_AGENTS;
use serde::Deserialize;

/// Main configuration structure for Product-Harvest
///
/// Every section and key is optional; missing values fall back to the
/// built-in defaults, which target the amazon.in listing layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub headers: HeaderConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Origin prefixed to relative listing links; its host is the only allowed domain
    #[serde(rename = "site-origin")]
    pub site_origin: String,

    /// Seed used when the user supplies an empty line
    #[serde(rename = "default-seed-url")]
    pub default_seed_url: String,

    /// Delay before each extractor launch (milliseconds)
    #[serde(rename = "launch-delay-ms")]
    pub launch_delay_ms: u64,

    /// Maximum number of extractor tasks in flight at once
    #[serde(rename = "max-concurrent-extractors")]
    pub max_concurrent_extractors: u32,

    /// Maximum redirect hops followed within a single page visit
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            site_origin: "https://www.amazon.in".to_string(),
            default_seed_url: "https://www.amazon.in/s?k=ear+buds".to_string(),
            launch_delay_ms: 5,
            max_concurrent_extractors: 16,
            max_depth: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    /// Fixed Accept-Language value sent with every request
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Pool the user-agent rotator draws from
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            accept_language: "en-US;q=0.9".to_string(),
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

/// CSS selectors for link discovery and field extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Anchors on the search-results page that lead to product pages
    #[serde(rename = "listing-link")]
    pub listing_link: String,

    pub image: String,

    pub title: String,

    pub price: String,

    pub rating: String,

    #[serde(rename = "rating-count")]
    pub rating_count: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_link: ".s-product-image-container a.a-link-normal".to_string(),
            image: ".imgTagWrapper img".to_string(),
            title: "h1#title span#productTitle".to_string(),
            price: "div.a-section.a-spacing-none.aok-align-center.aok-relative .a-price-whole"
                .to_string(),
            rating: "#averageCustomerReviews_feature_div #averageCustomerReviews #acrPopover a.a-popover-trigger.a-declarative .a-size-base.a-color-base".to_string(),
            rating_count:
                "#averageCustomerReviews_feature_div #averageCustomerReviews #acrCustomerReviewLink"
                    .to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "output/products.csv".to_string(),
        }
    }
}
