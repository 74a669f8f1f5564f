use crate::config::types::{Config, CrawlerConfig, HeaderConfig, OutputConfig, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on `max-concurrent-extractors`
const MAX_CONCURRENCY: u32 = 256;

/// Upper bound on `max-depth` (redirect hops per visit)
const MAX_REDIRECT_DEPTH: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_header_config(&config.headers)?;
    validate_selector_config(&config.selectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&config.site_origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site-origin: {}", e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "site-origin must use http or https, got '{}'",
            config.site_origin
        )));
    }

    if origin.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "site-origin has no host: '{}'",
            config.site_origin
        )));
    }

    // An empty default seed is allowed; the run then needs an explicit seed.
    if !config.default_seed_url.is_empty() {
        Url::parse(&config.default_seed_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid default-seed-url: {}", e)))?;
    }

    if config.max_concurrent_extractors < 1 || config.max_concurrent_extractors > MAX_CONCURRENCY
    {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-extractors must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrent_extractors
        )));
    }

    if config.max_depth > MAX_REDIRECT_DEPTH {
        return Err(ConfigError::Validation(format!(
            "max-depth must be at most {}, got {}",
            MAX_REDIRECT_DEPTH, config.max_depth
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates request header configuration
fn validate_header_config(config: &HeaderConfig) -> Result<(), ConfigError> {
    if config.accept_language.trim().is_empty() {
        return Err(ConfigError::Validation(
            "accept-language cannot be empty".to_string(),
        ));
    }

    if config.user_agents.is_empty() {
        return Err(ConfigError::Validation(
            "user-agents must contain at least one entry".to_string(),
        ));
    }

    if let Some(pos) = config.user_agents.iter().position(|ua| ua.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "user-agents entry {} is empty",
            pos
        )));
    }

    Ok(())
}

/// Validates that every selector parses
fn validate_selector_config(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (field, selector) in [
        ("listing-link", &config.listing_link),
        ("image", &config.image),
        ("title", &config.title),
        ("price", &config.price),
        ("rating", &config.rating),
        ("rating-count", &config.rating_count),
    ] {
        parse_selector(field, selector)?;
    }
    Ok(())
}

/// Parses a CSS selector, naming the config field on failure
pub(crate) fn parse_selector(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        message: format!("{:?}", e),
    })
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
