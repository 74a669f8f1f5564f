//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with a bounded, domain-restricted redirect policy
//! - Setting `Accept-Language` and a rotated `User-Agent` on every request
//! - Refusing URLs outside the allowed domain
//! - Error classification
//!
//! No request is ever retried.

use crate::config::{CrawlerConfig, HeaderConfig};
use crate::crawler::user_agent::UserAgentRotator;
use crate::url::{allowed_domain, is_allowed_domain};
use crate::{ConfigError, HarvestError};
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// URL is outside the allowed domain; no request was sent
    DomainNotAllowed {
        /// The refused URL
        url: String,
    },

    /// Response was not HTML
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// Non-2xx response
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, redirect limit, bad URL)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl fmt::Display for FetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { status_code, .. } => write!(f, "HTTP {}", status_code),
            Self::DomainNotAllowed { url } => write!(f, "domain not allowed: {}", url),
            Self::ContentMismatch { content_type } => {
                write!(f, "expected HTML, got {}", content_type)
            }
            Self::HttpError { status_code } => write!(f, "HTTP {}", status_code),
            Self::NetworkError { error } => write!(f, "{}", error),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to `max-depth` hops and only while they stay on
/// `allowed_domain`. The same URL may appear more than once in a redirect chain.
pub fn build_http_client(
    config: &CrawlerConfig,
    allowed_domain: &str,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirect_policy(
            config.max_depth as usize,
            allowed_domain.to_string(),
        ))
        .gzip(true)
        .brotli(true)
        .build()
}

fn redirect_policy(max_depth: usize, allowed_domain: String) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max_depth {
            let message = format!("redirect depth exceeded ({} hops)", max_depth);
            attempt.error(message)
        } else if !is_allowed_domain(attempt.url(), &allowed_domain) {
            let message = format!("redirect to disallowed domain: {}", attempt.url());
            attempt.error(message)
        } else {
            attempt.follow()
        }
    })
}

/// Fetches pages from the single allowed domain
///
/// A `Fetcher` is shared (behind an `Arc`) by every extractor task; the
/// underlying `reqwest::Client` pools connections across them.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    rotator: UserAgentRotator,
    accept_language: String,
    allowed_domain: String,
}

impl Fetcher {
    /// Creates a fetcher from crawler and header configuration
    ///
    /// The allowed domain is the host of `site-origin`.
    pub fn new(crawler: &CrawlerConfig, headers: &HeaderConfig) -> Result<Self, HarvestError> {
        let allowed = allowed_domain(&crawler.site_origin).ok_or_else(|| {
            ConfigError::InvalidUrl(format!("site-origin has no host: {}", crawler.site_origin))
        })?;

        let client = build_http_client(crawler, &allowed)?;
        let rotator = UserAgentRotator::new(headers.user_agents.clone());
        tracing::debug!(
            "Fetcher restricted to {} with {} user agents",
            allowed,
            rotator.len()
        );

        Ok(Self {
            client,
            rotator,
            accept_language: headers.accept_language.clone(),
            allowed_domain: allowed,
        })
    }

    /// The only domain this fetcher will contact
    pub fn allowed_domain(&self) -> &str {
        &self.allowed_domain
    }

    /// Fetches a URL with a single GET request
    ///
    /// # Outcomes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Unparseable URL | NetworkError |
    /// | Host is not the allowed domain | DomainNotAllowed |
    /// | Connection failure / timeout / redirect limit | NetworkError |
    /// | Non-2xx status | HttpError |
    /// | Content-Type present and not HTML | ContentMismatch |
    /// | Otherwise | Success |
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                return FetchResult::NetworkError {
                    error: format!("invalid URL: {}", e),
                }
            }
        };

        if !is_allowed_domain(&parsed, &self.allowed_domain) {
            return FetchResult::DomainNotAllowed {
                url: url.to_string(),
            };
        }

        let request = self
            .client
            .get(parsed)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .header(USER_AGENT, self.rotator.next_agent());

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return classify_error(e),
        };

        let status = response.status();
        let final_url = response.url().to_string();

        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        // A missing Content-Type is treated as HTML.
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("html") {
                return FetchResult::ContentMismatch {
                    content_type: content_type.to_string(),
                };
            }
        }

        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                body,
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
