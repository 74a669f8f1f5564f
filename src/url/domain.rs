use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use product_harvest::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Amazon.in/dp/B0TEST").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.amazon.in".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Derives the allowed domain from the configured site origin
///
/// Returns `None` if the origin does not parse or has no host.
pub fn allowed_domain(site_origin: &str) -> Option<String> {
    Url::parse(site_origin)
        .ok()
        .and_then(|url| extract_domain(&url))
}

/// Returns true if the URL's host is exactly the allowed domain
///
/// Subdomains do not match: `m.amazon.in` is not `www.amazon.in`.
pub fn is_allowed_domain(url: &Url, allowed: &str) -> bool {
    extract_domain(url).is_some_and(|domain| domain == allowed.to_lowercase())
}
