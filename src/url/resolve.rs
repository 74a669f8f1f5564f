use url::Url;

/// Makes a listing `href` absolute by prefixing the site origin
///
/// Relative hrefs are concatenated onto the origin (a trailing `/` on the origin
/// is dropped so the result has exactly one separator). Hrefs that are already
/// absolute http(s) URLs are returned unchanged. Empty hrefs yield `None`.
///
/// # Examples
///
/// ```
/// use product_harvest::url::resolve_listing_href;
///
/// assert_eq!(
///     resolve_listing_href("https://example.test", "/p/1"),
///     Some("https://example.test/p/1".to_string())
/// );
/// ```
pub fn resolve_listing_href(site_origin: &str, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let origin = site_origin.trim_end_matches('/');
    if href.starts_with('/') {
        Some(format!("{}{}", origin, href))
    } else {
        Some(format!("{}/{}", origin, href))
    }
}

/// Turns raw user input into the seed URL to crawl
///
/// - blank input falls back to `default_seed` (`None` if that is empty too)
/// - input with an http(s) scheme is used as the seed URL
/// - anything else is treated as a search query: `{site_origin}/s?k=<query>`
pub fn resolve_seed(
    input: &str,
    default_seed: &str,
    site_origin: &str,
) -> Result<Option<String>, url::ParseError> {
    let input = input.trim();

    if input.is_empty() {
        let default_seed = default_seed.trim();
        if default_seed.is_empty() {
            return Ok(None);
        }
        return Ok(Some(Url::parse(default_seed)?.to_string()));
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        return Ok(Some(Url::parse(input)?.to_string()));
    }

    let mut search = Url::parse(site_origin)?.join("/s")?;
    search.query_pairs_mut().append_pair("k", input);
    Ok(Some(search.to_string()))
}
