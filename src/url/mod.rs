//! URL handling module for Product-Harvest
//!
//! This module turns raw seed input and listing `href` values into the absolute
//! URLs the crawler fetches, and derives the single domain requests are allowed to.

mod domain;
mod resolve;

// Re-export main functions
pub use domain::{allowed_domain, extract_domain, is_allowed_domain};
pub use resolve::{resolve_listing_href, resolve_seed};
