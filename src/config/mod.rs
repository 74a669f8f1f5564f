//! Configuration module for Product-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A run without a configuration file uses [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use product_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Site origin: {}", config.crawler.site_origin);
//! ```

mod parser;
mod types;
pub(crate) mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HeaderConfig, OutputConfig, SelectorConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
