//! Product-Harvest main entry point
//!
//! This is the command-line interface for the Product-Harvest crawler.

use anyhow::Context;
use clap::Parser;
use product_harvest::config::{load_config_with_hash, validate, Config};
use product_harvest::crawler::crawl;
use product_harvest::output::print_report;
use product_harvest::url::resolve_seed;
use product_harvest::HarvestError;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Product-Harvest: a product listing crawler
///
/// Discovers product links on a search-results page, scrapes every product
/// page concurrently and writes name, price, rating, rating count and image
/// to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "product-harvest")]
#[command(version)]
#[command(about = "Scrape product listings into a CSV file", long_about = None)]
struct Cli {
    /// Search-results URL or search query (prompted for on stdin when omitted)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// CSV output path (overrides output.csv-path)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Maximum concurrent extractors (overrides crawler.max-concurrent-extractors)
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration and seed without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let input = match cli.seed.clone() {
        Some(seed) => seed,
        None => match prompt_for_seed().context("Failed to read seed from stdin")? {
            Some(line) => line,
            None => {
                tracing::info!("No input received, exiting");
                return Ok(ExitCode::SUCCESS);
            }
        },
    };

    let seed_url = match resolve_seed(
        &input,
        &config.crawler.default_seed_url,
        &config.crawler.site_origin,
    ) {
        Ok(Some(seed_url)) => seed_url,
        Ok(None) => {
            tracing::error!("{}", HarvestError::EmptySeed);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            tracing::error!("Invalid seed '{}': {}", input.trim(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &seed_url);
        return Ok(ExitCode::SUCCESS);
    }

    Ok(handle_crawl(&config, &seed_url).await)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("product_harvest=info,warn"),
            1 => EnvFilter::new("product_harvest=debug,info"),
            2 => EnvFilter::new("product_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_extractors = concurrency;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Prompts for a seed on stdout and reads one line
///
/// Returns `None` on end of input.
fn prompt_for_seed() -> std::io::Result<Option<String>> {
    println!("Enter url that you want to scrape");
    std::io::stdout().flush()?;

    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, seed_url: &str) {
    println!("=== Product-Harvest Dry Run ===\n");

    println!("Seed URL: {}", seed_url);

    println!("\nCrawler Configuration:");
    println!("  Site origin: {}", config.crawler.site_origin);
    println!("  Launch delay: {}ms", config.crawler.launch_delay_ms);
    println!(
        "  Max concurrent extractors: {}",
        config.crawler.max_concurrent_extractors
    );
    println!("  Max redirect depth: {}", config.crawler.max_depth);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);

    println!("\nHeaders:");
    println!("  Accept-Language: {}", config.headers.accept_language);
    println!("  User agents in pool: {}", config.headers.user_agents.len());

    println!("\nSelectors:");
    println!("  Listing link: {}", config.selectors.listing_link);
    println!("  Image: {}", config.selectors.image);
    println!("  Title: {}", config.selectors.title);
    println!("  Price: {}", config.selectors.price);
    println!("  Rating: {}", config.selectors.rating);
    println!("  Rating count: {}", config.selectors.rating_count);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, seed_url: &str) -> ExitCode {
    tracing::info!("Starting harvest from {}", seed_url);

    match crawl(config, seed_url).await {
        Ok(report) => {
            print_report(&report);
            println!(
                "Your product's details are in {} file.",
                config.output.csv_path
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
