//! Shelf-Harvest main entry point
//!
//! This is the command-line interface for the Shelf-Harvest book scraper.

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_harvest::config::{load_config_with_hash, Config};
use shelf_harvest::crawler::build_http_client;
use shelf_harvest::pipeline::{scrape_book, scrape_category};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Harvest: a book catalog scraper
///
/// Extracts title, prices, availability, rating, category, description and
/// cover image from catalog product pages and saves them as `;`-delimited
/// files.
#[derive(Parser, Debug)]
#[command(name = "shelf-harvest")]
#[command(version)]
#[command(about = "A book catalog scraper", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (built-in defaults otherwise)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a single product page
    Book {
        /// Product page URL (defaults to `catalog.book-url`)
        #[arg(long)]
        url: Option<String>,
    },

    /// Crawl a category listing and scrape every book in it
    Category {
        /// Listing page URL (defaults to `catalog.category-url`)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let client = build_http_client(&config.http).context("failed to build HTTP client")?;
    let today = chrono::Local::now().date_naive();

    let result = match cli.command {
        Command::Book { url } => {
            let url = url.unwrap_or_else(|| config.catalog.book_url.clone());
            scrape_book(&client, &config, &url, today)
                .await
                .map(|run| match run.file {
                    Some(file) => tracing::info!("Saved {}", file.display()),
                    None => tracing::warn!("'{}' was scraped but not saved", run.record.title),
                })
        }
        Command::Category { url } => {
            let url = url.unwrap_or_else(|| config.catalog.category_url.clone());
            scrape_category(&client, &config, &url, today)
                .await
                .map(|run| {
                    tracing::info!(
                        "Category {}: {} links, {} scraped, {} failed",
                        run.category,
                        run.links.len(),
                        run.records.len(),
                        run.failures.len()
                    );
                })
        }
    };

    if let Err(e) = &result {
        tracing::error!("Run failed: {}", e);
    }
    result.map_err(Into::into)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_harvest=info,warn"),
            1 => EnvFilter::new("shelf_harvest=debug,info"),
            2 => EnvFilter::new("shelf_harvest=trace,debug"),
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
