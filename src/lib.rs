//! Shelf-Harvest: a book catalog scraper
//!
//! This crate fetches product pages from a book catalog, extracts a flat
//! record of fields from each page, and writes the records to `;`-delimited
//! files. It runs either on a single product page or across a whole category
//! listing, following pagination until no "next" link remains.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod record;

use thiserror::Error;

/// Main error type for Shelf-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Extraction failed for {url}: {source}")]
    Extraction { url: String, source: ExtractError },

    #[error("Parser setup failed: {0}")]
    Setup(#[from] ExtractError),

    #[error("No items found on listing page: {url}")]
    EmptyListing { url: String },

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning a product page into a record
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("label '{0}' not found in product table")]
    MissingLabel(extract::TableLabel),

    #[error("element not found: {0}")]
    MissingElement(&'static str),

    #[error("invalid price for '{label}': {value:?}")]
    InvalidPrice {
        label: extract::TableLabel,
        value: String,
    },

    #[error("invalid image URL: {0}")]
    InvalidImageUrl(#[from] ::url::ParseError),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised while writing record files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("File is open in another program, close it and retry: {}", path.display())]
    FileInUse { path: std::path::PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for Shelf-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for extraction operations
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for output operations
pub type OutputResult<T> = std::result::Result<T, OutputError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::extract_book;
pub use record::{Availability, BookRecord};
