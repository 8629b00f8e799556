//! Configuration module for Shelf-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section has defaults, so an empty file (or no file at all) yields the
//! built-in catalog URLs.
//!
//! # Example
//!
//! ```no_run
//! use shelf_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Request timeout: {}s", config.http.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogConfig, Config, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_BOOK_URL,
    DEFAULT_CATEGORY_URL, DEFAULT_ROOT_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
