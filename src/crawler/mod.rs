//! Crawler module for page fetching and category traversal
//!
//! This module contains:
//! - HTTP fetching with forced UTF-8 decoding
//! - Category listing traversal with pagination

mod category;
mod fetcher;

pub use category::{category_name_from_url, CategoryCrawler, ListingPage, UNKNOWN_CATEGORY};
pub use fetcher::{build_http_client, fetch_body, fetch_document};
