//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the shared HTTP client (one connection pool per run)
//! - GET requests with a fixed per-request timeout
//! - UTF-8 decoding of the body regardless of the declared charset
//!
//! Nothing is retried. Transport failures and non-success statuses are
//! surfaced with the offending URL.

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// The same client is reused for every request of a run so connections are
/// kept alive between pages.
///
/// # Example
///
/// ```no_run
/// use shelf_harvest::config::HttpConfig;
/// use shelf_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches `url` and returns its body decoded as UTF-8
///
/// Invalid byte sequences are replaced rather than rejected.
///
/// # Errors
///
/// * [`HarvestError::Fetch`] - connection, timeout or body read failure
/// * [`HarvestError::HttpStatus`] - the server answered with a non-2xx status
pub async fn fetch_body(client: &Client, url: &str) -> Result<String, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| fetch_error(url, source))?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| fetch_error(url, source))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Fetches `url` and parses it into an HTML document
pub async fn fetch_document(client: &Client, url: &str) -> Result<Html, HarvestError> {
    let body = fetch_body(client, url).await?;
    Ok(Html::parse_document(&body))
}

fn fetch_error(url: &str, source: reqwest::Error) -> HarvestError {
    if source.is_timeout() {
        tracing::debug!("Request timeout for {}", url);
    } else if source.is_connect() {
        tracing::debug!("Connection failed for {}", url);
    }

    HarvestError::Fetch {
        url: url.to_string(),
        source,
    }
}
