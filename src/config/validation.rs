use crate::config::types::{CatalogConfig, Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_catalog_config(&config.catalog)?;
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates catalog URLs
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    let root = validate_http_url("root_url", &config.root_url)?;
    if !root.path().ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "root_url must end with '/', got '{}'",
            config.root_url
        )));
    }

    validate_http_url("book_url", &config.book_url)?;
    validate_http_url("category_url", &config.category_url)?;

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.book_dir.is_empty() {
        return Err(ConfigError::Validation(
            "book_dir cannot be empty".to_string(),
        ));
    }

    if config.category_dir.is_empty() {
        return Err(ConfigError::Validation(
            "category_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses `value` and requires an http or https scheme
pub(crate) fn validate_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(url)
}
