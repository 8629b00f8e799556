//! Run orchestration
//!
//! Two pipelines share the fetcher, the extractor and the writer:
//! - book: fetch → extract → write one file
//! - category: crawl → (fetch → extract)* → write one file
//!
//! In a category run a failing book is logged and skipped. Crawl failures,
//! single-book failures and a locked output file end the run.

use crate::config::Config;
use crate::crawler::{category_name_from_url, fetch_document, CategoryCrawler};
use crate::extract::BookExtractor;
use crate::output::RecordWriter;
use crate::record::BookRecord;
use crate::{HarvestError, OutputError, OutputResult};
use chrono::NaiveDate;
use reqwest::Client;
use std::path::PathBuf;

/// Outcome of a single-book run
#[derive(Debug, Clone)]
pub struct BookRun {
    pub record: BookRecord,

    /// Written file, `None` if writing failed with a generic I/O error
    pub file: Option<PathBuf>,
}

/// A book of a category run that could not be scraped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFailure {
    pub url: String,
    pub message: String,
}

/// Outcome of a category run
#[derive(Debug, Clone)]
pub struct CategoryRun {
    /// Display name derived from the listing URL
    pub category: String,

    /// Detail-page URLs collected by the crawler
    pub links: Vec<String>,

    /// Records extracted, in link order
    pub records: Vec<BookRecord>,

    /// Books skipped because fetching or extraction failed
    pub failures: Vec<BookFailure>,

    /// Written file; `None` when there was nothing to write or writing failed
    pub file: Option<PathBuf>,
}

/// Scrapes one product page and writes it to `config.output.book_dir`
///
/// # Errors
///
/// Fetch and extraction failures, and [`OutputError::FileInUse`], are
/// returned. Other write failures are logged and leave `file` empty.
pub async fn scrape_book(
    client: &Client,
    config: &Config,
    url: &str,
    date: NaiveDate,
) -> Result<BookRun, HarvestError> {
    let extractor = BookExtractor::new()?;
    let record = scrape_one(client, &extractor, url).await?;

    let writer = RecordWriter::new(&config.output.book_dir);
    let file = settle_write(writer.write_record(&record, date))?;
    if file.is_some() {
        tracing::info!("Exported '{}'", record.title);
    }

    Ok(BookRun { record, file })
}

/// Crawls a category and writes every scraped book to `config.output.category_dir`
///
/// # Errors
///
/// Listing failures (fetch, empty page) and [`OutputError::FileInUse`] are
/// returned. Per-book failures are collected in [`CategoryRun::failures`].
pub async fn scrape_category(
    client: &Client,
    config: &Config,
    url: &str,
    date: NaiveDate,
) -> Result<CategoryRun, HarvestError> {
    let category = category_name_from_url(url);
    tracing::info!("Starting category {}", category);

    let crawler = CategoryCrawler::new(client, &config.catalog.root_url, config.crawler.max_pages)?;
    let links = crawler.crawl(url).await?;
    tracing::info!("Collected {} book links", links.len());

    let extractor = BookExtractor::new()?;
    let mut records = Vec::with_capacity(links.len());
    let mut failures = Vec::new();

    for (index, link) in links.iter().enumerate() {
        tracing::info!(
            "Scraping book {}/{} (category {}): {}",
            index + 1,
            links.len(),
            category,
            link
        );

        match scrape_one(client, &extractor, link).await {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::error!("Skipping {}: {}", link, e);
                failures.push(BookFailure {
                    url: link.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    let writer = RecordWriter::new(&config.output.category_dir);
    let file = settle_write(writer.write_category(&category, &records, date))?;

    Ok(CategoryRun {
        category,
        links,
        records,
        failures,
        file,
    })
}

async fn scrape_one(
    client: &Client,
    extractor: &BookExtractor,
    url: &str,
) -> Result<BookRecord, HarvestError> {
    let document = fetch_document(client, url).await?;
    extractor.extract(&document, url)
}

/// A locked file is fatal; any other write failure only costs the file
fn settle_write<T>(result: OutputResult<T>) -> Result<Option<PathBuf>, HarvestError>
where
    T: Into<Option<PathBuf>>,
{
    match result {
        Ok(file) => Ok(file.into()),
        Err(e @ OutputError::FileInUse { .. }) => Err(e.into()),
        Err(e) => {
            tracing::error!("Could not write output file: {}", e);
            Ok(None)
        }
    }
}
