//! Category crawler
//!
//! Walks a paginated category listing and collects the absolute URL of every
//! product summary, in page order then in-page order. Duplicates are kept.
//!
//! Pagination stops when a page has no "next" link, when the next link points
//! at a page already visited, or after `max_pages` listing pages.

use crate::crawler::fetcher::fetch_body;
use crate::extract::compile_selector;
use crate::HarvestError;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Name used when the listing URL does not follow `/books/<name>_<id>/`
pub const UNKNOWN_CATEGORY: &str = "Unknown";

const CATEGORY_PATTERN: &str = r"/books/([^_/]+)_\d+/";

/// Links found on one listing page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    /// Number of product summaries on the page
    pub item_count: usize,

    /// Absolute detail-page URLs, in page order
    pub detail_links: Vec<String>,

    /// Absolute URL of the following listing page
    pub next_page: Option<Url>,
}

/// Crawls category listings with a shared HTTP client
pub struct CategoryCrawler<'a> {
    client: &'a Client,
    catalog_root: Url,
    max_pages: usize,
    item: Selector,
    item_link: Selector,
    next_link: Selector,
}

impl<'a> CategoryCrawler<'a> {
    /// Creates a crawler resolving detail links against `catalog_root`
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client reused for every listing page
    /// * `catalog_root` - e.g. `https://books.toscrape.com/catalogue/`
    /// * `max_pages` - upper bound on listing pages followed
    pub fn new(
        client: &'a Client,
        catalog_root: &str,
        max_pages: usize,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            client,
            catalog_root: Url::parse(catalog_root)?,
            max_pages,
            item: compile_selector("article.product_pod")?,
            item_link: compile_selector("h3 a")?,
            next_link: compile_selector("li.next a")?,
        })
    }

    /// Collects every detail-page URL of the category starting at `category_url`
    ///
    /// # Errors
    ///
    /// * [`HarvestError::Fetch`] / [`HarvestError::HttpStatus`] - a listing page could not be fetched
    /// * [`HarvestError::EmptyListing`] - a listing page had no product summaries
    pub async fn crawl(&self, category_url: &str) -> Result<Vec<String>, HarvestError> {
        let mut urls = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Url::parse(category_url)?;
        let mut page_number = 1;

        loop {
            visited.insert(current.to_string());

            let body = fetch_body(self.client, current.as_str()).await?;
            let listing = self.parse_listing(&body, &current)?;

            tracing::info!(
                "Page {} processed, {} books found",
                page_number,
                listing.item_count
            );
            urls.extend(listing.detail_links);

            let Some(next) = listing.next_page else {
                break;
            };

            if visited.contains(next.as_str()) {
                tracing::warn!(
                    "Next link on {} points back to visited page {}, stopping",
                    current,
                    next
                );
                break;
            }

            if page_number >= self.max_pages {
                tracing::warn!(
                    "Reached max_pages ({}) at {}, stopping pagination",
                    self.max_pages,
                    current
                );
                break;
            }

            current = next;
            page_number += 1;
        }

        Ok(urls)
    }

    /// Parses one listing page fetched from `page_url`
    ///
    /// A summary whose link is missing or unresolvable is logged and skipped.
    pub fn parse_listing(&self, html: &str, page_url: &Url) -> Result<ListingPage, HarvestError> {
        let document = Html::parse_document(html);

        let items: Vec<_> = document.select(&self.item).collect();
        if items.is_empty() {
            return Err(HarvestError::EmptyListing {
                url: page_url.to_string(),
            });
        }

        let mut detail_links = Vec::with_capacity(items.len());
        for item in &items {
            let Some(href) = item
                .select(&self.item_link)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                tracing::warn!("Product summary without a link on {}", page_url);
                continue;
            };

            match self.detail_url(href) {
                Ok(url) => detail_links.push(url.to_string()),
                Err(e) => tracing::warn!("Bad product link {:?} on {}: {}", href, page_url, e),
            }
        }

        let next_page = match document.select(&self.next_link).next() {
            Some(a) => match a.value().attr("href").map(|href| page_url.join(href.trim())) {
                Some(Ok(url)) => Some(url),
                Some(Err(e)) => {
                    tracing::warn!("Bad next link on {}: {}", page_url, e);
                    None
                }
                None => {
                    tracing::warn!("Next link without href on {}", page_url);
                    None
                }
            },
            None => None,
        };

        Ok(ListingPage {
            item_count: items.len(),
            detail_links,
            next_page,
        })
    }

    /// Listing hrefs climb out of the category with `../`; detail pages all
    /// live directly under the catalog root.
    fn detail_url(&self, href: &str) -> Result<Url, url::ParseError> {
        let relative = href.trim().replace("../", "");
        self.catalog_root.join(&relative)
    }
}

/// Derives a display name from a category listing URL
///
/// `.../category/books/mystery_3/index.html` gives `Mystery`.
pub fn category_name_from_url(url: &str) -> String {
    Regex::new(CATEGORY_PATTERN)
        .ok()
        .and_then(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|name| capitalize(name.as_str()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
