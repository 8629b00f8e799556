//! Record extraction from product pages
//!
//! This module maps the DOM of a product page onto a flat [`BookRecord`]:
//! - the labeled product table (UPC, prices, availability)
//! - the title heading and the optional description paragraph
//! - the star-rating marker
//! - the breadcrumb trail (category)
//! - the cover image (resolved to an absolute URL)
//!
//! Extraction is all-or-nothing: any missing required element fails the whole
//! record with [`HarvestError::Extraction`].

mod fields;
mod table;

pub use fields::{
    parse_availability, parse_price, rating_from_classes, rating_from_word, AVAILABILITY_PATTERN,
    RATING_BASE_CLASS,
};
pub use table::{LabeledTable, TableLabel, EMPTY_CELL};

use crate::record::{BookRecord, NO_DESCRIPTION};
use crate::{ExtractError, ExtractResult, HarvestError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Breadcrumb entry holding the category name (Home › Books › Category › Title)
const CATEGORY_CRUMB: usize = 2;

/// Compiles a CSS selector, keeping the source text in the error
pub(crate) fn compile_selector(css: &str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::Selector(format!("{}: {:?}", css, e)))
}

/// Product page extractor with its selectors and patterns compiled once
#[derive(Debug, Clone)]
pub struct BookExtractor {
    table: Selector,
    table_header: Selector,
    title: Selector,
    description_anchor: Selector,
    rating: Selector,
    breadcrumb: Selector,
    image: Selector,
    availability: Regex,
}

impl BookExtractor {
    /// Compiles the extractor
    pub fn new() -> ExtractResult<Self> {
        Ok(Self {
            table: compile_selector("table.table.table-striped")?,
            table_header: compile_selector("th")?,
            title: compile_selector("div.product_main h1")?,
            description_anchor: compile_selector("div#product_description")?,
            rating: compile_selector("p.star-rating")?,
            breadcrumb: compile_selector("ul.breadcrumb li")?,
            image: compile_selector("div.item img")?,
            availability: Regex::new(AVAILABILITY_PATTERN)?,
        })
    }

    /// Extracts a record from `document`, fetched from `url`
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Extraction`] naming `url` when any required
    /// element or table label is absent or unparsable. No partial record is
    /// ever returned.
    pub fn extract(&self, document: &Html, url: &str) -> Result<BookRecord, HarvestError> {
        self.extract_fields(document, url)
            .map_err(|source| HarvestError::Extraction {
                url: url.to_string(),
                source,
            })
    }

    fn extract_fields(&self, document: &Html, url: &str) -> ExtractResult<BookRecord> {
        let table_element = document
            .select(&self.table)
            .next()
            .ok_or(ExtractError::MissingElement("product table"))?;
        let table = LabeledTable::scan(table_element, &self.table_header);

        let universal_product_code = table.get(TableLabel::Upc)?.to_string();
        let price_including_tax = parse_price(
            TableLabel::PriceInclTax,
            table.get(TableLabel::PriceInclTax)?,
        )?;
        let price_excluding_tax = parse_price(
            TableLabel::PriceExclTax,
            table.get(TableLabel::PriceExclTax)?,
        )?;
        let number_available =
            parse_availability(&self.availability, table.get(TableLabel::Availability)?);

        Ok(BookRecord {
            product_page_url: url.to_string(),
            universal_product_code,
            title: self.title(document)?,
            price_including_tax,
            price_excluding_tax,
            number_available,
            product_description: self.description(document),
            category: self.category(document)?,
            review_rating: self.rating(document),
            image_url: self.image_url(document, url)?,
        })
    }

    fn title(&self, document: &Html) -> ExtractResult<String> {
        document
            .select(&self.title)
            .next()
            .map(|h1| h1.text().collect::<String>().trim().to_string())
            .ok_or(ExtractError::MissingElement("title heading"))
    }

    /// The first `<p>` following the description anchor, or the placeholder
    fn description(&self, document: &Html) -> String {
        document
            .select(&self.description_anchor)
            .next()
            .and_then(|anchor| {
                anchor
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .find(|sibling| sibling.value().name() == "p")
            })
            .map(|p| p.text().collect::<String>())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }

    fn rating(&self, document: &Html) -> u8 {
        document
            .select(&self.rating)
            .next()
            .map(|marker| rating_from_classes(marker.value().classes()))
            .unwrap_or(0)
    }

    fn category(&self, document: &Html) -> ExtractResult<String> {
        document
            .select(&self.breadcrumb)
            .nth(CATEGORY_CRUMB)
            .map(|li| li.text().collect::<String>().trim().to_string())
            .ok_or(ExtractError::MissingElement("breadcrumb category"))
    }

    fn image_url(&self, document: &Html, url: &str) -> ExtractResult<String> {
        let src = document
            .select(&self.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .ok_or(ExtractError::MissingElement("product image"))?;

        let base = Url::parse(url)?;
        Ok(base.join(src.trim())?.to_string())
    }
}

/// Extracts a record with a freshly compiled [`BookExtractor`]
///
/// # Example
///
/// ```no_run
/// use scraper::Html;
/// use shelf_harvest::extract_book;
///
/// # fn example(body: &str) {
/// let url = "https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html";
/// let record = extract_book(&Html::parse_document(body), url).unwrap();
/// println!("{} costs {}", record.title, record.price_including_tax);
/// # }
/// ```
pub fn extract_book(document: &Html, url: &str) -> Result<BookRecord, HarvestError> {
    BookExtractor::new()?.extract(document, url)
}
