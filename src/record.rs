//! Book record data model
//!
//! A `BookRecord` is built in one extraction call and never mutated
//! afterwards. Its CSV projection is fixed: ten columns, in the order of
//! [`HEADERS`].

use std::fmt;

/// Column names written as the header row of every output file
pub const HEADERS: [&str; 10] = [
    "product_page_url",
    "universal_product_code",
    "title",
    "price_including_tax",
    "price_excluding_tax",
    "number_available",
    "product_description",
    "category",
    "review_rating",
    "image_url",
];

/// Placeholder used when a page has no description block
pub const NO_DESCRIPTION: &str = "N/A";

/// Stock count parsed from the availability cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// "In stock (22 available)" → `Count(22)`
    Count(u32),

    /// The cell did not contain a parenthesized count; raw text is kept
    Unparsed(String),
}

impl Availability {
    /// Returns the parsed count, if any
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Count(n) => Some(*n),
            Self::Unparsed(_) => None,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{}", n),
            Self::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// One product page, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub product_page_url: String,
    pub universal_product_code: String,
    pub title: String,
    pub price_including_tax: f64,
    pub price_excluding_tax: f64,
    pub number_available: Availability,
    pub product_description: String,
    pub category: String,
    /// Star rating in 0..=5
    pub review_rating: u8,
    pub image_url: String,
}

impl BookRecord {
    /// Projects the record onto the columns of [`HEADERS`]
    pub fn to_csv_record(&self) -> [String; 10] {
        [
            self.product_page_url.clone(),
            self.universal_product_code.clone(),
            self.title.clone(),
            self.price_including_tax.to_string(),
            self.price_excluding_tax.to_string(),
            self.number_available.to_string(),
            self.product_description.clone(),
            self.category.clone(),
            self.review_rating.to_string(),
            self.image_url.clone(),
        ]
    }
}
