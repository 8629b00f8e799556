//! Decoders for individual product fields

use crate::extract::TableLabel;
use crate::record::Availability;
use crate::{ExtractError, ExtractResult};
use regex::Regex;

/// Base class of the rating marker; every other class encodes the rating
pub const RATING_BASE_CLASS: &str = "star-rating";

/// Pattern for "(N available)" inside the availability cell
pub const AVAILABILITY_PATTERN: &str = r"\((\d+)\s+available\)";

/// Parses an availability cell such as "In stock (22 available)"
///
/// A cell without a parenthesized count (or with one too large for `u32`)
/// is kept verbatim as [`Availability::Unparsed`].
pub fn parse_availability(pattern: &Regex, text: &str) -> Availability {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|count| count.as_str().parse::<u32>().ok())
        .map(Availability::Count)
        .unwrap_or_else(|| Availability::Unparsed(text.trim().to_string()))
}

/// Parses a currency-prefixed amount such as "£51.77"
pub fn parse_price(label: TableLabel, text: &str) -> ExtractResult<f64> {
    let amount = text
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-' && c != '.');

    amount
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ExtractError::InvalidPrice {
            label,
            value: text.to_string(),
        })
}

/// Decodes a spelled-out star rating ("Zero" … "Five"), case-insensitively
pub fn rating_from_word(word: &str) -> Option<u8> {
    match word.to_ascii_lowercase().as_str() {
        "zero" => Some(0),
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        _ => None,
    }
}

/// Reads the rating from the marker's class list
///
/// Only the first class other than [`RATING_BASE_CLASS`] is considered;
/// a missing or unknown word rates 0.
pub fn rating_from_classes<'a, I>(classes: I) -> u8
where
    I: IntoIterator<Item = &'a str>,
{
    classes
        .into_iter()
        .find(|class| *class != RATING_BASE_CLASS)
        .and_then(rating_from_word)
        .unwrap_or(0)
}
