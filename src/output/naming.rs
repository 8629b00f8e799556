//! Output file naming
//!
//! File names embed a sanitized title or category name and the run date,
//! which is passed in explicitly rather than read from the clock.

use chrono::NaiveDate;

/// Longest sanitized stem kept in a file name
pub const MAX_STEM_LEN: usize = 100;

/// Stem used when sanitizing leaves nothing
pub const EMPTY_STEM: &str = "untitled";

/// How the output file of a run is named
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingStrategy {
    /// `<title>_<date>.csv`, for single-book runs
    Title(String),

    /// `products_category_<category>_<date>.csv`, for category runs
    Category(String),
}

impl NamingStrategy {
    /// Builds the file name for `date`
    pub fn file_name(&self, date: NaiveDate) -> String {
        let date = date.format("%Y-%m-%d");
        match self {
            Self::Title(title) => format!("{}_{}.csv", sanitize_filename(title), date),
            Self::Category(name) => {
                format!("products_category_{}_{}.csv", sanitize_filename(name), date)
            }
        }
    }
}

/// Turns free text into a file-name stem safe on Windows and Unix
///
/// Reserved characters (`\ / : * ? " < > |`) and control characters are
/// dropped, whitespace runs become `_`, leading/trailing `_` and `.` are
/// trimmed and the result is capped at [`MAX_STEM_LEN`] characters.
pub fn sanitize_filename(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut pending_space = false;

    for c in name.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() || matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            continue;
        }
        if pending_space && !stem.is_empty() {
            stem.push('_');
        }
        pending_space = false;
        stem.push(c);
    }

    let stem: String = stem
        .trim_matches(|c| c == '_' || c == '.')
        .chars()
        .take(MAX_STEM_LEN)
        .collect();
    let stem = stem.trim_end_matches(|c| c == '_' || c == '.');

    if stem.is_empty() {
        EMPTY_STEM.to_string()
    } else {
        stem.to_string()
    }
}
