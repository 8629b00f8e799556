//! Labeled product table
//!
//! Product pages carry a two-column table of `<th>label</th><td>value</td>`
//! rows. The table is scanned once into a map keyed by [`TableLabel`];
//! lookups of a label the page did not carry return
//! [`ExtractError::MissingLabel`].

use crate::{ExtractError, ExtractResult};
use scraper::{ElementRef, Selector};
use std::collections::HashMap;
use std::fmt;

/// Value stored for a label whose row has no `<td>`
pub const EMPTY_CELL: &str = "N/A";

/// Row labels read from the product table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableLabel {
    Upc,
    PriceInclTax,
    PriceExclTax,
    Availability,
}

impl TableLabel {
    /// All labels the extractor knows about
    pub const ALL: [TableLabel; 4] = [
        TableLabel::Upc,
        TableLabel::PriceInclTax,
        TableLabel::PriceExclTax,
        TableLabel::Availability,
    ];

    /// The exact `<th>` text for this label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upc => "UPC",
            Self::PriceInclTax => "Price (incl. tax)",
            Self::PriceExclTax => "Price (excl. tax)",
            Self::Availability => "Availability",
        }
    }

    /// Maps header text to a label; matching is exact
    pub fn from_header(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|label| label.as_str() == text)
    }
}

impl fmt::Display for TableLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values of the known labels found in one product table
#[derive(Debug, Clone, Default)]
pub struct LabeledTable {
    cells: HashMap<TableLabel, String>,
}

impl LabeledTable {
    /// Scans every `<th>` of `table` and records the text of its next `<td>` sibling
    ///
    /// Unknown headers are ignored. When a label appears twice the first row wins.
    pub fn scan(table: ElementRef<'_>, header_selector: &Selector) -> Self {
        let mut cells = HashMap::new();

        for th in table.select(header_selector) {
            let header: String = th.text().collect();
            let Some(label) = TableLabel::from_header(&header) else {
                continue;
            };

            let value = th
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|sibling| sibling.value().name() == "td")
                .map(|td| td.text().collect::<String>())
                .unwrap_or_else(|| EMPTY_CELL.to_string());

            cells.entry(label).or_insert(value);
        }

        Self { cells }
    }

    /// Returns the cell text for `label`
    pub fn get(&self, label: TableLabel) -> ExtractResult<&str> {
        self.cells
            .get(&label)
            .map(String::as_str)
            .ok_or(ExtractError::MissingLabel(label))
    }

    /// Number of known labels found
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no known label was found
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
