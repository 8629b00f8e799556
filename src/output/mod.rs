//! Output module for writing extracted records
//!
//! This module handles:
//! - Naming output files from a title or category name plus the run date
//! - Writing `;`-delimited, BOM-prefixed UTF-8 files
//! - Reporting a file held open by another program as its own error

mod csv_writer;
mod naming;

pub use csv_writer::{RecordWriter, DELIMITER, UTF8_BOM};
pub use naming::{sanitize_filename, NamingStrategy};
