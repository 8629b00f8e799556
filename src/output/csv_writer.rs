//! Delimited record files
//!
//! Files are UTF-8 with a byte-order mark (so spreadsheet programs pick the
//! right encoding), `;`-separated, with one header row followed by one row
//! per record.

use crate::output::naming::NamingStrategy;
use crate::record::{BookRecord, HEADERS};
use crate::{OutputError, OutputResult};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Field separator of every output file
pub const DELIMITER: u8 = b';';

/// UTF-8 byte-order mark
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes record files into one output directory
#[derive(Debug, Clone)]
pub struct RecordWriter {
    dir: PathBuf,
}

impl RecordWriter {
    /// Creates a writer for `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes a single record, named after its title
    ///
    /// # Returns
    ///
    /// The path of the written file
    pub fn write_record(&self, record: &BookRecord, date: NaiveDate) -> OutputResult<PathBuf> {
        let naming = NamingStrategy::Title(record.title.clone());
        self.write_rows(&naming, std::slice::from_ref(record), date)
    }

    /// Writes all records of a category into one file
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - file written
    /// * `Ok(None)` - `records` was empty, nothing written
    pub fn write_category(
        &self,
        category: &str,
        records: &[BookRecord],
        date: NaiveDate,
    ) -> OutputResult<Option<PathBuf>> {
        if records.is_empty() {
            tracing::info!("No books to save for category {}", category);
            return Ok(None);
        }

        let naming = NamingStrategy::Category(category.to_string());
        self.write_rows(&naming, records, date).map(Some)
    }

    fn write_rows(
        &self,
        naming: &NamingStrategy,
        records: &[BookRecord],
        date: NaiveDate,
    ) -> OutputResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(naming.file_name(date));
        let mut file = File::create(&path).map_err(|e| classify_io_error(&path, e))?;
        file.write_all(UTF8_BOM)?;

        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .from_writer(file);

        writer.write_record(HEADERS)?;
        for record in records {
            writer.write_record(record.to_csv_record())?;
        }
        writer.flush()?;

        tracing::info!("Saved {} book(s) to {}", records.len(), path.display());
        Ok(path)
    }
}

/// Maps an open failure to [`OutputError::FileInUse`] when another process
/// holds the file
pub(crate) fn classify_io_error(path: &Path, error: io::Error) -> OutputError {
    if is_file_locked(&error) {
        OutputError::FileInUse {
            path: path.to_path_buf(),
        }
    } else {
        OutputError::Io(error)
    }
}

/// Permission denied, or a Windows sharing/lock violation
fn is_file_locked(error: &io::Error) -> bool {
    const ERROR_SHARING_VIOLATION: i32 = 32;
    const ERROR_LOCK_VIOLATION: i32 = 33;

    error.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows)
            && matches!(
                error.raw_os_error(),
                Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
            ))
}
