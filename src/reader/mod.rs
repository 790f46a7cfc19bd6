//! # Sheet Readers
//!
//! Collaborators that supply one [`Grid`] per worksheet. The extraction core
//! never parses binary spreadsheet formats itself; delimited text files are
//! read by [`csv::CsvReader`], and pre-built grids can be fed through
//! [`memory::MemoryReader`].

pub mod csv;
pub mod memory;

use crate::error::TableScanError;
use crate::grid::Grid;
use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;

/// Errors raised while locating or reading a worksheet.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// Unsupported or unrecognized file format
    #[error("Cannot detect file format for '{name}'")]
    InvalidFileFormat { name: String },

    /// Requested sheet does not exist in the source file
    #[error("Sheet '{sheet}' not found in '{file}'")]
    SheetNotFound { file: String, sheet: String },
}

/// Supplies grids for the worksheets of one source file.
///
/// Reading a sheet must not mutate the reader, so the pipeline can retry a
/// traversal and read sheets in any order.
pub trait SheetReader {
    /// Source identifier recorded as provenance, usually the file path.
    fn file_name(&self) -> &str;

    /// Names of all worksheets in the source.
    fn sheet_names(&self) -> Vec<String>;

    /// Reads one worksheet into a grid.
    fn read_sheet(&self, sheet_name: &str) -> Result<Grid, TableScanError>;
}

/// Opens the reader matching a file's extension.
///
/// Supported: `.csv` (comma separated) and `.tsv` (tab separated).
pub fn open_reader<P>(path: P) -> Result<Box<dyn SheetReader>, TableScanError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => Ok(Box::new(csv::CsvReader::new(path, b','))),
        Some("tsv") => Ok(Box::new(csv::CsvReader::new(path, b'\t'))),
        _ => Err(ReaderError::InvalidFileFormat {
            name: path.to_string_lossy().to_string(),
        })?,
    }
}
