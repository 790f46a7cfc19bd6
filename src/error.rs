use thiserror::Error;

/// Main error type for the tablescan crate.
/// Aggregates errors from the standard library, dependencies, and internal
/// modules.
#[derive(Error, Debug)]
pub enum TableScanError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("{0}")]
    PatternError(#[from] glob::PatternError),

    // Internal module errors
    #[error("{0}")]
    RangeError(#[from] crate::grid::range::RangeError),

    #[error("{0}")]
    ReaderError(#[from] crate::reader::ReaderError),
}

pub trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, TableScanError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| TableScanError::WithContextError(format!("{}: {}", message, e)))
    }
}
