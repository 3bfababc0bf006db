//! Error types for the data-loader crate.
//!
//! Every variant is fatal at startup: without a catalog no query can run.

use thiserror::Error;

/// Errors that can occur while loading the movie catalog
///
/// The `#[derive(Error)]` macro from thiserror implements `std::error::Error`
/// and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Dataset file could not be found or opened
    #[error("Failed to open dataset: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the dataset
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV record couldn't be parsed
    ///
    /// `line` is 1-based and counts the header row.
    #[error("Parse error at line {line}: {reason}")]
    ParseError { line: u64, reason: String },

    /// The header row is missing a column the catalog needs
    #[error("Missing required column '{column}' (found: {found})")]
    MissingColumn { column: String, found: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;

impl From<csv::Error> for DataLoadError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        match err.into_kind() {
            csv::ErrorKind::Io(io) => DataLoadError::IoError(io),
            kind => DataLoadError::ParseError {
                line,
                reason: format!("{:?}", kind),
            },
        }
    }
}
