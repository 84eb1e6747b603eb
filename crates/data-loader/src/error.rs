//! Error types for the data-loader crate.
//!
//! Two layers of errors live here:
//! - `RowError` describes why a single input row was rejected. These are
//!   never fatal; the row is dropped and counted by whoever is classifying.
//! - `DataLoadError` covers failures reading an input file as a whole.

use thiserror::Error;

/// Why a single tab-delimited row could not be turned into a record.
///
/// `Clone` and `PartialEq` so it can ride inside `InputRecord::Malformed`
/// and be matched on in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Field count is neither 8 (rating) nor 4 (trust edge)
    #[error("Expected 8 or 4 tab-separated fields but found {found}")]
    MalformedRow { found: usize },

    /// A numeric field failed to parse or fell outside its domain
    ///
    /// Ratings must be integers in 1..=5, trust values must be -1 or +1.
    #[error("Invalid value for {field}: {value:?}")]
    InvalidNumericField { field: &'static str, value: String },
}

/// Errors that can occur while reading input files
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
