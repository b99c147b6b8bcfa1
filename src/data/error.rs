use std::path::PathBuf;

use thiserror::Error;

/// Failures of the data pipeline. Each one aborts the current render pass
/// and is shown to the user as text.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    /// The source file is missing, unreadable, or not a table at all.
    #[error("data unavailable at {path}: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// A required column is absent from the source.
    #[error("schema mismatch: required column '{column}' not found")]
    SchemaMismatch { column: String },

    /// Filter bounds are reversed or not numbers.
    #[error("invalid income range: [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    /// A row has a missing/non-numeric required cell or breaks a record
    /// invariant (coordinates out of range, negative income or value).
    #[error("malformed record at row {row}: {reason}")]
    MalformedRecord { row: usize, reason: String },
}

impl DataError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DataError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn missing_column(column: &str) -> Self {
        DataError::SchemaMismatch {
            column: column.to_string(),
        }
    }
}
