//! Error types for the rating pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, RaterError>;

/// Errors that can stop a row or a whole run.
///
/// Per-field defects (unparsable or out-of-range scores) are not errors: they
/// are corrected in place and reported as [`crate::processor::Diagnostic`]s.
#[derive(Error, Debug)]
pub enum RaterError {
    /// The input could not be read or the output could not be written.
    #[error("resource unavailable: {}: {source}", .path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row carries an identifier but no score columns to average.
    #[error("cannot average student {student}: row has no score columns")]
    DivisionByZero { student: String },

    /// Startup configuration failed validation.
    #[error("invalid configuration: {message}")]
    ConfigInvalid { message: String },
}

impl RaterError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        RaterError::ResourceUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        RaterError::ConfigInvalid {
            message: message.into(),
        }
    }
}
