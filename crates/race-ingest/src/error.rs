//! Error types for race data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading candidate sources.
///
/// Everything except [`IngestError::NoDataAvailable`] is recovered by the
/// resolver falling through to the next tier.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Data Directory ===
    #[error("data directory does not exist: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("cannot list data directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Source Files ===
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Present but unreadable (permissions, locked by the producer, ...).
    #[error("cannot read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Not a JSON document of the expected shape, often a half-written file.
    #[error("invalid JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid participant export {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("participant export {path} has no '{column}' column")]
    MissingColumn { column: String, path: PathBuf },

    /// Column access or cast failed inside polars.
    #[error("participant export column error: {message}")]
    DataFrame { message: String },

    // === Resolution ===
    /// Every tier was absent, ineligible or unreadable.
    #[error("no race data available (tried: {})", .attempted.join("; "))]
    NoDataAvailable { attempted: Vec<String> },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Maps an I/O error on `path` to `FileNotFound` or `FileRead`.
pub(crate) fn file_error(path: &std::path::Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/latest_race_results.json"),
        };
        assert_eq!(
            err.to_string(),
            "file not found: /data/latest_race_results.json"
        );
    }

    #[test]
    fn test_no_data_display_lists_attempts() {
        let err = IngestError::NoDataAvailable {
            attempted: vec!["live results: absent".into(), "backup: absent".into()],
        };
        assert_eq!(
            err.to_string(),
            "no race data available (tried: live results: absent; backup: absent)"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("Username".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }

    #[test]
    fn test_file_error_classification() {
        let path = std::path::Path::new("missing.json");
        let err = file_error(path, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(err, IngestError::FileNotFound { .. }));
        let err = file_error(path, std::io::Error::other("locked"));
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
