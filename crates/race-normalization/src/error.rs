//! Per-record normalization errors.

use race_model::ModelError;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::fields::RaceField;

/// Why a single raw record was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    // === Shape ===
    /// Entry could not be read as a participant record at all.
    #[error("malformed record: {message}")]
    Malformed { message: String },

    /// Required field is absent or null.
    #[error("missing required field '{field}'")]
    MissingField { field: RaceField },

    /// Username is blank after trimming and sigil removal.
    #[error("username is empty")]
    EmptyUsername,

    // === Values ===
    /// Counter is negative or does not fit the canonical type.
    #[error("invalid {field} value {value}, expected a non-negative integer")]
    InvalidCount { field: RaceField, value: i64 },

    // === Collection ===
    /// Record breaks a collection invariant (duplicate, rank order, bad metric).
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for single-record normalization.
pub type Result<T> = std::result::Result<T, RecordError>;

/// A skipped input record, reported alongside the valid subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialRecordError {
    /// 1-based position in the source (results array index or CSV row).
    pub position: usize,
    /// Normalized username, when one could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "message", serialize_with = "serialize_display")]
    pub error: RecordError,
}

impl std::fmt::Display for PartialRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.username {
            Some(username) => write!(f, "record {} ('{username}'): {}", self.position, self.error),
            None => write!(f, "record {}: {}", self.position, self.error),
        }
    }
}

fn serialize_display<S: Serializer>(
    error: &RecordError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
