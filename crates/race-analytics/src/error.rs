//! Error types for analytics queries.

use race_model::ResultsKind;
use thiserror::Error;

/// Errors returned by [`AnalyticsEngine`](crate::AnalyticsEngine) queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// Query is not defined for this kind of collection.
    #[error("{query} is not applicable to a {kind} collection")]
    NotApplicable {
        query: &'static str,
        kind: ResultsKind,
    },

    /// Query needs at least one record.
    #[error("{query} requires at least one record")]
    EmptyCollection { query: &'static str },

    // === Query Parsing ===
    /// Row limit is neither a count nor `all`.
    #[error("invalid row limit '{value}', expected a number or 'all'")]
    InvalidRowLimit { value: String },

    /// Name does not refer to a numeric field.
    #[error("unknown numeric field '{name}'")]
    UnknownField { name: String },
}

/// Result type for analytics queries.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
