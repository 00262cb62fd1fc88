//! Error types for the canonical race model.

use thiserror::Error;

use crate::result::ResultsKind;

/// Violations of the [`RaceResults`](crate::RaceResults) collection invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Username is empty after normalization.
    #[error("username is empty")]
    EmptyUsername,

    /// Username already present in the collection.
    #[error("duplicate username '{username}'")]
    DuplicateUsername { username: String },

    /// Record does not match the collection kind (raced vs pending).
    #[error("record '{username}' does not belong in a {expected} collection")]
    MixedCollection {
        username: String,
        expected: ResultsKind,
    },

    /// Rank must be a positive integer.
    #[error("record '{username}' has invalid rank 0")]
    ZeroRank { username: String },

    /// Ranks must strictly increase in collection order.
    #[error("record '{username}' has rank {rank}, expected greater than {previous}")]
    RankOrder {
        username: String,
        rank: u32,
        previous: u32,
    },

    /// Metric value is negative or not finite.
    #[error("record '{username}' has invalid {field} value {value}")]
    InvalidMetric {
        username: String,
        field: &'static str,
        value: f64,
    },
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ModelError::RankOrder {
            username: "pilot".to_string(),
            rank: 2,
            previous: 3,
        };
        assert_eq!(
            err.to_string(),
            "record 'pilot' has rank 2, expected greater than 3"
        );

        let err = ModelError::MixedCollection {
            username: "pilot".to_string(),
            expected: ResultsKind::Pending,
        };
        assert_eq!(
            err.to_string(),
            "record 'pilot' does not belong in a pending collection"
        );
    }
}
