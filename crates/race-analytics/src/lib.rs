//! Analytics over normalized race results.
//!
//! [`AnalyticsEngine`] borrows a [`race_model::RaceResults`] collection and
//! answers the dashboard's questions about it: the ranked leaderboard, who
//! matches a search, how a racer compares with the field and who holds each
//! superlative. Every query is pure; nothing is cached between calls.
//!
//! Queries that only make sense with race outcomes return
//! [`AnalyticsError::NotApplicable`] on a pending collection.

mod engine;
mod error;
mod query;
mod standing;

// === Engine ===
pub use engine::{
    AnalyticsEngine, FunFacts, PODIUM_SIZE, RaceStatistics, RelativePerformance, TimeBounds,
};

// === Errors ===
pub use error::{AnalyticsError, Result};

// === Queries ===
pub use query::{NumericField, RowLimit, SearchOptions};
pub use standing::Standing;
