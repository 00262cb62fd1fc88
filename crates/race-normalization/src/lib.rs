//! Schema normalization for race datasets.
//!
//! Turns the raw payload picked by [`race_ingest::SourceResolver`] into the
//! canonical [`race_model::RaceResults`] collection and derives the
//! [`race_model::SessionMetadata`] for the same resolution.
//!
//! Malformed per-participant entries never fail a dataset: they are skipped
//! and returned as [`PartialRecordError`]s next to the valid subset.
//!
//! # Example
//!
//! ```ignore
//! use race_normalization::{extract_metadata, normalize};
//!
//! let normalized = normalize(&resolved);
//! let metadata = extract_metadata(&resolved, &normalized.results);
//! ```

mod error;
mod fields;
mod metadata;
mod normalizer;

// === Errors ===
pub use error::{PartialRecordError, RecordError, Result};

// === Field Translation ===
pub use fields::RaceField;

// === Normalization ===
pub use normalizer::{NormalizedResults, normalize, normalize_participants, normalize_race_records};

// === Metadata ===
pub use metadata::extract_metadata;
