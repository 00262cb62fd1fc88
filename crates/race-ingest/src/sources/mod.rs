//! Candidate dataset sources, one per tier.
//!
//! Each tier is a [`CandidateSource`] strategy. The resolver asks them in
//! priority order and takes the first eligible dataset; it never merges.

mod backup;
mod live;
mod participants;

use std::path::PathBuf;

use race_model::DatasetKind;

use crate::error::IngestError;
use crate::raw::ResolvedSource;

pub use backup::BackupFilesSource;
pub use live::{LIVE_RESULTS_LABEL, LiveResultsSource};
pub use participants::{PARTICIPANT_LIST_LABEL, ParticipantListSource};

/// Outcome of asking one tier for its dataset.
#[derive(Debug)]
pub enum SourceAttempt {
    /// The tier has a usable dataset.
    Eligible(ResolvedSource),
    /// The tier's file exists and parses but must not be used.
    Ineligible { path: PathBuf, reason: String },
    /// Nothing to read for this tier.
    Absent { reason: String },
    /// The tier's file could not be read or parsed.
    Unreadable(IngestError),
}

/// A tier that can attempt to produce the authoritative dataset.
pub trait CandidateSource {
    /// The tier this source represents.
    fn kind(&self) -> DatasetKind;

    /// Short description used in diagnostics.
    fn describe(&self) -> String;

    /// Reads the tier and reports whether it is eligible.
    fn attempt(&self) -> SourceAttempt;
}
