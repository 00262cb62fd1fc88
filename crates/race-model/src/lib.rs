//! Canonical data model for rocket race telemetry.
//!
//! Every dataset tier (live results, backup result files, the participant
//! list) is reduced to the types in this crate before analytics run:
//!
//! - [`RaceResult`]: one canonical record per participant
//! - [`RaceResults`]: an ordered collection that is either fully raced or
//!   fully pending, never a mix of both
//! - [`SessionMetadata`]: session-level facts tagged with [`Provenance`]
//! - [`Diagnostics`]: the channel through which degraded and fallback
//!   decisions are reported to the caller

mod diagnostics;
mod error;
mod result;
mod session;

pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics};
pub use error::{ModelError, Result};
pub use result::{
    RaceMetrics, RaceResult, RaceResults, RaceResultsBuilder, ResultsKind, normalize_username,
};
pub use session::{
    DatasetKind, NEVER, NO_RACE_DATE, NO_RACE_ID, Provenance, SessionMetadata, UNKNOWN,
    WAITING_FOR_RACE, WinnerSummary,
};
