//! Race data ingestion.
//!
//! This crate decides which on-disk dataset represents the current state of
//! the race and reads it without interpreting its records.
//!
//! # Tiers
//!
//! 1. **Live results**: `latest_race_results.json`, eligible once its status
//!    is `completed` and it carries results
//! 2. **Backup files**: the most recently created `rocket_race_results_*.json`
//! 3. **Participant list**: the CSV export of registered racers, read as a
//!    pending dataset
//!
//! The first eligible tier wins. Read failures fall through to the next tier
//! and are reported via [`race_model::Diagnostics`]; only exhausting every
//! tier is an error.
//!
//! # Example
//!
//! ```ignore
//! use race_ingest::{SourceConfig, SourceResolver};
//! use race_model::Diagnostics;
//!
//! let resolver = SourceResolver::from_config(&SourceConfig::new("race-data"));
//! let mut diagnostics = Diagnostics::new();
//! let resolved = resolver.resolve(&mut diagnostics)?;
//! println!("{}", resolved.provenance.label);
//! ```

mod csv;
mod discovery;
mod error;
mod mapping;
mod raw;
mod resolver;
mod sources;

// === Error Types ===
pub use error::{IngestError, Result};

// === Raw Datasets ===
pub use raw::{
    COMPLETED_STATUS, RawDataset, RawParticipant, RawRaceFile, RawRaceRecord, ResolvedSource,
    read_race_file,
};

// === Participant List ===
pub use csv::{FULL_NAME_COLUMN, USERNAME_COLUMN, read_participant_list};

// === File Discovery ===
pub use discovery::{
    FileCandidate, file_created_time, file_modified_timestamp, latest_file_with_prefix,
    list_files_with_prefix, select_latest,
};

// === Source Resolution ===
pub use resolver::{
    DEFAULT_BACKUP_PREFIX, DEFAULT_LIVE_RESULTS_FILE, DEFAULT_PARTICIPANT_LIST_PREFIX,
    SourceConfig, SourceResolver,
};
pub use sources::{
    BackupFilesSource, CandidateSource, LIVE_RESULTS_LABEL, LiveResultsSource,
    PARTICIPANT_LIST_LABEL, ParticipantListSource, SourceAttempt,
};

// === Image Mapping ===
pub use mapping::{DEFAULT_IMAGE_MAPPING_FILE, ImageMapping, ImageMappingCache, load_image_mapping};
