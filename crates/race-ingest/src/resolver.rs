//! Tiered source resolution.

use std::path::{Path, PathBuf};

use race_model::{Diagnostic, Diagnostics};
use tracing::{debug, info_span};

use crate::error::{IngestError, Result};
use crate::raw::ResolvedSource;
use crate::sources::{
    BackupFilesSource, CandidateSource, LiveResultsSource, ParticipantListSource, SourceAttempt,
};

/// Default name of the live results file.
pub const DEFAULT_LIVE_RESULTS_FILE: &str = "latest_race_results.json";
/// Default name prefix of backup race result files.
pub const DEFAULT_BACKUP_PREFIX: &str = "rocket_race_results_";
/// Default name prefix of participant list exports.
pub const DEFAULT_PARTICIPANT_LIST_PREFIX: &str = "instaExport-";

/// Locations of the three tiers.
///
/// Relative paths are resolved against `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub data_dir: PathBuf,
    pub live_results_file: PathBuf,
    pub backup_prefix: String,
    pub participant_list: Option<PathBuf>,
    pub participant_list_prefix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            live_results_file: PathBuf::from(DEFAULT_LIVE_RESULTS_FILE),
            backup_prefix: DEFAULT_BACKUP_PREFIX.to_string(),
            participant_list: None,
            participant_list_prefix: DEFAULT_PARTICIPANT_LIST_PREFIX.to_string(),
        }
    }
}

impl SourceConfig {
    /// Default file names inside the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Joins a relative path onto `data_dir`.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

/// Picks the single authoritative dataset among the candidate tiers.
///
/// Sources are tried in insertion order; the first eligible one wins and the
/// rest are not read. Every skipped tier is reported through [`Diagnostics`].
pub struct SourceResolver {
    sources: Vec<Box<dyn CandidateSource>>,
}

impl SourceResolver {
    /// A resolver with no tiers.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// The standard chain: live results, backup files, participant list.
    pub fn from_config(config: &SourceConfig) -> Self {
        let mut participants =
            ParticipantListSource::new(&config.data_dir, &config.participant_list_prefix);
        if let Some(path) = &config.participant_list {
            participants = participants.with_path(config.resolve_path(path));
        }

        Self::new()
            .with_source(LiveResultsSource::new(
                config.resolve_path(&config.live_results_file),
            ))
            .with_source(BackupFilesSource::new(
                &config.data_dir,
                &config.backup_prefix,
            ))
            .with_source(participants)
    }

    /// Appends a lower-priority tier.
    #[must_use]
    pub fn with_source(mut self, source: impl CandidateSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolves the current dataset.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::NoDataAvailable`] when every tier is absent,
    /// ineligible or unreadable.
    pub fn resolve(&self, diagnostics: &mut Diagnostics) -> Result<ResolvedSource> {
        let mut attempted = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let kind = source.kind();
            let span = info_span!("tier", tier = kind.label());
            let _guard = span.enter();
            debug!(source = %source.describe(), "Attempting source");

            match source.attempt() {
                SourceAttempt::Eligible(resolved) => {
                    let mut diagnostic = Diagnostic::info(format!(
                        "using {} (last updated {})",
                        resolved.provenance.label, resolved.provenance.timestamp
                    ))
                    .with_tier(kind);
                    if let Some(path) = &resolved.provenance.path {
                        diagnostic = diagnostic.with_path(path);
                    }
                    diagnostics.push(diagnostic);
                    return Ok(resolved);
                }
                SourceAttempt::Ineligible { path, reason } => {
                    diagnostics.push(
                        Diagnostic::warning(format!("{} skipped: {reason}", kind.label()))
                            .with_tier(kind)
                            .with_path(path),
                    );
                    attempted.push(format!("{}: {reason}", source.describe()));
                }
                SourceAttempt::Absent { reason } => {
                    diagnostics.push(
                        Diagnostic::info(format!("{} not available: {reason}", kind.label()))
                            .with_tier(kind),
                    );
                    attempted.push(format!("{}: {reason}", source.describe()));
                }
                SourceAttempt::Unreadable(error) => {
                    diagnostics.push(
                        Diagnostic::warning(format!("{} unreadable: {error}", kind.label()))
                            .with_tier(kind),
                    );
                    attempted.push(format!("{}: {error}", source.describe()));
                }
            }
        }

        diagnostics.push(Diagnostic::error("no race data available from any source"));
        Err(IngestError::NoDataAvailable { attempted })
    }
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}
