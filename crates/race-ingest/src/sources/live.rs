use std::path::PathBuf;

use race_model::{DatasetKind, Provenance, UNKNOWN};

use crate::discovery::file_modified_timestamp;
use crate::raw::{COMPLETED_STATUS, RawDataset, ResolvedSource, read_race_file};

use super::{CandidateSource, SourceAttempt};

/// Label attached to datasets read from the live results file.
pub const LIVE_RESULTS_LABEL: &str = "Latest Results (Real-time)";

/// The live results file the simulation rewrites after every race.
///
/// Eligible only once it declares status `completed` and carries results.
#[derive(Debug, Clone)]
pub struct LiveResultsSource {
    path: PathBuf,
}

impl LiveResultsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CandidateSource for LiveResultsSource {
    fn kind(&self) -> DatasetKind {
        DatasetKind::LiveResults
    }

    fn describe(&self) -> String {
        format!("live results {}", self.path.display())
    }

    fn attempt(&self) -> SourceAttempt {
        if !self.path.is_file() {
            return SourceAttempt::Absent {
                reason: format!("{} does not exist", self.path.display()),
            };
        }

        let raw = match read_race_file(&self.path) {
            Ok(raw) => raw,
            Err(error) => return SourceAttempt::Unreadable(error),
        };

        if !raw.is_completed() {
            let status = raw.status_text().unwrap_or_else(|| "missing".to_string());
            return SourceAttempt::Ineligible {
                path: self.path.clone(),
                reason: format!(
                    "status is '{status}', waiting for '{COMPLETED_STATUS}' (no race completed yet)"
                ),
            };
        }
        if !raw.has_results() {
            return SourceAttempt::Ineligible {
                path: self.path.clone(),
                reason: "race completed but results are empty".to_string(),
            };
        }

        let timestamp = raw
            .timestamp_text()
            .or_else(|| file_modified_timestamp(&self.path))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let provenance = Provenance::new(DatasetKind::LiveResults, LIVE_RESULTS_LABEL)
            .with_path(&self.path)
            .with_timestamp(timestamp);

        SourceAttempt::Eligible(ResolvedSource {
            dataset: RawDataset::Race(raw),
            provenance,
        })
    }
}
