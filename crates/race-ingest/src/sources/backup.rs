use std::path::PathBuf;

use race_model::{DatasetKind, Provenance, UNKNOWN};

use crate::discovery::{file_modified_timestamp, latest_file_with_prefix};
use crate::error::IngestError;
use crate::raw::{RawDataset, ResolvedSource, read_race_file};

use super::{CandidateSource, SourceAttempt};

/// Historical race result files, one per race (`<prefix>*.json`).
///
/// Only the most recently created file is considered. If it cannot be used
/// the tier is skipped as a whole; older files are not tried.
#[derive(Debug, Clone)]
pub struct BackupFilesSource {
    dir: PathBuf,
    prefix: String,
}

impl BackupFilesSource {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }
}

impl CandidateSource for BackupFilesSource {
    fn kind(&self) -> DatasetKind {
        DatasetKind::BackupFile
    }

    fn describe(&self) -> String {
        format!("backup files {}/{}*.json", self.dir.display(), self.prefix)
    }

    fn attempt(&self) -> SourceAttempt {
        let latest = match latest_file_with_prefix(&self.dir, &self.prefix, "json") {
            Ok(Some(latest)) => latest,
            Ok(None) => {
                return SourceAttempt::Absent {
                    reason: format!("no {}*.json files in {}", self.prefix, self.dir.display()),
                };
            }
            Err(IngestError::DirectoryNotFound { path }) => {
                return SourceAttempt::Absent {
                    reason: format!("directory {} does not exist", path.display()),
                };
            }
            Err(error) => return SourceAttempt::Unreadable(error),
        };

        tracing::debug!(path = %latest.path.display(), "Selected most recent backup file");

        let raw = match read_race_file(&latest.path) {
            Ok(raw) => raw,
            Err(error) => return SourceAttempt::Unreadable(error),
        };

        if !raw.has_results() {
            return SourceAttempt::Ineligible {
                path: latest.path,
                reason: "backup file carries no results".to_string(),
            };
        }

        let file_name = latest
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let timestamp = raw
            .timestamp_text()
            .or_else(|| file_modified_timestamp(&latest.path))
            .unwrap_or_else(|| UNKNOWN.to_string());
        let provenance =
            Provenance::new(DatasetKind::BackupFile, format!("Backup File: {file_name}"))
                .with_path(&latest.path)
                .with_timestamp(timestamp);

        SourceAttempt::Eligible(ResolvedSource {
            dataset: RawDataset::Race(raw),
            provenance,
        })
    }
}
