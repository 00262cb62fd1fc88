use std::path::{Path, PathBuf};

use race_model::{DatasetKind, NEVER, Provenance};

use crate::csv::read_participant_list;
use crate::discovery::{file_modified_timestamp, list_files_with_prefix};
use crate::error::IngestError;
use crate::raw::{RawDataset, ResolvedSource};

use super::{CandidateSource, SourceAttempt};

/// Label attached to datasets read from the participant list.
pub const PARTICIPANT_LIST_LABEL: &str = "CSV participant list";

/// The static participant export, read as a pending dataset.
///
/// Uses the explicit path when configured, otherwise the lexicographically
/// last `<prefix>*.csv` in the data directory. Export names embed an ISO
/// timestamp, so that is also the newest export.
#[derive(Debug, Clone)]
pub struct ParticipantListSource {
    dir: PathBuf,
    prefix: String,
    explicit: Option<PathBuf>,
}

impl ParticipantListSource {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            explicit: None,
        }
    }

    /// Reads this file instead of discovering one.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    fn locate(&self) -> Result<Option<PathBuf>, IngestError> {
        if let Some(path) = &self.explicit {
            return Ok(Some(path.clone()));
        }
        let mut files = list_files_with_prefix(&self.dir, &self.prefix, "csv")?;
        Ok(files.pop())
    }
}

impl CandidateSource for ParticipantListSource {
    fn kind(&self) -> DatasetKind {
        DatasetKind::ParticipantList
    }

    fn describe(&self) -> String {
        match &self.explicit {
            Some(path) => format!("participant list {}", path.display()),
            None => format!("participant list {}/{}*.csv", self.dir.display(), self.prefix),
        }
    }

    fn attempt(&self) -> SourceAttempt {
        let path = match self.locate() {
            Ok(Some(path)) => path,
            Ok(None) => {
                return SourceAttempt::Absent {
                    reason: format!("no {}*.csv export in {}", self.prefix, self.dir.display()),
                };
            }
            Err(IngestError::DirectoryNotFound { path }) => {
                return SourceAttempt::Absent {
                    reason: format!("directory {} does not exist", path.display()),
                };
            }
            Err(error) => return SourceAttempt::Unreadable(error),
        };

        if !path.is_file() {
            return SourceAttempt::Absent {
                reason: format!("{} does not exist", path.display()),
            };
        }

        let participants = match read_participant_list(&path) {
            Ok(participants) => participants,
            Err(error) => return SourceAttempt::Unreadable(error),
        };

        let provenance = Provenance::new(DatasetKind::ParticipantList, PARTICIPANT_LIST_LABEL)
            .with_path(&path)
            .with_timestamp(export_timestamp(&path));

        SourceAttempt::Eligible(ResolvedSource {
            dataset: RawDataset::Participants(participants),
            provenance,
        })
    }
}

/// When the export was last written, or [`NEVER`] if the platform cannot say.
fn export_timestamp(path: &Path) -> String {
    file_modified_timestamp(path).unwrap_or_else(|| NEVER.to_string())
}
