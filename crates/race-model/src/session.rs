//! Session-level metadata and dataset provenance.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Placeholder for a field the source did not declare.
pub const UNKNOWN: &str = "Unknown";
/// Race date shown while only the participant list is available.
pub const NO_RACE_DATE: &str = "No race yet";
/// Race time shown while only the participant list is available.
pub const WAITING_FOR_RACE: &str = "Waiting for first race...";
/// Race id shown while only the participant list is available.
pub const NO_RACE_ID: &str = "No race data";
/// Timestamp placeholder for a source that never recorded one.
pub const NEVER: &str = "Never";

/// The three mutually exclusive dataset tiers, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    LiveResults,
    BackupFile,
    ParticipantList,
}

impl DatasetKind {
    /// Whether datasets of this kind carry race outcomes.
    #[must_use]
    pub const fn is_race_tier(&self) -> bool {
        matches!(self, Self::LiveResults | Self::BackupFile)
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::LiveResults => "Live results",
            Self::BackupFile => "Backup file",
            Self::ParticipantList => "Participant list",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Where a resolved dataset came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub kind: DatasetKind,
    /// Human readable description, e.g. "Backup File: rocket_race_results_1.json".
    pub label: String,
    /// The file the dataset was read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Declared timestamp of the payload, or the file's modification time.
    pub timestamp: String,
}

impl Provenance {
    pub fn new(kind: DatasetKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            path: None,
            timestamp: UNKNOWN.to_string(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }
}

/// Short description of the race winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerSummary {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race_time_seconds: Option<f64>,
}

/// Session-level facts derived from one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub race_date: String,
    pub race_time: String,
    pub race_duration_seconds: f64,
    pub total_participants: usize,
    pub finishers: usize,
    pub winner: Option<WinnerSummary>,
    pub race_id: String,
    pub provenance: Provenance,
}

impl SessionMetadata {
    /// Metadata for a dataset that has no race outcomes yet.
    pub fn pending(total_participants: usize, provenance: Provenance) -> Self {
        Self {
            race_date: NO_RACE_DATE.to_string(),
            race_time: WAITING_FOR_RACE.to_string(),
            race_duration_seconds: 0.0,
            total_participants,
            finishers: 0,
            winner: None,
            race_id: NO_RACE_ID.to_string(),
            provenance,
        }
    }

    pub fn has_race_data(&self) -> bool {
        self.provenance.kind.is_race_tier()
    }
}
