//! Raw dataset shapes as written by the race simulation and the participant export.

use std::fs;
use std::path::Path;

use chrono::DateTime;
use race_model::{DatasetKind, Provenance};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::{IngestError, Result, file_error};

/// Status value a live results file must declare to be eligible.
pub const COMPLETED_STATUS: &str = "completed";

/// A race results file (live or backup).
///
/// Only `status` and `results` decide eligibility. Session fields stay as
/// untyped JSON so a producer writing `3.0` or `"4"` for a count does not make
/// the whole file unreadable; they are coerced when metadata is extracted.
/// Per-participant entries stay untyped as well so the normalizer can reject
/// malformed entries one at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRaceFile {
    pub status: Option<Value>,
    pub results: Option<Vec<Value>>,
    pub race_date: Option<Value>,
    pub race_time: Option<Value>,
    /// Race duration in seconds.
    pub actual_duration: Option<Value>,
    pub total_participants: Option<Value>,
    pub finishers: Option<Value>,
    pub winner: Option<Value>,
    pub race_id: Option<Value>,
    pub timestamp: Option<Value>,
}

impl RawRaceFile {
    /// True when the producer marked the race as finished.
    pub fn is_completed(&self) -> bool {
        self.status_text().as_deref() == Some(COMPLETED_STATUS)
    }

    /// The declared status, if it is a non-blank string or number.
    pub fn status_text(&self) -> Option<String> {
        self.status.as_ref().and_then(value_text)
    }

    /// Number of raw per-participant entries.
    pub fn result_count(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }

    pub fn has_results(&self) -> bool {
        self.result_count() > 0
    }

    /// The race id rendered as text, whatever JSON type the producer used.
    pub fn race_id_text(&self) -> Option<String> {
        self.race_id.as_ref().and_then(value_text)
    }

    /// The declared timestamp as text.
    ///
    /// Numeric timestamps are read as epoch milliseconds (or seconds when too
    /// small to be milliseconds) and rendered as RFC 3339. Fractional values
    /// such as `1723800000.123` are rounded to the millisecond.
    pub fn timestamp_text(&self) -> Option<String> {
        match self.timestamp.as_ref()? {
            Value::Number(number) => epoch_millis(number)
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.to_rfc3339()),
            other => value_text(other),
        }
    }
}

/// Epoch values at or above this are taken as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

fn epoch_millis(number: &Number) -> Option<i64> {
    if let Some(raw) = number.as_i64() {
        return if raw.abs() >= MILLIS_THRESHOLD {
            Some(raw)
        } else {
            raw.checked_mul(1000)
        };
    }
    let raw = number.as_f64().filter(|v| v.is_finite())?;
    let millis = if raw.abs() >= MILLIS_THRESHOLD as f64 {
        raw
    } else {
        raw * 1000.0
    };
    let millis = millis.round();
    (millis.abs() < i64::MAX as f64).then_some(millis as i64)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Reads and parses a race results file.
pub fn read_race_file(path: &Path) -> Result<RawRaceFile> {
    let content = fs::read_to_string(path).map_err(|e| file_error(path, e))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    serde_json::from_str(content).map_err(|e| IngestError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// One per-participant entry of a race results file.
///
/// Integer counters are signed so negative values surface as record errors
/// rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawRaceRecord {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub race_time: Option<f64>,
    pub average_speed: Option<f64>,
    pub boosts_used: Option<i64>,
    pub collisions: Option<i64>,
    pub distance_covered: Option<f64>,
    pub rank: Option<i64>,
}

/// One row of the participant list export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParticipant {
    /// 1-based row number, excluding the header.
    pub row: usize,
    pub username: Option<String>,
    pub full_name: Option<String>,
}

/// Raw payload of the tier the resolver selected.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDataset {
    Race(RawRaceFile),
    Participants(Vec<RawParticipant>),
}

/// The single dataset chosen by the resolver, tagged with provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSource {
    pub dataset: RawDataset,
    pub provenance: Provenance,
}

impl ResolvedSource {
    pub fn kind(&self) -> DatasetKind {
        self.provenance.kind
    }

    pub fn has_race_data(&self) -> bool {
        self.kind().is_race_tier()
    }
}
