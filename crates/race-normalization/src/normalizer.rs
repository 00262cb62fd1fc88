//! Mapping of raw datasets onto the canonical record collection.

use race_ingest::{RawDataset, RawParticipant, RawRaceRecord, ResolvedSource};
use race_model::{
    RaceMetrics, RaceResult, RaceResults, RaceResultsBuilder, ResultsKind, normalize_username,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::{PartialRecordError, RecordError, Result};
use crate::fields::RaceField;

/// The valid subset of a dataset plus the records that were skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResults {
    pub results: RaceResults,
    pub record_errors: Vec<PartialRecordError>,
}

impl NormalizedResults {
    pub fn has_record_errors(&self) -> bool {
        !self.record_errors.is_empty()
    }
}

/// Normalizes the dataset chosen by the resolver.
///
/// Race tiers yield a raced collection and the participant list a pending
/// one; the collection kind is decided once for the whole dataset. Record
/// order is preserved as the tier encodes it.
pub fn normalize(source: &ResolvedSource) -> NormalizedResults {
    let normalized = match &source.dataset {
        RawDataset::Race(raw) => {
            normalize_race_records(raw.results.as_deref().unwrap_or_default())
        }
        RawDataset::Participants(rows) => normalize_participants(rows),
    };
    tracing::info!(
        tier = %source.kind(),
        kind = %normalized.results.kind(),
        records = normalized.results.len(),
        skipped = normalized.record_errors.len(),
        "Normalized dataset"
    );
    normalized
}

/// Normalizes per-participant entries of a race results file.
pub fn normalize_race_records(entries: &[Value]) -> NormalizedResults {
    let mut builder = RaceResultsBuilder::new(ResultsKind::Raced);
    let mut record_errors = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        let position = index + 1;
        let outcome = race_record(entry, position).and_then(|record| {
            let username = record.username.clone();
            builder
                .push(record)
                .map_err(|e| (Some(username), RecordError::from(e)))
        });
        if let Err((username, error)) = outcome {
            record_errors.push(skip(position, username, error));
        }
    }

    NormalizedResults {
        results: builder.finish(),
        record_errors,
    }
}

/// Normalizes participant list rows into pending records.
///
/// Ranks follow the order of accepted rows.
pub fn normalize_participants(rows: &[RawParticipant]) -> NormalizedResults {
    let mut builder = RaceResultsBuilder::new(ResultsKind::Pending);
    let mut record_errors = Vec::new();

    for row in rows {
        let username = row.username.as_deref().map(normalize_username);
        let outcome = match username.as_deref() {
            None => Err(RecordError::MissingField {
                field: RaceField::Username,
            }),
            Some("") => Err(RecordError::EmptyUsername),
            Some(username) => {
                let full_name = display_name(row.full_name.as_deref(), username);
                let rank = builder.last_rank().unwrap_or(0) + 1;
                builder
                    .push(RaceResult::pending(username, full_name, rank))
                    .map_err(RecordError::from)
            }
        };
        if let Err(error) = outcome {
            let username = username.filter(|u| !u.is_empty());
            record_errors.push(skip(row.row, username, error));
        }
    }

    NormalizedResults {
        results: builder.finish(),
        record_errors,
    }
}

type RecordOutcome = std::result::Result<RaceResult, (Option<String>, RecordError)>;

fn race_record(entry: &Value, position: usize) -> RecordOutcome {
    let raw: RawRaceRecord = serde_json::from_value(entry.clone()).map_err(|e| {
        let username = entry
            .get(RaceField::Username.raw_name())
            .and_then(Value::as_str)
            .map(normalize_username)
            .filter(|u| !u.is_empty());
        (
            username,
            RecordError::Malformed {
                message: e.to_string(),
            },
        )
    })?;

    let username = match raw.username.as_deref().map(normalize_username) {
        None => {
            return Err((
                None,
                RecordError::MissingField {
                    field: RaceField::Username,
                },
            ));
        }
        Some(username) if username.is_empty() => return Err((None, RecordError::EmptyUsername)),
        Some(username) => username,
    };

    build_race_record(&raw, &username, position).map_err(|e| (Some(username), e))
}

fn build_race_record(raw: &RawRaceRecord, username: &str, position: usize) -> Result<RaceResult> {
    let metrics = RaceMetrics {
        race_time_seconds: required(raw.race_time, RaceField::RaceTime)?,
        average_speed_kmh: required(raw.average_speed, RaceField::AverageSpeed)?,
        distance_covered_km: required(raw.distance_covered, RaceField::DistanceCovered)?,
    };
    let boosts_used = count(raw.boosts_used.unwrap_or(0), RaceField::BoostsUsed)?;
    let collisions = count(raw.collisions.unwrap_or(0), RaceField::Collisions)?;
    let fallback_rank = i64::try_from(position).unwrap_or(i64::MAX);
    let rank = count(raw.rank.unwrap_or(fallback_rank), RaceField::Rank)?;

    Ok(RaceResult::raced(
        username,
        display_name(raw.full_name.as_deref(), username),
        metrics,
        boosts_used,
        collisions,
        rank,
    ))
}

fn required(value: Option<f64>, field: RaceField) -> Result<f64> {
    value.ok_or(RecordError::MissingField { field })
}

fn count(value: i64, field: RaceField) -> Result<u32> {
    u32::try_from(value).map_err(|_| RecordError::InvalidCount { field, value })
}

fn display_name(full_name: Option<&str>, username: &str) -> String {
    full_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(username)
        .to_string()
}

fn skip(position: usize, username: Option<String>, error: RecordError) -> PartialRecordError {
    tracing::warn!(
        position,
        username = username.as_deref().unwrap_or(""),
        error = %error,
        "Skipping record"
    );
    PartialRecordError {
        position,
        username,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use race_model::ModelError;
    use serde_json::json;

    fn participant(row: usize, username: &str, full_name: Option<&str>) -> RawParticipant {
        RawParticipant {
            row,
            username: Some(username.to_string()),
            full_name: full_name.map(str::to_string),
        }
    }

    #[test]
    fn test_race_record_strips_sigil_and_defaults_name() {
        let normalized = normalize_race_records(&[json!({
            "username": "@ace",
            "raceTime": 10.0,
            "averageSpeed": 50.0,
            "distanceCovered": 1.5,
            "rank": 1
        })]);

        assert!(!normalized.has_record_errors());
        let record = &normalized.results.records()[0];
        assert_eq!(record.username, "ace");
        assert_eq!(record.full_name, "ace");
        assert_eq!(record.boosts_used, 0);
        assert_eq!(record.collisions, 0);
    }

    #[test]
    fn test_missing_metric_skips_only_that_record() {
        let normalized = normalize_race_records(&[
            json!({"username": "a", "raceTime": 10.0, "averageSpeed": 50.0, "distanceCovered": 1.0, "rank": 1}),
            json!({"username": "b", "averageSpeed": 45.0, "distanceCovered": 1.0, "rank": 2}),
            json!({"username": "c", "raceTime": 12.0, "averageSpeed": 40.0, "distanceCovered": 1.0, "rank": 3}),
        ]);

        let names: Vec<_> = normalized
            .results
            .iter()
            .map(|r| r.username.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(
            normalized.record_errors,
            vec![PartialRecordError {
                position: 2,
                username: Some("b".to_string()),
                error: RecordError::MissingField {
                    field: RaceField::RaceTime,
                },
            }]
        );
    }

    #[test]
    fn test_rank_falls_back_to_position() {
        let normalized = normalize_race_records(&[
            json!({"username": "a", "raceTime": 10.0, "averageSpeed": 50.0, "distanceCovered": 1.0}),
            json!({"username": "b", "raceTime": 11.0, "averageSpeed": 49.0, "distanceCovered": 1.0}),
        ]);
        let ranks: Vec<_> = normalized.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn test_negative_counter_is_rejected() {
        let normalized = normalize_race_records(&[json!({
            "username": "a", "raceTime": 10.0, "averageSpeed": 50.0,
            "distanceCovered": 1.0, "boostsUsed": -1, "rank": 1
        })]);
        assert!(normalized.results.is_empty());
        assert_eq!(
            normalized.record_errors[0].error,
            RecordError::InvalidCount {
                field: RaceField::BoostsUsed,
                value: -1,
            }
        );
    }

    #[test]
    fn test_duplicate_username_is_reported() {
        let normalized = normalize_race_records(&[
            json!({"username": "@a", "raceTime": 10.0, "averageSpeed": 50.0, "distanceCovered": 1.0, "rank": 1}),
            json!({"username": "a", "raceTime": 11.0, "averageSpeed": 49.0, "distanceCovered": 1.0, "rank": 2}),
        ]);
        assert_eq!(normalized.results.len(), 1);
        assert_eq!(
            normalized.record_errors[0].error,
            RecordError::Model(ModelError::DuplicateUsername {
                username: "a".to_string(),
            })
        );
    }

    #[test]
    fn test_malformed_entry_keeps_username() {
        let normalized = normalize_race_records(&[json!({"username": "@a", "raceTime": "fast"})]);
        let error = &normalized.record_errors[0];
        assert_eq!(error.username.as_deref(), Some("a"));
        assert!(matches!(error.error, RecordError::Malformed { .. }));

        let normalized = normalize_race_records(&[json!("not an object")]);
        assert_eq!(normalized.record_errors[0].username, None);
    }

    #[test]
    fn test_participants_are_pending_in_row_order() {
        let normalized = normalize_participants(&[
            participant(1, "  zed ", Some("Zed Z")),
            participant(2, "amy", None),
            participant(3, "   ", Some("Nobody")),
            participant(4, "bob", Some("  ")),
        ]);

        assert_eq!(normalized.results.kind(), ResultsKind::Pending);
        let rows: Vec<_> = normalized
            .results
            .iter()
            .map(|r| (r.username.as_str(), r.full_name.as_str(), r.rank))
            .collect();
        assert_eq!(
            rows,
            vec![("zed", "Zed Z", 1), ("amy", "amy", 2), ("bob", "bob", 3)]
        );
        assert_eq!(normalized.record_errors.len(), 1);
        assert_eq!(normalized.record_errors[0].position, 3);
        assert_eq!(normalized.record_errors[0].error, RecordError::EmptyUsername);
    }

    #[test]
    fn test_participant_without_username_column_value() {
        let normalized = normalize_participants(&[RawParticipant {
            row: 1,
            username: None,
            full_name: Some("Ghost".to_string()),
        }]);
        assert!(normalized.results.is_empty());
        assert_eq!(
            normalized.record_errors[0].error,
            RecordError::MissingField {
                field: RaceField::Username,
            }
        );
    }
}
