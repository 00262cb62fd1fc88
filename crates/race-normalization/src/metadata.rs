//! Session-level facts derived from a resolved dataset.

use race_ingest::{RawDataset, RawRaceFile, ResolvedSource};
use race_model::{
    Provenance, RaceResults, SessionMetadata, UNKNOWN, WinnerSummary, normalize_username,
};
use serde_json::Value;

/// Builds the session metadata for a resolution.
///
/// Fields the tier does not provide fall back to sentinels. The participant
/// tier always reports zero finishers and zero duration.
pub fn extract_metadata(source: &ResolvedSource, results: &RaceResults) -> SessionMetadata {
    let provenance = source.provenance.clone();
    match &source.dataset {
        RawDataset::Race(raw) => race_metadata(raw, results, provenance),
        RawDataset::Participants(_) => SessionMetadata::pending(results.len(), provenance),
    }
}

fn race_metadata(
    raw: &RawRaceFile,
    results: &RaceResults,
    provenance: Provenance,
) -> SessionMetadata {
    let total_participants =
        declared_count(raw.total_participants.as_ref()).unwrap_or(results.len());
    let finishers = declared_count(raw.finishers.as_ref())
        .unwrap_or(results.len())
        .min(total_participants);

    SessionMetadata {
        race_date: text_or_unknown(raw.race_date.as_ref()),
        race_time: text_or_unknown(raw.race_time.as_ref()),
        race_duration_seconds: declared_number(raw.actual_duration.as_ref())
            .filter(|d| *d >= 0.0)
            .unwrap_or(0.0),
        total_participants,
        finishers,
        winner: declared_winner(raw.winner.as_ref()).or_else(|| leader_summary(results)),
        race_id: raw.race_id_text().unwrap_or_else(|| UNKNOWN.to_string()),
        provenance,
    }
}

/// A finite number, written either as a JSON number or a numeric string.
fn declared_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// A non-negative whole count; `3`, `3.0` and `"3"` all read as 3.
fn declared_count(value: Option<&Value>) -> Option<usize> {
    if let Some(Value::Number(number)) = value
        && let Some(count) = number.as_u64()
    {
        return Some(usize::try_from(count).unwrap_or(usize::MAX));
    }
    let number = declared_number(value)?;
    if number < 0.0 || number.fract() != 0.0 {
        return None;
    }
    Some(if number >= usize::MAX as f64 {
        usize::MAX
    } else {
        number as usize
    })
}

/// Trimmed text of a string or number, else [`UNKNOWN`].
fn text_or_unknown(value: Option<&Value>) -> String {
    let text = match value {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    };
    if text.is_empty() {
        UNKNOWN.to_string()
    } else {
        text
    }
}

/// Winner summary as declared by the producer, if it names a username.
fn declared_winner(winner: Option<&Value>) -> Option<WinnerSummary> {
    let winner = winner?.as_object()?;
    let username = normalize_username(winner.get("username")?.as_str()?);
    if username.is_empty() {
        return None;
    }
    let full_name = winner
        .get("fullName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    Some(WinnerSummary {
        username,
        full_name,
        race_time_seconds: winner.get("raceTime").and_then(Value::as_f64),
    })
}

fn leader_summary(results: &RaceResults) -> Option<WinnerSummary> {
    let leader = results.leader()?;
    Some(WinnerSummary {
        username: leader.username.clone(),
        full_name: Some(leader.full_name.clone()),
        race_time_seconds: leader.race_time_seconds(),
    })
}
