//! Canonical per-participant records and the homogeneous result collection.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Strips surrounding whitespace and any leading `@` sigils from a username.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_string()
}

/// Race outcome figures for a participant that finished a race.
///
/// Kept together so a record either carries all of them or none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceMetrics {
    pub race_time_seconds: f64,
    pub average_speed_kmh: f64,
    pub distance_covered_km: f64,
}

impl RaceMetrics {
    fn validate(&self, username: &str) -> Result<()> {
        let fields = [
            ("raceTimeSeconds", self.race_time_seconds),
            ("averageSpeedKmh", self.average_speed_kmh),
            ("distanceCoveredKm", self.distance_covered_km),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidMetric {
                    username: username.to_string(),
                    field,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// One canonical record per participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub username: String,
    pub full_name: String,
    #[serde(flatten)]
    pub metrics: Option<RaceMetrics>,
    pub boosts_used: u32,
    pub collisions: u32,
    pub rank: u32,
}

impl RaceResult {
    /// Creates a record for a participant that has not raced yet.
    pub fn pending(username: impl Into<String>, full_name: impl Into<String>, rank: u32) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            metrics: None,
            boosts_used: 0,
            collisions: 0,
            rank,
        }
    }

    /// Creates a record for a participant with race outcomes.
    pub fn raced(
        username: impl Into<String>,
        full_name: impl Into<String>,
        metrics: RaceMetrics,
        boosts_used: u32,
        collisions: u32,
        rank: u32,
    ) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            metrics: Some(metrics),
            boosts_used,
            collisions,
            rank,
        }
    }

    pub fn race_time_seconds(&self) -> Option<f64> {
        self.metrics.map(|m| m.race_time_seconds)
    }

    pub fn average_speed_kmh(&self) -> Option<f64> {
        self.metrics.map(|m| m.average_speed_kmh)
    }

    pub fn distance_covered_km(&self) -> Option<f64> {
        self.metrics.map(|m| m.distance_covered_km)
    }

    pub fn has_race_data(&self) -> bool {
        self.metrics.is_some()
    }
}

/// Whether a collection carries race outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultsKind {
    /// Every record has race metrics, ordered by finish.
    Raced,
    /// No record has race metrics, ordered by input position.
    Pending,
}

impl fmt::Display for ResultsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raced => write!(f, "raced"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// Ordered, homogeneous collection of [`RaceResult`] records.
///
/// Invariants, checked on every insertion:
/// - all records match the collection [`ResultsKind`]
/// - usernames are non-empty and unique
/// - ranks are positive and strictly increasing in collection order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceResults {
    kind: ResultsKind,
    records: Vec<RaceResult>,
}

impl RaceResults {
    /// Builds a collection, failing on the first invariant violation.
    pub fn new(kind: ResultsKind, records: Vec<RaceResult>) -> Result<Self> {
        let mut builder = RaceResultsBuilder::new(kind);
        for record in records {
            builder.push(record)?;
        }
        Ok(builder.finish())
    }

    pub fn raced(records: Vec<RaceResult>) -> Result<Self> {
        Self::new(ResultsKind::Raced, records)
    }

    pub fn pending(records: Vec<RaceResult>) -> Result<Self> {
        Self::new(ResultsKind::Pending, records)
    }

    pub fn empty(kind: ResultsKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> ResultsKind {
        self.kind
    }

    /// True for a raced collection.
    pub fn has_race_data(&self) -> bool {
        self.kind == ResultsKind::Raced
    }

    pub fn records(&self) -> &[RaceResult] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RaceResult> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The top-ranked record.
    pub fn leader(&self) -> Option<&RaceResult> {
        self.records.first()
    }

    pub fn find(&self, username: &str) -> Option<&RaceResult> {
        let wanted = normalize_username(username);
        self.records.iter().find(|r| r.username == wanted)
    }
}

impl<'a> IntoIterator for &'a RaceResults {
    type Item = &'a RaceResult;
    type IntoIter = std::slice::Iter<'a, RaceResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Incremental construction of a [`RaceResults`] collection.
///
/// A rejected record leaves the builder untouched, so callers can report it
/// and keep going with the rest of their input.
#[derive(Debug)]
pub struct RaceResultsBuilder {
    kind: ResultsKind,
    records: Vec<RaceResult>,
    seen: BTreeSet<String>,
}

impl RaceResultsBuilder {
    pub fn new(kind: ResultsKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> ResultsKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rank of the last accepted record.
    pub fn last_rank(&self) -> Option<u32> {
        self.records.last().map(|r| r.rank)
    }

    /// Validates and appends a record.
    pub fn push(&mut self, record: RaceResult) -> Result<()> {
        self.check(&record)?;
        self.seen.insert(record.username.clone());
        self.records.push(record);
        Ok(())
    }

    fn check(&self, record: &RaceResult) -> Result<()> {
        if record.username.is_empty() {
            return Err(ModelError::EmptyUsername);
        }
        let expects_metrics = self.kind == ResultsKind::Raced;
        if record.has_race_data() != expects_metrics {
            return Err(ModelError::MixedCollection {
                username: record.username.clone(),
                expected: self.kind,
            });
        }
        if let Some(metrics) = &record.metrics {
            metrics.validate(&record.username)?;
        }
        if record.rank == 0 {
            return Err(ModelError::ZeroRank {
                username: record.username.clone(),
            });
        }
        if let Some(previous) = self.last_rank()
            && record.rank <= previous
        {
            return Err(ModelError::RankOrder {
                username: record.username.clone(),
                rank: record.rank,
                previous,
            });
        }
        if self.seen.contains(&record.username) {
            return Err(ModelError::DuplicateUsername {
                username: record.username.clone(),
            });
        }
        Ok(())
    }

    pub fn finish(self) -> RaceResults {
        RaceResults {
            kind: self.kind,
            records: self.records,
        }
    }
}
