//! Query parameters accepted by the analytics engine.

use std::fmt;
use std::str::FromStr;

use race_model::RaceResult;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// How many rows a ranked view returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLimit {
    /// No limit.
    #[default]
    All,
    /// At most this many rows.
    Top(usize),
}

impl RowLimit {
    /// Truncation length for a collection of `len` rows.
    pub fn apply(&self, len: usize) -> usize {
        match self {
            Self::All => len,
            Self::Top(n) => len.min(*n),
        }
    }
}

impl FromStr for RowLimit {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<usize>()
            .map(Self::Top)
            .map_err(|_| AnalyticsError::InvalidRowLimit {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Top(n) => write!(f, "{n}"),
        }
    }
}

/// Matching options for [`AnalyticsEngine::search`](crate::AnalyticsEngine::search).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub case_insensitive: bool,
    /// Also match against the display name.
    pub match_full_name: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            match_full_name: false,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    #[must_use]
    pub fn with_full_name(mut self) -> Self {
        self.match_full_name = true;
        self
    }
}

/// Numeric fields a superlative can be taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumericField {
    BoostsUsed,
    Collisions,
    DistanceCoveredKm,
    AverageSpeedKmh,
}

impl NumericField {
    pub const ALL: [NumericField; 4] = [
        Self::BoostsUsed,
        Self::Collisions,
        Self::DistanceCoveredKm,
        Self::AverageSpeedKmh,
    ];

    /// The field's value on a record, absent for pending metrics.
    pub fn value(&self, record: &RaceResult) -> Option<f64> {
        match self {
            Self::BoostsUsed => Some(f64::from(record.boosts_used)),
            Self::Collisions => Some(f64::from(record.collisions)),
            Self::DistanceCoveredKm => record.distance_covered_km(),
            Self::AverageSpeedKmh => record.average_speed_kmh(),
        }
    }

    /// Canonical serialized name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BoostsUsed => "boostsUsed",
            Self::Collisions => "collisions",
            Self::DistanceCoveredKm => "distanceCoveredKm",
            Self::AverageSpeedKmh => "averageSpeedKmh",
        }
    }
}

impl FromStr for NumericField {
    type Err = AnalyticsError;

    /// Accepts canonical, producer and snake_case names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "boostsused" | "boosts" => Ok(Self::BoostsUsed),
            "collisions" => Ok(Self::Collisions),
            "distancecoveredkm" | "distancecovered" | "distance" => Ok(Self::DistanceCoveredKm),
            "averagespeedkmh" | "averagespeed" | "speed" => Ok(Self::AverageSpeedKmh),
            _ => Err(AnalyticsError::UnknownField {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
