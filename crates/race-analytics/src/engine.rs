//! Stateless queries over a normalized result collection.

use race_model::{RaceResult, RaceResults, normalize_username};
use serde::Serialize;

use crate::error::{AnalyticsError, Result};
use crate::query::{NumericField, RowLimit, SearchOptions};

/// Podium size.
pub const PODIUM_SIZE: usize = 3;

/// How one record's time compares to the rest of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelativePerformance {
    /// Arithmetic mean of all race times.
    pub mean_time_seconds: f64,
    /// Record time minus the mean; negative is faster than average.
    pub delta_vs_mean: f64,
    /// Share (0 to 100) of the collection strictly slower than the record.
    pub percentile_faster_than: f64,
}

impl RelativePerformance {
    pub fn is_faster_than_average(&self) -> bool {
        self.delta_vs_mean < 0.0
    }
}

/// Fastest and slowest race time in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeBounds {
    pub min: f64,
    pub max: f64,
}

/// Aggregate figures for a collection. Time figures are absent when pending.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceStatistics {
    pub participants: usize,
    pub average_time_seconds: Option<f64>,
    pub fastest_time_seconds: Option<f64>,
    pub slowest_time_seconds: Option<f64>,
    pub total_boosts: u64,
    pub total_collisions: u64,
}

/// The four headline superlatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunFacts<'a> {
    pub most_boosts: &'a RaceResult,
    pub most_collisions: &'a RaceResult,
    pub longest_distance: &'a RaceResult,
    pub highest_speed: &'a RaceResult,
}

/// Read-only query surface over one [`RaceResults`] collection.
///
/// The collection is already in rank order, so every view that returns
/// records preserves that order.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsEngine<'a> {
    results: &'a RaceResults,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn new(results: &'a RaceResults) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &'a RaceResults {
        self.results
    }

    pub fn has_race_data(&self) -> bool {
        self.results.has_race_data()
    }

    /// Records in rank order, filtered by inclusive time bounds, then truncated.
    ///
    /// Bounds only apply to raced collections; a pending collection is
    /// returned in input order regardless of them.
    pub fn ranked_view(
        &self,
        limit: RowLimit,
        min_time: Option<f64>,
        max_time: Option<f64>,
    ) -> Vec<&'a RaceResult> {
        let apply_bounds = self.has_race_data();
        let mut view: Vec<&'a RaceResult> = self
            .results
            .iter()
            .filter(|record| {
                if !apply_bounds {
                    return true;
                }
                let Some(time) = record.race_time_seconds() else {
                    return false;
                };
                min_time.is_none_or(|min| time >= min) && max_time.is_none_or(|max| time <= max)
            })
            .collect();
        view.truncate(limit.apply(view.len()));
        view
    }

    /// Substring search over usernames, and display names when asked.
    ///
    /// The query is trimmed and a leading `@` removed. An empty query returns
    /// the whole collection; no match is an empty result.
    pub fn search(&self, query: &str, options: SearchOptions) -> Vec<&'a RaceResult> {
        let needle = normalize_username(query);
        if needle.is_empty() {
            return self.results.iter().collect();
        }

        let fold = |text: &str| {
            if options.case_insensitive {
                text.to_lowercase()
            } else {
                text.to_string()
            }
        };
        let needle = fold(&needle);

        let hits: Vec<_> = self
            .results
            .iter()
            .filter(|record| {
                fold(&record.username).contains(&needle)
                    || (options.match_full_name && fold(&record.full_name).contains(&needle))
            })
            .collect();
        tracing::debug!(query = %query, hits = hits.len(), "Search");
        hits
    }

    /// Compares a record's race time with the whole collection.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::NotApplicable`] for pending collections or a record
    /// without a race time, [`AnalyticsError::EmptyCollection`] when there is
    /// nothing to compare against.
    pub fn relative_performance(&self, record: &RaceResult) -> Result<RelativePerformance> {
        const QUERY: &str = "relative performance";
        if !self.has_race_data() {
            return Err(self.not_applicable(QUERY));
        }
        let time = record
            .race_time_seconds()
            .ok_or_else(|| self.not_applicable(QUERY))?;
        let times = self.race_times();
        if times.is_empty() {
            return Err(AnalyticsError::EmptyCollection { query: QUERY });
        }

        let count = times.len() as f64;
        let mean = times.iter().sum::<f64>() / count;
        let slower = times.iter().filter(|t| **t > time).count() as f64;

        Ok(RelativePerformance {
            mean_time_seconds: mean,
            delta_vs_mean: time - mean,
            percentile_faster_than: slower / count * 100.0,
        })
    }

    /// The record with the maximum value of `field`, ties going to the lowest rank.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::EmptyCollection`] for an empty collection,
    /// [`AnalyticsError::NotApplicable`] when no record carries the field.
    pub fn superlative(&self, field: NumericField) -> Result<&'a RaceResult> {
        const QUERY: &str = "superlative";
        if self.results.is_empty() {
            return Err(AnalyticsError::EmptyCollection { query: QUERY });
        }

        let mut best: Option<(f64, &'a RaceResult)> = None;
        for record in self.results {
            let Some(value) = field.value(record) else {
                continue;
            };
            let replace = match best {
                None => true,
                Some((best_value, best_record)) => {
                    value > best_value || (value == best_value && record.rank < best_record.rank)
                }
            };
            if replace {
                best = Some((value, record));
            }
        }

        best.map(|(_, record)| record)
            .ok_or_else(|| self.not_applicable(QUERY))
    }

    /// Most boosts, most collisions, longest distance and highest speed.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::NotApplicable`] for pending collections,
    /// [`AnalyticsError::EmptyCollection`] when empty.
    pub fn fun_facts(&self) -> Result<FunFacts<'a>> {
        if !self.has_race_data() {
            return Err(self.not_applicable("fun facts"));
        }
        Ok(FunFacts {
            most_boosts: self.superlative(NumericField::BoostsUsed)?,
            most_collisions: self.superlative(NumericField::Collisions)?,
            longest_distance: self.superlative(NumericField::DistanceCoveredKm)?,
            highest_speed: self.superlative(NumericField::AverageSpeedKmh)?,
        })
    }

    pub fn statistics(&self) -> RaceStatistics {
        let times = self.race_times();
        let average = if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<f64>() / times.len() as f64)
        };
        let bounds = self.time_bounds();

        RaceStatistics {
            participants: self.results.len(),
            average_time_seconds: average,
            fastest_time_seconds: bounds.map(|b| b.min),
            slowest_time_seconds: bounds.map(|b| b.max),
            total_boosts: self.results.iter().map(|r| u64::from(r.boosts_used)).sum(),
            total_collisions: self.results.iter().map(|r| u64::from(r.collisions)).sum(),
        }
    }

    /// Fastest and slowest time, absent when no record has one.
    pub fn time_bounds(&self) -> Option<TimeBounds> {
        self.results
            .iter()
            .filter_map(RaceResult::race_time_seconds)
            .fold(None, |bounds, time| match bounds {
                None => Some(TimeBounds {
                    min: time,
                    max: time,
                }),
                Some(b) => Some(TimeBounds {
                    min: b.min.min(time),
                    max: b.max.max(time),
                }),
            })
    }

    /// The top three records.
    pub fn podium(&self) -> &'a [RaceResult] {
        let records = self.results.records();
        &records[..records.len().min(PODIUM_SIZE)]
    }

    fn race_times(&self) -> Vec<f64> {
        self.results
            .iter()
            .filter_map(RaceResult::race_time_seconds)
            .collect()
    }

    fn not_applicable(&self, query: &'static str) -> AnalyticsError {
        AnalyticsError::NotApplicable {
            query,
            kind: self.results.kind(),
        }
    }
}
