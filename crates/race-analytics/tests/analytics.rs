//! Property tests for the analytics engine.

use proptest::prelude::*;
use race_analytics::{AnalyticsEngine, AnalyticsError, NumericField, RowLimit, SearchOptions};
use race_model::{RaceMetrics, RaceResult, RaceResults};

fn raced_collection() -> impl Strategy<Value = RaceResults> {
    proptest::collection::vec((1.0f64..300.0, 0u32..20, 0u32..10), 0..30).prop_map(|rows| {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, (time, boosts, collisions))| {
                let metrics = RaceMetrics {
                    race_time_seconds: time,
                    average_speed_kmh: 360.0 / time,
                    distance_covered_km: 1.0,
                };
                RaceResult::raced(
                    format!("racer{i}"),
                    format!("Racer {i}"),
                    metrics,
                    boosts,
                    collisions,
                    i as u32 + 1,
                )
            })
            .collect();
        RaceResults::raced(records).unwrap()
    })
}

fn pending_collection() -> impl Strategy<Value = RaceResults> {
    (0usize..30).prop_map(|n| {
        let records = (0..n)
            .map(|i| RaceResult::pending(format!("p{i}"), format!("P {i}"), i as u32 + 1))
            .collect();
        RaceResults::pending(records).unwrap()
    })
}

#[test]
fn superlative_tie_example() {
    let metrics = RaceMetrics {
        race_time_seconds: 10.0,
        average_speed_kmh: 40.0,
        distance_covered_km: 1.0,
    };
    let results = RaceResults::raced(vec![
        RaceResult::raced("a", "a", metrics, 3, 0, 1),
        RaceResult::raced("b", "b", metrics, 7, 0, 2),
        RaceResult::raced("c", "c", metrics, 7, 0, 3),
    ])
    .unwrap();

    let top = AnalyticsEngine::new(&results)
        .superlative(NumericField::BoostsUsed)
        .unwrap();
    assert_eq!(top.username, "b");
}

proptest! {
    #[test]
    fn empty_search_is_identity(results in raced_collection()) {
        let engine = AnalyticsEngine::new(&results);
        let all: Vec<&RaceResult> = results.iter().collect();
        prop_assert_eq!(engine.search("", SearchOptions::default()), all.clone());
        prop_assert_eq!(engine.search("   ", SearchOptions::default()), all);
        prop_assert!(engine.search("zzzznomatch", SearchOptions::default()).is_empty());
    }

    #[test]
    fn ranked_view_respects_limit_and_order(results in raced_collection(), top in 0usize..40) {
        let engine = AnalyticsEngine::new(&results);
        let view = engine.ranked_view(RowLimit::Top(top), None, None);
        prop_assert_eq!(view.len(), results.len().min(top));
        prop_assert!(view.windows(2).all(|w| w[0].rank < w[1].rank));
        prop_assert_eq!(engine.ranked_view(RowLimit::All, None, None).len(), results.len());
    }

    #[test]
    fn ranked_view_bounds_are_inclusive(results in raced_collection()) {
        let engine = AnalyticsEngine::new(&results);
        if let Some(bounds) = engine.time_bounds() {
            let view = engine.ranked_view(RowLimit::All, Some(bounds.min), Some(bounds.max));
            prop_assert_eq!(view.len(), results.len());
        } else {
            prop_assert!(results.is_empty());
        }
    }

    #[test]
    fn percentile_is_a_share(results in raced_collection()) {
        let engine = AnalyticsEngine::new(&results);
        for record in &results {
            let perf = engine.relative_performance(record).unwrap();
            prop_assert!((0.0..=100.0).contains(&perf.percentile_faster_than));
            let time = record.race_time_seconds().unwrap_or_default();
            prop_assert!((perf.delta_vs_mean - (time - perf.mean_time_seconds)).abs() < 1e-9);
        }
    }

    #[test]
    fn superlative_holds_the_maximum(results in raced_collection()) {
        let engine = AnalyticsEngine::new(&results);
        match engine.superlative(NumericField::BoostsUsed) {
            Ok(top) => {
                prop_assert!(results.iter().all(|r| r.boosts_used <= top.boosts_used));
                let first_max = results
                    .iter()
                    .find(|r| r.boosts_used == top.boosts_used)
                    .map(|r| r.rank);
                prop_assert_eq!(first_max, Some(top.rank));
            }
            Err(err) => {
                prop_assert!(results.is_empty());
                prop_assert_eq!(err, AnalyticsError::EmptyCollection { query: "superlative" });
            }
        }
    }

    #[test]
    fn pending_collections_reject_performance(results in pending_collection()) {
        let engine = AnalyticsEngine::new(&results);
        for record in &results {
            let is_not_applicable = matches!(
                engine.relative_performance(record),
                Err(AnalyticsError::NotApplicable { .. })
            );
            prop_assert!(is_not_applicable);
        }
        let view = engine.ranked_view(RowLimit::All, Some(1.0), Some(2.0));
        prop_assert_eq!(view.len(), results.len());
    }
}
