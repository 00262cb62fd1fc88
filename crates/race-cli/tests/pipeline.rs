//! End-to-end refresh cycles over on-disk fixtures.

use std::fs;
use std::path::Path;

use race_analytics::{RowLimit, Standing};
use race_cli::config::DashboardConfig;
use race_cli::pipeline::{Dashboard, load_dashboard};
use race_ingest::ImageMapping;
use race_model::{DatasetKind, Diagnostics, RaceResults};
use race_normalization::PartialRecordError;
use serde::Serialize;
use tempfile::TempDir;

const PARTICIPANTS: &str = "Username,Full Name\nace,Ace Pilot\n,Nobody\nbee,\n";

const LIVE_RESULTS: &str = r#"{
    "status": "completed",
    "raceDate": "2025-08-16",
    "raceTime": "09:15",
    "actualDuration": 95.5,
    "totalParticipants": 4,
    "finishers": 3,
    "raceId": 42,
    "timestamp": "2025-08-16T09:17:00Z",
    "results": [
        {"username": "@pilot1", "fullName": "Pilot One", "raceTime": 60.0,
         "averageSpeed": 120.0, "boostsUsed": 3, "collisions": 1,
         "distanceCovered": 2.0, "rank": 1},
        {"username": "pilot2", "fullName": "Pilot Two", "raceTime": 70.0,
         "averageSpeed": 100.0, "boostsUsed": 5, "collisions": 0,
         "distanceCovered": 1.9, "rank": 2},
        {"username": "pilot3", "raceTime": 80.0, "averageSpeed": 90.0,
         "distanceCovered": 1.8, "rank": 3},
        {"username": "broken", "raceTime": "fast"}
    ]
}"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("write fixture");
}

/// The deterministic part of a pending snapshot.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PendingView<'a> {
    has_race_data: bool,
    race_date: &'a str,
    race_time: &'a str,
    total_participants: usize,
    finishers: usize,
    race_id: &'a str,
    source: &'a str,
    results: &'a RaceResults,
    record_errors: &'a [PartialRecordError],
    image_mapping: &'a ImageMapping,
}

#[test]
fn participant_list_snapshot() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "instaExport-2025-08-16T09-00-00.csv", PARTICIPANTS);
    write(
        dir.path(),
        "image-mapping.json",
        r#"{"@ace": "ace.png", "bee": 3}"#,
    );

    let snapshot = load_dashboard(&DashboardConfig::new(dir.path())).unwrap();
    assert_eq!(
        snapshot.metadata.provenance.kind,
        DatasetKind::ParticipantList
    );
    assert!(
        snapshot
            .diagnostics
            .iter()
            .any(|d| d.message == "skipped 1 malformed record(s)")
    );

    let metadata = &snapshot.metadata;
    let view = PendingView {
        has_race_data: snapshot.has_race_data,
        race_date: &metadata.race_date,
        race_time: &metadata.race_time,
        total_participants: metadata.total_participants,
        finishers: metadata.finishers,
        race_id: &metadata.race_id,
        source: &metadata.provenance.label,
        results: &snapshot.results,
        record_errors: &snapshot.record_errors,
        image_mapping: &snapshot.image_mapping,
    };
    let json = serde_json::to_string_pretty(&view).unwrap();
    insta::assert_snapshot!(json, @r#"
{
  "hasRaceData": false,
  "raceDate": "No race yet",
  "raceTime": "Waiting for first race...",
  "totalParticipants": 2,
  "finishers": 0,
  "raceId": "No race data",
  "source": "CSV participant list",
  "results": {
    "kind": "pending",
    "records": [
      {
        "username": "ace",
        "fullName": "Ace Pilot",
        "boostsUsed": 0,
        "collisions": 0,
        "rank": 1
      },
      {
        "username": "bee",
        "fullName": "bee",
        "boostsUsed": 0,
        "collisions": 0,
        "rank": 2
      }
    ]
  },
  "recordErrors": [
    {
      "position": 2,
      "message": "missing required field 'username'"
    }
  ],
  "imageMapping": {
    "ace": "ace.png"
  }
}
"#);
}

#[test]
fn completed_live_results_drive_the_dashboard() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "instaExport-2025.csv", PARTICIPANTS);
    write(dir.path(), "latest_race_results.json", LIVE_RESULTS);

    let snapshot = load_dashboard(&DashboardConfig::new(dir.path())).unwrap();
    assert!(snapshot.has_race_data);
    assert_eq!(snapshot.metadata.provenance.kind, DatasetKind::LiveResults);
    assert_eq!(snapshot.metadata.race_id, "42");
    assert_eq!(snapshot.metadata.race_date, "2025-08-16");
    assert_eq!(snapshot.metadata.total_participants, 4);
    assert_eq!(snapshot.metadata.finishers, 3);
    assert_eq!(snapshot.metadata.provenance.timestamp, "2025-08-16T09:17:00Z");

    assert_eq!(snapshot.results.len(), 3);
    assert_eq!(snapshot.record_errors.len(), 1);
    assert_eq!(snapshot.record_errors[0].position, 4);
    assert_eq!(
        snapshot.record_errors[0].username.as_deref(),
        Some("broken")
    );

    let winner = snapshot.metadata.winner.as_ref().unwrap();
    assert_eq!(winner.username, "pilot1");

    let analytics = snapshot.analytics();
    let top = analytics.ranked_view(RowLimit::Top(2), None, None);
    let names: Vec<&str> = top.iter().map(|r| r.username.as_str()).collect();
    assert_eq!(names, ["pilot1", "pilot2"]);

    let hits = analytics.search("@PILOT3", Default::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].full_name, "pilot3");
    assert_eq!(Standing::for_rank(hits[0].rank), Standing::Podium);
    let performance = analytics.relative_performance(hits[0]).unwrap();
    assert!(!performance.is_faster_than_average());

    let podium: Vec<&str> = analytics
        .podium()
        .iter()
        .map(|r| r.username.as_str())
        .collect();
    assert_eq!(podium, ["pilot1", "pilot2", "pilot3"]);

    let facts = analytics.fun_facts().unwrap();
    assert_eq!(facts.most_boosts.username, "pilot2");
    assert_eq!(facts.most_collisions.username, "pilot1");
    assert_eq!(facts.highest_speed.username, "pilot1");
}

#[test]
fn missing_data_is_reported_as_no_data() {
    let dir = TempDir::new().unwrap();

    let error = load_dashboard(&DashboardConfig::new(dir.path())).unwrap_err();
    assert!(error.is_no_data());
    assert!(error.diagnostics.error_count() >= 1);
}

#[test]
fn image_mapping_is_read_once_per_dashboard() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "instaExport-2025.csv", PARTICIPANTS);
    write(dir.path(), "image-mapping.json", r#"{"ace": "first.png"}"#);

    let dashboard = Dashboard::new(DashboardConfig::new(dir.path()));
    let first = dashboard.refresh(Diagnostics::new()).unwrap();
    assert_eq!(first.image_for("@ace"), Some("first.png"));

    write(dir.path(), "image-mapping.json", r#"{"ace": "second.png"}"#);
    let second = dashboard.refresh(Diagnostics::new()).unwrap();
    assert_eq!(second.image_for("ace"), Some("first.png"));

    let fresh = load_dashboard(dashboard.config()).unwrap();
    assert_eq!(fresh.image_for("ace"), Some("second.png"));
}

#[test]
fn broken_image_mapping_degrades_to_empty() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "instaExport-2025.csv", PARTICIPANTS);
    write(dir.path(), "image-mapping.json", "[not json");

    let snapshot = load_dashboard(&DashboardConfig::new(dir.path())).unwrap();
    assert!(snapshot.image_mapping.is_empty());
    assert!(snapshot.diagnostics.warning_count() >= 1);
}

#[test]
fn export_json_uses_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "latest_race_results.json", LIVE_RESULTS);

    let snapshot = load_dashboard(&DashboardConfig::new(dir.path())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&snapshot.to_json_pretty().unwrap()).unwrap();
    assert_eq!(value["hasRaceData"], true);
    assert_eq!(value["metadata"]["raceId"], "42");
    assert_eq!(value["results"]["records"][0]["raceTimeSeconds"], 60.0);
    assert_eq!(value["recordErrors"][0]["position"], 4);
}
