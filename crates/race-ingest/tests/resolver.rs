//! Tests for tier precedence in source resolution.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

use race_ingest::{IngestError, RawDataset, SourceConfig, SourceResolver};
use race_model::{DatasetKind, Diagnostics};
use tempfile::TempDir;

const PARTICIPANTS: &str = "Username,Full Name\nace,Ace Pilot\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write file");
    path
}

fn race_file(status: &str, username: &str) -> String {
    format!(
        r#"{{"status": "{status}", "raceId": "{username}-race", "results": [
            {{"username": "@{username}", "fullName": "Racer", "raceTime": 12.5,
              "averageSpeed": 40.0, "boostsUsed": 2, "collisions": 0,
              "distanceCovered": 1.2, "rank": 1}}
        ]}}"#
    )
}

fn resolve(dir: &Path) -> (Result<race_ingest::ResolvedSource, IngestError>, Diagnostics) {
    let resolver = SourceResolver::from_config(&SourceConfig::new(dir));
    let mut diagnostics = Diagnostics::new();
    let result = resolver.resolve(&mut diagnostics);
    (result, diagnostics)
}

fn race_id(dataset: &RawDataset) -> Option<String> {
    match dataset {
        RawDataset::Race(raw) => raw.race_id_text(),
        RawDataset::Participants(_) => None,
    }
}

#[test]
fn completed_live_results_beat_newer_backups() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "instaExport-2025.csv", PARTICIPANTS);
    write(
        dir.path(),
        "latest_race_results.json",
        &race_file("completed", "live"),
    );
    sleep(Duration::from_millis(20));
    write(
        dir.path(),
        "rocket_race_results_2.json",
        &race_file("completed", "backup"),
    );

    let (result, _) = resolve(dir.path());
    let resolved = result.expect("resolved");

    assert_eq!(resolved.kind(), DatasetKind::LiveResults);
    assert_eq!(race_id(&resolved.dataset).as_deref(), Some("live-race"));
}

#[test]
fn float_and_string_counts_keep_live_results_eligible() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "instaExport-2025.csv", PARTICIPANTS);
    write(
        dir.path(),
        "latest_race_results.json",
        r#"{"status": "completed", "finishers": 3.0, "totalParticipants": "4",
            "raceId": "float-race",
            "results": [{"username": "@pilot", "raceTime": 12.5, "averageSpeed": 40.0,
                         "distanceCovered": 1.2, "rank": 1}]}"#,
    );

    let (result, diagnostics) = resolve(dir.path());
    let resolved = result.expect("resolved");

    assert_eq!(resolved.kind(), DatasetKind::LiveResults);
    assert_eq!(race_id(&resolved.dataset).as_deref(), Some("float-race"));
    assert_eq!(diagnostics.warning_count(), 0);
}

#[test]
fn running_live_results_fall_through_to_backup() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "instaExport-2025.csv", PARTICIPANTS);
    write(
        dir.path(),
        "latest_race_results.json",
        &race_file("running", "live"),
    );
    write(
        dir.path(),
        "rocket_race_results_1.json",
        &race_file("completed", "backup"),
    );

    let (result, diagnostics) = resolve(dir.path());
    let resolved = result.expect("resolved");

    assert_eq!(resolved.kind(), DatasetKind::BackupFile);
    assert_eq!(race_id(&resolved.dataset).as_deref(), Some("backup-race"));
    let live_notes: Vec<_> = diagnostics.for_tier(DatasetKind::LiveResults).collect();
    assert_eq!(live_notes.len(), 1);
    assert!(live_notes[0].message.contains("running"));
}

#[test]
fn latest_created_backup_is_selected() {
    let dir = TempDir::new().unwrap();
    // Written in reverse name order so neither name nor listing order explains the pick.
    write(dir.path(), "rocket_race_results_B.json", &race_file("completed", "first"));
    sleep(Duration::from_millis(50));
    write(dir.path(), "rocket_race_results_A.json", &race_file("completed", "second"));

    let (result, _) = resolve(dir.path());
    let resolved = result.expect("resolved");

    assert_eq!(resolved.kind(), DatasetKind::BackupFile);
    assert_eq!(race_id(&resolved.dataset).as_deref(), Some("second-race"));
    assert_eq!(
        resolved.provenance.label,
        "Backup File: rocket_race_results_A.json"
    );
}

#[test]
fn malformed_tiers_fall_through_to_participants() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "latest_race_results.json", "{ truncated");
    write(dir.path(), "rocket_race_results_1.json", "not json either");
    write(dir.path(), "instaExport-2025.csv", PARTICIPANTS);

    let (result, diagnostics) = resolve(dir.path());
    let resolved = result.expect("resolved");

    assert_eq!(resolved.kind(), DatasetKind::ParticipantList);
    assert!(!resolved.has_race_data());
    assert_eq!(diagnostics.warning_count(), 2);
    let RawDataset::Participants(rows) = &resolved.dataset else {
        panic!("expected participant rows");
    };
    assert_eq!(rows.len(), 1);
}

#[test]
fn empty_directory_has_no_data() {
    let dir = TempDir::new().unwrap();

    let (result, diagnostics) = resolve(dir.path());

    let err = result.unwrap_err();
    let IngestError::NoDataAvailable { attempted } = err else {
        panic!("expected NoDataAvailable, got {err}");
    };
    assert_eq!(attempted.len(), 3);
    assert_eq!(diagnostics.error_count(), 1);
}

#[test]
fn explicit_participant_list_path() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "roster.csv", PARTICIPANTS);

    let mut config = SourceConfig::new(dir.path());
    config.participant_list = Some(PathBuf::from("roster.csv"));
    let resolver = SourceResolver::from_config(&config);
    let mut diagnostics = Diagnostics::new();
    let resolved = resolver.resolve(&mut diagnostics).expect("resolved");

    assert_eq!(resolved.kind(), DatasetKind::ParticipantList);
    assert_eq!(
        resolved.provenance.path.as_deref(),
        Some(dir.path().join("roster.csv").as_path())
    );
}
