//! Integration tests for the snapshot publisher's file output.
//!
//! Each test writes into its own directory under the system temp dir and
//! drives the publisher with views produced by a real `MatchState`.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::PathBuf;

use scorebug_core::command::Command;
use scorebug_core::config::{ClockConfig, OverlayConfig, PathsConfig};
use scorebug_core::match_state::MatchState;
use scorebug_core::roster::EmptyRoster;
use scorebug_core::session::SnapshotSink;
use scorebug_publish::SnapshotPublisher;
use scorebug_types::{Side, StateRecord};

const T0: i64 = 1_700_000_000_000;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "scorebug-publish-{name}-{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn paths(dir: &std::path::Path) -> PathsConfig {
    PathsConfig {
        document_file: dir.join("TXT").join("salida.html"),
        record_file: dir.join("TXT").join("estado.json"),
        ..PathsConfig::default()
    }
}

fn match_state() -> MatchState {
    MatchState::new(&ClockConfig::default(), &OverlayConfig::default())
}

#[test]
fn unchanged_document_is_not_rewritten_but_record_is() {
    let dir = scratch("unchanged");
    let paths = paths(&dir);
    let mut publisher = SnapshotPublisher::new(&paths).unwrap();
    let state = match_state();

    let first = publisher
        .publish_snapshot(&state.view(T0, &EmptyRoster))
        .unwrap();
    assert!(first.document_written);
    assert!(paths.document_file.exists());

    fs::remove_file(&paths.record_file).unwrap();
    let second = publisher
        .publish_snapshot(&state.view(T0 + 300, &EmptyRoster))
        .unwrap();
    assert!(!second.document_written);
    assert!(paths.record_file.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn running_clock_rewrites_document_each_second() {
    let dir = scratch("running");
    let paths = paths(&dir);
    let mut publisher = SnapshotPublisher::new(&paths).unwrap();
    let mut state = match_state();
    state
        .apply(Command::ToggleClock { confirm: None }, T0)
        .unwrap();

    let at_start = publisher
        .publish_snapshot(&state.view(T0, &EmptyRoster))
        .unwrap();
    let same_second = publisher
        .publish_snapshot(&state.view(T0 + 400, &EmptyRoster))
        .unwrap();
    let next_second = publisher
        .publish_snapshot(&state.view(T0 + 1_000, &EmptyRoster))
        .unwrap();

    assert!(at_start.document_written);
    assert!(!same_second.document_written);
    assert!(next_second.document_written);
    assert_eq!(next_second.record.clock, "00:01");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn record_file_uses_published_field_names() {
    let dir = scratch("fields");
    let paths = paths(&dir);
    let mut publisher = SnapshotPublisher::new(&paths).unwrap();
    let mut state = match_state();
    state
        .apply(Command::RecordGoal { side: Side::Home, scorer: None }, T0)
        .unwrap();

    publisher.publish(&state.view(T0, &EmptyRoster));

    let raw = fs::read_to_string(&paths.record_file).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    for key in [
        "teamHome",
        "teamAway",
        "colorHome",
        "colorAway",
        "textColorHome",
        "textColorAway",
        "scoreHome",
        "scoreAway",
        "clock",
        "addedMinutes",
        "overlayMarkup",
        "overlayKind",
        "redCardsHome",
        "redCardsAway",
        "flashColor",
        "running",
        "startEpochMs",
        "elapsedMs",
        "baseMs",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }

    let record: StateRecord = serde_json::from_str(&raw).unwrap();
    assert_eq!(record.score_home, 1);
    assert_eq!(record.overlay_kind, "");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn failed_document_write_still_writes_record_and_retries() {
    let dir = scratch("failure");
    let paths = paths(&dir);
    // A directory where the document should be makes the rename fail.
    fs::create_dir_all(&paths.document_file).unwrap();

    let mut publisher = SnapshotPublisher::new(&paths).unwrap();
    let state = match_state();
    let result = publisher.publish_snapshot(&state.view(T0, &EmptyRoster));
    assert!(result.is_err());
    assert!(paths.record_file.exists());

    fs::remove_dir_all(&paths.document_file).unwrap();
    let retried = publisher
        .publish_snapshot(&state.view(T0, &EmptyRoster))
        .unwrap();
    assert!(retried.document_written);
    assert!(paths.document_file.is_file());

    let _ = fs::remove_dir_all(&dir);
}
