//! Integration tests: a session hydrated from and persisted to the JSON
//! file store, with the YAML directory resolving teams and scorers.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use scorebug_core::command::Command;
use scorebug_core::config::EngineConfig;
use scorebug_core::session::{MatchSession, NullSink};
use scorebug_store::{FileRoster, JsonFileStore};
use scorebug_types::{OverlayPayload, Side};

const T0: i64 = 1_700_000_000_000;

const DIRECTORY: &str = r##"
teams:
  - name: Lions
    color: "#FFEB3B"
  - name: Tigers
    color: "#1B5E20"
players:
  Lions:
    - { number: 9, name: Striker }
"##;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scorebug-session-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn session(path: &Path) -> MatchSession {
    MatchSession::new(
        &EngineConfig::default(),
        Box::new(FileRoster::parse(DIRECTORY).unwrap()),
        Box::new(JsonFileStore::new(path)),
        Box::new(NullSink),
    )
}

#[test]
fn restart_resumes_clock_and_score() {
    let dir = scratch("restart");
    let path = dir.join("config.json");

    let mut first = session(&path);
    assert!(path.exists());
    first
        .execute(
            Command::SelectTeams {
                home: "Lions".to_owned(),
                away: "Tigers".to_owned(),
            },
            T0,
        )
        .unwrap();
    first.execute(Command::ToggleClock { confirm: None }, T0).unwrap();
    first
        .execute(Command::RecordGoal { side: Side::Home, scorer: None }, T0 + 1_000)
        .unwrap();
    first.shutdown(T0 + 90_000);
    drop(first);

    let second = session(&path);
    let state = second.state();
    assert!(!state.clock().is_running());
    assert_eq!(state.clock().total_elapsed_ms(T0 + 500_000), 90_000);
    assert_eq!(state.score().home, 1);
    assert_eq!(state.teams().home, "Lions");

    let view = second.view(T0 + 500_000);
    assert_eq!(view.home.display_color, "#FFEB3B");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn goal_scorer_resolves_from_directory() {
    let dir = scratch("scorer");
    let path = dir.join("config.json");

    let mut session = session(&path);
    session
        .execute(
            Command::SelectTeams {
                home: "Lions".to_owned(),
                away: "Tigers".to_owned(),
            },
            T0,
        )
        .unwrap();
    assert_eq!(session.players(Side::Home), vec!["9 Striker"]);
    session
        .execute(
            Command::RecordGoal {
                side: Side::Home,
                scorer: Some("9".to_owned()),
            },
            T0,
        )
        .unwrap();
    session.tick(T0 + 1_200);

    let goal = match session.view(T0 + 1_300).overlay {
        Some(OverlayPayload::Goal(goal)) => Some(goal),
        _ => None,
    }
    .unwrap();
    assert_eq!(goal.scorer_number.as_deref(), Some("9"));
    assert_eq!(goal.scorer_name.as_deref(), Some("Striker"));
    assert_eq!(goal.score_home, 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn malformed_state_file_falls_back_to_defaults() {
    let dir = scratch("malformed");
    let path = dir.join("config.json");
    fs::create_dir_all(&dir).unwrap();
    fs::write(&path, "][").unwrap();

    let session = session(&path);
    assert_eq!(session.state().score().home, 0);
    assert_eq!(session.state().teams().home, "Team A");
    assert_eq!(fs::read_to_string(&path).unwrap(), "][");

    let _ = fs::remove_dir_all(&dir);
}
