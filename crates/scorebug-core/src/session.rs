//! A live match session: the match state plus its collaborators.
//!
//! [`MatchSession`] funnels every command and every tick through the same
//! sequence: mutate the [`MatchState`], publish a fresh view through the
//! [`SnapshotSink`], and persist through the [`PersistenceStore`] when the
//! durable subset changed. Publication and persistence failures are the
//! collaborators' business; the in-memory transition always stands.

use scorebug_types::{PersistedMatch, Side};
use tracing::{info, warn};

use crate::command::{Command, CommandError, CommandOutcome};
use crate::config::EngineConfig;
use crate::match_state::{MatchState, MatchStatus, MatchView, TickReport};
use crate::roster::Roster;

/// Receives a fresh view after every change.
///
/// Implementations log their own failures; a failed publish is retried
/// implicitly by the next one.
pub trait SnapshotSink: Send {
    /// Render and hand out `view`.
    fn publish(&mut self, view: &MatchView);
}

/// Error raised by a persistence backend.
#[derive(Debug, thiserror::Error)]
#[error("persistence failed: {message}")]
pub struct PersistError {
    /// Description of the failure.
    pub message: String,
}

/// Durable storage of the match record between runs.
pub trait PersistenceStore: Send {
    /// Load the stored record. `Ok(None)` when nothing has been stored yet.
    fn load(&mut self) -> Result<Option<PersistedMatch>, PersistError>;

    /// Replace the stored record.
    fn save(&mut self, record: &PersistedMatch) -> Result<(), PersistError>;
}

/// A sink that drops every view.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn publish(&mut self, _view: &MatchView) {}
}

/// The match state together with its roster, store and sink.
pub struct MatchSession {
    state: MatchState,
    roster: Box<dyn Roster>,
    store: Box<dyn PersistenceStore>,
    sink: Box<dyn SnapshotSink>,
}

impl MatchSession {
    /// Hydrate a session from `store`, falling back to a fresh match when
    /// the store is empty or unreadable.
    pub fn new(
        config: &EngineConfig,
        roster: Box<dyn Roster>,
        mut store: Box<dyn PersistenceStore>,
        sink: Box<dyn SnapshotSink>,
    ) -> Self {
        let state = match store.load() {
            Ok(Some(record)) => {
                info!(
                    running = record.running,
                    elapsed_ms = record.elapsed_ms,
                    home = %record.team_home,
                    away = %record.team_away,
                    "Match restored from persisted state"
                );
                MatchState::restore(&config.clock, &config.overlay, &record)
            }
            Ok(None) => {
                info!("No persisted match found, starting fresh");
                MatchState::new(&config.clock, &config.overlay)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load persisted match, starting fresh");
                MatchState::new(&config.clock, &config.overlay)
            }
        };
        Self {
            state,
            roster,
            store,
            sink,
        }
    }

    /// Apply a command, then publish and persist as needed.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the command fails validation. Nothing
    /// is published or persisted in that case.
    pub fn execute(
        &mut self,
        command: Command,
        now_ms: i64,
    ) -> Result<CommandOutcome, CommandError> {
        let persists = command.persists();
        let outcome = self.state.apply(command, now_ms)?;
        if matches!(
            outcome,
            CommandOutcome::ConfirmationRequired(_) | CommandOutcome::Declined
        ) {
            return Ok(outcome);
        }
        self.publish(now_ms);
        if persists {
            self.persist();
        }
        Ok(outcome)
    }

    /// Advance time, publish, and persist if the clock paused itself.
    pub fn tick(&mut self, now_ms: i64) -> TickReport {
        let report = self.state.tick(now_ms, self.roster.as_ref());
        self.publish(now_ms);
        if report.auto_paused {
            self.persist();
        }
        report
    }

    /// Publish the current view.
    pub fn publish(&mut self, now_ms: i64) {
        let view = self.state.view(now_ms, self.roster.as_ref());
        self.sink.publish(&view);
    }

    /// Fold running time into the accumulator, publish, and persist the
    /// match as paused.
    pub fn shutdown(&mut self, now_ms: i64) {
        if self.state.halt_clock(now_ms) {
            info!(
                elapsed_ms = self.state.clock().elapsed_ms(),
                "Clock consolidated for shutdown"
            );
        }
        self.publish(now_ms);
        self.persist();
    }

    fn persist(&mut self) {
        let record = self.state.to_persisted();
        if let Err(e) = self.store.save(&record) {
            warn!(error = %e, "Failed to persist match state");
        }
    }

    /// Resolve the current view without publishing it.
    pub fn view(&self, now_ms: i64) -> MatchView {
        self.state.view(now_ms, self.roster.as_ref())
    }

    /// Operator-facing summary.
    pub fn status(&self) -> MatchStatus {
        self.state.status()
    }

    /// Player labels of the team currently on `side`. Empty on failure.
    pub fn players(&self, side: Side) -> Vec<String> {
        let team = self.state.teams().name(side);
        self.roster.players(team, side).unwrap_or_else(|e| {
            warn!(%side, team, error = %e, "Player lookup failed");
            Vec::new()
        })
    }

    /// Every team name the directory knows.
    pub fn team_names(&self) -> Vec<String> {
        self.roster.team_names()
    }

    /// The underlying match state.
    pub const fn state(&self) -> &MatchState {
        &self.state
    }
}
