//! Operator REST API handlers.
//!
//! Every `POST` maps one-to-one onto a [`Command`] executed on the live
//! session under its lock, so a command and a tick never interleave.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/operator/status` | Session status, record, document URL |
//! | `POST` | `/api/operator/clock/toggle` | Start or pause the clock |
//! | `POST` | `/api/operator/reset` | Reset the match |
//! | `POST` | `/api/operator/period` | Switch period |
//! | `POST` | `/api/operator/added-time` | Set added time |
//! | `POST` | `/api/operator/goal` | Record a goal |
//! | `POST` | `/api/operator/score/correct` | Take a goal back |
//! | `POST` | `/api/operator/card` | Record a card |
//! | `POST` | `/api/operator/substitution` | Record a substitution |
//! | `POST` | `/api/operator/stats` | Show a statistic now |
//! | `POST` | `/api/operator/stats/schedule` | Show a statistic later |
//! | `POST` | `/api/operator/overlay/hide` | Hide the overlay |
//! | `POST` | `/api/operator/teams` | Select teams |
//! | `POST` | `/api/operator/crest` | Set a crest or brand image |
//!
//! Pause and reset are confirmation-guarded: without `confirm` they may
//! answer `409 {"confirmationRequired": "pause"}`; resend with
//! `confirm: true` to apply or `confirm: false` to decline.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use scorebug_core::clock::now_ms;
use scorebug_core::command::{Command, CommandOutcome};
use scorebug_core::match_state::MatchStatus;
use scorebug_types::{CardSeverity, CrestSlot, Period, Side, StateRecord};
use tracing::debug;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of the guarded commands. May be omitted entirely.
#[derive(Debug, serde::Deserialize)]
pub struct ConfirmRequest {
    /// Answer to a confirmation prompt.
    #[serde(default)]
    pub confirm: Option<bool>,
}

/// Body of `POST /api/operator/period`.
#[derive(Debug, serde::Deserialize)]
pub struct PeriodRequest {
    /// The new period.
    pub period: Period,
}

/// Body of `POST /api/operator/added-time`.
#[derive(Debug, serde::Deserialize)]
pub struct AddedTimeRequest {
    /// Minutes to show, 0 to hide.
    pub minutes: u32,
}

/// Body of `POST /api/operator/goal`.
#[derive(Debug, serde::Deserialize)]
pub struct GoalRequest {
    /// Scoring side.
    pub side: Side,
    /// Scorer label or shirt number.
    #[serde(default)]
    pub scorer: Option<String>,
}

/// Body of `POST /api/operator/score/correct`.
#[derive(Debug, serde::Deserialize)]
pub struct SideRequest {
    /// Side to correct.
    pub side: Side,
}

/// Body of `POST /api/operator/card`.
#[derive(Debug, serde::Deserialize)]
pub struct CardRequest {
    /// Side of the player.
    pub side: Side,
    /// Player label.
    #[serde(default)]
    pub player: String,
    /// Yellow or red.
    pub severity: CardSeverity,
}

/// Body of `POST /api/operator/substitution`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionRequest {
    /// Side making the change.
    pub side: Side,
    /// Player leaving.
    #[serde(default)]
    pub player_out: String,
    /// Player coming on.
    #[serde(default)]
    pub player_in: String,
}

/// Body of `POST /api/operator/stats`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRequest {
    /// Caption.
    pub title: String,
    /// Home value.
    pub value_home: u32,
    /// Away value.
    pub value_away: u32,
}

/// Body of `POST /api/operator/stats/schedule`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatsRequest {
    /// Caption.
    pub title: String,
    /// Home value.
    pub value_home: u32,
    /// Away value.
    pub value_away: u32,
    /// Upper bound of the random delay, in seconds.
    pub max_delay_secs: u32,
}

/// Body of `POST /api/operator/teams`.
#[derive(Debug, serde::Deserialize)]
pub struct TeamsRequest {
    /// Home team name.
    pub home: String,
    /// Away team name.
    pub away: String,
}

/// Body of `POST /api/operator/crest`.
#[derive(Debug, serde::Deserialize)]
pub struct CrestRequest {
    /// Which image.
    pub slot: CrestSlot,
    /// Path or URL; empty to clear.
    #[serde(default)]
    pub reference: String,
}

/// Response to an accepted command.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    /// Always `true`; failures use an error status.
    pub ok: bool,
    /// Command name.
    pub command: &'static str,
    /// `applied`, `declined` or `scheduled`.
    pub outcome: &'static str,
    /// Delay of a scheduled event, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    /// Session status after the command.
    pub status: MatchStatus,
}

/// Response of `GET /api/operator/status`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Session status.
    pub status: MatchStatus,
    /// Latest published record.
    pub record: StateRecord,
    /// URL of the rendered document.
    pub document_url: String,
    /// Teams known to the directory.
    pub teams: Vec<String>,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

async fn execute(
    state: &AppState,
    command: Command,
) -> Result<Json<CommandResponse>, ObserverError> {
    let name = command.name();
    let mut session = state.session.lock().await;
    let outcome = session.execute(command, now_ms())?;
    debug!(command = name, ?outcome, "Operator command handled");

    let (label, delay_ms) = match outcome {
        CommandOutcome::ConfirmationRequired(action) => {
            return Err(ObserverError::ConfirmationRequired(action));
        }
        CommandOutcome::Applied => ("applied", None),
        CommandOutcome::Declined => ("declined", None),
        CommandOutcome::Scheduled { delay_ms } => ("scheduled", Some(delay_ms)),
    };

    Ok(Json(CommandResponse {
        ok: true,
        command: name,
        outcome: label,
        delay_ms,
        status: session.status(),
    }))
}

/// Read the optional `{"confirm": bool}` body of a guarded command.
fn parse_confirm(body: &[u8]) -> Result<Option<bool>, ObserverError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let request: ConfirmRequest = serde_json::from_slice(body)
        .map_err(|e| ObserverError::BadRequest(format!("invalid confirm body: {e}")))?;
    Ok(request.confirm)
}

// ---------------------------------------------------------------------------
// GET /api/operator/status
// ---------------------------------------------------------------------------

/// Report the session status together with the latest record.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (status, teams) = {
        let session = state.session.lock().await;
        (session.status(), session.team_names())
    };
    let record = state.channel.snapshot.read().await.record.clone();
    Json(StatusResponse {
        status,
        record,
        document_url: state.document_url().to_owned(),
        teams,
    })
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Start or pause the clock.
pub async fn toggle_clock(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CommandResponse>, ObserverError> {
    let confirm = parse_confirm(&body)?;
    execute(&state, Command::ToggleClock { confirm }).await
}

/// Reset the match.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CommandResponse>, ObserverError> {
    let confirm = parse_confirm(&body)?;
    execute(&state, Command::ResetMatch { confirm }).await
}

/// Switch period.
pub async fn set_period(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PeriodRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    execute(&state, Command::SetPeriod { period: body.period }).await
}

/// Set the added time.
pub async fn added_time(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddedTimeRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    execute(&state, Command::ApplyAddedTime { minutes: body.minutes }).await
}

// ---------------------------------------------------------------------------
// Match events
// ---------------------------------------------------------------------------

/// Record a goal.
pub async fn goal(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GoalRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    let command = Command::RecordGoal {
        side: body.side,
        scorer: body.scorer,
    };
    execute(&state, command).await
}

/// Take a goal back.
pub async fn correct_score(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SideRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    execute(&state, Command::CorrectScore { side: body.side }).await
}

/// Record a card.
pub async fn card(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CardRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    let command = Command::RecordCard {
        side: body.side,
        player: body.player,
        severity: body.severity,
    };
    execute(&state, command).await
}

/// Record a substitution.
pub async fn substitution(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubstitutionRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    let command = Command::RecordSubstitution {
        side: body.side,
        player_out: body.player_out,
        player_in: body.player_in,
    };
    execute(&state, command).await
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

/// Show a statistic now.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StatsRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    let command = Command::ShowStats {
        title: body.title,
        value_home: body.value_home,
        value_away: body.value_away,
    };
    execute(&state, command).await
}

/// Show a statistic after a random delay.
pub async fn schedule_stats(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScheduleStatsRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    let command = Command::ScheduleStats {
        title: body.title,
        value_home: body.value_home,
        value_away: body.value_away,
        max_delay_secs: body.max_delay_secs,
    };
    execute(&state, command).await
}

/// Hide the active overlay.
pub async fn hide_overlay(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, ObserverError> {
    execute(&state, Command::HideOverlay).await
}

// ---------------------------------------------------------------------------
// Teams and crests
// ---------------------------------------------------------------------------

/// Select the teams on the scorebug.
pub async fn teams(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TeamsRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    let command = Command::SelectTeams {
        home: body.home,
        away: body.away,
    };
    execute(&state, command).await
}

/// Point a crest slot at an image.
pub async fn crest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CrestRequest>,
) -> Result<Json<CommandResponse>, ObserverError> {
    let command = Command::SetCrest {
        slot: body.slot,
        reference: body.reference,
    };
    execute(&state, command).await
}
