//! Read endpoints for the renderer and the operator's pickers.
//!
//! The document and record handlers read the latest
//! [`PublishedSnapshot`](crate::state::PublishedSnapshot) and never take
//! the session lock.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/`, `/overlay.html` | Rendered document |
//! | `GET` | `/state.json` | Latest state record |
//! | `GET` | `/api/roster/{side}` | Player labels for a side |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use scorebug_types::Side;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET / and /overlay.html
// ---------------------------------------------------------------------------

/// Serve the latest rendered document.
pub async fn document(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let document = state.channel.snapshot.read().await.document.clone();
    ([(header::CACHE_CONTROL, "no-store")], Html(document))
}

// ---------------------------------------------------------------------------
// GET /state.json
// ---------------------------------------------------------------------------

/// Serve the latest state record.
pub async fn record(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let record = state.channel.snapshot.read().await.record.clone();
    ([(header::CACHE_CONTROL, "no-store")], Json(record))
}

// ---------------------------------------------------------------------------
// GET /api/roster/{side}
// ---------------------------------------------------------------------------

/// Players of the team currently on one side.
#[derive(Debug, serde::Serialize)]
pub struct RosterResponse {
    /// The side asked for.
    pub side: Side,
    /// The team currently on that side.
    pub team: String,
    /// Player labels, empty when the directory has none.
    pub players: Vec<String>,
}

/// List the player labels of the team on `side`.
pub async fn roster(
    State(state): State<Arc<AppState>>,
    Path(side): Path<Side>,
) -> Json<RosterResponse> {
    let session = state.session.lock().await;
    let team = session.state().teams().name(side).to_owned();
    let players = session.players(side);
    Json(RosterResponse {
        side,
        team,
        players,
    })
}
