//! `WebSocket` push of the state record.
//!
//! Clients connect to `GET /ws/state`, receive the current record at once,
//! then one JSON text frame per publish. A client that falls behind skips
//! to the newest record. This is the push alternative to polling
//! `/state.json`; both carry the same record.

use std::ops::ControlFlow;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use scorebug_types::StateRecord;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::AppState;

/// Why a connection ended.
type Closed = &'static str;

/// Upgrade to a `WebSocket` streaming state records.
///
/// # Route
///
/// `GET /ws/state`
pub async fn ws_state(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| stream_records(socket, state))
}

async fn stream_records(mut socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.channel.subscribe();
    let current = state.channel.snapshot.read().await.record.clone();
    debug!("State stream opened");

    let mut flow = push(&mut socket, &current).await;
    while flow.is_continue() {
        flow = tokio::select! {
            received = rx.recv() => match received {
                Ok(record) => push(&mut socket, &record).await,
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "State stream lagging, jumping to newest record");
                    ControlFlow::Continue(())
                }
                Err(RecvError::Closed) => ControlFlow::Break("publisher gone"),
            },
            frame = socket.recv() => answer(&mut socket, frame).await,
        };
    }

    if let ControlFlow::Break(reason) = flow {
        debug!(reason, "State stream closed");
    }
}

/// Send one record as a text frame.
async fn push(socket: &mut WebSocket, record: &StateRecord) -> ControlFlow<Closed> {
    let text = match serde_json::to_string(record) {
        Ok(text) => text,
        Err(e) => {
            // Skip this record; the next publish supersedes it.
            warn!(error = %e, "State record not serializable");
            return ControlFlow::Continue(());
        }
    };
    match socket.send(Message::Text(text.into())).await {
        Ok(()) => ControlFlow::Continue(()),
        Err(_) => ControlFlow::Break("send failed"),
    }
}

/// React to a frame from the client. Only pings get an answer.
async fn answer(
    socket: &mut WebSocket,
    frame: Option<Result<Message, axum::Error>>,
) -> ControlFlow<Closed> {
    match frame {
        None | Some(Ok(Message::Close(_))) => ControlFlow::Break("client left"),
        Some(Err(e)) => {
            debug!(error = %e, "State stream read error");
            ControlFlow::Break("read error")
        }
        Some(Ok(Message::Ping(payload))) => match socket.send(Message::Pong(payload)).await {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break("pong failed"),
        },
        Some(Ok(_)) => ControlFlow::Continue(()),
    }
}
