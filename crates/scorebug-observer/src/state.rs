//! Shared application state for the observer server.
//!
//! [`PublishChannel`] is the hand-off between the session and the HTTP
//! side: every publish stores the latest record and document in
//! [`PublishedSnapshot`] and broadcasts the record to `WebSocket`
//! subscribers, so read endpoints never take the session lock.
//! [`AppState`] adds the session itself for the operator endpoints.

use std::sync::{Arc, OnceLock};

use scorebug_core::session::MatchSession;
use scorebug_types::StateRecord;
use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::debug;

/// Capacity of the record broadcast channel.
///
/// A subscriber that falls further behind receives
/// [`broadcast::error::RecvError::Lagged`] and skips to the newest record.
const BROADCAST_CAPACITY: usize = 64;

/// The latest published artifacts.
#[derive(Debug, Clone, Default)]
pub struct PublishedSnapshot {
    /// The compact state record.
    pub record: StateRecord,
    /// The rendered document.
    pub document: String,
}

/// Latest snapshot plus the push channel for state records.
#[derive(Clone)]
pub struct PublishChannel {
    /// Broadcast sender for state records.
    pub tx: broadcast::Sender<StateRecord>,
    /// The latest snapshot served by the read endpoints.
    pub snapshot: Arc<RwLock<PublishedSnapshot>>,
}

impl PublishChannel {
    /// Create a channel with an empty snapshot.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            snapshot: Arc::new(RwLock::new(PublishedSnapshot::default())),
        }
    }

    /// Subscribe to published records.
    pub fn subscribe(&self) -> broadcast::Receiver<StateRecord> {
        self.tx.subscribe()
    }

    /// Store a fresh snapshot and push its record to subscribers.
    ///
    /// The snapshot is updated with `try_write` so a publisher never waits
    /// on a slow reader; a skipped update is superseded by the next publish.
    /// Returns the number of subscribers that received the record.
    pub fn publish(&self, record: StateRecord, document: String) -> usize {
        match self.snapshot.try_write() {
            Ok(mut snapshot) => {
                snapshot.record = record.clone();
                snapshot.document = document;
            }
            Err(_) => debug!("Snapshot busy, skipping update"),
        }
        // send only fails when nobody is subscribed.
        self.tx.send(record).unwrap_or(0)
    }
}

impl Default for PublishChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state for the Axum application.
pub struct AppState {
    /// The live session, shared with the tick loop.
    pub session: Arc<Mutex<MatchSession>>,
    /// Latest snapshot and record broadcast.
    pub channel: PublishChannel,
    /// URL of the rendered document, known once the server is bound.
    pub document_url: OnceLock<String>,
    /// Path under which the record is also served, matching the name the
    /// document's auto-refresh script fetches.
    pub record_route: String,
}

impl AppState {
    /// Create the application state.
    pub fn new(
        session: Arc<Mutex<MatchSession>>,
        channel: PublishChannel,
        record_route: String,
    ) -> Self {
        Self {
            session,
            channel,
            document_url: OnceLock::new(),
            record_route,
        }
    }

    /// The document URL, empty until the server is bound.
    pub fn document_url(&self) -> &str {
        self.document_url.get().map_or("", String::as_str)
    }
}
