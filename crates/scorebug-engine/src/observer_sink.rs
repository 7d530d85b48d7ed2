//! Snapshot sink that feeds both the output files and the observer.
//!
//! Each publish renders the view once, writes the document and record
//! files, then hands the same record and document to the
//! [`PublishChannel`] so HTTP readers and `WebSocket` clients see exactly
//! what is on disk.

use scorebug_core::match_state::MatchView;
use scorebug_core::session::SnapshotSink;
use scorebug_observer::state::PublishChannel;
use scorebug_publish::SnapshotPublisher;
use tracing::{debug, warn};

/// Sink bridging the session to the file publisher and the observer.
pub struct ObserverSink {
    publisher: SnapshotPublisher,
    channel: PublishChannel,
}

impl ObserverSink {
    /// Create a sink writing through `publisher` and pushing to `channel`.
    pub const fn new(publisher: SnapshotPublisher, channel: PublishChannel) -> Self {
        Self { publisher, channel }
    }
}

impl SnapshotSink for ObserverSink {
    fn publish(&mut self, view: &MatchView) {
        let snapshot = match self.publisher.render(view) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Snapshot render failed");
                return;
            }
        };

        // A failed write still reaches the observer; the files catch up on
        // the next publish.
        if let Err(e) = self.publisher.write(&snapshot) {
            warn!(error = %e, "Snapshot write failed");
        }

        let receivers = self.channel.publish(snapshot.record, snapshot.document);
        debug!(receivers, "State record broadcast");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use scorebug_core::config::{ClockConfig, OverlayConfig, PathsConfig};
    use scorebug_core::match_state::MatchState;
    use scorebug_core::roster::EmptyRoster;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scorebug-engine-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn publish_reaches_files_and_channel() {
        let dir = scratch("sink");
        let paths = PathsConfig {
            document_file: dir.join("salida.html"),
            record_file: dir.join("estado.json"),
            ..PathsConfig::default()
        };
        let Ok(publisher) = SnapshotPublisher::new(&paths) else {
            return;
        };
        let channel = PublishChannel::new();
        let mut rx = channel.subscribe();
        let mut sink = ObserverSink::new(publisher, channel.clone());

        let state = MatchState::new(&ClockConfig::default(), &OverlayConfig::default());
        sink.publish(&state.view(1_700_000_000_000, &EmptyRoster));

        assert!(paths.document_file.is_file());
        assert!(paths.record_file.is_file());
        let pushed = rx.try_recv().ok();
        assert_eq!(pushed.map(|r| r.clock), Some(String::from("00:00")));

        let snapshot = channel.snapshot.read().await;
        assert!(snapshot.document.contains("id=\"scorebug\""));
        assert_eq!(
            fs::read_to_string(&paths.document_file).ok().as_deref(),
            Some(snapshot.document.as_str())
        );

        let _ = fs::remove_dir_all(&dir);
    }
}
