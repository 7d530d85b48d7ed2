//! Periodic tick loop for a live session.
//!
//! [`run_tick_loop`] drives [`MatchSession::tick`] at a fixed interval
//! until the shutdown future resolves. Commands arrive concurrently
//! through the same mutex, so ticks and commands never interleave
//! partially.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::clock::now_ms;
use crate::session::MatchSession;

/// Tick `session` every `interval` until `shutdown` resolves, then run the
/// session's shutdown sequence. Returns the number of ticks performed.
pub async fn run_tick_loop<F>(
    session: Arc<Mutex<MatchSession>>,
    interval: Duration,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut ticks: u64 = 0;
    let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
    info!(interval_ms, "Tick loop starting");

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!(ticks, "Shutdown requested, stopping tick loop");
                break;
            }
            _ = ticker.tick() => {
                let report = session.lock().await.tick(now_ms());
                ticks = ticks.saturating_add(1);
                if report.fired > 0 {
                    debug!(fired = report.fired, "Scheduled tasks dispatched");
                }
            }
        }
    }

    session.lock().await.shutdown(now_ms());
    ticks
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use super::*;
    use crate::command::Command;
    use crate::config::EngineConfig;
    use crate::match_state::MatchView;
    use crate::roster::EmptyRoster;
    use crate::session::{PersistError, PersistenceStore, SnapshotSink};
    use scorebug_types::PersistedMatch;

    #[derive(Clone, Default)]
    struct SharedStore(Arc<StdMutex<Option<PersistedMatch>>>);

    impl PersistenceStore for SharedStore {
        fn load(&mut self) -> Result<Option<PersistedMatch>, PersistError> {
            Ok(None)
        }

        fn save(&mut self, record: &PersistedMatch) -> Result<(), PersistError> {
            if let Ok(mut slot) = self.0.lock() {
                *slot = Some(record.clone());
            }
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct CountingSink(Arc<StdMutex<usize>>);

    impl SnapshotSink for CountingSink {
        fn publish(&mut self, _view: &MatchView) {
            if let Ok(mut count) = self.0.lock() {
                *count = count.saturating_add(1);
            }
        }
    }

    #[tokio::test]
    async fn loop_ticks_until_shutdown_then_persists_paused() {
        let store = SharedStore::default();
        let sink = CountingSink::default();
        let session = Arc::new(Mutex::new(MatchSession::new(
            &EngineConfig::default(),
            Box::new(EmptyRoster),
            Box::new(store.clone()),
            Box::new(sink.clone()),
        )));
        let _ = session
            .lock()
            .await
            .execute(Command::ToggleClock { confirm: None }, now_ms());

        let ticks = run_tick_loop(
            Arc::clone(&session),
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_millis(55)),
        )
        .await;

        assert!(ticks >= 1);
        assert!(sink.0.lock().map(|c| *c).unwrap_or_default() > 1);
        let saved = store.0.lock().ok().and_then(|r| r.clone());
        assert!(saved.is_some_and(|r| !r.running));
    }
}
