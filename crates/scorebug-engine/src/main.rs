//! Scorebug engine binary.
//!
//! Wires the match session to its collaborators: the team directory, the
//! JSON state store, the file publisher and the observer server. Then it
//! drives the tick loop until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `scorebug-config.yaml` (or `SCOREBUG_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the team directory
//! 4. Open the state store
//! 5. Compile the templates and create the publisher
//! 6. Restore the match session and publish its first snapshot
//! 7. Start the observer server
//! 8. Run the tick loop until Ctrl-C
//! 9. Persist the match as paused and stop the observer

mod error;
mod observer_sink;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use scorebug_core::clock::now_ms;
use scorebug_core::config::EngineConfig;
use scorebug_core::roster::Roster;
use scorebug_core::runner::run_tick_loop;
use scorebug_core::session::MatchSession;
use scorebug_observer::state::{AppState, PublishChannel};
use scorebug_publish::SnapshotPublisher;
use scorebug_publish::fill::record_href;
use scorebug_store::{FileRoster, JsonFileStore};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_sink::ObserverSink;

const DEFAULT_CONFIG_PATH: &str = "scorebug-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, template compilation or the
/// observer bind fails. Everything after startup is logged and retried.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_found) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(config_found, "scorebug-engine starting");
    info!(
        tick_interval_ms = config.clock.tick_interval_ms,
        state_file = %config.paths.state_file.display(),
        document_file = %config.paths.document_file.display(),
        record_file = %config.paths.record_file.display(),
        port = config.observer.port,
        "Configuration loaded"
    );

    // 3. Team directory.
    let roster = load_roster(&config.paths.roster_file);

    // 4. State store.
    let store = JsonFileStore::new(&config.paths.state_file);

    // 5. Publisher and observer channel.
    let publisher = SnapshotPublisher::new(&config.paths).map_err(EngineError::from)?;
    let channel = PublishChannel::new();
    let sink = ObserverSink::new(publisher, channel.clone());

    // 6. Session.
    let mut session = MatchSession::new(&config, roster, Box::new(store), Box::new(sink));
    session.publish(now_ms());
    let session = Arc::new(Mutex::new(session));
    info!("Match session ready");

    // 7. Observer server.
    let record_route = format!(
        "/{}",
        record_href(&config.paths.document_file, &config.paths.record_file)
    );
    let app_state = Arc::new(AppState::new(
        Arc::clone(&session),
        channel,
        record_route,
    ));
    let observer = scorebug_observer::spawn_observer(&config.observer, app_state)
        .await
        .map_err(EngineError::from)?;
    info!(
        addr = %observer.addr,
        url = %observer.document_url,
        "Observer API server started"
    );

    // 8. Tick loop.
    let interval = Duration::from_millis(config.clock.tick_interval_ms);
    let ticks = run_tick_loop(session, interval, shutdown_signal()).await;

    // 9. Stop the observer.
    observer.handle.abort();
    info!(ticks, "scorebug-engine shutdown complete");

    Ok(())
}

/// Load the engine configuration.
///
/// Reads `SCOREBUG_CONFIG` or `scorebug-config.yaml` relative to the
/// working directory. A missing file means defaults; a malformed one is an
/// error. Returns whether a file was found so it can be logged once
/// tracing is up.
fn load_config() -> Result<(EngineConfig, bool), EngineError> {
    let config_path = std::env::var("SCOREBUG_CONFIG")
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if config_path.exists() {
        Ok((EngineConfig::from_file(&config_path)?, true))
    } else {
        Ok((EngineConfig::parse("")?, false))
    }
}

/// Load the team directory, falling back to an empty one.
fn load_roster(path: &Path) -> Box<dyn Roster> {
    if !path.exists() {
        info!(path = %path.display(), "Team directory not found, team lookups disabled");
        return Box::new(FileRoster::default());
    }
    match FileRoster::load(path) {
        Ok(roster) => Box::new(roster),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load team directory");
            Box::new(FileRoster::default())
        }
    }
}

/// Resolve on Ctrl-C. If the handler cannot be installed the engine runs
/// until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
