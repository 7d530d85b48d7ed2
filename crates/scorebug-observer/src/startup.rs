//! Observer server startup helper for embedding in the engine binary.
//!
//! [`spawn_observer`] binds the listener eagerly, records the document URL
//! in [`AppState`], and serves on a background Tokio task so the HTTP side
//! runs concurrently with the tick loop.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scorebug_observer::startup::spawn_observer;
//!
//! let observer = spawn_observer(&config.observer, Arc::clone(&state)).await?;
//! // ... run the tick loop ...
//! observer.handle.abort();
//! ```

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use scorebug_core::config::ObserverConfig;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::server::{ServerConfig, ServerError, bind, serve};
use crate::state::AppState;

/// Errors that can occur when spawning the observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A running observer.
#[derive(Debug)]
pub struct ObserverHandle {
    /// The serving task. Abort it on shutdown.
    pub handle: JoinHandle<()>,
    /// The address actually bound.
    pub addr: SocketAddr,
    /// Where the rendered document can be opened.
    pub document_url: String,
}

/// Spawn the observer HTTP server on a background Tokio task.
///
/// The bind happens before the task is spawned so a port conflict across
/// the whole attempt range surfaces here rather than in a detached task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if no port in the configured range
/// can be bound.
pub async fn spawn_observer(
    config: &ObserverConfig,
    state: Arc<AppState>,
) -> Result<ObserverHandle, StartupError> {
    let (listener, addr) = bind(&ServerConfig::from(config)).await?;

    let document_url = document_url(addr);
    // Already set only when spawned twice on the same state; the first URL stays.
    let _ = state.document_url.set(document_url.clone());

    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            error!(error = %e, "Observer server exited with error");
        }
    });

    info!(%addr, url = %document_url, "Observer server spawned on background task");

    Ok(ObserverHandle {
        handle,
        addr,
        document_url,
    })
}

/// The URL an operator opens for the bound address. Wildcard binds are
/// reported as `localhost`.
fn document_url(addr: SocketAddr) -> String {
    let host = match addr.ip() {
        ip if ip.is_unspecified() || ip.is_loopback() => String::from("localhost"),
        IpAddr::V4(ip) => ip.to_string(),
        IpAddr::V6(ip) => format!("[{ip}]"),
    };
    format!("http://{host}:{}/overlay.html", addr.port())
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::*;

    #[test]
    fn wildcard_and_loopback_read_as_localhost() {
        let any = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000));
        assert_eq!(document_url(any), "http://localhost:3000/overlay.html");
        let local = SocketAddr::from((Ipv4Addr::LOCALHOST, 3001));
        assert_eq!(document_url(local), "http://localhost:3001/overlay.html");
    }

    #[test]
    fn concrete_addresses_are_kept() {
        let lan = SocketAddr::from((Ipv4Addr::new(192, 168, 1, 20), 3000));
        assert_eq!(document_url(lan), "http://192.168.1.20:3000/overlay.html");
        let v6 = SocketAddr::from((Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1), 3000));
        assert_eq!(document_url(v6), "http://[fe80::1]:3000/overlay.html");
    }
}
