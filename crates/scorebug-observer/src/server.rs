//! Observer HTTP server lifecycle.
//!
//! [`bind`] claims the first free port in `[port, port + port_attempts)`
//! and [`serve`] runs the router on it until the task is aborted.

use std::net::SocketAddr;
use std::sync::Arc;

use scorebug_core::config::ObserverConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the observer server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The first TCP port to try.
    pub port: u16,
    /// How many consecutive ports to try.
    pub port_attempts: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&ObserverConfig::default())
    }
}

impl From<&ObserverConfig> for ServerConfig {
    fn from(config: &ObserverConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            port_attempts: config.port_attempts,
        }
    }
}

/// Bind the first free port.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] when the host does not parse or every
/// port in the range is taken.
pub async fn bind(config: &ServerConfig) -> Result<(TcpListener, SocketAddr), ServerError> {
    let attempts = config.port_attempts.max(1);
    let mut last_error = String::from("no port attempted");

    for offset in 0..attempts {
        let Some(port) = config.port.checked_add(offset) else {
            break;
        };
        let addr: SocketAddr = format!("{}:{port}", config.host)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                let bound = listener
                    .local_addr()
                    .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;
                return Ok((listener, bound));
            }
            Err(e) => {
                warn!(%addr, error = %e, "Port unavailable, trying next");
                last_error = format!("bind failed on {addr}: {e}");
            }
        }
    }

    Err(ServerError::Bind(last_error))
}

/// Serve the observer router on `listener`.
///
/// # Errors
///
/// Returns [`ServerError::Serve`] if the server hits a fatal I/O error.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    let router = build_router(state);
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Observer server listening");
    }
    axum::serve(listener, router)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
}

/// Errors that can occur when starting or running the observer server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
