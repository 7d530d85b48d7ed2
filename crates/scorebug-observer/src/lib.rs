//! HTTP and `WebSocket` server for the Scorebug engine.
//!
//! This crate exposes the live match to two audiences:
//!
//! - **Renderers** fetch the rendered document (`GET /overlay.html`) and
//!   poll the compact state record (`GET /state.json`), or subscribe to
//!   record pushes over `WebSocket` (`/ws/state`)
//! - **Operators** drive the match through `/api/operator/*`, one endpoint
//!   per command, and fill their pickers from `/api/roster/{side}`
//!
//! # Architecture
//!
//! Reads are served from the latest [`PublishedSnapshot`], which the engine
//! replaces on every publish, so a renderer never waits on the session.
//! Operator commands lock the session, the same lock the tick loop takes,
//! and run to completion before the response is sent.
//!
//! [`PublishedSnapshot`]: state::PublishedSnapshot

pub mod error;
pub mod handlers;
pub mod operator;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError};
pub use startup::{ObserverHandle, StartupError, spawn_observer};
pub use state::{AppState, PublishChannel, PublishedSnapshot};
