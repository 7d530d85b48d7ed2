//! Snapshot publication for the Scorebug overlay.
//!
//! Renders a [`MatchView`](scorebug_core::match_state::MatchView) into the
//! HTML document shown by the broadcast browser source and the compact
//! JSON record its auto-refresh script polls.
//!
//! # Modules
//!
//! - [`color`] -- Team color fallback and the text contrast rule.
//! - [`fill`] -- Typed template fills, clock text, crest references.
//! - [`publisher`] -- Template rendering and change-detected writes.
//! - [`error`] -- Publication errors.

pub mod color;
pub mod error;
pub mod fill;
pub mod publisher;

pub use error::PublishError;
pub use publisher::{Publication, Snapshot, SnapshotPublisher, Templates, render_snapshot};
