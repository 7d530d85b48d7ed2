//! Match-state engine for the Scorebug live overlay.
//!
//! This crate owns everything with timing semantics: the wall-clock match
//! clock, the exclusive auto-expiring overlay, the deferred-task scheduler,
//! the confirmation guards, and the [`MatchState`] aggregate that ties them
//! together. [`MatchSession`] adds the collaborators (roster, persistence,
//! snapshot sink) and [`runner::run_tick_loop`] drives it in real time.
//!
//! # Modules
//!
//! - [`clock`] -- Wall-clock match clock with periods and added time.
//! - [`overlay`] -- Overlay state machine and flash indicator.
//! - [`scheduler`] -- Cancellable deferred tasks keyed by token.
//! - [`guard`] -- Confirmation policy for pause and reset.
//! - [`roster`] -- Team and player directory trait, label helpers.
//! - [`command`] -- Operator command vocabulary and outcomes.
//! - [`match_state`] -- The aggregate root.
//! - [`session`] -- Publication and persistence around the aggregate.
//! - [`config`] -- Configuration loading from `scorebug-config.yaml`.
//! - [`runner`] -- The periodic tick loop.
//! - [`atomic`] -- Atomic file replacement.
//!
//! [`MatchState`]: match_state::MatchState
//! [`MatchSession`]: session::MatchSession

pub mod atomic;
pub mod clock;
pub mod command;
pub mod config;
pub mod guard;
pub mod match_state;
pub mod overlay;
pub mod roster;
pub mod runner;
pub mod scheduler;
pub mod session;
