//! Shared type definitions for the Scorebug match engine.
//!
//! This crate is the single source of truth for the values that cross crate
//! boundaries: the command vocabulary (sides, periods, card severities), the
//! overlay payloads, the state record polled by the renderer, and the record
//! persisted between runs. Types flow downstream to `TypeScript` via `ts-rs`
//! for the renderer and the operator console.
//!
//! # Modules
//!
//! - [`enums`] -- Enumeration types (sides, periods, overlay kinds, cards)
//! - [`structs`] -- Teams, overlay payloads, published and persisted records

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CardSeverity, CrestSlot, FlashColor, OverlayKind, Period, Side};
pub use structs::{
    CardPayload, DEFAULT_AWAY_TEAM, DEFAULT_HOME_TEAM, GoalPayload, OverlayPayload,
    PersistedMatch, StateRecord, StatsPayload, SubPayload, Team,
};
