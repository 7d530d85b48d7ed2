//! Enumeration types for the Scorebug match engine.
//!
//! Wire names are lowercase so the published state record and the operator
//! API read naturally from JavaScript (`"home"`, `"goal"`, `"red"`).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// One of the two teams on the scorebug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Side {
    /// The home team, drawn on the upper row.
    Home,
    /// The away team, drawn on the lower row.
    Away,
}

impl Side {
    /// Stable lowercase key used in file formats and roster lookups.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }

    /// Background color used when a team's own color is missing or malformed.
    pub const fn default_color(self) -> &'static str {
        match self {
            Self::Home => "#D32F2F",
            Self::Away => "#1976D2",
        }
    }

    /// Upper-case caption shown on card overlays.
    pub const fn caption(self) -> &'static str {
        match self {
            Self::Home => "HOME",
            Self::Away => "AWAY",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Period
// ---------------------------------------------------------------------------

/// Half of the match currently being played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Period {
    /// First half; the clock starts from 00:00.
    #[default]
    First,
    /// Second half; the clock starts from the first half's length.
    Second,
}

impl Period {
    /// Ordinal of the period (1 or 2).
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay kinds
// ---------------------------------------------------------------------------

/// Kind of transient overlay shown beneath the scorebug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum OverlayKind {
    /// A goal announcement with the updated score.
    Goal,
    /// A yellow or red card.
    Card,
    /// A substitution.
    Sub,
    /// A two-sided statistic bar.
    Stats,
}

impl OverlayKind {
    /// Wire name written into the state record.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Card => "card",
            Self::Sub => "sub",
            Self::Stats => "stats",
        }
    }
}

// ---------------------------------------------------------------------------
// Cards and flash
// ---------------------------------------------------------------------------

/// Severity of a disciplinary card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CardSeverity {
    /// Caution.
    Yellow,
    /// Sending off; counted on the scorebug.
    Red,
}

impl CardSeverity {
    /// Flash color pulsed when a card of this severity is shown.
    pub const fn flash_color(self) -> FlashColor {
        match self {
            Self::Yellow => FlashColor::Yellow,
            Self::Red => FlashColor::Red,
        }
    }

    /// Upper-case label printed on the card chip.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }
}

/// Color of the short pulse that follows a card event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum FlashColor {
    /// Pulse after a yellow card.
    Yellow,
    /// Pulse after a red card.
    Red,
}

impl FlashColor {
    /// Wire name written into the state record.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

// ---------------------------------------------------------------------------
// Crest slots
// ---------------------------------------------------------------------------

/// Image slot that the operator can point at a crest or logo file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CrestSlot {
    /// Crest drawn beside the home team.
    Home,
    /// Crest drawn beside the away team.
    Away,
    /// Competition brand mark in the top-left block.
    Brand,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_serializes_lowercase() {
        let json = serde_json::to_string(&Side::Away).unwrap_or_default();
        assert_eq!(json, "\"away\"");
        let back: Side = serde_json::from_str("\"home\"").unwrap_or(Side::Away);
        assert_eq!(back, Side::Home);
    }

    #[test]
    fn side_default_colors() {
        assert_eq!(Side::Home.default_color(), "#D32F2F");
        assert_eq!(Side::Away.default_color(), "#1976D2");
    }

    #[test]
    fn card_severity_maps_to_flash() {
        assert_eq!(CardSeverity::Yellow.flash_color(), FlashColor::Yellow);
        assert_eq!(CardSeverity::Red.flash_color(), FlashColor::Red);
    }

    #[test]
    fn period_defaults_to_first() {
        assert_eq!(Period::default(), Period::First);
        assert_eq!(Period::Second.number(), 2);
    }
}
