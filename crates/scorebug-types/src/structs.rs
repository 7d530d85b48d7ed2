//! Core data structs: teams, overlay payloads, the published state record,
//! and the persisted match record.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CardSeverity, OverlayKind, Period, Side};

/// Default name of the home team when nothing has been selected yet.
pub const DEFAULT_HOME_TEAM: &str = "Team A";

/// Default name of the away team when nothing has been selected yet.
pub const DEFAULT_AWAY_TEAM: &str = "Team B";

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// A team as resolved from the team directory.
///
/// The color is kept exactly as the directory supplied it; the publisher
/// validates it and falls back to [`Side::default_color`] when it is not a
/// six-digit hex value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Team {
    /// Display name.
    pub name: String,
    /// Background color as a hex string (with or without `#`).
    pub display_color: String,
    /// Path or URL of the crest image, if the directory knows one.
    pub crest_ref: Option<String>,
}

impl Team {
    /// A team with no directory entry: side-default color and no crest.
    pub fn unresolved(name: &str, side: Side) -> Self {
        Self {
            name: name.to_owned(),
            display_color: side.default_color().to_owned(),
            crest_ref: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay payloads
// ---------------------------------------------------------------------------

/// Payload of a GOAL overlay.
///
/// The score is captured when the overlay is shown, not when the goal
/// command arrived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct GoalPayload {
    /// Scoring side.
    pub side: Side,
    /// Home score at the moment the overlay was shown.
    pub score_home: u32,
    /// Away score at the moment the overlay was shown.
    pub score_away: u32,
    /// Shirt number of the scorer, when the label carried one.
    pub scorer_number: Option<String>,
    /// Name of the scorer, when one was resolved.
    pub scorer_name: Option<String>,
}

/// Payload of a CARD overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CardPayload {
    /// Side of the booked player.
    pub side: Side,
    /// Player label as picked by the operator.
    pub player: String,
    /// Yellow or red.
    pub severity: CardSeverity,
}

/// Payload of a SUB overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SubPayload {
    /// Side making the change.
    pub side: Side,
    /// Label of the player leaving the pitch.
    pub player_out: String,
    /// Label of the player coming on.
    pub player_in: String,
}

/// Payload of a STATS overlay.
///
/// Shares are the proportion of each value in the sum of both values,
/// clamped to `[0, 1]`. A zero sum is treated as one so both shares are 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StatsPayload {
    /// Caption of the statistic (e.g. "Shots on target").
    pub title: String,
    /// Home share of the bar in `[0, 1]`.
    pub share_home: f64,
    /// Away share of the bar in `[0, 1]`.
    pub share_away: f64,
    /// Raw home value.
    pub value_home: u32,
    /// Raw away value.
    pub value_away: u32,
}

impl StatsPayload {
    /// Build a payload from raw values, computing both shares.
    pub fn from_values(title: &str, value_home: u32, value_away: u32) -> Self {
        let sum = u64::from(value_home).saturating_add(u64::from(value_away)).max(1);
        #[allow(clippy::cast_precision_loss)]
        let total = sum as f64;
        let share_home = (f64::from(value_home) / total).clamp(0.0, 1.0);
        let share_away = (f64::from(value_away) / total).clamp(0.0, 1.0);
        Self {
            title: title.to_owned(),
            share_home,
            share_away,
            value_home,
            value_away,
        }
    }
}

/// Kind-specific payload of an active overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum OverlayPayload {
    /// Goal announcement.
    Goal(GoalPayload),
    /// Disciplinary card.
    Card(CardPayload),
    /// Substitution.
    Sub(SubPayload),
    /// Statistic bar.
    Stats(StatsPayload),
}

impl OverlayPayload {
    /// The overlay kind this payload belongs to.
    pub const fn kind(&self) -> OverlayKind {
        match self {
            Self::Goal(_) => OverlayKind::Goal,
            Self::Card(_) => OverlayKind::Card,
            Self::Sub(_) => OverlayKind::Sub,
            Self::Stats(_) => OverlayKind::Stats,
        }
    }
}

// ---------------------------------------------------------------------------
// Published state record
// ---------------------------------------------------------------------------

/// Compact state record polled by the renderer.
///
/// Rewritten on every publish, whether or not anything changed. Empty
/// strings stand for "no overlay" and "no flash" so the renderer can test
/// them for truthiness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct StateRecord {
    /// Home team name.
    pub team_home: String,
    /// Away team name.
    pub team_away: String,
    /// Home background color (validated hex).
    pub color_home: String,
    /// Away background color (validated hex).
    pub color_away: String,
    /// Text color readable on the home background.
    pub text_color_home: String,
    /// Text color readable on the away background.
    pub text_color_away: String,
    /// Home goals.
    pub score_home: u32,
    /// Away goals.
    pub score_away: u32,
    /// Match clock as `mm:ss`.
    pub clock: String,
    /// Added minutes on display, 0 when hidden.
    pub added_minutes: u32,
    /// Markup of the active overlay, empty when none.
    pub overlay_markup: String,
    /// Kind of the active overlay, empty when none.
    pub overlay_kind: String,
    /// Home red cards.
    pub red_cards_home: u32,
    /// Away red cards.
    pub red_cards_away: u32,
    /// Active flash color, empty when none.
    pub flash_color: String,
    /// Whether the clock is running.
    pub running: bool,
    /// Epoch milliseconds when the clock last started, 0 when paused.
    #[ts(type = "number")]
    pub start_epoch_ms: i64,
    /// Consolidated elapsed milliseconds in the current period.
    #[ts(type = "number")]
    pub elapsed_ms: i64,
    /// Milliseconds contributed by the period offset.
    #[ts(type = "number")]
    pub base_ms: i64,
}

// ---------------------------------------------------------------------------
// Persisted match
// ---------------------------------------------------------------------------

/// Durable record written on every clock toggle, reset, period change,
/// team or crest change, and at shutdown.
///
/// Every field carries a serde default so partially written or older files
/// still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct PersistedMatch {
    /// Whether the clock was running when written.
    pub running: bool,
    /// Epoch milliseconds of the last start, 0 when paused.
    #[ts(type = "number")]
    pub start_epoch_ms: i64,
    /// Consolidated elapsed milliseconds in the current period.
    #[ts(type = "number")]
    pub elapsed_ms: i64,
    /// Current period.
    pub period: Period,
    /// Selected home team.
    pub team_home: String,
    /// Selected away team.
    pub team_away: String,
    /// Home goals.
    pub score_home: u32,
    /// Away goals.
    pub score_away: u32,
    /// Home red cards.
    pub red_cards_home: u32,
    /// Away red cards.
    pub red_cards_away: u32,
    /// Operator-chosen brand mark reference.
    pub brand_logo: String,
    /// Operator-chosen home crest reference (overrides the directory).
    pub logo_home: String,
    /// Operator-chosen away crest reference (overrides the directory).
    pub logo_away: String,
}

impl Default for PersistedMatch {
    fn default() -> Self {
        Self {
            running: false,
            start_epoch_ms: 0,
            elapsed_ms: 0,
            period: Period::First,
            team_home: DEFAULT_HOME_TEAM.to_owned(),
            team_away: DEFAULT_AWAY_TEAM.to_owned(),
            score_home: 0,
            score_away: 0,
            red_cards_home: 0,
            red_cards_away: 0,
            brand_logo: String::new(),
            logo_home: String::new(),
            logo_away: String::new(),
        }
    }
}
