//! Typed template fills and the pure derivations behind them.
//!
//! Everything in this module is a function of a [`MatchView`]: the clock
//! string, resolved colors, crest references, overlay fragment contexts,
//! the [`DocumentFill`] and the published [`StateRecord`]. No I/O happens
//! here, so the document rendered from a fill is byte-stable for equal
//! views.

use std::path::{Component, Path};

use serde::Serialize;

use scorebug_core::match_state::MatchView;
use scorebug_core::roster::split_player_label;
use scorebug_types::{
    CardPayload, CardSeverity, GoalPayload, Side, StateRecord, StatsPayload, SubPayload,
};

use crate::color::{contrast_text, resolve_background};

/// Milliseconds per displayed second.
const MS_PER_SECOND: i64 = 1_000;

/// Seconds per displayed minute.
const SECONDS_PER_MINUTE: i64 = 60;

// ---------------------------------------------------------------------------
// Clock and crest text
// ---------------------------------------------------------------------------

/// Format a total match time as `mm:ss` using floor division.
///
/// Minutes keep counting past 99 (`105:00`); negative input reads `00:00`.
pub fn format_clock(total_ms: i64) -> String {
    let seconds = total_ms.max(0).checked_div(MS_PER_SECOND).unwrap_or_default();
    let minutes = seconds.checked_div(SECONDS_PER_MINUTE).unwrap_or_default();
    let rest = seconds.checked_rem(SECONDS_PER_MINUTE).unwrap_or_default();
    format!("{minutes:02}:{rest:02}")
}

/// Added-time caption (`+3'`), empty when no added time is on display.
pub fn added_time_text(minutes: u32) -> String {
    if minutes == 0 {
        String::new()
    } else {
        format!("+{minutes}'")
    }
}

/// Normalise a crest or logo reference for use as an image source.
///
/// Remote (`http://`, `https://`) and inline (`data:`) references pass
/// through untouched. Local paths use forward slashes and get a `.png`
/// extension when they have none. Blank references yield `None`, which
/// omits the image element.
pub fn normalize_crest(reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    if ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| trimmed.starts_with(scheme))
    {
        return Some(trimmed.to_owned());
    }
    let local = trimmed.replace('\\', "/");
    if Path::new(&local).extension().is_none() {
        Some(format!("{local}.png"))
    } else {
        Some(local)
    }
}

/// Reference from the document to the record file, as the auto-refresh
/// script fetches it.
///
/// A record below the document's directory is referenced relatively; any
/// other location falls back to the bare file name.
pub fn record_href(document_path: &Path, record_path: &Path) -> String {
    let relative = document_path
        .parent()
        .and_then(|dir| record_path.strip_prefix(dir).ok())
        .filter(|rel| rel.components().all(|c| matches!(c, Component::Normal(_))));
    let href = relative.map_or_else(
        || {
            record_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        },
        |rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        },
    );
    if href.is_empty() {
        "estado.json".to_owned()
    } else {
        href
    }
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Resolved background and text colors of both teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Home background.
    pub home: String,
    /// Away background.
    pub away: String,
    /// Text drawn on the home background.
    pub text_home: &'static str,
    /// Text drawn on the away background.
    pub text_away: &'static str,
}

impl Palette {
    /// Resolve the palette of `view`, falling back to side defaults.
    pub fn of(view: &MatchView) -> Self {
        let home = resolve_background(&view.home.display_color, Side::Home);
        let away = resolve_background(&view.away.display_color, Side::Away);
        let text_home = contrast_text(&home);
        let text_away = contrast_text(&away);
        Self {
            home,
            away,
            text_home,
            text_away,
        }
    }

    /// Background and text color of `side`.
    pub fn side(&self, side: Side) -> (&str, &'static str) {
        match side {
            Side::Home => (&self.home, self.text_home),
            Side::Away => (&self.away, self.text_away),
        }
    }
}

// ---------------------------------------------------------------------------
// Overlay fragment contexts
// ---------------------------------------------------------------------------

/// Context of the goal fragment.
#[derive(Debug, Clone, Serialize)]
pub struct GoalFill {
    /// Scoring team background.
    pub background: String,
    /// Text on the scoring team background.
    pub text: &'static str,
    /// Scoring team name.
    pub team: String,
    /// Home score at the time of the goal.
    pub score_home: u32,
    /// Away score at the time of the goal.
    pub score_away: u32,
    /// Scorer line (`#9 Name`), empty when unknown.
    pub scorer: String,
}

impl GoalFill {
    /// Build the goal context.
    pub fn new(payload: &GoalPayload, view: &MatchView, palette: &Palette) -> Self {
        let (background, text) = palette.side(payload.side);
        let team = match payload.side {
            Side::Home => view.home.name.clone(),
            Side::Away => view.away.name.clone(),
        };
        let name = payload.scorer_name.as_deref().unwrap_or_default();
        let scorer = match payload.scorer_number.as_deref() {
            Some(number) if !name.is_empty() => format!("#{number} {name}"),
            Some(number) => format!("#{number}"),
            None => name.to_owned(),
        };
        Self {
            background: background.to_owned(),
            text,
            team,
            score_home: payload.score_home,
            score_away: payload.score_away,
            scorer,
        }
    }
}

/// Context of the card fragment.
#[derive(Debug, Clone, Serialize)]
pub struct CardFill {
    /// Chip background for the severity.
    pub chip: &'static str,
    /// Chip text color.
    pub chip_text: &'static str,
    /// Severity label.
    pub label: &'static str,
    /// Side caption.
    pub side: &'static str,
    /// Player label as entered.
    pub player: String,
}

impl CardFill {
    /// Build the card context.
    pub fn new(payload: &CardPayload) -> Self {
        let (chip, chip_text) = match payload.severity {
            CardSeverity::Yellow => ("#FBC02D", "#000"),
            CardSeverity::Red => ("#D32F2F", "#fff"),
        };
        Self {
            chip,
            chip_text,
            label: payload.severity.label(),
            side: payload.side.caption(),
            player: payload.player.trim().to_owned(),
        }
    }
}

/// Context of the substitution fragment.
#[derive(Debug, Clone, Serialize)]
pub struct SubFill {
    /// Incoming shirt number, empty when the label has none.
    pub number_in: String,
    /// Incoming player name.
    pub name_in: String,
    /// Outgoing shirt number, empty when the label has none.
    pub number_out: String,
    /// Outgoing player name.
    pub name_out: String,
}

impl SubFill {
    /// Build the substitution context.
    pub fn new(payload: &SubPayload) -> Self {
        let incoming = split_player_label(&payload.player_in);
        let outgoing = split_player_label(&payload.player_out);
        Self {
            number_in: incoming.number.unwrap_or_default(),
            name_in: incoming.name,
            number_out: outgoing.number.unwrap_or_default(),
            name_out: outgoing.name,
        }
    }
}

/// Context of the statistics fragment.
#[derive(Debug, Clone, Serialize)]
pub struct StatsFill {
    /// Caption.
    pub title: String,
    /// Home bar width in percent, two decimals.
    pub width_home: String,
    /// Away bar width in percent, two decimals.
    pub width_away: String,
    /// Raw home value.
    pub value_home: u32,
    /// Raw away value.
    pub value_away: u32,
}

impl StatsFill {
    /// Build the statistics context.
    pub fn new(payload: &StatsPayload) -> Self {
        Self {
            title: payload.title.clone(),
            width_home: format!("{:.2}", payload.share_home.clamp(0.0, 1.0) * 100.0),
            width_away: format!("{:.2}", payload.share_away.clamp(0.0, 1.0) * 100.0),
            value_home: payload.value_home,
            value_away: payload.value_away,
        }
    }
}

// ---------------------------------------------------------------------------
// Document fill
// ---------------------------------------------------------------------------

/// Every value substituted into the rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFill {
    /// Home background.
    pub color_home: String,
    /// Away background.
    pub color_away: String,
    /// Text on the home background.
    pub text_color_home: String,
    /// Text on the away background.
    pub text_color_away: String,
    /// Brand mark image, empty to omit.
    pub brand: String,
    /// Home crest image, empty to omit.
    pub crest_home: String,
    /// Away crest image, empty to omit.
    pub crest_away: String,
    /// Clock string.
    pub clock: String,
    /// Added-time caption, empty when hidden.
    pub added_text: String,
    /// Home team name.
    pub team_home: String,
    /// Away team name.
    pub team_away: String,
    /// Home score.
    pub score_home: u32,
    /// Away score.
    pub score_away: u32,
    /// Home red card count.
    pub red_cards_home: u32,
    /// Away red card count.
    pub red_cards_away: u32,
    /// Rendered overlay fragment, empty when no overlay is active.
    pub overlay_markup: String,
    /// Record location fetched by the auto-refresh script.
    pub record_href: String,
}

impl DocumentFill {
    /// Assemble the fill for `view` with an already-rendered overlay.
    pub fn new(
        view: &MatchView,
        palette: &Palette,
        overlay_markup: String,
        record_href: String,
    ) -> Self {
        Self {
            color_home: palette.home.clone(),
            color_away: palette.away.clone(),
            text_color_home: palette.text_home.to_owned(),
            text_color_away: palette.text_away.to_owned(),
            brand: normalize_crest(&view.brand_logo).unwrap_or_default(),
            crest_home: normalize_crest(&view.crest_home).unwrap_or_default(),
            crest_away: normalize_crest(&view.crest_away).unwrap_or_default(),
            clock: format_clock(view.clock.total_ms),
            added_text: added_time_text(view.added_minutes),
            team_home: view.home.name.clone(),
            team_away: view.away.name.clone(),
            score_home: view.score.home,
            score_away: view.score.away,
            red_cards_home: view.red_cards.home,
            red_cards_away: view.red_cards.away,
            overlay_markup,
            record_href,
        }
    }
}

/// Build the compact state record for `view`.
pub fn build_record(view: &MatchView, palette: &Palette, overlay_markup: String) -> StateRecord {
    StateRecord {
        team_home: view.home.name.clone(),
        team_away: view.away.name.clone(),
        color_home: palette.home.clone(),
        color_away: palette.away.clone(),
        text_color_home: palette.text_home.to_owned(),
        text_color_away: palette.text_away.to_owned(),
        score_home: view.score.home,
        score_away: view.score.away,
        clock: format_clock(view.clock.total_ms),
        added_minutes: view.added_minutes,
        overlay_markup,
        overlay_kind: view
            .overlay
            .as_ref()
            .map(|payload| payload.kind().as_str().to_owned())
            .unwrap_or_default(),
        red_cards_home: view.red_cards.home,
        red_cards_away: view.red_cards.away,
        flash_color: view
            .flash
            .map(|color| color.as_str().to_owned())
            .unwrap_or_default(),
        running: view.clock.running,
        start_epoch_ms: view.clock.start_epoch_ms,
        elapsed_ms: view.clock.elapsed_ms,
        base_ms: view.clock.base_ms,
    }
}
