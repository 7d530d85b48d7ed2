//! Operator command vocabulary and its outcomes.
//!
//! Every mutation of a match goes through a [`Command`] applied by
//! [`MatchState::apply`](crate::match_state::MatchState::apply). Rejections
//! are [`CommandError`]s and never leave partial state behind.

use rand::Rng;
use scorebug_types::{CardSeverity, CrestSlot, Period, Side};

use crate::clock::ClockError;
use crate::guard::GuardedAction;

/// Lower bound of a scheduled statistic's random delay, in seconds.
pub const MIN_STATS_DELAY_SECS: u32 = 5;

/// A named operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start or pause the clock. Pausing is confirmation-guarded.
    ToggleClock {
        /// The operator's answer to a confirmation prompt, if asked.
        confirm: Option<bool>,
    },
    /// Reset clock, period, score, cards and pending events. Guarded.
    ResetMatch {
        /// The operator's answer to a confirmation prompt, if asked.
        confirm: Option<bool>,
    },
    /// Switch period.
    SetPeriod {
        /// The new period.
        period: Period,
    },
    /// Set the added time shown next to the clock.
    ApplyAddedTime {
        /// Minutes, 0 to hide.
        minutes: u32,
    },
    /// Score a goal; the overlay follows after the grace delay.
    RecordGoal {
        /// Scoring side.
        side: Side,
        /// Scorer label or shirt number.
        scorer: Option<String>,
    },
    /// Take one goal back.
    CorrectScore {
        /// Side whose score is decremented.
        side: Side,
    },
    /// Book a player.
    RecordCard {
        /// Side of the player.
        side: Side,
        /// Player label.
        player: String,
        /// Yellow or red.
        severity: CardSeverity,
    },
    /// Substitute a player.
    RecordSubstitution {
        /// Side making the change.
        side: Side,
        /// Player leaving.
        player_out: String,
        /// Player coming on.
        player_in: String,
    },
    /// Show a statistic bar now.
    ShowStats {
        /// Caption.
        title: String,
        /// Home value.
        value_home: u32,
        /// Away value.
        value_away: u32,
    },
    /// Show a statistic bar after a random delay.
    ScheduleStats {
        /// Caption.
        title: String,
        /// Home value.
        value_home: u32,
        /// Away value.
        value_away: u32,
        /// Upper bound of the delay, in seconds.
        max_delay_secs: u32,
    },
    /// Remove the active overlay.
    HideOverlay,
    /// Choose the teams on the scorebug.
    SelectTeams {
        /// Home team name.
        home: String,
        /// Away team name.
        away: String,
    },
    /// Point a crest slot at an image reference.
    SetCrest {
        /// Which image.
        slot: CrestSlot,
        /// Path or URL; empty to clear.
        reference: String,
    },
}

impl Command {
    /// Whether applying this command changes what is persisted.
    pub const fn persists(&self) -> bool {
        matches!(
            self,
            Self::ToggleClock { .. }
                | Self::ResetMatch { .. }
                | Self::SetPeriod { .. }
                | Self::ApplyAddedTime { .. }
                | Self::RecordGoal { .. }
                | Self::CorrectScore { .. }
                | Self::RecordCard { .. }
                | Self::SelectTeams { .. }
                | Self::SetCrest { .. }
        )
    }

    /// Short name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ToggleClock { .. } => "toggle_clock",
            Self::ResetMatch { .. } => "reset_match",
            Self::SetPeriod { .. } => "set_period",
            Self::ApplyAddedTime { .. } => "apply_added_time",
            Self::RecordGoal { .. } => "record_goal",
            Self::CorrectScore { .. } => "correct_score",
            Self::RecordCard { .. } => "record_card",
            Self::RecordSubstitution { .. } => "record_substitution",
            Self::ShowStats { .. } => "show_stats",
            Self::ScheduleStats { .. } => "schedule_stats",
            Self::HideOverlay => "hide_overlay",
            Self::SelectTeams { .. } => "select_teams",
            Self::SetCrest { .. } => "set_crest",
        }
    }
}

/// Result of a command that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State changed.
    Applied,
    /// The action is guarded; resend with an explicit answer.
    ConfirmationRequired(GuardedAction),
    /// The operator declined; nothing changed.
    Declined,
    /// An event was scheduled to happen after `delay_ms`.
    Scheduled {
        /// Delay before the event, in milliseconds.
        delay_ms: u64,
    },
}

/// Validation rejections. No state is mutated when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A substitution named the same player twice.
    #[error("substitution rejected: {player} cannot replace themselves")]
    SamePlayer {
        /// The repeated label.
        player: String,
    },

    /// Added time outside the accepted range.
    #[error("invalid added time: {source}")]
    AddedTime {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A team name was blank.
    #[error("team names must not be empty")]
    EmptyTeamName,
}

/// Draw the delay of a scheduled statistic, uniformly in
/// `[5, max(5, max_delay_secs)]` seconds.
pub fn draw_stats_delay_secs(max_delay_secs: u32) -> u32 {
    let upper = max_delay_secs.max(MIN_STATS_DELAY_SECS);
    rand::rng().random_range(MIN_STATS_DELAY_SECS..=upper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_delay_stays_in_range() {
        for _ in 0..200 {
            let delay = draw_stats_delay_secs(12);
            assert!((5..=12).contains(&delay));
        }
    }

    #[test]
    fn small_maximum_is_raised_to_the_floor() {
        assert_eq!(draw_stats_delay_secs(0), 5);
        assert_eq!(draw_stats_delay_secs(3), 5);
    }

    #[test]
    fn overlay_only_commands_do_not_persist() {
        assert!(!Command::HideOverlay.persists());
        assert!(
            !Command::ShowStats {
                title: "Shots".to_owned(),
                value_home: 1,
                value_away: 2,
            }
            .persists()
        );
        assert!(Command::ToggleClock { confirm: None }.persists());
    }
}
