//! The match aggregate: the single mutation surface of a live match.
//!
//! [`MatchState`] owns the score, red cards, team selection, crest
//! references, the clock, the overlay and flash, the confirmation guards,
//! and the scheduler holding every deferred effect. Commands are applied
//! through [`MatchState::apply`]; time advances through [`MatchState::tick`].
//! Both take `now_ms` explicitly so the whole aggregate is deterministic
//! under test.

use scorebug_types::{
    CardPayload, CardSeverity, CrestSlot, DEFAULT_AWAY_TEAM, DEFAULT_HOME_TEAM, FlashColor, GoalPayload,
    OverlayKind, OverlayPayload, Period, PersistedMatch, Side, StatsPayload, SubPayload, Team,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{ClockEngine, ClockReading};
use crate::command::{Command, CommandError, CommandOutcome, draw_stats_delay_secs};
use crate::config::{ClockConfig, OverlayConfig};
use crate::guard::{ConfirmationGuard, GuardDecision, GuardedAction};
use crate::overlay::{FlashIndicator, OverlayStateMachine};
use crate::roster::{Roster, resolve_scorer};
use crate::scheduler::{Scheduler, TimerTask, TimerToken, deadline_after};

// ---------------------------------------------------------------------------
// Value types
// ---------------------------------------------------------------------------

/// Goals per side. Never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    /// Home goals.
    pub home: u32,
    /// Away goals.
    pub away: u32,
}

impl Score {
    /// Goals of `side`.
    pub const fn get(self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    const fn slot(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }

    /// Add one goal to `side`.
    pub const fn increment(&mut self, side: Side) {
        let goals = self.slot(side);
        *goals = goals.saturating_add(1);
    }

    /// Take one goal from `side`. Returns `false` at zero.
    pub const fn decrement(&mut self, side: Side) -> bool {
        let goals = self.slot(side);
        if *goals == 0 {
            return false;
        }
        *goals = goals.saturating_sub(1);
        true
    }
}

/// Red cards per side. Only a match reset lowers them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RedCards {
    /// Home red cards.
    pub home: u32,
    /// Away red cards.
    pub away: u32,
}

impl RedCards {
    /// Red cards of `side`.
    pub const fn get(self, side: Side) -> u32 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// Count one more red card for `side`.
    pub const fn record(&mut self, side: Side) {
        match side {
            Side::Home => self.home = self.home.saturating_add(1),
            Side::Away => self.away = self.away.saturating_add(1),
        }
    }
}

/// Names of the two selected teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSelection {
    /// Home team name.
    pub home: String,
    /// Away team name.
    pub away: String,
}

impl TeamSelection {
    /// Name of the team on `side`.
    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

impl Default for TeamSelection {
    fn default() -> Self {
        Self {
            home: DEFAULT_HOME_TEAM.to_owned(),
            away: DEFAULT_AWAY_TEAM.to_owned(),
        }
    }
}

/// Operator-chosen image references. Empty means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrestRefs {
    /// Home crest override.
    pub home: String,
    /// Away crest override.
    pub away: String,
    /// Competition brand mark.
    pub brand: String,
}

impl CrestRefs {
    /// Reference stored for `slot`.
    pub fn get(&self, slot: CrestSlot) -> &str {
        match slot {
            CrestSlot::Home => &self.home,
            CrestSlot::Away => &self.away,
            CrestSlot::Brand => &self.brand,
        }
    }

    fn set(&mut self, slot: CrestSlot, reference: String) {
        match slot {
            CrestSlot::Home => self.home = reference,
            CrestSlot::Away => self.away = reference,
            CrestSlot::Brand => self.brand = reference,
        }
    }
}

/// Transient message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text.
    pub text: String,
    /// Epoch milliseconds at which the notice is dropped.
    pub deadline_ms: i64,
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Everything the publisher needs, resolved at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchView {
    /// Home team as resolved by the directory.
    pub home: Team,
    /// Away team as resolved by the directory.
    pub away: Team,
    /// Effective home crest reference, empty when none.
    pub crest_home: String,
    /// Effective away crest reference, empty when none.
    pub crest_away: String,
    /// Brand mark reference, empty when none.
    pub brand_logo: String,
    /// Current score.
    pub score: Score,
    /// Current red cards.
    pub red_cards: RedCards,
    /// Clock fields at the view instant.
    pub clock: ClockReading,
    /// Current period.
    pub period: Period,
    /// Added minutes on display, 0 when hidden.
    pub added_minutes: u32,
    /// Active overlay content.
    pub overlay: Option<OverlayPayload>,
    /// Active flash color.
    pub flash: Option<FlashColor>,
}

/// Operator-facing summary of the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatus {
    /// Whether the clock is running.
    pub running: bool,
    /// Current period.
    pub period: Period,
    /// Current score.
    pub score: Score,
    /// Selected home team.
    pub team_home: String,
    /// Selected away team.
    pub team_away: String,
    /// Kind of the active overlay.
    pub overlay_kind: Option<OverlayKind>,
    /// How many pauses have been applied.
    pub pause_confirmations: u32,
    /// How many resets have been applied.
    pub reset_confirmations: u32,
    /// Current operator notice.
    pub notice: Option<String>,
    /// Number of deferred effects still pending.
    pub pending_timers: usize,
}

/// What a tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Number of scheduled tasks dispatched.
    pub fired: usize,
    /// Whether the clock was paused at a period boundary.
    pub auto_paused: bool,
}

// ---------------------------------------------------------------------------
// MatchState
// ---------------------------------------------------------------------------

/// Aggregate root of a live match.
#[derive(Debug)]
pub struct MatchState {
    clock: ClockEngine,
    overlay: OverlayStateMachine,
    flash: FlashIndicator,
    scheduler: Scheduler,
    guard: ConfirmationGuard,
    score: Score,
    red_cards: RedCards,
    teams: TeamSelection,
    crests: CrestRefs,
    notice: Option<Notice>,
    timings: OverlayConfig,
    overlay_token: Option<TimerToken>,
    flash_token: Option<TimerToken>,
    notice_token: Option<TimerToken>,
}

impl MatchState {
    /// A fresh match: default teams, 0-0, clock paused at 00:00.
    pub fn new(clock: &ClockConfig, timings: &OverlayConfig) -> Self {
        Self {
            clock: ClockEngine::new(clock),
            overlay: OverlayStateMachine::new(),
            flash: FlashIndicator::new(),
            scheduler: Scheduler::new(),
            guard: ConfirmationGuard::new(),
            score: Score::default(),
            red_cards: RedCards::default(),
            teams: TeamSelection::default(),
            crests: CrestRefs::default(),
            notice: None,
            timings: timings.clone(),
            overlay_token: None,
            flash_token: None,
            notice_token: None,
        }
    }

    /// Rebuild a match from its persisted record.
    pub fn restore(clock: &ClockConfig, timings: &OverlayConfig, record: &PersistedMatch) -> Self {
        let mut state = Self::new(clock, timings);
        state.clock = ClockEngine::restore(clock, record);
        state.score = Score {
            home: record.score_home,
            away: record.score_away,
        };
        state.red_cards = RedCards {
            home: record.red_cards_home,
            away: record.red_cards_away,
        };
        state.teams = TeamSelection {
            home: non_blank_or(&record.team_home, DEFAULT_HOME_TEAM),
            away: non_blank_or(&record.team_away, DEFAULT_AWAY_TEAM),
        };
        state.crests = CrestRefs {
            home: record.logo_home.clone(),
            away: record.logo_away.clone(),
            brand: record.brand_logo.clone(),
        };
        state
    }

    /// The durable subset of the match.
    pub fn to_persisted(&self) -> PersistedMatch {
        PersistedMatch {
            running: self.clock.is_running(),
            start_epoch_ms: self.clock.start_epoch_ms().unwrap_or(0),
            elapsed_ms: self.clock.elapsed_ms(),
            period: self.clock.period(),
            team_home: self.teams.home.clone(),
            team_away: self.teams.away.clone(),
            score_home: self.score.home,
            score_away: self.score.away,
            red_cards_home: self.red_cards.home,
            red_cards_away: self.red_cards.away,
            brand_logo: self.crests.brand.clone(),
            logo_home: self.crests.home.clone(),
            logo_away: self.crests.away.clone(),
        }
    }

    /// Apply one operator command.
    ///
    /// Rejections leave the match untouched apart from an operator notice.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] when the command fails validation.
    pub fn apply(
        &mut self,
        command: Command,
        now_ms: i64,
    ) -> Result<CommandOutcome, CommandError> {
        let name = command.name();
        let result = self.apply_inner(command, now_ms);
        match &result {
            Ok(outcome) => debug!(command = name, ?outcome, "Command applied"),
            Err(e) => {
                warn!(command = name, error = %e, "Command rejected");
                self.post_notice(e.to_string(), now_ms);
            }
        }
        result
    }

    fn apply_inner(
        &mut self,
        command: Command,
        now_ms: i64,
    ) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::ToggleClock { confirm } => {
                if self.clock.is_running() {
                    if let Some(outcome) = self.pass_guard(GuardedAction::Pause, confirm) {
                        return Ok(outcome);
                    }
                }
                let transition = self.clock.toggle(now_ms);
                info!(
                    ?transition,
                    elapsed_ms = self.clock.elapsed_ms(),
                    "Clock toggled"
                );
                Ok(CommandOutcome::Applied)
            }
            Command::ResetMatch { confirm } => {
                if let Some(outcome) = self.pass_guard(GuardedAction::Reset, confirm) {
                    return Ok(outcome);
                }
                self.reset_match();
                Ok(CommandOutcome::Applied)
            }
            Command::SetPeriod { period } => {
                self.clock.set_period(period);
                self.clear_flash();
                info!(period = period.number(), "Period set");
                Ok(CommandOutcome::Applied)
            }
            Command::ApplyAddedTime { minutes } => {
                self.clock.apply_added_time(minutes, now_ms)?;
                info!(minutes, "Added time applied");
                Ok(CommandOutcome::Applied)
            }
            Command::RecordGoal { side, scorer } => {
                self.score.increment(side);
                self.scheduler.schedule(
                    now_ms,
                    self.timings.goal_grace_ms,
                    TimerTask::GoalCompletion {
                        side,
                        scorer_hint: scorer,
                    },
                );
                info!(
                    %side,
                    home = self.score.home,
                    away = self.score.away,
                    "Goal recorded"
                );
                Ok(CommandOutcome::Applied)
            }
            Command::CorrectScore { side } => {
                if self.score.decrement(side) {
                    info!(%side, "Score corrected");
                }
                Ok(CommandOutcome::Applied)
            }
            Command::RecordCard {
                side,
                player,
                severity,
            } => {
                if severity == CardSeverity::Red {
                    self.red_cards.record(side);
                }
                self.trigger_flash(severity.flash_color(), now_ms);
                let duration = self.timings.card_duration_ms;
                self.show_overlay(
                    OverlayPayload::Card(CardPayload {
                        side,
                        player,
                        severity,
                    }),
                    duration,
                    now_ms,
                );
                Ok(CommandOutcome::Applied)
            }
            Command::RecordSubstitution {
                side,
                player_out,
                player_in,
            } => {
                let out = player_out.trim();
                if !out.is_empty() && out == player_in.trim() {
                    return Err(CommandError::SamePlayer {
                        player: out.to_owned(),
                    });
                }
                let duration = self.timings.sub_duration_ms;
                self.show_overlay(
                    OverlayPayload::Sub(SubPayload {
                        side,
                        player_out,
                        player_in,
                    }),
                    duration,
                    now_ms,
                );
                Ok(CommandOutcome::Applied)
            }
            Command::ShowStats {
                title,
                value_home,
                value_away,
            } => {
                let duration = self.timings.stats_duration_ms;
                self.show_overlay(
                    OverlayPayload::Stats(StatsPayload::from_values(
                        &title, value_home, value_away,
                    )),
                    duration,
                    now_ms,
                );
                Ok(CommandOutcome::Applied)
            }
            Command::ScheduleStats {
                title,
                value_home,
                value_away,
                max_delay_secs,
            } => {
                let delay_secs = draw_stats_delay_secs(max_delay_secs);
                let payload = StatsPayload::from_values(&title, value_home, value_away);
                let delay_ms = self.schedule_stats(payload, delay_secs, now_ms);
                Ok(CommandOutcome::Scheduled { delay_ms })
            }
            Command::HideOverlay => {
                self.hide_overlay();
                Ok(CommandOutcome::Applied)
            }
            Command::SelectTeams { home, away } => {
                let (home, away) = (home.trim(), away.trim());
                if home.is_empty() || away.is_empty() {
                    return Err(CommandError::EmptyTeamName);
                }
                if home != self.teams.home {
                    self.crests.home.clear();
                }
                if away != self.teams.away {
                    self.crests.away.clear();
                }
                self.teams = TeamSelection {
                    home: home.to_owned(),
                    away: away.to_owned(),
                };
                info!(home, away, "Teams selected");
                Ok(CommandOutcome::Applied)
            }
            Command::SetCrest { slot, reference } => {
                self.crests.set(slot, reference.trim().to_owned());
                Ok(CommandOutcome::Applied)
            }
        }
    }

    /// Schedule `payload` to be shown after `delay_secs` and tell the
    /// operator. Returns the delay in milliseconds.
    pub fn schedule_stats(&mut self, payload: StatsPayload, delay_secs: u32, now_ms: i64) -> u64 {
        let delay_ms = u64::from(delay_secs).saturating_mul(1000);
        let title = payload.title.clone();
        self.scheduler
            .schedule(now_ms, delay_ms, TimerTask::ScheduledStats(payload));
        info!(title = %title, delay_secs, "Statistic scheduled");
        self.post_notice(format!("\"{title}\" scheduled in ~{delay_secs}s"), now_ms);
        delay_ms
    }

    /// Advance time: dispatch every due task, then let the clock check its
    /// period boundary.
    pub fn tick(&mut self, now_ms: i64, roster: &dyn Roster) -> TickReport {
        let due = self.scheduler.take_due(now_ms);
        let fired = due.len();
        for (token, task) in due {
            self.dispatch(token, task, now_ms, roster);
        }

        let auto_paused = self.clock.tick(now_ms);
        if auto_paused {
            info!(
                period = self.clock.period().number(),
                total_ms = self.clock.total_elapsed_ms(now_ms),
                "Period end reached, clock paused"
            );
        }
        TickReport { fired, auto_paused }
    }

    /// Pause a running clock without consulting the guard, for shutdown.
    pub fn halt_clock(&mut self, now_ms: i64) -> bool {
        self.clock.stop(now_ms)
    }

    // -----------------------------------------------------------------------
    // Deferred effects
    // -----------------------------------------------------------------------

    fn dispatch(&mut self, token: TimerToken, task: TimerTask, now_ms: i64, roster: &dyn Roster) {
        match task {
            TimerTask::OverlayExpiry => {
                if self.overlay_token == Some(token) && self.overlay.expire(now_ms) {
                    self.overlay_token = None;
                    debug!("Overlay expired");
                }
            }
            TimerTask::FlashExpiry => {
                if self.flash_token == Some(token) && self.flash.expire(now_ms) {
                    self.flash_token = None;
                }
            }
            TimerTask::NoticeExpiry => {
                if self.notice_token == Some(token) {
                    self.notice = None;
                    self.notice_token = None;
                }
            }
            TimerTask::GoalCompletion { side, scorer_hint } => {
                self.complete_goal(side, scorer_hint.as_deref(), now_ms, roster);
            }
            TimerTask::ScheduledStats(payload) => {
                let duration = self.timings.stats_duration_ms;
                self.show_overlay(OverlayPayload::Stats(payload), duration, now_ms);
            }
        }
    }

    fn complete_goal(
        &mut self,
        side: Side,
        scorer_hint: Option<&str>,
        now_ms: i64,
        roster: &dyn Roster,
    ) {
        let scorer = scorer_hint.and_then(|hint| {
            match roster.players(self.teams.name(side), side) {
                Ok(players) => resolve_scorer(&players, hint),
                Err(e) => {
                    warn!(%side, error = %e, "Scorer lookup failed, showing goal without scorer");
                    None
                }
            }
        });
        let (scorer_number, scorer_name) = scorer.map_or((None, None), |label| {
            let name = Some(label.name).filter(|name| !name.is_empty());
            (label.number, name)
        });

        let duration = self.timings.goal_duration_ms;
        self.show_overlay(
            OverlayPayload::Goal(GoalPayload {
                side,
                score_home: self.score.home,
                score_away: self.score.away,
                scorer_number,
                scorer_name,
            }),
            duration,
            now_ms,
        );
    }

    fn show_overlay(&mut self, payload: OverlayPayload, duration_ms: u64, now_ms: i64) {
        if let Some(previous) = self.overlay_token.take() {
            self.scheduler.cancel(previous);
        }
        let kind = payload.kind();
        if let Some(preempted) = self.overlay.show(payload, duration_ms, now_ms) {
            debug!(
                preempted = preempted.payload.kind().as_str(),
                "Overlay preempted"
            );
        }
        self.overlay_token = Some(
            self.scheduler
                .schedule(now_ms, duration_ms, TimerTask::OverlayExpiry),
        );
        info!(kind = kind.as_str(), duration_ms, "Overlay shown");
    }

    fn hide_overlay(&mut self) {
        if let Some(token) = self.overlay_token.take() {
            self.scheduler.cancel(token);
        }
        self.overlay.hide();
    }

    fn trigger_flash(&mut self, color: FlashColor, now_ms: i64) {
        if let Some(previous) = self.flash_token.take() {
            self.scheduler.cancel(previous);
        }
        let duration = self.timings.flash_duration_ms;
        self.flash.trigger(color, duration, now_ms);
        self.flash_token = Some(
            self.scheduler
                .schedule(now_ms, duration, TimerTask::FlashExpiry),
        );
    }

    fn clear_flash(&mut self) {
        if let Some(token) = self.flash_token.take() {
            self.scheduler.cancel(token);
        }
        self.flash.clear();
    }

    fn post_notice(&mut self, text: String, now_ms: i64) {
        if let Some(previous) = self.notice_token.take() {
            self.scheduler.cancel(previous);
        }
        let duration = self.timings.notice_duration_ms;
        self.notice = Some(Notice {
            text,
            deadline_ms: deadline_after(now_ms, duration),
        });
        self.notice_token = Some(
            self.scheduler
                .schedule(now_ms, duration, TimerTask::NoticeExpiry),
        );
    }

    fn pass_guard(&mut self, action: GuardedAction, confirm: Option<bool>) -> Option<CommandOutcome> {
        match self.guard.check(action, confirm) {
            GuardDecision::Proceed => {
                self.guard.record(action);
                None
            }
            GuardDecision::NeedsConfirmation => Some(CommandOutcome::ConfirmationRequired(action)),
            GuardDecision::Declined => {
                debug!(?action, "Guarded action declined");
                Some(CommandOutcome::Declined)
            }
        }
    }

    fn reset_match(&mut self) {
        self.clock.reset();
        self.clock.set_period(Period::First);
        self.score = Score::default();
        self.red_cards = RedCards::default();
        self.clear_flash();
        self.hide_overlay();
        let cancelled = self.scheduler.cancel_where(TimerTask::is_match_event);
        info!(cancelled, "Match reset");
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Resolve everything the publisher needs at `now_ms`.
    pub fn view(&self, now_ms: i64, roster: &dyn Roster) -> MatchView {
        let home = resolve_team(roster, &self.teams.home, Side::Home);
        let away = resolve_team(roster, &self.teams.away, Side::Away);
        let crest_home = effective_crest(&self.crests.home, &home);
        let crest_away = effective_crest(&self.crests.away, &away);
        MatchView {
            home,
            away,
            crest_home,
            crest_away,
            brand_logo: self.crests.brand.clone(),
            score: self.score,
            red_cards: self.red_cards,
            clock: self.clock.reading(now_ms),
            period: self.clock.period(),
            added_minutes: self.clock.displayed_added_minutes(),
            overlay: self.overlay.active().map(|active| active.payload.clone()),
            flash: self.flash.color(),
        }
    }

    /// Operator-facing summary.
    pub fn status(&self) -> MatchStatus {
        MatchStatus {
            running: self.clock.is_running(),
            period: self.clock.period(),
            score: self.score,
            team_home: self.teams.home.clone(),
            team_away: self.teams.away.clone(),
            overlay_kind: self.overlay.kind(),
            pause_confirmations: self.guard.count(GuardedAction::Pause),
            reset_confirmations: self.guard.count(GuardedAction::Reset),
            notice: self.notice.as_ref().map(|notice| notice.text.clone()),
            pending_timers: self.scheduler.len(),
        }
    }

    /// The match clock.
    pub const fn clock(&self) -> &ClockEngine {
        &self.clock
    }

    /// The overlay state machine.
    pub const fn overlay(&self) -> &OverlayStateMachine {
        &self.overlay
    }

    /// The flash indicator.
    pub const fn flash(&self) -> &FlashIndicator {
        &self.flash
    }

    /// Current score.
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Current red cards.
    pub const fn red_cards(&self) -> RedCards {
        self.red_cards
    }

    /// Selected teams.
    pub const fn teams(&self) -> &TeamSelection {
        &self.teams
    }

    /// Operator image references.
    pub const fn crests(&self) -> &CrestRefs {
        &self.crests
    }

    /// Current operator notice.
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Pending deferred effects.
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn resolve_team(roster: &dyn Roster, name: &str, side: Side) -> Team {
    roster.team(name).map_or_else(
        || Team::unresolved(name, side),
        |team| Team {
            name: name.to_owned(),
            ..team
        },
    )
}

fn effective_crest(operator_ref: &str, team: &Team) -> String {
    if operator_ref.is_empty() {
        team.crest_ref.clone().unwrap_or_default()
    } else {
        operator_ref.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{EmptyRoster, RosterError};

    const T0: i64 = 1_700_000_000_000;

    struct Squads;

    impl Roster for Squads {
        fn team(&self, name: &str) -> Option<Team> {
            (name == "Lions").then(|| Team {
                name: "Lions".to_owned(),
                display_color: "#FFD700".to_owned(),
                crest_ref: Some("crests/lions".to_owned()),
            })
        }

        fn team_names(&self) -> Vec<String> {
            vec!["Lions".to_owned()]
        }

        fn players(&self, _team: &str, _side: Side) -> Result<Vec<String>, RosterError> {
            Ok(vec!["9 Striker".to_owned(), "4 Defender".to_owned()])
        }
    }

    struct BrokenRoster;

    impl Roster for BrokenRoster {
        fn team(&self, _name: &str) -> Option<Team> {
            None
        }

        fn team_names(&self) -> Vec<String> {
            Vec::new()
        }

        fn players(&self, _team: &str, _side: Side) -> Result<Vec<String>, RosterError> {
            Err(RosterError::Unavailable("sheet locked".to_owned()))
        }
    }

    fn state() -> MatchState {
        MatchState::new(&ClockConfig::default(), &OverlayConfig::default())
    }

    fn apply(state: &mut MatchState, command: Command, now: i64) -> Option<CommandOutcome> {
        state.apply(command, now).ok()
    }

    fn goal_payload(state: &MatchState) -> Option<GoalPayload> {
        match state.overlay().active().map(|a| &a.payload) {
            Some(OverlayPayload::Goal(goal)) => Some(goal.clone()),
            _ => None,
        }
    }

    #[test]
    fn goal_increments_immediately_and_shows_after_grace() {
        let mut state = state();
        apply(
            &mut state,
            Command::RecordGoal {
                side: Side::Home,
                scorer: Some("9".to_owned()),
            },
            T0,
        );
        assert_eq!(state.score().home, 1);
        assert!(state.overlay().active().is_none());

        state.tick(T0 + 1_199, &Squads);
        assert!(state.overlay().active().is_none());

        let report = state.tick(T0 + 1_200, &Squads);
        assert_eq!(report.fired, 1);
        let goal = goal_payload(&state);
        assert_eq!(
            goal,
            Some(GoalPayload {
                side: Side::Home,
                score_home: 1,
                score_away: 0,
                scorer_number: Some("9".to_owned()),
                scorer_name: Some("Striker".to_owned()),
            })
        );
    }

    #[test]
    fn goal_overlay_bakes_in_the_score_at_completion() {
        let mut state = state();
        apply(&mut state, Command::RecordGoal { side: Side::Away, scorer: None }, T0);
        apply(&mut state, Command::CorrectScore { side: Side::Away }, T0 + 100);
        apply(&mut state, Command::RecordGoal { side: Side::Home, scorer: None }, T0 + 200);

        state.tick(T0 + 1_200, &EmptyRoster);
        let goal = goal_payload(&state);
        assert_eq!(goal.as_ref().map(|g| (g.score_home, g.score_away)), Some((1, 0)));
        assert_eq!(goal.and_then(|g| g.scorer_name), None);
    }

    #[test]
    fn roster_failure_still_shows_the_goal() {
        let mut state = state();
        apply(
            &mut state,
            Command::RecordGoal {
                side: Side::Home,
                scorer: Some("10 Someone".to_owned()),
            },
            T0,
        );
        state.tick(T0 + 2_000, &BrokenRoster);
        let goal = goal_payload(&state);
        assert!(goal.is_some());
        assert_eq!(goal.and_then(|g| g.scorer_number), None);
    }

    #[test]
    fn red_card_counts_flashes_and_shows() {
        let mut state = state();
        apply(
            &mut state,
            Command::RecordCard {
                side: Side::Away,
                player: "4 Defender".to_owned(),
                severity: CardSeverity::Red,
            },
            T0,
        );
        assert_eq!(state.red_cards().away, 1);
        assert_eq!(state.flash().color(), Some(FlashColor::Red));
        assert_eq!(state.overlay().kind(), Some(OverlayKind::Card));

        state.tick(T0 + 3_000, &EmptyRoster);
        assert_eq!(state.flash().color(), None);
        assert_eq!(state.overlay().kind(), Some(OverlayKind::Card));

        state.tick(T0 + 5_500, &EmptyRoster);
        assert_eq!(state.overlay().kind(), None);
    }

    #[test]
    fn yellow_card_does_not_count() {
        let mut state = state();
        apply(
            &mut state,
            Command::RecordCard {
                side: Side::Home,
                player: "8 Midfielder".to_owned(),
                severity: CardSeverity::Yellow,
            },
            T0,
        );
        assert_eq!(state.red_cards(), RedCards::default());
        assert_eq!(state.flash().color(), Some(FlashColor::Yellow));
    }

    #[test]
    fn new_overlay_cancels_the_previous_expiry() {
        let mut state = state();
        apply(
            &mut state,
            Command::RecordCard {
                side: Side::Home,
                player: "5 Stopper".to_owned(),
                severity: CardSeverity::Yellow,
            },
            T0,
        );
        apply(
            &mut state,
            Command::ShowStats {
                title: "Corners".to_owned(),
                value_home: 3,
                value_away: 1,
            },
            T0 + 5_000,
        );
        // The card's expiry would have fired here.
        state.tick(T0 + 5_500, &EmptyRoster);
        assert_eq!(state.overlay().kind(), Some(OverlayKind::Stats));
        state.tick(T0 + 11_999, &EmptyRoster);
        assert_eq!(state.overlay().kind(), Some(OverlayKind::Stats));
        state.tick(T0 + 12_000, &EmptyRoster);
        assert_eq!(state.overlay().kind(), None);
    }

    #[test]
    fn stats_overlay_keeps_an_active_flash() {
        let mut state = state();
        apply(
            &mut state,
            Command::RecordCard {
                side: Side::Home,
                player: "5 Stopper".to_owned(),
                severity: CardSeverity::Red,
            },
            T0,
        );
        apply(&mut state, Command::HideOverlay, T0 + 100);
        apply(
            &mut state,
            Command::ShowStats {
                title: "Shots".to_owned(),
                value_home: 0,
                value_away: 0,
            },
            T0 + 200,
        );
        assert_eq!(state.flash().color(), Some(FlashColor::Red));
    }

    #[test]
    fn same_player_substitution_is_rejected() {
        let mut state = state();
        let result = state.apply(
            Command::RecordSubstitution {
                side: Side::Home,
                player_out: "7 Winger".to_owned(),
                player_in: " 7 Winger".to_owned(),
            },
            T0,
        );
        assert!(matches!(result, Err(CommandError::SamePlayer { .. })));
        assert!(state.overlay().active().is_none());
        assert!(state.notice().is_some());
    }

    #[test]
    fn empty_substitution_is_allowed() {
        let mut state = state();
        let outcome = apply(
            &mut state,
            Command::RecordSubstitution {
                side: Side::Away,
                player_out: String::new(),
                player_in: String::new(),
            },
            T0,
        );
        assert_eq!(outcome, Some(CommandOutcome::Applied));
        assert_eq!(state.overlay().kind(), Some(OverlayKind::Sub));
    }

    #[test]
    fn second_pause_needs_confirmation() {
        let mut state = state();
        let toggle = |confirm| Command::ToggleClock { confirm };

        assert_eq!(apply(&mut state, toggle(None), T0), Some(CommandOutcome::Applied));
        assert_eq!(apply(&mut state, toggle(None), T0 + 1_000), Some(CommandOutcome::Applied));
        assert!(!state.clock().is_running());

        // Resuming is never guarded.
        assert_eq!(apply(&mut state, toggle(None), T0 + 2_000), Some(CommandOutcome::Applied));
        assert_eq!(
            apply(&mut state, toggle(None), T0 + 3_000),
            Some(CommandOutcome::ConfirmationRequired(GuardedAction::Pause))
        );
        assert!(state.clock().is_running());
        assert_eq!(
            apply(&mut state, toggle(Some(false)), T0 + 3_000),
            Some(CommandOutcome::Declined)
        );
        assert!(state.clock().is_running());
        assert_eq!(
            apply(&mut state, toggle(Some(true)), T0 + 4_000),
            Some(CommandOutcome::Applied)
        );
        assert!(!state.clock().is_running());
        assert_eq!(state.clock().elapsed_ms(), 3_000);
    }

    #[test]
    fn reset_clears_the_match_but_keeps_teams() {
        let mut state = state();
        apply(&mut state, Command::SetPeriod { period: Period::Second }, T0);
        apply(&mut state, Command::ToggleClock { confirm: None }, T0);
        apply(&mut state, Command::RecordGoal { side: Side::Home, scorer: None }, T0);
        apply(
            &mut state,
            Command::RecordCard {
                side: Side::Away,
                player: "3 Back".to_owned(),
                severity: CardSeverity::Red,
            },
            T0,
        );
        apply(
            &mut state,
            Command::SelectTeams {
                home: "Lions".to_owned(),
                away: "Tigers".to_owned(),
            },
            T0,
        );

        assert_eq!(
            apply(&mut state, Command::ResetMatch { confirm: None }, T0 + 500),
            Some(CommandOutcome::Applied)
        );
        assert_eq!(state.score(), Score::default());
        assert_eq!(state.red_cards(), RedCards::default());
        assert_eq!(state.clock().period(), Period::First);
        assert!(!state.clock().is_running());
        assert_eq!(state.overlay().kind(), None);
        assert_eq!(state.flash().color(), None);
        assert_eq!(state.teams().home, "Lions");

        // The pending goal completion was cancelled.
        state.tick(T0 + 2_000, &EmptyRoster);
        assert!(goal_payload(&state).is_none());

        assert_eq!(
            apply(&mut state, Command::ResetMatch { confirm: None }, T0 + 3_000),
            Some(CommandOutcome::ConfirmationRequired(GuardedAction::Reset))
        );
    }

    #[test]
    fn period_change_clears_flash_and_counter() {
        let mut state = state();
        apply(&mut state, Command::ToggleClock { confirm: None }, T0);
        apply(
            &mut state,
            Command::RecordCard {
                side: Side::Home,
                player: "2 Back".to_owned(),
                severity: CardSeverity::Yellow,
            },
            T0 + 1_000,
        );
        apply(&mut state, Command::SetPeriod { period: Period::Second }, T0 + 2_000);
        assert_eq!(state.flash().color(), None);
        assert_eq!(state.clock().elapsed_ms(), 0);
        assert_eq!(state.clock().total_elapsed_ms(T0 + 2_000), 45 * 60_000);
    }

    #[test]
    fn score_correction_at_zero_is_a_no_op() {
        let mut state = state();
        assert_eq!(
            apply(&mut state, Command::CorrectScore { side: Side::Home }, T0),
            Some(CommandOutcome::Applied)
        );
        assert_eq!(state.score().home, 0);
    }

    #[test]
    fn auto_pause_is_reported_once() {
        let mut state = state();
        apply(&mut state, Command::ToggleClock { confirm: None }, T0);
        let at_end = T0 + 45 * 60_000;
        assert!(state.tick(at_end, &EmptyRoster).auto_paused);
        assert!(!state.tick(at_end + 300, &EmptyRoster).auto_paused);
        // The forced pause does not consume the free pause.
        assert_eq!(state.status().pause_confirmations, 0);
    }

    #[test]
    fn scheduled_stats_show_after_their_delay() {
        let mut state = state();
        let delay = state.schedule_stats(StatsPayload::from_values("Fouls", 4, 6), 8, T0);
        assert_eq!(delay, 8_000);
        assert!(state.notice().is_some());

        state.tick(T0 + 7_999, &EmptyRoster);
        assert_eq!(state.overlay().kind(), None);
        state.tick(T0 + 8_000, &EmptyRoster);
        assert_eq!(state.overlay().kind(), Some(OverlayKind::Stats));
    }

    #[test]
    fn schedule_stats_command_reports_the_delay() {
        let mut state = state();
        let outcome = apply(
            &mut state,
            Command::ScheduleStats {
                title: "Saves".to_owned(),
                value_home: 2,
                value_away: 5,
                max_delay_secs: 20,
            },
            T0,
        );
        assert!(
            matches!(
                outcome,
                Some(CommandOutcome::Scheduled { delay_ms }) if (5_000..=20_000).contains(&delay_ms)
            ),
            "unexpected outcome {outcome:?}"
        );
    }

    #[test]
    fn notices_expire() {
        let mut state = state();
        state.schedule_stats(StatsPayload::from_values("Fouls", 1, 1), 60, T0);
        state.tick(T0 + 3_000, &EmptyRoster);
        assert!(state.notice().is_none());
    }

    #[test]
    fn blank_team_name_is_rejected() {
        let mut state = state();
        let result = state.apply(
            Command::SelectTeams {
                home: "  ".to_owned(),
                away: "Tigers".to_owned(),
            },
            T0,
        );
        assert!(matches!(result, Err(CommandError::EmptyTeamName)));
        assert_eq!(state.teams().away, DEFAULT_AWAY_TEAM);
    }

    #[test]
    fn view_resolves_teams_and_crests() {
        let mut state = state();
        apply(
            &mut state,
            Command::SelectTeams {
                home: "Lions".to_owned(),
                away: "Nobody FC".to_owned(),
            },
            T0,
        );
        apply(
            &mut state,
            Command::SetCrest {
                slot: CrestSlot::Away,
                reference: "https://example.org/nobody.svg".to_owned(),
            },
            T0,
        );
        let view = state.view(T0, &Squads);
        assert_eq!(view.home.display_color, "#FFD700");
        assert_eq!(view.crest_home, "crests/lions");
        assert_eq!(view.away.display_color, Side::Away.default_color());
        assert_eq!(view.crest_away, "https://example.org/nobody.svg");
    }

    #[test]
    fn persisted_round_trip_keeps_the_clock_running() {
        let mut state = state();
        apply(&mut state, Command::ToggleClock { confirm: None }, T0);
        apply(&mut state, Command::RecordGoal { side: Side::Away, scorer: None }, T0);
        let record = state.to_persisted();
        assert!(record.running);
        assert_eq!(record.start_epoch_ms, T0);

        let restored =
            MatchState::restore(&ClockConfig::default(), &OverlayConfig::default(), &record);
        assert_eq!(restored.score().away, 1);
        assert_eq!(restored.clock().total_elapsed_ms(T0 + 10_000), 10_000);
    }

    #[test]
    fn halt_consolidates_for_shutdown() {
        let mut state = state();
        apply(&mut state, Command::ToggleClock { confirm: None }, T0);
        assert!(state.halt_clock(T0 + 4_200));
        let record = state.to_persisted();
        assert!(!record.running);
        assert_eq!(record.start_epoch_ms, 0);
        assert_eq!(record.elapsed_ms, 4_200);
    }
}
