//! Scheduled-task abstraction for deferred match events.
//!
//! Every delayed effect in a match (overlay expiry, flash expiry, the goal
//! completion after its grace delay, scheduled statistics, notice expiry)
//! is a [`TimerTask`] registered with the [`Scheduler`]. The scheduler never
//! runs anything by itself: the tick calls [`Scheduler::take_due`] and the
//! match state dispatches the returned tasks.
//!
//! Cancellation is idempotent. Cancelling a token that already fired, was
//! already cancelled, or never existed is a no-op that returns `false`.

use std::collections::BTreeMap;

use scorebug_types::{Side, StatsPayload};

/// Handle returned by [`Scheduler::schedule`], used to cancel the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerToken(u64);

/// A deferred effect waiting for its due time.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerTask {
    /// Hide the active overlay once its deadline passes.
    OverlayExpiry,
    /// Clear the flash indicator once its deadline passes.
    FlashExpiry,
    /// Resolve the scorer and show the GOAL overlay.
    GoalCompletion {
        /// Side that scored.
        side: Side,
        /// Label or shirt number supplied with the goal command.
        scorer_hint: Option<String>,
    },
    /// Show a STATS overlay prepared earlier.
    ScheduledStats(StatsPayload),
    /// Drop the current operator notice.
    NoticeExpiry,
}

impl TimerTask {
    /// Whether the task belongs to a match event that a reset discards.
    pub const fn is_match_event(&self) -> bool {
        matches!(self, Self::GoalCompletion { .. } | Self::ScheduledStats(_))
    }
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: i64,
    task: TimerTask,
}

/// Ordered set of pending tasks keyed by token.
#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    pending: BTreeMap<TimerToken, Scheduled>,
}

impl Scheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` to become due `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: i64, delay_ms: u64, task: TimerTask) -> TimerToken {
        let token = TimerToken(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.pending.insert(
            token,
            Scheduled {
                due_ms: deadline_after(now_ms, delay_ms),
                task,
            },
        );
        token
    }

    /// Cancel a pending task. Returns `true` if something was removed.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        self.pending.remove(&token).is_some()
    }

    /// Cancel every pending task matching `predicate`, returning how many
    /// were removed.
    pub fn cancel_where(&mut self, predicate: impl Fn(&TimerTask) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, scheduled| !predicate(&scheduled.task));
        before.saturating_sub(self.pending.len())
    }

    /// Remove and return every task due at or before `now_ms`, earliest
    /// first. Tasks due at the same instant keep their scheduling order.
    pub fn take_due(&mut self, now_ms: i64) -> Vec<(TimerToken, TimerTask)> {
        let mut due: Vec<(i64, TimerToken)> = self
            .pending
            .iter()
            .filter(|(_, scheduled)| scheduled.due_ms <= now_ms)
            .map(|(token, scheduled)| (scheduled.due_ms, *token))
            .collect();
        due.sort_unstable();

        due.into_iter()
            .filter_map(|(_, token)| {
                self.pending
                    .remove(&token)
                    .map(|scheduled| (token, scheduled.task))
            })
            .collect()
    }

    /// Due time of a pending task, or `None` if it is not pending.
    pub fn due_at(&self, token: TimerToken) -> Option<i64> {
        self.pending.get(&token).map(|scheduled| scheduled.due_ms)
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no task is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// `now_ms + duration_ms`, saturating instead of overflowing.
pub fn deadline_after(now_ms: i64, duration_ms: u64) -> i64 {
    now_ms.saturating_add(i64::try_from(duration_ms).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_become_due_at_their_deadline() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(1_000, 500, TimerTask::OverlayExpiry);
        assert_eq!(scheduler.due_at(token), Some(1_500));

        assert!(scheduler.take_due(1_499).is_empty());
        let due = scheduler.take_due(1_500);
        assert_eq!(due, vec![(token, TimerTask::OverlayExpiry)]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn due_tasks_come_out_earliest_first() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(0, 300, TimerTask::NoticeExpiry);
        let early = scheduler.schedule(0, 100, TimerTask::FlashExpiry);
        let tokens: Vec<TimerToken> = scheduler
            .take_due(1_000)
            .into_iter()
            .map(|(token, _)| token)
            .collect();
        assert_eq!(tokens, vec![early, late]);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(0, 100, TimerTask::FlashExpiry);
        assert!(scheduler.cancel(token));
        assert!(!scheduler.cancel(token));
        assert!(scheduler.take_due(200).is_empty());
    }

    #[test]
    fn cancelling_a_fired_task_is_a_no_op() {
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule(0, 100, TimerTask::OverlayExpiry);
        assert_eq!(scheduler.take_due(100).len(), 1);
        assert!(!scheduler.cancel(token));
    }

    #[test]
    fn cancel_where_removes_only_matching_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            0,
            1_200,
            TimerTask::GoalCompletion {
                side: Side::Home,
                scorer_hint: None,
            },
        );
        scheduler.schedule(
            0,
            9_000,
            TimerTask::ScheduledStats(StatsPayload::from_values("Shots", 2, 1)),
        );
        let keep = scheduler.schedule(0, 5_500, TimerTask::OverlayExpiry);

        assert_eq!(scheduler.cancel_where(TimerTask::is_match_event), 2);
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.due_at(keep).is_some());
    }

    #[test]
    fn deadline_saturates() {
        assert_eq!(deadline_after(i64::MAX, 10), i64::MAX);
        assert_eq!(deadline_after(0, u64::MAX), i64::MAX);
    }
}
