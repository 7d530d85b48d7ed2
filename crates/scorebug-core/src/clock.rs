//! Wall-clock based match clock.
//!
//! The clock never counts ticks. It stores the epoch millisecond at which it
//! last started plus the milliseconds consolidated by earlier pauses, and
//! derives the displayed time from the wall clock on demand. A restarted
//! process that reloads those two numbers therefore resumes exactly where
//! the previous one stopped.
//!
//! # Design Principles
//!
//! - `start_epoch_ms` is `Some` if and only if the clock is running.
//! - All arithmetic saturates; a wall clock that jumps backwards contributes
//!   zero, never a negative interval.
//! - The second half is offset by the first half's length so its display
//!   continues from 45:00.

use scorebug_types::{Period, PersistedMatch};

use crate::config::ClockConfig;

/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60_000;

/// Current wall-clock time in epoch milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Added time outside the accepted range.
    #[error("added time of {minutes} minutes exceeds the maximum of {max}")]
    AddedTimeOutOfRange {
        /// Requested minutes.
        minutes: u32,
        /// Configured maximum.
        max: u32,
    },
}

/// Direction of a [`ClockEngine::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTransition {
    /// The clock was paused and is now running.
    Started,
    /// The clock was running and is now paused.
    Paused,
}

/// Point-in-time reading of the clock, as published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockReading {
    /// Whether the clock is running.
    pub running: bool,
    /// Epoch milliseconds of the last start, 0 when paused.
    pub start_epoch_ms: i64,
    /// Consolidated milliseconds in the current period.
    pub elapsed_ms: i64,
    /// Period offset in milliseconds.
    pub base_ms: i64,
    /// Total match time shown on the scorebug.
    pub total_ms: i64,
}

/// Match clock with pause/resume, periods and added time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockEngine {
    running: bool,
    start_epoch_ms: Option<i64>,
    elapsed_ms: i64,
    period: Period,
    added_minutes: u32,
    show_added: bool,
    first_half_end_ms: i64,
    second_half_end_ms: i64,
    max_added_minutes: u32,
}

impl ClockEngine {
    /// Create a paused clock at 00:00 in the first half.
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            running: false,
            start_epoch_ms: None,
            elapsed_ms: 0,
            period: Period::First,
            added_minutes: 0,
            show_added: false,
            first_half_end_ms: minutes_to_ms(config.first_half_end_minutes),
            second_half_end_ms: minutes_to_ms(config.second_half_end_minutes),
            max_added_minutes: config.max_added_minutes,
        }
    }

    /// Restore a clock from a persisted record.
    ///
    /// A record written while running resumes running from its start
    /// instant, so time spent while the process was down is counted. A
    /// running record with no usable start instant loads paused.
    pub fn restore(config: &ClockConfig, record: &PersistedMatch) -> Self {
        let mut clock = Self::new(config);
        clock.period = record.period;
        clock.elapsed_ms = record.elapsed_ms.max(0);
        if record.running && record.start_epoch_ms > 0 {
            clock.running = true;
            clock.start_epoch_ms = Some(record.start_epoch_ms);
        }
        clock
    }

    /// Start a paused clock or pause a running one.
    pub fn toggle(&mut self, now_ms: i64) -> ClockTransition {
        if self.stop(now_ms) {
            ClockTransition::Paused
        } else {
            self.start(now_ms);
            ClockTransition::Started
        }
    }

    /// Start the clock if it is paused. Returns `true` if it was started.
    pub const fn start(&mut self, now_ms: i64) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.start_epoch_ms = Some(now_ms);
        true
    }

    /// Pause the clock if it is running, folding the running interval into
    /// the accumulator. Returns `true` if it was running.
    pub fn stop(&mut self, now_ms: i64) -> bool {
        let Some(start) = self.start_epoch_ms.take() else {
            self.running = false;
            return false;
        };
        let delta = now_ms.saturating_sub(start).max(0);
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta);
        self.running = false;
        true
    }

    /// Total match time at `now_ms`: period offset + consolidated time +
    /// the running interval.
    pub fn total_elapsed_ms(&self, now_ms: i64) -> i64 {
        let running = self
            .start_epoch_ms
            .map_or(0, |start| now_ms.saturating_sub(start).max(0));
        self.base_ms()
            .saturating_add(self.elapsed_ms)
            .saturating_add(running)
    }

    /// Pause the clock when the period's end has been reached.
    ///
    /// Returns `true` only on the tick that performed the pause; a paused
    /// clock is never touched.
    pub fn tick(&mut self, now_ms: i64) -> bool {
        if !self.running {
            return false;
        }
        if self.total_elapsed_ms(now_ms) >= self.period_end_ms() {
            return self.stop(now_ms);
        }
        false
    }

    /// Stop and zero the clock for the current period and hide added time.
    /// The period is kept.
    pub const fn reset(&mut self) {
        self.running = false;
        self.start_epoch_ms = None;
        self.elapsed_ms = 0;
        self.added_minutes = 0;
        self.show_added = false;
    }

    /// Switch period, stopping the clock and zeroing the period's counter.
    /// Added time stays configured but is hidden.
    pub const fn set_period(&mut self, period: Period) {
        self.period = period;
        self.running = false;
        self.start_epoch_ms = None;
        self.elapsed_ms = 0;
        self.show_added = false;
    }

    /// Set the added time shown next to the clock, stopping a running clock
    /// first. Zero hides the indicator.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::AddedTimeOutOfRange`] above the configured
    /// maximum; the clock is left untouched.
    pub fn apply_added_time(&mut self, minutes: u32, now_ms: i64) -> Result<(), ClockError> {
        if minutes > self.max_added_minutes {
            return Err(ClockError::AddedTimeOutOfRange {
                minutes,
                max: self.max_added_minutes,
            });
        }
        self.stop(now_ms);
        self.added_minutes = minutes;
        self.show_added = minutes > 0;
        Ok(())
    }

    /// Period offset in milliseconds.
    pub const fn base_ms(&self) -> i64 {
        match self.period {
            Period::First => 0,
            Period::Second => self.first_half_end_ms,
        }
    }

    /// Total time at which the current period auto-pauses.
    pub const fn period_end_ms(&self) -> i64 {
        match self.period {
            Period::First => self.first_half_end_ms,
            Period::Second => self.second_half_end_ms,
        }
    }

    /// Whether the clock is running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Epoch milliseconds of the last start while running.
    pub const fn start_epoch_ms(&self) -> Option<i64> {
        self.start_epoch_ms
    }

    /// Consolidated milliseconds in the current period.
    pub const fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    /// Current period.
    pub const fn period(&self) -> Period {
        self.period
    }

    /// Configured added minutes, whether shown or not.
    pub const fn added_minutes(&self) -> u32 {
        self.added_minutes
    }

    /// Added minutes to display; 0 while hidden.
    pub const fn displayed_added_minutes(&self) -> u32 {
        if self.show_added { self.added_minutes } else { 0 }
    }

    /// Read every published clock field at `now_ms`.
    pub fn reading(&self, now_ms: i64) -> ClockReading {
        ClockReading {
            running: self.running,
            start_epoch_ms: self.start_epoch_ms.unwrap_or(0),
            elapsed_ms: self.elapsed_ms,
            base_ms: self.base_ms(),
            total_ms: self.total_elapsed_ms(now_ms),
        }
    }
}

fn minutes_to_ms(minutes: u32) -> i64 {
    i64::from(minutes).saturating_mul(MS_PER_MINUTE)
}
