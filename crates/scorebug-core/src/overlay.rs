//! Exclusive auto-expiring overlay plus the independent flash indicator.
//!
//! At most one overlay is active. Showing a new one replaces the current one
//! immediately; there is no queue. The flash indicator has its own deadline
//! and is only ever replaced by another flash or cleared explicitly.

use scorebug_types::{FlashColor, OverlayKind, OverlayPayload};

use crate::scheduler::deadline_after;

/// The overlay currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveOverlay {
    /// Kind-specific content.
    pub payload: OverlayPayload,
    /// Epoch milliseconds at which the overlay may be removed.
    pub deadline_ms: i64,
}

/// Two-state machine: nothing shown, or one active overlay with a deadline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayStateMachine {
    active: Option<ActiveOverlay>,
}

impl OverlayStateMachine {
    /// Create a machine with nothing shown.
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Replace whatever is shown with `payload` until `now_ms + duration_ms`.
    ///
    /// Returns the overlay that was preempted, if any.
    pub fn show(
        &mut self,
        payload: OverlayPayload,
        duration_ms: u64,
        now_ms: i64,
    ) -> Option<ActiveOverlay> {
        self.active.replace(ActiveOverlay {
            payload,
            deadline_ms: deadline_after(now_ms, duration_ms),
        })
    }

    /// Remove the overlay if its deadline has passed. Returns `true` when
    /// something was removed.
    pub fn expire(&mut self, now_ms: i64) -> bool {
        if self
            .active
            .as_ref()
            .is_some_and(|active| now_ms >= active.deadline_ms)
        {
            self.active = None;
            return true;
        }
        false
    }

    /// Remove the overlay immediately. Returns `true` when something was shown.
    pub fn hide(&mut self) -> bool {
        self.active.take().is_some()
    }

    /// The active overlay, if any.
    pub const fn active(&self) -> Option<&ActiveOverlay> {
        self.active.as_ref()
    }

    /// Kind of the active overlay, if any.
    pub fn kind(&self) -> Option<OverlayKind> {
        self.active.as_ref().map(|active| active.payload.kind())
    }
}

/// Short color pulse shown after a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashIndicator {
    active: Option<(FlashColor, i64)>,
}

impl FlashIndicator {
    /// Create an indicator with no pulse.
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Start (or restart) a pulse of `color` until `now_ms + duration_ms`.
    pub fn trigger(&mut self, color: FlashColor, duration_ms: u64, now_ms: i64) {
        self.active = Some((color, deadline_after(now_ms, duration_ms)));
    }

    /// Clear the pulse if its deadline has passed.
    pub fn expire(&mut self, now_ms: i64) -> bool {
        if self.active.is_some_and(|(_, deadline)| now_ms >= deadline) {
            self.active = None;
            return true;
        }
        false
    }

    /// Clear the pulse immediately.
    pub const fn clear(&mut self) {
        self.active = None;
    }

    /// Color of the active pulse.
    pub fn color(&self) -> Option<FlashColor> {
        self.active.map(|(color, _)| color)
    }

    /// Deadline of the active pulse.
    pub fn deadline_ms(&self) -> Option<i64> {
        self.active.map(|(_, deadline)| deadline)
    }
}
