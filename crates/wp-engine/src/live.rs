//! Live position updates.
//!
//! While a step is settled on a visible target, scroll/resize/layout
//! notifications request a recompute. Requests made within the same tick
//! coalesce into one zero-delay timer, so a burst of scroll events produces a
//! single placement pass. A forced recompute cancels the pending request.

use crate::timers::{TimerHandle, TimerKind, TimerQueue};

#[derive(Debug, Default)]
pub struct LivePositionUpdater {
    active: bool,
    pending: Option<TimerHandle>,
}

impl LivePositionUpdater {
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Tear down, dropping any pending request.
    pub fn stop(&mut self, timers: &mut TimerQueue<TimerKind>) {
        self.cancel_pending(timers);
        self.active = false;
    }

    /// Ask for a non-forced recompute. No-op when inactive or already queued.
    pub fn request(&mut self, timers: &mut TimerQueue<TimerKind>, now: u64) -> bool {
        if !self.active || self.pending.is_some() {
            return false;
        }
        self.pending = Some(timers.schedule(now, TimerKind::LiveUpdate));
        true
    }

    /// A live-update timer fired. Returns `true` if it was the current one.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            self.active
        } else {
            false
        }
    }

    pub fn cancel_pending(&mut self, timers: &mut TimerQueue<TimerKind>) {
        if let Some(handle) = self.pending.take() {
            timers.cancel(handle);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
