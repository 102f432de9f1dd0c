//! Scroll-and-settle protocol.
//!
//! While the target scrolls into view the pointer and card are hidden. The
//! wait ends on whichever comes first:
//!
//! - the native scroll-end signal, when the host has one;
//! - otherwise a quiet window with no scroll events, re-armed by each event;
//! - a hard ceiling, so the overlay always reappears.

use crate::timers::{TimerHandle, TimerKind, TimerQueue};
use wp_core::TimingConfig;

#[derive(Debug, Default)]
pub struct ScrollCoordinator {
    active: bool,
    native: bool,
    idle: Option<TimerHandle>,
    ceiling: Option<TimerHandle>,
}

impl ScrollCoordinator {
    /// Start waiting. Any previous wait is cancelled first.
    pub fn begin(
        &mut self,
        timers: &mut TimerQueue<TimerKind>,
        now: u64,
        timing: &TimingConfig,
        native: bool,
    ) {
        self.cancel(timers);
        self.active = true;
        self.native = native;
        self.ceiling = Some(timers.schedule(
            now.saturating_add(timing.scroll_settle_timeout_ms),
            TimerKind::ScrollCeiling,
        ));
        if !native {
            self.idle = Some(timers.schedule(
                now.saturating_add(timing.scroll_idle_ms),
                TimerKind::ScrollIdle,
            ));
        }
    }

    /// A scroll event arrived. Re-arms the quiet window.
    pub fn on_activity(&mut self, timers: &mut TimerQueue<TimerKind>, now: u64, timing: &TimingConfig) {
        if !self.active || self.native {
            return;
        }
        if let Some(idle) = self.idle.take() {
            timers.cancel(idle);
        }
        self.idle = Some(timers.schedule(
            now.saturating_add(timing.scroll_idle_ms),
            TimerKind::ScrollIdle,
        ));
    }

    /// Whether a native scroll-end signal finishes the current wait.
    pub fn accepts_native_end(&self) -> bool {
        self.active && self.native
    }

    /// Whether a fired timer belongs to the current wait.
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.active && (self.idle == Some(handle) || self.ceiling == Some(handle))
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop waiting and drop every pending timer.
    pub fn cancel(&mut self, timers: &mut TimerQueue<TimerKind>) {
        for handle in [self.idle.take(), self.ceiling.take()].into_iter().flatten() {
            timers.cancel(handle);
        }
        self.active = false;
        self.native = false;
    }
}
