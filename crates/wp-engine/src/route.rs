//! Route coordination for steps that live on another page.
//!
//! When a step's route does not match the current one the coordinator
//! navigates exactly once for that step entry and then waits (through a
//! [`Watcher`]) for the page to produce the step's target. While the wait is
//! active `pending_route_change` is reported so hosts can disable "Next".

use crate::timers::{TimerHandle, TimerKind, TimerQueue};
use crate::watch::Watcher;

#[derive(Debug, Default)]
pub struct RouteCoordinator {
    /// Keyed by the step index the wait belongs to.
    watch: Watcher<usize>,
    /// Step index and route already navigated for this step entry.
    navigated: Option<(usize, String)>,
}

impl RouteCoordinator {
    /// Whether entering step `index` requires navigating to `route`.
    pub fn needs_navigation(&self, index: usize, route: &str, current: Option<&str>) -> bool {
        let on_route = current.is_some_and(|current| current.ends_with(route));
        !on_route && !self.navigated_for(index, route)
    }

    /// Whether this step entry already navigated to `route`.
    pub fn navigated_for(&self, index: usize, route: &str) -> bool {
        matches!(&self.navigated, Some((i, r)) if *i == index && r == route)
    }

    /// Record the navigation and start waiting for the target.
    pub fn begin(
        &mut self,
        timers: &mut TimerQueue<TimerKind>,
        now: u64,
        timeout_ms: u64,
        index: usize,
        route: &str,
    ) {
        self.navigated = Some((index, route.to_string()));
        self.wait(timers, now, timeout_ms, index);
    }

    /// Wait for the target of step `index` without navigating. Used when the
    /// step is set up again after its navigation already happened.
    pub fn wait(
        &mut self,
        timers: &mut TimerQueue<TimerKind>,
        now: u64,
        timeout_ms: u64,
        index: usize,
    ) {
        let deadline = now.saturating_add(timeout_ms);
        if let Some(previous) = self
            .watch
            .start(timers, deadline, index, TimerKind::RouteTimeout)
        {
            log::debug!("route watch for step {previous} superseded");
        }
    }

    /// Re-check the active wait. Returns the step index when `resolved`
    /// reports the wait is over.
    pub fn check(
        &mut self,
        timers: &mut TimerQueue<TimerKind>,
        resolved: impl FnOnce(usize) -> bool,
    ) -> Option<usize> {
        self.watch.check(timers, resolved)
    }

    /// A route timeout fired; returns the step index if it was ours.
    pub fn timed_out(&mut self, handle: TimerHandle) -> Option<usize> {
        self.watch.timed_out(handle)
    }

    /// Stop waiting. Clears the pending flag and cancels the timeout.
    pub fn disconnect(&mut self, timers: &mut TimerQueue<TimerKind>) -> Option<usize> {
        self.watch.disconnect(timers)
    }

    pub fn is_pending(&self) -> bool {
        self.watch.is_active()
    }

    /// Forget the navigation record: the next entry into any step may
    /// navigate again.
    pub fn reset(&mut self, timers: &mut TimerQueue<TimerKind>) {
        self.disconnect(timers);
        self.navigated = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_suffix_match_skips_navigation() {
        let route = RouteCoordinator::default();
        assert!(!route.needs_navigation(0, "/settings", Some("/app/settings")));
        assert!(route.needs_navigation(0, "/settings", Some("/home")));
        assert!(route.needs_navigation(0, "/settings", None));
    }

    #[test]
    fn navigates_once_per_step_entry() {
        let mut timers = TimerQueue::new();
        let mut route = RouteCoordinator::default();
        route.begin(&mut timers, 0, 5000, 2, "/settings");
        assert!(route.is_pending());
        assert!(!route.needs_navigation(2, "/settings", Some("/home")));
        assert!(route.needs_navigation(3, "/settings", Some("/home")));

        route.disconnect(&mut timers);
        assert!(route.navigated_for(2, "/settings"));
        route.wait(&mut timers, 100, 5000, 2);
        assert!(route.is_pending());
        assert_eq!(timers.next_due(), Some(5100));

        route.reset(&mut timers);
        assert!(!route.is_pending());
        assert!(timers.is_empty());
        assert!(route.needs_navigation(2, "/settings", Some("/home")));
    }

    #[test]
    fn wait_deadline_saturates() {
        let mut timers = TimerQueue::new();
        let mut route = RouteCoordinator::default();
        route.wait(&mut timers, 10, u64::MAX, 0);
        assert_eq!(timers.next_due(), Some(u64::MAX));
    }
}
