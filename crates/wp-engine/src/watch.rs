//! Cancellable "wait until a condition holds" with a deadline.
//!
//! The watcher does not observe anything by itself: whoever receives change
//! notifications calls [`Watcher::check`] with the predicate. The deadline is
//! an entry in the session timer queue. Disconnecting (success, timeout,
//! supersede, or teardown) always cancels the deadline, and a disconnected
//! watcher ignores further checks.

use crate::timers::{TimerHandle, TimerKind, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Watch<K> {
    key: K,
    deadline: TimerHandle,
}

#[derive(Debug)]
pub struct Watcher<K> {
    active: Option<Watch<K>>,
}

impl<K> Default for Watcher<K> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<K: Copy> Watcher<K> {
    /// Start watching for `key`, due to time out at `deadline`.
    /// Returns the key of a superseded watch, if one was still active.
    pub fn start(
        &mut self,
        timers: &mut TimerQueue<TimerKind>,
        deadline: u64,
        key: K,
        on_timeout: TimerKind,
    ) -> Option<K> {
        let superseded = self.disconnect(timers);
        self.active = Some(Watch {
            key,
            deadline: timers.schedule(deadline, on_timeout),
        });
        superseded
    }

    /// Evaluate the predicate for the active watch. When it holds the watch
    /// disconnects and its key is returned.
    pub fn check(
        &mut self,
        timers: &mut TimerQueue<TimerKind>,
        predicate: impl FnOnce(K) -> bool,
    ) -> Option<K> {
        let key = self.active?.key;
        if predicate(key) {
            self.disconnect(timers)
        } else {
            None
        }
    }

    /// A deadline timer fired. Returns the key if it was this watch's.
    pub fn timed_out(&mut self, handle: TimerHandle) -> Option<K> {
        match self.active {
            Some(watch) if watch.deadline == handle => {
                self.active = None;
                Some(watch.key)
            }
            _ => None,
        }
    }

    /// Stop watching. Returns the key if a watch was active.
    pub fn disconnect(&mut self, timers: &mut TimerQueue<TimerKind>) -> Option<K> {
        let watch = self.active.take()?;
        timers.cancel(watch.deadline);
        Some(watch.key)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn key(&self) -> Option<K> {
        self.active.map(|w| w.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_once_when_predicate_holds() {
        let mut timers = TimerQueue::new();
        let mut watcher = Watcher::default();
        watcher.start(&mut timers, 5000, 3usize, TimerKind::RouteTimeout);

        assert_eq!(watcher.check(&mut timers, |_| false), None);
        assert!(watcher.is_active());
        assert_eq!(watcher.check(&mut timers, |k| k == 3), Some(3));
        assert!(!watcher.is_active());
        assert!(timers.is_empty());

        // Already disconnected: later checks are ignored.
        assert_eq!(watcher.check(&mut timers, |_| true), None);
    }

    #[test]
    fn start_supersedes_and_cancels_previous_deadline() {
        let mut timers = TimerQueue::new();
        let mut watcher = Watcher::default();
        watcher.start(&mut timers, 5000, 1usize, TimerKind::RouteTimeout);
        let superseded = watcher.start(&mut timers, 6000, 2usize, TimerKind::RouteTimeout);

        assert_eq!(superseded, Some(1));
        assert_eq!(timers.len(), 1);
        assert_eq!(watcher.key(), Some(2));
    }

    #[test]
    fn only_its_own_deadline_times_it_out() {
        let mut timers = TimerQueue::new();
        let mut watcher = Watcher::default();
        let stray = timers.schedule(10, TimerKind::ScrollIdle);
        watcher.start(&mut timers, 5000, 7usize, TimerKind::RouteTimeout);

        assert_eq!(watcher.timed_out(stray), None);
        let (handle, kind) = std::iter::from_fn(|| timers.pop_due(5000))
            .find(|(_, kind)| *kind == TimerKind::RouteTimeout)
            .unwrap();
        assert_eq!(kind, TimerKind::RouteTimeout);
        assert_eq!(watcher.timed_out(handle), Some(7));
        assert!(!watcher.is_active());
    }
}
