//! Host-clocked timer queue.
//!
//! The engine never sleeps. Every delay (transition settle, scroll idle,
//! route timeout) is an entry here, and the host drives time forward with
//! `TourSession::advance`. Each entry has a handle; cancelling a handle
//! guarantees the entry never fires.

/// What a session timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Apply a pending step index.
    ApplyStep(usize),
    /// End of the step-transition guard.
    ClearStepChanging,
    /// The route watch gave up.
    RouteTimeout,
    /// No scroll activity for the quiet window.
    ScrollIdle,
    /// Hard ceiling on the scroll wait.
    ScrollCeiling,
    /// Coalesced live position update.
    LiveUpdate,
}

/// Cancel handle for a scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    handle: TimerHandle,
    due: u64,
    payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    /// Kept sorted by `(due, handle)` so ties fire in scheduling order.
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Schedule `payload` to fire once the clock reaches `due`.
    pub fn schedule(&mut self, due: u64, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let pos = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(
            pos,
            Entry {
                handle,
                due,
                payload,
            },
        );
        handle
    }

    /// Returns `true` if the entry was still pending.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Remove and return the earliest entry due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerHandle, T)> {
        if self.entries.first()?.due > now {
            return None;
        }
        let entry = self.entries.remove(0);
        Some((entry.handle, entry.payload))
    }

    /// When the next entry fires, if any.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.first().map(|e| e.due)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
