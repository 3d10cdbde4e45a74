//! Cancellable timer queue drained by the single-threaded update loop.
//!
//! Entries are ordered by fire time and then by insertion order, so two timers
//! due at the same instant fire in the order they were scheduled. Cancelling a
//! timer removes it from the queue immediately; a cancelled action can never
//! be returned by [`Schedule::pop_due`].

use std::{collections::BTreeMap, time::Duration};

/// Handle identifying a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle {
    fire_at: Duration,
    sequence: u64,
}

impl TimerHandle {
    /// Simulation time at which the timer fires.
    #[must_use]
    pub const fn fire_at(&self) -> Duration {
        self.fire_at
    }
}

/// Priority queue of `(fire time, action)` entries.
#[derive(Clone, Debug)]
pub struct Schedule<A> {
    entries: BTreeMap<TimerHandle, A>,
    next_sequence: u64,
}

impl<A> Default for Schedule<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Schedule<A> {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    /// Queues `action` to fire once simulation time reaches `fire_at`.
    pub fn schedule(&mut self, fire_at: Duration, action: A) -> TimerHandle {
        let handle = TimerHandle {
            fire_at,
            sequence: self.next_sequence,
        };
        self.next_sequence = self.next_sequence.wrapping_add(1);
        let _ = self.entries.insert(handle, action);
        handle
    }

    /// Removes a pending timer, returning its action if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<A> {
        self.entries.remove(&handle)
    }

    /// Reports whether the timer is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Removes and returns the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, A)> {
        let (&handle, _) = self.entries.first_key_value()?;
        if handle.fire_at > now {
            return None;
        }
        self.entries.pop_first()
    }

    /// Fire time of the earliest pending timer.
    #[must_use]
    pub fn next_fire_time(&self) -> Option<Duration> {
        self.entries.keys().next().map(TimerHandle::fire_at)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_in_time_then_insertion_order() {
        let mut schedule = Schedule::new();
        let _ = schedule.schedule(Duration::from_millis(20), "late");
        let _ = schedule.schedule(Duration::from_millis(10), "first");
        let _ = schedule.schedule(Duration::from_millis(10), "second");

        let mut fired = Vec::new();
        while let Some((_, action)) = schedule.pop_due(Duration::from_millis(20)) {
            fired.push(action);
        }

        assert_eq!(fired, vec!["first", "second", "late"]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn timers_are_not_returned_before_they_are_due() {
        let mut schedule = Schedule::new();
        let _ = schedule.schedule(Duration::from_millis(500), 1_u32);

        assert!(schedule.pop_due(Duration::from_millis(499)).is_none());
        assert_eq!(schedule.next_fire_time(), Some(Duration::from_millis(500)));
        assert_eq!(
            schedule.pop_due(Duration::from_millis(500)).map(|(_, action)| action),
            Some(1)
        );
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut schedule = Schedule::new();
        let cancelled = schedule.schedule(Duration::from_millis(5), "cancelled");
        let kept = schedule.schedule(Duration::from_millis(5), "kept");

        assert_eq!(schedule.cancel(cancelled), Some("cancelled"));
        assert_eq!(schedule.cancel(cancelled), None);
        assert!(!schedule.is_pending(cancelled));
        assert!(schedule.is_pending(kept));

        let (handle, action) = schedule.pop_due(Duration::from_secs(1)).expect("kept timer");
        assert_eq!(handle, kept);
        assert_eq!(action, "kept");
        assert!(schedule.pop_due(Duration::from_secs(1)).is_none());
    }
}
