//! Virtual-time timer queue
//!
//! Time only moves when the owner calls [`Scheduler::pop_due`] or
//! [`Scheduler::advance_to`], so tests drive it deterministically and the
//! launcher drives it from a real frame clock. Timers are plain values owned
//! by the scheduler: dropping it drops every pending timer.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Minimum period of a repeating timer. A zero period would never let time advance.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Handle for cancelling a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Timer<T> {
    id: TimerId,
    period: Option<Duration>,
    task: T,
}

/// A timer that came due
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub at: Duration,
    pub task: T,
}

/// Timer queue ordered by deadline, then by scheduling order
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    next_order: u64,
    queue: BTreeMap<(Duration, u64), Timer<T>>,
    index: HashMap<TimerId, (Duration, u64)>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_order: 0,
            queue: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Fire `task` once, `delay` from now
    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TimerId {
        let id = self.allocate_id();
        self.insert(self.now + delay, id, None, task);
        id
    }

    /// Fire `task` every `period`, first at now + period
    pub fn schedule_every(&mut self, period: Duration, task: T) -> TimerId {
        let period = period.max(MIN_PERIOD);
        let id = self.allocate_id();
        self.insert(self.now + period, id, Some(period), task);
        id
    }

    /// Cancel a timer. Returns false if it already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.index.remove(&id) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline. Repeating timers are re-armed.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        let key = *self.queue.keys().next()?;
        if key.0 > until {
            return None;
        }

        let timer = self.queue.remove(&key)?;
        self.index.remove(&timer.id);
        self.now = self.now.max(key.0);

        let fired = Fired {
            id: timer.id,
            at: key.0,
            task: timer.task.clone(),
        };

        if let Some(period) = timer.period {
            self.insert(key.0 + period, timer.id, Some(period), timer.task);
        }

        Some(fired)
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }

    fn allocate_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, deadline: Duration, id: TimerId, period: Option<Duration>, task: T) {
        let key = (deadline, self.next_order);
        self.next_order += 1;
        self.queue.insert(key, Timer { id, period, task });
        self.index.insert(id, key);
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>, until: Duration) -> Vec<(u64, &'static str)> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(until) {
            out.push((f.at.as_millis() as u64, f.task));
        }
        s.advance_to(until);
        out
    }

    #[test]
    fn test_once_fires_at_deadline() {
        let mut s = Scheduler::new();
        s.schedule_once(Duration::from_secs(2), "logo");

        assert!(drain(&mut s, Duration::from_millis(1999)).is_empty());
        assert_eq!(drain(&mut s, Duration::from_secs(2)), vec![(2000, "logo")]);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_every_rearms() {
        let mut s = Scheduler::new();
        s.schedule_every(Duration::from_millis(500), "battery");

        let fired = drain(&mut s, Duration::from_millis(1600));
        assert_eq!(fired, vec![(500, "battery"), (1000, "battery"), (1500, "battery")]);
        assert_eq!(s.next_deadline(), Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_ordering_and_ties() {
        let mut s = Scheduler::new();
        s.schedule_once(Duration::from_secs(1), "b");
        s.schedule_once(Duration::from_millis(500), "a");
        s.schedule_once(Duration::from_secs(1), "c");

        let order: Vec<_> = drain(&mut s, Duration::from_secs(5))
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let every = s.schedule_every(Duration::from_secs(1), "tick");
        let once = s.schedule_once(Duration::from_secs(3), "boot");

        assert!(s.cancel(once));
        assert!(!s.cancel(once));
        assert!(!s.is_pending(once));

        assert_eq!(drain(&mut s, Duration::from_secs(2)).len(), 2);
        assert!(s.cancel(every));
        assert!(drain(&mut s, Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn test_relative_to_virtual_now() {
        let mut s = Scheduler::new();
        s.advance_to(Duration::from_secs(10));
        s.schedule_once(Duration::from_secs(1), "late");
        assert_eq!(s.next_deadline(), Some(Duration::from_secs(11)));

        // Clock never goes backwards
        s.advance_to(Duration::from_secs(3));
        assert_eq!(s.now(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut s = Scheduler::new();
        s.schedule_every(Duration::ZERO, "spin");
        assert_eq!(drain(&mut s, Duration::from_millis(3)).len(), 3);
    }
}
