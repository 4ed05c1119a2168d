//! Scheduled timers.
//!
//! Fire-once, cancelable timers on a virtual session clock. Time is a
//! [`Duration`] since the session started and only moves when the host
//! advances it, so nothing here ever sleeps.

use std::time::Duration;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// One countdown step
    Tick,
    /// Mud lock is over
    SlowExpire,
    /// Move on from a completed level
    AdvanceLevel,
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A pending timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub due: Duration,
}

/// Timer queue ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct Scheduler {
    /// Current virtual time
    now: Duration,

    /// Next id to hand out
    next_id: u64,

    /// Pending timers
    pending: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `kind` to fire `delay` from now.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Timer {
            id,
            kind,
            due: self.now.saturating_add(delay),
        });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was canceled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending timer of a kind. Returns how many were dropped.
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|t| t.kind != kind);
        before - self.pending.len()
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    /// Check if a timer of `kind` is pending.
    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|t| t.kind == kind)
    }

    /// Earliest pending timer.
    pub fn next_due(&self) -> Option<&Timer> {
        self.pending.iter().min_by_key(|t| (t.due, t.id))
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its due time.
    ///
    /// Callers loop on this so that timers scheduled while handling one
    /// firing are still seen in order.
    pub fn pop_due(&mut self, until: Duration) -> Option<Timer> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        let timer = self.pending.remove(index);
        self.now = self.now.max(timer.due);
        Some(timer)
    }

    /// Move the clock forward to `until` once nothing more is due.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Count pending timers.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(TimerKind::Tick, ms(1000));
        s.schedule(TimerKind::SlowExpire, ms(300));

        let first = s.pop_due(ms(2000)).unwrap();
        assert_eq!(first.kind, TimerKind::SlowExpire);
        assert_eq!(s.now(), ms(300));

        let second = s.pop_due(ms(2000)).unwrap();
        assert_eq!(second.kind, TimerKind::Tick);
        assert_eq!(s.now(), ms(1000));

        assert!(s.pop_due(ms(2000)).is_none());
        s.settle(ms(2000));
        assert_eq!(s.now(), ms(2000));
    }

    #[test]
    fn test_same_due_keeps_schedule_order() {
        let mut s = Scheduler::new();
        let a = s.schedule(TimerKind::AdvanceLevel, ms(500));
        let b = s.schedule(TimerKind::Tick, ms(500));

        assert_eq!(s.pop_due(ms(500)).unwrap().id, a);
        assert_eq!(s.pop_due(ms(500)).unwrap().id, b);
    }

    #[test]
    fn test_not_due_yet() {
        let mut s = Scheduler::new();
        s.schedule(TimerKind::Tick, ms(1000));
        assert!(s.pop_due(ms(999)).is_none());
        assert_eq!(s.pending_count(), 1);
        assert_eq!(s.next_due().unwrap().due, ms(1000));
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut s = Scheduler::new();
        s.settle(ms(1500));
        s.schedule(TimerKind::Tick, ms(1000));
        assert_eq!(s.next_due().unwrap().due, ms(2500));
    }

    #[test]
    fn test_due_saturates_at_end_of_clock() {
        let mut s = Scheduler::new();
        s.settle(Duration::MAX);
        s.schedule(TimerKind::Tick, ms(1000));
        assert_eq!(s.next_due().unwrap().due, Duration::MAX);
        assert_eq!(s.pop_due(Duration::MAX).unwrap().kind, TimerKind::Tick);
    }

    #[test]
    fn test_cancel() {
        let mut s = Scheduler::new();
        let tick = s.schedule(TimerKind::Tick, ms(1000));
        s.schedule(TimerKind::SlowExpire, ms(300));
        s.schedule(TimerKind::SlowExpire, ms(600));

        assert!(s.cancel(tick));
        assert!(!s.cancel(tick));
        assert!(!s.is_pending(TimerKind::Tick));

        assert_eq!(s.cancel_kind(TimerKind::SlowExpire), 2);
        assert_eq!(s.pending_count(), 0);

        s.schedule(TimerKind::AdvanceLevel, ms(10));
        s.cancel_all();
        assert!(s.pop_due(ms(10_000)).is_none());
    }
}
