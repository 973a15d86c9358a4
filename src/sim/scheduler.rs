//! Virtual-clock timer scheduler
//!
//! Stands in for `setTimeout`/`setInterval`: the host advances time, the
//! session drains due events one at a time and dispatches them. Handlers run
//! to completion before the next event is popped, so a handler that clears a
//! timer reliably stops it from firing later in the same advance.

use serde::{Deserialize, Serialize};

/// Handle to a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer<E> {
    id: TimerId,
    due_ms: u64,
    /// Some(period) for repeating timers
    period: Option<u64>,
    event: E,
}

/// Single-threaded timer wheel over virtual milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<E> {
    now_ms: u64,
    /// Time the current advance is allowed to reach
    horizon_ms: u64,
    timers: Vec<Timer<E>>,
    next_id: u64,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            horizon_ms: 0,
            timers: Vec::new(),
            next_id: 1,
        }
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn insert(&mut self, delay_ms: u64, period: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms.max(1),
            period: period.map(|p| p.max(1)),
            event,
        });
        id
    }

    /// Fire `event` once after `delay_ms`
    pub fn set_timeout(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.insert(delay_ms, None, event)
    }

    /// Fire `event` every `period_ms`, first firing one period from now
    pub fn set_interval(&mut self, period_ms: u64, event: E) -> TimerId {
        self.insert(period_ms, Some(period_ms), event)
    }

    /// Cancel a timer. Clearing an unknown or already-fired id is a no-op.
    pub fn clear(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Cancel everything
    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    /// Allow time to run forward to `target_ms`. Events become available
    /// through [`Scheduler::pop_due`].
    pub fn advance_to(&mut self, target_ms: u64) {
        self.horizon_ms = self.horizon_ms.max(target_ms);
    }

    /// Allow time to run forward by `delta_ms`
    pub fn advance_by(&mut self, delta_ms: u64) {
        self.advance_to(self.now_ms.max(self.horizon_ms) + delta_ms);
    }

    /// Pop the earliest event due at or before the horizon.
    ///
    /// Ties resolve by creation order. `now_ms` jumps to the event's due
    /// time; when nothing is left it settles on the horizon.
    pub fn pop_due(&mut self) -> Option<(TimerId, E)>
    where
        E: Clone,
    {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= self.horizon_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id))
            .map(|(i, _)| i);

        let Some(idx) = idx else {
            self.now_ms = self.now_ms.max(self.horizon_ms);
            return None;
        };

        let timer = &mut self.timers[idx];
        self.now_ms = self.now_ms.max(timer.due_ms);
        let fired = (timer.id, timer.event.clone());
        match timer.period {
            Some(period) => timer.due_ms += period,
            None => {
                self.timers.swap_remove(idx);
            }
        }
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler<&'static str>) -> Vec<(u64, &'static str)> {
        let mut out = Vec::new();
        while let Some((_, e)) = s.pop_due() {
            out.push((s.now_ms(), e));
        }
        out
    }

    #[test]
    fn test_timeout_fires_once() {
        let mut s = Scheduler::new();
        let id = s.set_timeout(100, "once");
        s.advance_by(99);
        assert!(drain(&mut s).is_empty());
        s.advance_by(1);
        assert_eq!(drain(&mut s), vec![(100, "once")]);
        assert!(!s.is_active(id));
        s.advance_by(1000);
        assert!(drain(&mut s).is_empty());
        assert_eq!(s.now_ms(), 1100);
    }

    #[test]
    fn test_interval_repeats_in_order() {
        let mut s = Scheduler::new();
        s.set_interval(300, "slow");
        s.set_interval(100, "fast");
        s.advance_to(600);
        let fired = drain(&mut s);
        assert_eq!(
            fired,
            vec![
                (100, "fast"),
                (200, "fast"),
                (300, "slow"),
                (300, "fast"),
                (400, "fast"),
                (500, "fast"),
                (600, "slow"),
                (600, "fast"),
            ]
        );
    }

    #[test]
    fn test_clear_stops_later_events() {
        let mut s = Scheduler::new();
        let a = s.set_interval(10, "a");
        s.advance_to(100);
        let mut count = 0;
        while let Some((id, _)) = s.pop_due() {
            count += 1;
            if count == 3 {
                s.clear(id);
            }
        }
        assert_eq!(count, 3);
        assert!(!s.is_active(a));
        assert_eq!(s.pending(), 0);
        // Clearing twice is harmless
        s.clear(a);
    }

    #[test]
    fn test_timer_set_mid_advance_is_relative_to_event_time() {
        let mut s = Scheduler::new();
        s.set_timeout(50, "first");
        s.advance_to(200);
        let (_, e) = s.pop_due().unwrap();
        assert_eq!(e, "first");
        s.set_timeout(100, "chained");
        let (_, e) = s.pop_due().unwrap();
        assert_eq!(e, "chained");
        assert_eq!(s.now_ms(), 150);
        assert!(s.pop_due().is_none());
        assert_eq!(s.now_ms(), 200);
    }
}
