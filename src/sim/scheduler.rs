//! Cooperative timer queue on a virtual clock
//!
//! Single-threaded: the owner pulls due timers one at a time and runs each
//! callback to completion before asking for the next. Timers are handles
//! that can be cancelled at any point, including from inside another
//! timer's callback. A cancelled timer never fires again.
//!
//! Ordering is by due time, then by scheduling order, so two timers due at
//! the same instant fire in the order they were (re)scheduled.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use super::entity::EntityId;

/// Handle for a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Duration elapsed, destroy if still live
    Expire(EntityId),
    /// Consumption check against the event horizon
    Poll(EntityId),
}

/// A timer popped from the queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired {
    pub id: TimerId,
    pub action: TimerAction,
    pub due: f64,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    action: TimerAction,
    /// Repeat period for recurring timers
    period: Option<f64>,
    /// Sequence number of the live queue slot for this timer
    seq: u64,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    due: f64,
    seq: u64,
    id: TimerId,
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Slot {}

impl PartialOrd for Slot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slot {
    // Reversed so BinaryHeap pops the earliest slot
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Timer queue plus the virtual clock it runs on
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: f64,
    queue: BinaryHeap<Slot>,
    timers: HashMap<TimerId, TimerEntry>,
    next_timer: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of timers that will still fire
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Fire once after `delay` seconds
    pub fn schedule_once(&mut self, delay: f64, action: TimerAction) -> TimerId {
        self.insert(delay, None, action)
    }

    /// Fire every `period` seconds, first after one period
    pub fn schedule_repeating(&mut self, period: f64, action: TimerAction) -> TimerId {
        self.insert(period, Some(period), action)
    }

    fn insert(&mut self, delay: f64, period: Option<f64>, action: TimerAction) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        let seq = self.push_slot(id, self.now + delay.max(0.0));
        self.timers.insert(id, TimerEntry { action, period, seq });
        id
    }

    fn push_slot(&mut self, id: TimerId, due: f64) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Slot { due, seq, id });
        seq
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        // The heap slot goes stale and is skipped on pop
        self.timers.remove(&id).is_some()
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// Pop the next timer due at or before `limit` and move the clock to it.
    ///
    /// Recurring timers are re-armed before being returned, so cancelling one
    /// from its own callback stops it.
    pub fn pop_due(&mut self, limit: f64) -> Option<Fired> {
        while let Some(slot) = self.queue.peek().copied() {
            let live = self
                .timers
                .get(&slot.id)
                .is_some_and(|entry| entry.seq == slot.seq);
            if !live {
                self.queue.pop();
                continue;
            }
            if slot.due > limit {
                return None;
            }
            self.queue.pop();
            self.now = self.now.max(slot.due);

            let (action, period) = match self.timers.get(&slot.id) {
                Some(entry) => (entry.action, entry.period),
                None => continue,
            };
            match period {
                Some(period) => {
                    let seq = self.push_slot(slot.id, slot.due + period);
                    if let Some(entry) = self.timers.get_mut(&slot.id) {
                        entry.seq = seq;
                    }
                }
                None => {
                    self.timers.remove(&slot.id);
                }
            }
            return Some(Fired {
                id: slot.id,
                action,
                due: slot.due,
            });
        }
        None
    }

    /// Move the clock forward to `t` (never backward)
    pub fn set_now(&mut self, t: f64) {
        if t > self.now {
            self.now = t;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, limit: f64) -> Vec<Fired> {
        let mut out = Vec::new();
        while let Some(f) = s.pop_due(limit) {
            out.push(f);
        }
        s.set_now(limit);
        out
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule_once(2.0, TimerAction::Expire(EntityId(2)));
        s.schedule_once(1.0, TimerAction::Expire(EntityId(1)));
        let fired = drain(&mut s, 5.0);
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].action, TimerAction::Expire(EntityId(1)));
        assert_eq!(fired[1].action, TimerAction::Expire(EntityId(2)));
        assert_eq!(s.pending(), 0);
        assert_eq!(s.now(), 5.0);
    }

    #[test]
    fn test_same_due_time_fires_in_schedule_order() {
        let mut s = Scheduler::new();
        let a = s.schedule_once(1.0, TimerAction::Poll(EntityId(1)));
        let b = s.schedule_once(1.0, TimerAction::Expire(EntityId(1)));
        let fired = drain(&mut s, 1.0);
        assert_eq!(fired.iter().map(|f| f.id).collect::<Vec<_>>(), vec![a, b]);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let t = s.schedule_once(1.0, TimerAction::Expire(EntityId(1)));
        assert!(s.cancel(t));
        assert!(!s.cancel(t));
        assert!(drain(&mut s, 10.0).is_empty());
    }

    #[test]
    fn test_repeating_timer_rearms() {
        let mut s = Scheduler::new();
        let t = s.schedule_repeating(0.05, TimerAction::Poll(EntityId(9)));
        let fired = drain(&mut s, 0.2 + 1e-9);
        assert_eq!(fired.len(), 4);
        assert!(fired.iter().all(|f| f.id == t));
        assert!(s.is_pending(t));

        // Cancel between firings
        s.cancel(t);
        assert!(drain(&mut s, 1.0).is_empty());
    }

    #[test]
    fn test_cancel_from_inside_callback() {
        let mut s = Scheduler::new();
        let poll = s.schedule_repeating(0.5, TimerAction::Poll(EntityId(1)));
        let expiry = s.schedule_once(0.5, TimerAction::Expire(EntityId(1)));

        // Poll fires first and "destroys" the entity, cancelling both timers
        let first = s.pop_due(1.0).unwrap();
        assert_eq!(first.id, poll);
        s.cancel(poll);
        s.cancel(expiry);
        assert!(s.pop_due(10.0).is_none());
    }

    #[test]
    fn test_clock_moves_to_fired_timer() {
        let mut s = Scheduler::new();
        s.schedule_once(0.3, TimerAction::Expire(EntityId(1)));
        let f = s.pop_due(1.0).unwrap();
        assert!((f.due - 0.3).abs() < 1e-12);
        assert!((s.now() - 0.3).abs() < 1e-12);
        s.set_now(0.1);
        assert!((s.now() - 0.3).abs() < 1e-12);
    }
}
