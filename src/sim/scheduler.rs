/// Timers as data.
///
/// Every suspension point of the engine lives here instead of in nested
/// callbacks:
///   - one-shot timers (bomb fuse, chain detonation, invincibility end)
///   - the periodic enemy tick (re-armed by its handler after each firing)
///   - the deferred queue: work that must run on the *next* scheduling turn
///     (player blast checks, which read the player's latest position)
///
/// Timers fire in `(deadline, id)` order; ids are handed out in increasing
/// order, so timers sharing a deadline fire in the order they were armed.
/// Cancellation is lazy: the heap keeps the entry, the live map forgets it,
/// and `pop_due` skips anything no longer live. Cancel is idempotent.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::domain::entity::BombId;
use crate::domain::grid::GridPos;

pub type TimerId = u64;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TimerKind {
    BombFuse(BombId),
    ChainDetonation(BombId),
    EnemyTick,
    InvincibilityEnd,
}

/// Work queued for the next scheduling turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Resolve player damage for a finished blast.
    PlayerBlast { bomb: BombId, cells: Vec<GridPos> },
}

/// A live timer as exposed to snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub deadline_ms: u64,
    pub remaining_ms: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_id: TimerId,
    queue: BinaryHeap<Reverse<(u64, TimerId)>>,
    live: HashMap<TimerId, (TimerKind, u64)>,
    deferred: VecDeque<Deferred>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler::default()
    }

    /// Engine clock in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule_in(&mut self, delay_ms: u64, kind: TimerKind) -> TimerId {
        let deadline = self.now.saturating_add(delay_ms);
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push(Reverse((deadline, id)));
        self.live.insert(id, (kind, deadline));
        id
    }

    /// Returns true if the timer was live. Cancelling twice is harmless.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.live.get(&id).map(|&(_, deadline)| deadline)
    }

    /// Pop the next live timer due at or before `until`, moving the clock
    /// to its deadline.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, TimerKind)> {
        while let Some(&Reverse((deadline, id))) = self.queue.peek() {
            if deadline > until {
                return None;
            }
            self.queue.pop();
            if let Some((kind, _)) = self.live.remove(&id) {
                self.now = self.now.max(deadline);
                return Some((id, kind));
            }
            // cancelled: skip
        }
        None
    }

    /// Move the clock forward. Never moves backwards.
    pub fn advance_to(&mut self, t: u64) {
        self.now = self.now.max(t);
    }

    pub fn defer(&mut self, work: Deferred) {
        self.deferred.push_back(work);
    }

    pub fn pop_deferred(&mut self) -> Option<Deferred> {
        self.deferred.pop_front()
    }

    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Live timers ordered by firing order.
    pub fn pending(&self) -> Vec<PendingTimer> {
        let mut out: Vec<PendingTimer> = self.live.iter()
            .map(|(&id, &(kind, deadline))| PendingTimer {
                id,
                kind,
                deadline_ms: deadline,
                remaining_ms: deadline.saturating_sub(self.now),
            })
            .collect();
        out.sort_by_key(|t| (t.deadline_ms, t.id));
        out
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Drop every timer and deferred item. The clock keeps running.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.live.clear();
        self.deferred.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut s = Scheduler::new();
        let late = s.schedule_in(300, TimerKind::EnemyTick);
        let early = s.schedule_in(100, TimerKind::BombFuse(1));
        assert_eq!(s.pop_due(50), None);
        assert_eq!(s.pop_due(1000), Some((early, TimerKind::BombFuse(1))));
        assert_eq!(s.now(), 100);
        assert_eq!(s.pop_due(1000), Some((late, TimerKind::EnemyTick)));
        assert_eq!(s.now(), 300);
        assert_eq!(s.pop_due(1000), None);
    }

    #[test]
    fn equal_deadlines_fire_in_arming_order() {
        let mut s = Scheduler::new();
        let a = s.schedule_in(10, TimerKind::BombFuse(1));
        let b = s.schedule_in(10, TimerKind::BombFuse(2));
        assert_eq!(s.pop_due(10).map(|t| t.0), Some(a));
        assert_eq!(s.pop_due(10).map(|t| t.0), Some(b));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut s = Scheduler::new();
        let id = s.schedule_in(10, TimerKind::BombFuse(1));
        assert!(s.cancel(id));
        assert!(!s.cancel(id)); // idempotent
        assert!(!s.is_live(id));
        assert_eq!(s.pop_due(100), None);
    }

    #[test]
    fn pending_reports_remaining_time() {
        let mut s = Scheduler::new();
        s.schedule_in(500, TimerKind::InvincibilityEnd);
        s.advance_to(200);
        let pending = s.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].deadline_ms, 500);
        assert_eq!(pending[0].remaining_ms, 300);
    }

    #[test]
    fn clear_drops_timers_and_deferred() {
        let mut s = Scheduler::new();
        s.schedule_in(10, TimerKind::EnemyTick);
        s.defer(Deferred::PlayerBlast { bomb: 0, cells: vec![] });
        s.clear();
        assert_eq!(s.live_count(), 0);
        assert_eq!(s.deferred_len(), 0);
        assert_eq!(s.pop_due(u64::MAX), None);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut s = Scheduler::new();
        s.advance_to(100);
        s.advance_to(50);
        assert_eq!(s.now(), 100);
    }
}
