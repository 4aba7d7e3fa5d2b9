//! Session clock and queue of scheduled work
//!
//! Nothing in the simulation sleeps. Timed behavior (ticks, oscillator
//! steps, frenzy waves) is queued here and released as the clock advances.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::types::Millis;

/// A unit of deferred work
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScheduledWork {
    SimulationTick,
    OscillatorStep,
    AutoBell,
    SpawnWave { count: u32 },
    AutoSave,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    due: Millis,
    /// Insertion order, breaks ties at the same due time
    seq: u64,
    work: ScheduledWork,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now: Millis,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of queued items matching a predicate
    pub fn count_pending(&self, mut pred: impl FnMut(&ScheduledWork) -> bool) -> usize {
        self.queue.iter().filter(|Reverse(e)| pred(&e.work)).count()
    }

    pub fn schedule_at(&mut self, due: Millis, work: ScheduledWork) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            due: due.max(self.now),
            seq,
            work,
        }));
    }

    pub fn schedule_after(&mut self, delay: Millis, work: ScheduledWork) {
        self.schedule_at(self.now.saturating_add(delay), work);
    }

    /// Pop the earliest item due at or before `until`, moving the clock to it
    pub fn pop_due(&mut self, until: Millis) -> Option<(Millis, ScheduledWork)> {
        let due = self.queue.peek().map(|Reverse(e)| e.due)?;
        if due > until {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some((entry.due, entry.work))
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }

    /// Discard all queued work
    pub fn cancel_all(&mut self) {
        self.queue.clear();
    }

    /// Discard queued work matching a predicate
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&ScheduledWork) -> bool) {
        let kept: Vec<_> = self
            .queue
            .drain()
            .filter(|Reverse(e)| !pred(&e.work))
            .collect();
        self.queue = kept.into_iter().collect();
    }
}
