//! Delayed tasks
//!
//! A min-heap of tasks keyed by deadline. Tasks with equal deadlines fire in
//! the order they were scheduled.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Identifies a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Entry<T> {
    deadline: Duration,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest deadline first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Tasks waiting for their deadline
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    cancelled: HashSet<u64>,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Schedule `task` at an absolute page time
    pub fn schedule_at(&mut self, deadline: Duration, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry { deadline, seq, task });
        TimerId(seq)
    }

    /// Schedule `task` to run `delay` after `now`
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: T) -> TimerId {
        self.schedule_at(now + delay, task)
    }

    /// Prevent a task from firing. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let pending = self.heap.iter().any(|e| e.seq == id.0);
        pending && self.cancelled.insert(id.0)
    }

    /// Remove and return the earliest task due at `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<T> {
        loop {
            if self.heap.peek()?.deadline > now {
                return None;
            }
            let entry = self.heap.pop()?;
            if self.cancelled.remove(&entry.seq) {
                continue;
            }
            return Some(entry.task);
        }
    }

    /// Deadline of the earliest live task
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap
            .iter()
            .filter(|e| !self.cancelled.contains(&e.seq))
            .map(|e| e.deadline)
            .min()
    }

    pub fn len(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
