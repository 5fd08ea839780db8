#![forbid(unsafe_code)]

//! Deterministic timer queue.
//!
//! Every `Cmd::After` lands here. The queue is driven by an external clock:
//! the runner asks for due messages with [`TimerQueue::pop_due`] after the
//! host advances time, so a test can replay minutes of page activity in
//! microseconds with exact ordering.
//!
//! # Ordering
//!
//! Timers fire by deadline; timers with equal deadlines fire in the order
//! they were scheduled (like `setTimeout` callbacks in a browser).

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

struct Scheduled<M> {
    deadline: Duration,
    seq: u64,
    msg: M,
}

impl<M> PartialEq for Scheduled<M> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<M> Eq for Scheduled<M> {}

impl<M> PartialOrd for Scheduled<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Scheduled<M> {
    // Reversed so the max-heap pops the earliest (deadline, seq).
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-queue of pending timer messages keyed by absolute deadline.
pub struct TimerQueue<M> {
    heap: BinaryHeap<Scheduled<M>>,
    next_seq: u64,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TimerQueue<M> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Schedule `msg` to fire at absolute time `deadline`.
    pub fn schedule(&mut self, deadline: Duration, msg: M) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Scheduled { deadline, seq, msg });
    }

    /// Pop the earliest timer whose deadline is at or before `now`.
    ///
    /// Returns the timer's deadline with its message so the runner can
    /// execute follow-up commands relative to when the timer was due.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, M)> {
        if self.heap.peek()?.deadline > now {
            return None;
        }
        self.heap.pop().map(|s| (s.deadline, s.msg))
    }

    /// Deadline of the next timer, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|s| s.deadline)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Total timers ever scheduled.
    #[must_use]
    pub fn scheduled_total(&self) -> u64 {
        self.next_seq
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<M> std::fmt::Debug for TimerQueue<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.heap.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn empty_queue_has_nothing_due() {
        let mut q: TimerQueue<&str> = TimerQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.pop_due(ms(1_000)), None);
        assert_eq!(q.next_deadline(), None);
    }

    #[test]
    fn fires_by_deadline() {
        let mut q = TimerQueue::new();
        q.schedule(ms(300), "hide");
        q.schedule(ms(50), "reveal");
        q.schedule(ms(100), "slide-in");

        assert_eq!(q.next_deadline(), Some(ms(50)));
        assert_eq!(q.pop_due(ms(40)), None);
        assert_eq!(q.pop_due(ms(100)), Some((ms(50), "reveal")));
        assert_eq!(q.pop_due(ms(100)), Some((ms(100), "slide-in")));
        assert_eq!(q.pop_due(ms(100)), None);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut q = TimerQueue::new();
        for i in 0..5 {
            q.schedule(ms(10), i);
        }
        let fired: Vec<i32> = std::iter::from_fn(|| q.pop_due(ms(10)).map(|(_, m)| m)).collect();
        assert_eq!(fired, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn scheduled_total_counts_history() {
        let mut q = TimerQueue::new();
        q.schedule(ms(1), ());
        q.schedule(ms(2), ());
        let _ = q.pop_due(ms(5));
        assert_eq!(q.scheduled_total(), 2);
        q.clear();
        assert!(q.is_empty());
    }
}
