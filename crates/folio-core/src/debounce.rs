#![forbid(unsafe_code)]

//! Trailing-edge debouncing for high-frequency page events.
//!
//! Scroll and resize fire far more often than the page needs to react.
//! [`Debouncer`] keeps only the latest value of a burst and releases it once
//! the burst has been quiet for the configured wait.
//!
//! The debouncer owns no clock. Each [`push`](Debouncer::push) returns a
//! [`DebounceTicket`]; the caller schedules a timer for
//! [`wait`](Debouncer::wait) carrying that ticket and hands it back to
//! [`settle`](Debouncer::settle) when the timer fires. Only the ticket of the
//! most recent push releases the value, so earlier timers fire harmlessly and
//! nothing ever needs cancelling.
//!
//! ```
//! use std::time::Duration;
//! use folio_core::debounce::Debouncer;
//!
//! let mut scroll = Debouncer::new(Duration::from_millis(10));
//! let first = scroll.push(120_u32);
//! let second = scroll.push(480_u32);
//!
//! assert_eq!(scroll.settle(first), None); // superseded
//! assert_eq!(scroll.settle(second), Some(480));
//! assert!(!scroll.has_pending());
//! ```

use std::time::Duration;

/// Proof of a [`Debouncer::push`]; hand it back to [`Debouncer::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

/// Latest-value-wins trailing-edge debouncer.
///
/// Not thread-safe; drive it from the single event-processing flow.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    wait: Duration,
    generation: u64,
    pending: Option<T>,
    superseded: u64,
}

impl<T> Debouncer<T> {
    /// Create a debouncer that releases values after `wait` of quiet.
    #[must_use]
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            generation: 0,
            pending: None,
            superseded: 0,
        }
    }

    /// Quiet period the caller should schedule for each ticket.
    #[must_use]
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Record a new value, replacing any pending one.
    pub fn push(&mut self, value: T) -> DebounceTicket {
        if self.pending.replace(value).is_some() {
            self.superseded += 1;
        }
        self.generation += 1;
        DebounceTicket(self.generation)
    }

    /// Release the pending value if `ticket` belongs to the latest push.
    pub fn settle(&mut self, ticket: DebounceTicket) -> Option<T> {
        if ticket.0 == self.generation {
            self.pending.take()
        } else {
            None
        }
    }

    /// Whether a value is waiting to be released.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Number of values replaced before they were released.
    #[must_use]
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_debouncer_has_no_pending() {
        let d: Debouncer<u32> = Debouncer::new(Duration::from_millis(250));
        assert!(!d.has_pending());
        assert_eq!(d.wait(), Duration::from_millis(250));
        assert_eq!(d.superseded(), 0);
    }

    #[test]
    fn single_push_settles() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        let t = d.push(5);
        assert!(d.has_pending());
        assert_eq!(d.settle(t), Some(5));
        assert!(!d.has_pending());
    }

    #[test]
    fn burst_releases_only_latest() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        let tickets: Vec<_> = (0..5).map(|y| d.push(y * 100)).collect();
        assert_eq!(d.superseded(), 4);
        for t in &tickets[..4] {
            assert_eq!(d.settle(*t), None);
        }
        assert_eq!(d.settle(tickets[4]), Some(400));
    }

    #[test]
    fn ticket_settles_once() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        let t = d.push("resize");
        assert_eq!(d.settle(t), Some("resize"));
        assert_eq!(d.settle(t), None);
    }

    #[test]
    fn push_after_settle_starts_fresh_burst() {
        let mut d = Debouncer::new(Duration::from_millis(10));
        let a = d.push(1);
        assert_eq!(d.settle(a), Some(1));
        let b = d.push(2);
        assert_eq!(d.superseded(), 0);
        assert_eq!(d.settle(b), Some(2));
    }
}
