//! Deterministic, cancelable timer queue.
//!
//! The sequencer expresses all of its pacing as deferred tasks on this
//! queue. Time is a logical clock advanced by the embedder (the TUI feeds
//! it tick durations; tests feed it exact amounts), so delivery order is
//! fully deterministic. Every scheduled task can be canceled, which is what
//! makes mid-sequence teardown safe: a torn-down sequencer clears the queue
//! and no stale callback ever fires.

use std::time::Duration;
use tracing::trace;

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

/// A queue of delayed tasks on a logical clock.
#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    now: Duration,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue with the clock at zero.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            now: Duration::ZERO,
            next_id: 1,
        }
    }

    /// Current logical time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of outstanding tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tasks are outstanding.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Schedule `task` to be delivered after `delay`.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            task,
        });
        trace!(?id, ?delay, "timer scheduled");
        id
    }

    /// Cancel a scheduled task. Returns false if it already fired or was
    /// canceled before.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every outstanding task.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Time until the next task is due, if any.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries
            .iter()
            .map(|e| e.due.saturating_sub(self.now))
            .min()
    }

    /// Advance the clock by `elapsed` and collect every task that came due,
    /// in due-time order (FIFO among tasks due at the same instant).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let now = self.now;

        let mut due: Vec<Entry<T>> = Vec::new();
        let mut remaining: Vec<Entry<T>> = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.due <= now {
                due.push(entry);
            } else {
                remaining.push(entry);
            }
        }
        self.entries = remaining;

        // Scheduling order (the id) breaks ties between equal deadlines.
        due.sort_by_key(|e| (e.due, e.id.0));
        due.into_iter().map(|e| e.task).collect()
    }
}
