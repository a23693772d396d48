//! Completion events for the engine's priority queue.
//!
//! A [`CompletionEvent`] marks the simulated instant at which an in-flight
//! request finishes and its server's active load drops. Events are ordered
//! by time ascending; equal times are served FIFO via a sequence number so
//! runs are deterministic for a fixed seed.

use std::cmp::Ordering;

/// A scheduled request completion. Immutable once enqueued, consumed
/// exactly once when its time is reached.
#[derive(Debug, Clone, Copy)]
pub struct CompletionEvent {
    /// Simulated time at which the request completes.
    pub time: f64,
    /// Index of the owning server in declaration order.
    pub server: usize,
    /// Insertion order, for FIFO tie-breaking at equal times.
    pub sequence: u64,
}

impl PartialEq for CompletionEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CompletionEvent {}

impl PartialOrd for CompletionEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompletionEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse the comparison for a min-heap.
        // Times are finite by construction, so total_cmp agrees with the
        // numeric order.
        other
            .time
            .total_cmp(&self.time)
            .then(other.sequence.cmp(&self.sequence))
    }
}
