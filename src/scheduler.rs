//! Event scheduler — a priority queue that replays events in causal order.
//!
//! Ordering guarantee: events come out in non-decreasing timestamp order, and
//! events sharing a timestamp come out in admission order (FIFO), never
//! arbitrarily. The tie-break is a monotonically increasing sequence number
//! assigned at admission, which makes the replay fully deterministic for any
//! admission permutation of the same (timestamp, event) multiset.
//!
//! Admission pins the timestamp kind of the run: mixing epoch and calendar
//! timestamps in one scheduler is rejected with `InvalidTimestamp`.

use crate::domain::{Event, EventTime, TimeKind};
use crate::error::SimulationError;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A queued event with its ordering key.
#[derive(Debug)]
struct Entry {
    time: EventTime,
    seq: u64,
    event: Event,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary-heap-backed event queue. O(log n) admit and remove.
///
/// The scheduler exclusively owns queued events; [`EventScheduler::next`]
/// transfers ownership of the popped event to the caller.
#[derive(Debug, Default)]
pub struct EventScheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
    time_kind: Option<TimeKind>,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit one event.
    ///
    /// Fails with `InvalidTimestamp` if the event's timestamp kind differs
    /// from the kind pinned by the first admission. The pin persists until
    /// [`EventScheduler::clear`].
    pub fn schedule(&mut self, event: Event) -> Result<(), SimulationError> {
        let time = event.timestamp();
        match self.time_kind {
            None => self.time_kind = Some(time.kind()),
            Some(expected) if expected != time.kind() => {
                return Err(SimulationError::InvalidTimestamp {
                    expected,
                    found: time.kind(),
                });
            }
            Some(_) => {}
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { time, seq, event }));
        Ok(())
    }

    /// Remove and return the event with the smallest (timestamp, admission
    /// sequence). Returns `None` when the queue is empty — emptiness is a
    /// signal, not an error.
    pub fn next(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(entry)| entry.event)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop all queued events and unpin the timestamp kind.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.time_kind = None;
        self.next_seq = 0;
    }
}
