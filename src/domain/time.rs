//! Event timestamps — epoch milliseconds or calendar instants.
//!
//! One run uses exactly one timestamp kind. The scheduler pins the kind of
//! the first admitted event and rejects mixed admissions, so the cross-kind
//! ordering branch below is never reached through the public API; it exists
//! only so `EventTime` has a total order and can live in a `BinaryHeap`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Discriminant of an [`EventTime`], used for run-consistency checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeKind {
    Epoch,
    Instant,
}

impl fmt::Display for TimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeKind::Epoch => write!(f, "epoch"),
            TimeKind::Instant => write!(f, "calendar"),
        }
    }
}

/// A totally ordered event timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTime {
    /// Milliseconds since the Unix epoch.
    Epoch(i64),
    /// Calendar instant in UTC.
    Instant(DateTime<Utc>),
}

impl EventTime {
    pub fn kind(&self) -> TimeKind {
        match self {
            EventTime::Epoch(_) => TimeKind::Epoch,
            EventTime::Instant(_) => TimeKind::Instant,
        }
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (EventTime::Epoch(a), EventTime::Epoch(b)) => a.cmp(b),
            (EventTime::Instant(a), EventTime::Instant(b)) => a.cmp(b),
            // Unreachable once admission pins the kind; defined so the
            // order stays total.
            (EventTime::Epoch(_), EventTime::Instant(_)) => Ordering::Less,
            (EventTime::Instant(_), EventTime::Epoch(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Epoch(ms) => write!(f, "{ms}ms"),
            EventTime::Instant(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}
