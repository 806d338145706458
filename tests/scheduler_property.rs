//! Property tests for the scheduler's ordering guarantee.
//!
//! For any multiset of (timestamp, event) admissions, replay order depends
//! solely on (timestamp, admission sequence among equal timestamps) — never
//! on heap internals or admission permutation of distinct timestamps.

use proptest::prelude::*;
use quantsim::{Event, EventScheduler, EventTime, MarketEvent};

fn market(ms: i64, tag: usize) -> Event {
    Event::Market(MarketEvent {
        timestamp: EventTime::Epoch(ms),
        symbol: format!("SYM{tag}"),
        close: 1.0,
    })
}

fn drain(sched: &mut EventScheduler) -> Vec<(i64, usize)> {
    std::iter::from_fn(|| sched.next())
        .map(|e| match e {
            Event::Market(m) => {
                let tag = m.symbol.trim_start_matches("SYM").parse().unwrap();
                match m.timestamp {
                    EventTime::Epoch(ms) => (ms, tag),
                    _ => unreachable!(),
                }
            }
            _ => unreachable!(),
        })
        .collect()
}

proptest! {
    /// Output timestamps are non-decreasing for any admission order.
    #[test]
    fn output_is_sorted_by_timestamp(timestamps in prop::collection::vec(0i64..1000, 0..200)) {
        let mut sched = EventScheduler::new();
        for (i, &ms) in timestamps.iter().enumerate() {
            sched.schedule(market(ms, i)).unwrap();
        }
        let out = drain(&mut sched);
        prop_assert_eq!(out.len(), timestamps.len());
        for pair in out.windows(2) {
            prop_assert!(pair[0].0 <= pair[1].0);
        }
    }

    /// Replay equals a stable sort of the admissions by timestamp: equal
    /// timestamps keep admission order (FIFO), so the output is exactly the
    /// input stably sorted.
    #[test]
    fn replay_is_a_stable_sort_of_admissions(
        timestamps in prop::collection::vec(0i64..50, 0..200),
    ) {
        let mut sched = EventScheduler::new();
        for (i, &ms) in timestamps.iter().enumerate() {
            sched.schedule(market(ms, i)).unwrap();
        }
        let out = drain(&mut sched);

        let mut expected: Vec<(i64, usize)> =
            timestamps.iter().copied().zip(0usize..).collect();
        expected.sort_by_key(|&(ms, _)| ms); // sort_by_key is stable
        prop_assert_eq!(out, expected);
    }

    /// Two admission permutations of the same timestamped events produce
    /// identical replay, ordered by (timestamp, original admission order
    /// among equal timestamps).
    #[test]
    fn distinct_timestamp_permutations_replay_identically(
        mut timestamps in prop::collection::hash_set(0i64..10_000, 0..100),
    ) {
        let ordered: Vec<i64> = {
            let mut v: Vec<i64> = timestamps.drain().collect();
            v.sort_unstable();
            v
        };
        let reversed: Vec<i64> = ordered.iter().rev().copied().collect();

        let mut a = EventScheduler::new();
        for (i, &ms) in ordered.iter().enumerate() {
            a.schedule(market(ms, i)).unwrap();
        }
        let mut b = EventScheduler::new();
        for (i, &ms) in reversed.iter().enumerate() {
            b.schedule(market(ms, i)).unwrap();
        }

        let out_a: Vec<i64> = drain(&mut a).into_iter().map(|(ms, _)| ms).collect();
        let out_b: Vec<i64> = drain(&mut b).into_iter().map(|(ms, _)| ms).collect();
        prop_assert_eq!(out_a, out_b);
    }
}
