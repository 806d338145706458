//! State tracker — the simulation clock and last-known price per symbol.
//!
//! Owned and mutated exclusively by the orchestrator's single execution
//! path; every other component reads it through the accessors. The price map
//! is updated only by market events, and an invalid close never corrupts
//! previously stored prices (the update is atomic per symbol: validate
//! first, then insert).

use crate::domain::{Event, EventTime, TimeKind};
use crate::error::SimulationError;
use std::collections::HashMap;
use tracing::trace;

/// Simulation clock plus last-price map.
#[derive(Debug, Default)]
pub struct StateTracker {
    current_time: Option<EventTime>,
    last_price: HashMap<String, f64>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear clock and price map back to the initial empty state. Callable
    /// between independent runs without reconstruction.
    pub fn reset(&mut self) {
        self.current_time = None;
        self.last_price.clear();
    }

    /// Consume one event: advance the clock, and for market events update
    /// the symbol's last-known price.
    ///
    /// Fails with `InvalidTimestamp` if the event's timestamp kind differs
    /// from the run's established kind, and with `InvalidPrice` (naming the
    /// symbol and value) if a market event carries a negative or non-finite
    /// close. The clock never moves backwards.
    pub fn apply(&mut self, event: &Event) -> Result<(), SimulationError> {
        let ts = event.timestamp();
        if let Some(current) = self.current_time {
            if current.kind() != ts.kind() {
                return Err(SimulationError::InvalidTimestamp {
                    expected: current.kind(),
                    found: ts.kind(),
                });
            }
            if ts > current {
                self.current_time = Some(ts);
            }
        } else {
            self.current_time = Some(ts);
        }

        if let Event::Market(market) = event {
            if market.symbol.trim().is_empty() {
                return Err(SimulationError::InvalidEvent(
                    "market event symbol must be non-blank".into(),
                ));
            }
            if !market.close.is_finite() || market.close < 0.0 {
                return Err(SimulationError::InvalidPrice {
                    symbol: market.symbol.clone(),
                    value: market.close,
                });
            }
            trace!(symbol = %market.symbol, close = market.close, "price update");
            self.last_price.insert(market.symbol.clone(), market.close);
        }
        Ok(())
    }

    /// Last timestamp processed, monotonically non-decreasing across a run.
    pub fn current_time(&self) -> Option<EventTime> {
        self.current_time
    }

    pub fn time_kind(&self) -> Option<TimeKind> {
        self.current_time.map(|t| t.kind())
    }

    /// Last close seen for a symbol, if any market event has been consumed.
    pub fn last_price(&self, symbol: &str) -> Option<f64> {
        self.last_price.get(symbol).copied()
    }

    pub fn prices(&self) -> &HashMap<String, f64> {
        &self.last_price
    }
}
