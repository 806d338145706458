//! Strategy collaborator contract and a buy-and-hold reference strategy.

use crate::domain::{MarketEvent, SignalAction, SignalEvent};
use std::collections::HashSet;

/// Capability contract for the strategy collaborator.
///
/// A strategy is offered each market event and answers with zero or more
/// signals. It must be stateless with respect to the engine's internals but
/// may hold its own private state (e.g. "have I already bought").
pub trait Strategy {
    fn on_market(&mut self, event: &MarketEvent) -> Vec<SignalEvent>;
}

/// Buys a fixed quantity on the first market event per symbol, then holds.
#[derive(Debug, Clone)]
pub struct BuyAndHold {
    quantity: f64,
    bought: HashSet<String>,
}

impl BuyAndHold {
    pub fn new(quantity: f64) -> Self {
        Self {
            quantity,
            bought: HashSet::new(),
        }
    }
}

impl Strategy for BuyAndHold {
    fn on_market(&mut self, event: &MarketEvent) -> Vec<SignalEvent> {
        if self.bought.contains(&event.symbol) {
            return Vec::new();
        }
        self.bought.insert(event.symbol.clone());
        vec![SignalEvent {
            timestamp: event.timestamp,
            symbol: event.symbol.clone(),
            action: SignalAction::Buy,
            quantity: self.quantity,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventTime;

    fn market(ms: i64, symbol: &str) -> MarketEvent {
        MarketEvent {
            timestamp: EventTime::Epoch(ms),
            symbol: symbol.into(),
            close: 100.0,
        }
    }

    #[test]
    fn buys_once_per_symbol() {
        let mut strategy = BuyAndHold::new(5.0);
        let first = strategy.on_market(&market(1, "SPY"));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].action, SignalAction::Buy);
        assert_eq!(first[0].quantity, 5.0);

        assert!(strategy.on_market(&market(2, "SPY")).is_empty());
        // A new symbol triggers its own entry.
        assert_eq!(strategy.on_market(&market(3, "QQQ")).len(), 1);
    }
}
