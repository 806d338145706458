//! Fill-derived trade records for the run result's trade list.

use crate::domain::event::{Direction, FillEvent};
use crate::domain::time::EventTime;
use serde::{Deserialize, Serialize};

/// One executed trade, as reported in [`BacktestResult::trades`].
///
/// [`BacktestResult::trades`]: crate::engine::BacktestResult
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: EventTime,
    pub symbol: String,
    pub direction: Direction,
    pub quantity: f64,
    pub fill_price: f64,
    pub commission: f64,
}

impl From<&FillEvent> for TradeRecord {
    fn from(fill: &FillEvent) -> Self {
        Self {
            timestamp: fill.timestamp(),
            symbol: fill.symbol().to_string(),
            direction: fill.direction(),
            quantity: fill.quantity(),
            fill_price: fill.fill_price(),
            commission: fill.commission(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_record_from_fill() {
        let fill = FillEvent::new(
            EventTime::Epoch(10),
            "SPY",
            5.0,
            101.5,
            0.51,
            Direction::Buy,
        )
        .unwrap();
        let trade = TradeRecord::from(&fill);
        assert_eq!(trade.symbol, "SPY");
        assert_eq!(trade.direction, Direction::Buy);
        assert_eq!(trade.quantity, 5.0);
        assert_eq!(trade.fill_price, 101.5);
        assert_eq!(trade.commission, 0.51);
    }
}
