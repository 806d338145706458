//! Portfolio collaborator contract and the reference implementation.
//!
//! The orchestrator needs exactly three capabilities from a portfolio:
//! translate a signal into a sized order, absorb a fill, and report current
//! value. The trait is the whole capability set — an object that lacks one
//! of these cannot be handed to the engine at all.

use crate::domain::{Direction, FillEvent, OrderEvent, OrderType, SignalAction, SignalEvent};
use crate::error::SimulationError;
use crate::state::StateTracker;
use std::collections::HashMap;

/// Capability contract for the orchestrator's portfolio collaborator.
pub trait Portfolio {
    /// Apply the sizing rule: turn a signal into zero or one orders.
    fn order_for_signal(
        &self,
        signal: &SignalEvent,
    ) -> Result<Option<OrderEvent>, SimulationError>;

    /// Absorb an executed fill into cash and positions.
    fn apply_fill(&mut self, fill: &FillEvent);

    /// Mark-to-market value of cash plus open positions, using the state
    /// tracker's last-known prices.
    fn current_value(&self, state: &StateTracker) -> f64;
}

/// Cash plus a signed quantity per symbol, valued at last-known prices.
///
/// Position entry prices are carried per symbol so value stays defined for
/// a symbol whose price has not been observed since the fill.
#[derive(Debug, Clone)]
pub struct BasicPortfolio {
    pub cash: f64,
    positions: HashMap<String, PositionEntry>,
}

#[derive(Debug, Clone, Copy)]
struct PositionEntry {
    quantity: f64,
    last_fill_price: f64,
}

impl BasicPortfolio {
    pub fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            positions: HashMap::new(),
        }
    }

    pub fn position(&self, symbol: &str) -> f64 {
        self.positions.get(symbol).map_or(0.0, |p| p.quantity)
    }

    /// Reset cash to a new starting capital and drop all positions.
    pub fn reset(&mut self, initial_capital: f64) {
        self.cash = initial_capital;
        self.positions.clear();
    }
}

impl Portfolio for BasicPortfolio {
    fn order_for_signal(
        &self,
        signal: &SignalEvent,
    ) -> Result<Option<OrderEvent>, SimulationError> {
        let direction = match signal.action {
            SignalAction::Buy => Direction::Buy,
            SignalAction::Sell => Direction::Sell,
            SignalAction::Hold => return Ok(None),
        };
        if signal.quantity == 0.0 {
            return Ok(None);
        }
        let order = OrderEvent::new(
            signal.timestamp,
            signal.symbol.clone(),
            OrderType::Market,
            signal.quantity,
            direction,
        )?;
        Ok(Some(order))
    }

    fn apply_fill(&mut self, fill: &FillEvent) {
        match fill.direction() {
            Direction::Buy => self.cash -= fill.total_cost(),
            Direction::Sell => self.cash += fill.total_cost(),
        }
        let entry = self
            .positions
            .entry(fill.symbol().to_string())
            .or_insert(PositionEntry {
                quantity: 0.0,
                last_fill_price: fill.fill_price(),
            });
        entry.quantity += fill.net_quantity();
        entry.last_fill_price = fill.fill_price();
        if entry.quantity == 0.0 {
            self.positions.remove(fill.symbol());
        }
    }

    fn current_value(&self, state: &StateTracker) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .map(|(symbol, entry)| {
                let price = state.last_price(symbol).unwrap_or(entry.last_fill_price);
                entry.quantity * price
            })
            .sum();
        self.cash + position_value
    }
}
