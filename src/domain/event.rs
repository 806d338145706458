//! Market, signal, order, and fill events — the currency of the simulation.
//!
//! Events are a closed tagged-variant type so the scheduler and state tracker
//! can match exhaustively instead of probing attributes at dispatch time.
//! Order and fill events validate their numeric fields at construction
//! (fail-fast): an order that would be rejected at execution time cannot be
//! built in the first place.

use crate::domain::time::EventTime;
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction for orders and fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// Strategy signal action. `Hold` produces no order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

/// Order type. Closed enumeration: the base execution model supports market
/// orders only; other variants are rejected by the simulator with
/// `UnsupportedOrderType` until they grow a fill rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OrderType {
    /// Fill at the current reference price.
    Market,
    /// Fill at the limit price or better. Not simulated in the base model.
    Limit { limit_price: f64 },
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit { limit_price } => write!(f, "LIMIT@{limit_price}"),
        }
    }
}

/// A new closing price observed for a symbol.
///
/// The feed is validated upstream; the state tracker still defensively
/// rejects blank symbols and negative or non-finite closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub timestamp: EventTime,
    pub symbol: String,
    pub close: f64,
}

/// A strategy's trading intention, before sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub timestamp: EventTime,
    pub symbol: String,
    pub action: SignalAction,
    pub quantity: f64,
}

/// A sized, validated order ready for execution.
///
/// Only constructible through [`OrderEvent::new`], which enforces the
/// invariants; the fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    timestamp: EventTime,
    symbol: String,
    order_type: OrderType,
    quantity: f64,
    direction: Direction,
}

impl OrderEvent {
    /// Build an order. Fails with `InvalidEvent` if the symbol is blank or
    /// the quantity is not finite and strictly positive.
    pub fn new(
        timestamp: EventTime,
        symbol: impl Into<String>,
        order_type: OrderType,
        quantity: f64,
        direction: Direction,
    ) -> Result<Self, SimulationError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(SimulationError::InvalidEvent(
                "order symbol must be non-empty".into(),
            ));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(SimulationError::InvalidEvent(format!(
                "order quantity must be finite and positive, got {quantity}"
            )));
        }
        if let OrderType::Limit { limit_price } = order_type {
            if !limit_price.is_finite() || limit_price <= 0.0 {
                return Err(SimulationError::InvalidEvent(format!(
                    "limit price must be finite and positive, got {limit_price}"
                )));
            }
        }
        Ok(Self {
            timestamp,
            symbol,
            order_type,
            quantity,
            direction,
        })
    }

    pub fn timestamp(&self) -> EventTime {
        self.timestamp
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// The realized result of executing an order at a price, inclusive of
/// commission. Only constructible through [`FillEvent::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    timestamp: EventTime,
    symbol: String,
    quantity: f64,
    fill_price: f64,
    commission: f64,
    direction: Direction,
}

impl FillEvent {
    /// Build a fill. All numeric fields must be finite; quantity and price
    /// strictly positive; commission non-negative.
    pub fn new(
        timestamp: EventTime,
        symbol: impl Into<String>,
        quantity: f64,
        fill_price: f64,
        commission: f64,
        direction: Direction,
    ) -> Result<Self, SimulationError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(SimulationError::InvalidEvent(
                "fill symbol must be non-empty".into(),
            ));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(SimulationError::InvalidEvent(format!(
                "fill quantity must be finite and positive, got {quantity}"
            )));
        }
        if !fill_price.is_finite() || fill_price <= 0.0 {
            return Err(SimulationError::InvalidEvent(format!(
                "fill price must be finite and positive, got {fill_price}"
            )));
        }
        if !commission.is_finite() || commission < 0.0 {
            return Err(SimulationError::InvalidEvent(format!(
                "commission must be finite and non-negative, got {commission}"
            )));
        }
        Ok(Self {
            timestamp,
            symbol,
            quantity,
            fill_price,
            commission,
            direction,
        })
    }

    pub fn timestamp(&self) -> EventTime {
        self.timestamp
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn fill_price(&self) -> f64 {
        self.fill_price
    }

    pub fn commission(&self) -> f64 {
        self.commission
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Cash impact of the fill: buys pay `quantity * price + commission`,
    /// sells receive `quantity * price - commission`.
    pub fn total_cost(&self) -> f64 {
        match self.direction {
            Direction::Buy => self.quantity * self.fill_price + self.commission,
            Direction::Sell => self.quantity * self.fill_price - self.commission,
        }
    }

    /// Signed position delta: `+quantity` for buys, `-quantity` for sells.
    pub fn net_quantity(&self) -> f64 {
        match self.direction {
            Direction::Buy => self.quantity,
            Direction::Sell => -self.quantity,
        }
    }
}

/// A timestamped occurrence driving the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Market(MarketEvent),
    Signal(SignalEvent),
    Order(OrderEvent),
    Fill(FillEvent),
}

impl Event {
    pub fn timestamp(&self) -> EventTime {
        match self {
            Event::Market(e) => e.timestamp,
            Event::Signal(e) => e.timestamp,
            Event::Order(e) => e.timestamp,
            Event::Fill(e) => e.timestamp,
        }
    }

    /// Variant name, for log lines and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Event::Market(_) => "market",
            Event::Signal(_) => "signal",
            Event::Order(_) => "order",
            Event::Fill(_) => "fill",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(ms: i64) -> EventTime {
        EventTime::Epoch(ms)
    }

    #[test]
    fn order_construction_validates_quantity() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let res = OrderEvent::new(t(0), "BTC", OrderType::Market, bad, Direction::Buy);
            assert!(res.is_err(), "quantity {bad} should be rejected");
        }
        let ok = OrderEvent::new(t(0), "BTC", OrderType::Market, 2.0, Direction::Buy);
        assert!(ok.is_ok());
    }

    #[test]
    fn limit_order_construction_validates_limit_price() {
        for bad in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let res = OrderEvent::new(
                t(0),
                "BTC",
                OrderType::Limit { limit_price: bad },
                1.0,
                Direction::Buy,
            );
            assert!(res.is_err(), "limit price {bad} should be rejected");
        }
    }

    #[test]
    fn order_construction_rejects_blank_symbol() {
        let res = OrderEvent::new(t(0), "   ", OrderType::Market, 1.0, Direction::Sell);
        assert!(matches!(res, Err(SimulationError::InvalidEvent(_))));
    }

    #[test]
    fn fill_construction_validates_all_numeric_fields() {
        // (quantity, price, commission)
        let cases = [
            (0.0, 100.0, 0.0),
            (-1.0, 100.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, -5.0, 0.0),
            (1.0, 100.0, -0.01),
            (f64::NAN, 100.0, 0.0),
            (1.0, f64::INFINITY, 0.0),
            (1.0, 100.0, f64::NAN),
        ];
        for (q, p, c) in cases {
            let res = FillEvent::new(t(0), "BTC", q, p, c, Direction::Buy);
            assert!(res.is_err(), "({q}, {p}, {c}) should be rejected");
        }
    }

    #[test]
    fn fill_cost_conventions() {
        // quantity=2, price=20000, rate=0.001 => commission=40
        let buy = FillEvent::new(t(0), "BTC", 2.0, 20_000.0, 40.0, Direction::Buy).unwrap();
        assert!((buy.total_cost() - 40_040.0).abs() < 1e-9);
        assert_eq!(buy.net_quantity(), 2.0);

        let sell = FillEvent::new(t(0), "BTC", 2.0, 20_000.0, 40.0, Direction::Sell).unwrap();
        assert!((sell.total_cost() - 39_960.0).abs() < 1e-9);
        assert_eq!(sell.net_quantity(), -2.0);
    }

    #[test]
    fn zero_commission_fill_is_valid() {
        let fill = FillEvent::new(t(0), "SPY", 10.0, 100.0, 0.0, Direction::Buy).unwrap();
        assert_eq!(fill.total_cost(), 1000.0);
    }

    #[test]
    fn event_timestamp_accessor_covers_all_variants() {
        let market = Event::Market(MarketEvent {
            timestamp: t(1),
            symbol: "SPY".into(),
            close: 100.0,
        });
        let signal = Event::Signal(SignalEvent {
            timestamp: t(2),
            symbol: "SPY".into(),
            action: SignalAction::Buy,
            quantity: 1.0,
        });
        let order = Event::Order(
            OrderEvent::new(t(3), "SPY", OrderType::Market, 1.0, Direction::Buy).unwrap(),
        );
        let fill =
            Event::Fill(FillEvent::new(t(4), "SPY", 1.0, 100.0, 0.1, Direction::Buy).unwrap());

        assert_eq!(market.timestamp(), t(1));
        assert_eq!(signal.timestamp(), t(2));
        assert_eq!(order.timestamp(), t(3));
        assert_eq!(fill.timestamp(), t(4));
    }

    #[test]
    fn event_serialization_roundtrip() {
        let order =
            OrderEvent::new(t(5), "AAPL", OrderType::Market, 50.0, Direction::Sell).unwrap();
        let json = serde_json::to_string(&Event::Order(order.clone())).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Event::Order(order));
    }
}
