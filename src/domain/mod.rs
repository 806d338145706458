//! Domain types: timestamps, events, and trade records.

pub mod event;
pub mod time;
pub mod trade;

pub use event::{
    Direction, Event, FillEvent, MarketEvent, OrderEvent, OrderType, SignalAction, SignalEvent,
};
pub use time::{EventTime, TimeKind};
pub use trade::TradeRecord;
