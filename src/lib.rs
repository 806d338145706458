//! quantsim — event-driven backtest simulation engine.
//!
//! The crate replays time-stamped market, signal, order, and fill events in
//! strict temporal order, updates simulation state, simulates order
//! execution with transaction costs, and computes performance statistics
//! over the resulting equity curve:
//!
//! - Domain types (events, timestamps, trade records)
//! - Deterministic event scheduler with FIFO tie-breaking
//! - State tracker (simulation clock + last-known prices)
//! - Execution simulator with a fixed-rate commission model
//! - Performance analyzer (returns, Sharpe ratio, drawdown bundle)
//! - Simulation orchestrator driving the tick loop
//!
//! The simulation is single-threaded and cooperative: one event is processed
//! to completion per tick. Independent engines share no state, so separate
//! backtests may run in parallel across instances.

pub mod analytics;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod execution;
pub mod portfolio;
pub mod scheduler;
pub mod state;
pub mod strategy;

pub use analytics::{DrawdownStats, PerformanceAnalyzer, PerformanceReport};
pub use config::{BacktestConfig, ConfigError};
pub use domain::{
    Direction, Event, EventTime, FillEvent, MarketEvent, OrderEvent, OrderType, SignalAction,
    SignalEvent, TimeKind, TradeRecord,
};
pub use engine::{BacktestResult, EngineStatus, MetricsConfig, SimulationEngine};
pub use error::SimulationError;
pub use execution::{CommissionModel, ExecutionHandler, SimulatedExecution};
pub use portfolio::{BasicPortfolio, Portfolio};
pub use scheduler::EventScheduler;
pub use state::StateTracker;
pub use strategy::{BuyAndHold, Strategy};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine components are Send + Sync so independent
    /// runs can be farmed out across threads without retrofitting.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Event>();
        require_sync::<Event>();
        require_send::<EventTime>();
        require_sync::<EventTime>();
        require_send::<EventScheduler>();
        require_sync::<EventScheduler>();
        require_send::<StateTracker>();
        require_sync::<StateTracker>();
        require_send::<SimulatedExecution>();
        require_sync::<SimulatedExecution>();
        require_send::<PerformanceAnalyzer>();
        require_sync::<PerformanceAnalyzer>();
        require_send::<BasicPortfolio>();
        require_sync::<BasicPortfolio>();
        require_send::<SimulationEngine<BasicPortfolio, SimulatedExecution>>();
        require_send::<SimulationError>();
        require_sync::<SimulationError>();
    }
}
