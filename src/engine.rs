//! Simulation orchestrator — drives the deterministic event replay loop.
//!
//! One tick processes exactly one event to completion: pop from the
//! scheduler, advance the state tracker, dispatch to the collaborators,
//! record the portfolio valuation. The loop is single-threaded by design —
//! correctness depends on total, deterministic event ordering, and
//! concurrent dispatch would buy nothing at backtest data volumes while
//! forcing that ordering to be re-derived as a synchronization invariant.
//!
//! Independent runs isolate completely: each engine owns its scheduler,
//! tracker, and analyzer, so separate instances may run in parallel with no
//! shared mutable state.

use crate::analytics::{PerformanceAnalyzer, PerformanceReport};
use crate::domain::{Event, EventTime, FillEvent, OrderEvent, SignalEvent, TradeRecord};
use crate::error::SimulationError;
use crate::execution::ExecutionHandler;
use crate::portfolio::Portfolio;
use crate::scheduler::EventScheduler;
use crate::state::StateTracker;
use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Orchestrator lifecycle. `Failed` is terminal and reachable only from
/// `Running`; a failed run is never reported as `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineStatus {
    Created,
    Ready,
    Running,
    Completed,
    Failed,
}

/// Annualization settings for the performance report.
#[derive(Debug, Clone, Copy)]
pub struct MetricsConfig {
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            periods_per_year: 252.0,
        }
    }
}

/// Result record of a complete (or failed) run.
///
/// On failure the partial valuation series and trade list recorded before
/// the first error survive here for diagnostic inspection, and `error`
/// carries the originating condition.
#[derive(Debug)]
pub struct BacktestResult {
    pub status: EngineStatus,
    pub error: Option<SimulationError>,
    pub initial_capital: f64,
    pub final_value: f64,
    pub total_return: Option<f64>,
    pub trades: Vec<TradeRecord>,
    pub metrics: PerformanceReport,
}

/// The simulation engine: scheduler, state tracker, analyzer, and the two
/// collaborators it is generic over.
///
/// The portfolio and execution capability sets are the `Portfolio` and
/// `ExecutionHandler` traits — a collaborator missing a capability is a
/// compile error, not a late runtime condition.
pub struct SimulationEngine<P: Portfolio, E: ExecutionHandler> {
    scheduler: EventScheduler,
    state: StateTracker,
    analyzer: PerformanceAnalyzer,
    portfolio: P,
    execution: E,
    metrics_config: MetricsConfig,
    horizon: Option<EventTime>,
    status: EngineStatus,
    abort: Option<Arc<AtomicBool>>,
    trades: Vec<TradeRecord>,
}

impl<P: Portfolio, E: ExecutionHandler> SimulationEngine<P, E> {
    /// Build an engine with its collaborators. The result is `Ready`: the
    /// capability checks the source system performed at this point are
    /// discharged by the trait bounds.
    pub fn new(portfolio: P, execution: E) -> Self {
        Self {
            scheduler: EventScheduler::new(),
            state: StateTracker::new(),
            analyzer: PerformanceAnalyzer::new(),
            portfolio,
            execution,
            metrics_config: MetricsConfig::default(),
            horizon: None,
            status: EngineStatus::Ready,
            abort: None,
            trades: Vec::new(),
        }
    }

    pub fn with_metrics_config(mut self, metrics_config: MetricsConfig) -> Self {
        self.metrics_config = metrics_config;
        self
    }

    /// Bound the simulated time span. Events with timestamps beyond the
    /// horizon are not processed; reaching it completes the run normally.
    /// The horizon must use the same timestamp kind as the feed. It is
    /// configuration, not run state, so [`Self::reset`] keeps it.
    pub fn with_horizon(mut self, horizon: EventTime) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Install a shared flag checked between event iterations. When set,
    /// the run stops with `Aborted`, leaving the tracker and analyzer in a
    /// consistent snapshot.
    pub fn set_abort_flag(&mut self, flag: Arc<AtomicBool>) {
        self.abort = Some(flag);
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn state(&self) -> &StateTracker {
        &self.state
    }

    pub fn portfolio(&self) -> &P {
        &self.portfolio
    }

    /// Clear scheduler, tracker, analyzer, and trade list so the same
    /// instance can host another independent run.
    pub fn reset(&mut self) {
        self.scheduler.clear();
        self.state.reset();
        self.analyzer.reset();
        self.trades.clear();
        self.status = EngineStatus::Ready;
    }

    /// Run a full simulation over the feed.
    ///
    /// Fails fast with `ParameterValidation` (as `Err`, before any
    /// simulation work) when `initial_capital` is not strictly positive, or
    /// when the engine is not `Ready` — a finished engine still holds the
    /// previous run's valuation series, prices, and pinned timestamp kind,
    /// and must go through [`Self::reset`] before it can host another run.
    /// Errors *during* the replay produce `Ok` with `status == Failed` and
    /// the originating condition attached — see [`BacktestResult`].
    pub fn run(
        &mut self,
        feed: impl IntoIterator<Item = Event>,
        strategy: &mut dyn Strategy,
        initial_capital: f64,
    ) -> Result<BacktestResult, SimulationError> {
        if self.status != EngineStatus::Ready {
            return Err(SimulationError::ParameterValidation(format!(
                "engine is {:?}, not Ready; call reset() before another run",
                self.status
            )));
        }
        if !initial_capital.is_finite() || initial_capital <= 0.0 {
            return Err(SimulationError::ParameterValidation(format!(
                "initial_capital must be strictly positive, got {initial_capital}"
            )));
        }

        self.status = EngineStatus::Running;
        let outcome = self
            .load_events(feed)
            .and_then(|admitted| {
                debug!(events = admitted, "feed loaded");
                self.run_loop(strategy)
            });

        let (status, error) = match outcome {
            Ok(()) => (EngineStatus::Completed, None),
            Err(err) => {
                warn!(%err, "run failed");
                (EngineStatus::Failed, Some(err))
            }
        };
        self.status = status;

        let final_value = self.portfolio.current_value(&self.state);
        let metrics = self.analyzer.report(
            self.metrics_config.risk_free_rate,
            self.metrics_config.periods_per_year,
        );
        debug!(
            ?status,
            final_value,
            trades = self.trades.len(),
            "run finished"
        );
        Ok(BacktestResult {
            status,
            error,
            initial_capital,
            final_value,
            total_return: metrics.total_return,
            trades: std::mem::take(&mut self.trades),
            metrics,
        })
    }

    /// Data-admission phase: everything from the feed goes through the
    /// scheduler so replay order is owned by one component. Kept separate
    /// from [`Self::run_loop`] so each phase is testable on its own.
    fn load_events(
        &mut self,
        feed: impl IntoIterator<Item = Event>,
    ) -> Result<usize, SimulationError> {
        let mut admitted = 0usize;
        for event in feed {
            self.scheduler.schedule(event)?;
            admitted += 1;
        }
        Ok(admitted)
    }

    /// The tick loop: one event popped, applied, dispatched, and valued per
    /// iteration, until the scheduler is empty or the horizon is reached.
    fn run_loop(&mut self, strategy: &mut dyn Strategy) -> Result<(), SimulationError> {
        while let Some(event) = {
            if self
                .abort
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                return Err(SimulationError::Aborted);
            }
            self.scheduler.next()
        } {
            let timestamp = event.timestamp();
            if let Some(horizon) = self.horizon {
                if horizon.kind() != timestamp.kind() {
                    return Err(SimulationError::InvalidTimestamp {
                        expected: timestamp.kind(),
                        found: horizon.kind(),
                    });
                }
                // Replay is chronological, so everything still queued is
                // also beyond the horizon.
                if timestamp > horizon {
                    debug!(%timestamp, %horizon, "horizon reached");
                    return Ok(());
                }
            }
            self.state.apply(&event)?;
            match event {
                Event::Market(market) => {
                    let signals = strategy.on_market(&market);
                    for signal in signals {
                        self.process_signal(&signal)?;
                    }
                }
                Event::Signal(signal) => self.process_signal(&signal)?,
                Event::Order(order) => self.process_order(&order)?,
                Event::Fill(fill) => self.apply_fill(&fill),
            }
            let value = self.portfolio.current_value(&self.state);
            self.analyzer.record(timestamp, value)?;
        }
        Ok(())
    }

    fn process_signal(&mut self, signal: &SignalEvent) -> Result<(), SimulationError> {
        if let Some(order) = self.portfolio.order_for_signal(signal)? {
            self.process_order(&order)?;
        }
        Ok(())
    }

    fn process_order(&mut self, order: &OrderEvent) -> Result<(), SimulationError> {
        let reference_price = self
            .state
            .last_price(order.symbol())
            .ok_or_else(|| SimulationError::MissingPrice(order.symbol().to_string()))?;
        let fill = self.execution.execute(order, reference_price)?;
        debug!(
            symbol = order.symbol(),
            direction = %order.direction(),
            quantity = order.quantity(),
            price = fill.fill_price(),
            "order filled"
        );
        self.apply_fill(&fill);
        Ok(())
    }

    fn apply_fill(&mut self, fill: &FillEvent) {
        self.portfolio.apply_fill(fill);
        self.trades.push(TradeRecord::from(fill));
    }
}
