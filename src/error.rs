//! Shared error taxonomy for the simulation core.
//!
//! Every failure is raised synchronously at the point of detection and never
//! downgraded to a warning: a corrupted price or mis-ordered event would
//! otherwise propagate invisibly into the performance statistics. Nothing is
//! retried — a backtest is a deterministic replay, so a failure indicates a
//! data or configuration defect that retrying cannot fix.

use crate::domain::time::TimeKind;
use thiserror::Error;

/// Errors raised by the scheduler, state tracker, execution simulator,
/// analyzer, and orchestrator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Malformed event: invalid field values at construction time.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Timestamp kind differs from the one this run was pinned to.
    #[error("invalid timestamp: expected {expected} timestamps, got {found}")]
    InvalidTimestamp { expected: TimeKind, found: TimeKind },

    /// Non-positive or non-finite price observed at a validation boundary.
    #[error("invalid price for {symbol}: {value}")]
    InvalidPrice { symbol: String, value: f64 },

    /// The execution simulator only supports market orders in the base model.
    #[error("unsupported order type: {0}")]
    UnsupportedOrderType(String),

    /// Bad run arguments (e.g. non-positive initial capital).
    #[error("parameter validation failed: {0}")]
    ParameterValidation(String),

    /// An order referenced a symbol with no market event seen yet.
    #[error("no market price seen yet for {0}")]
    MissingPrice(String),

    /// The run was aborted externally between event iterations.
    #[error("run aborted")]
    Aborted,
}
