//! Execution simulator — converts orders into fills at a reference price.
//!
//! The base model fills market orders at the reference price exactly, with a
//! fixed-rate commission and no slippage. Slippage modeling is a deliberate
//! extension point: the struct design allows swapping in a directional or
//! distribution-sampled model later without touching the orchestrator.

use crate::domain::{FillEvent, OrderEvent, OrderType};
use crate::error::SimulationError;

/// Fixed-rate commission model.
///
/// `commission = quantity * price * rate`, identical formula for both
/// directions; the sign of its effect on cash lives in
/// [`FillEvent::total_cost`].
#[derive(Debug, Clone, Copy)]
pub struct CommissionModel {
    /// Commission as a fraction of notional (0.001 = 10 bps).
    pub rate: f64,
}

impl CommissionModel {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0)
    }

    pub fn commission(&self, quantity: f64, price: f64) -> f64 {
        quantity * price * self.rate
    }
}

/// Capability contract for the orchestrator's execution collaborator.
pub trait ExecutionHandler {
    /// Execute an order against a reference price, producing a fill.
    fn execute(
        &self,
        order: &OrderEvent,
        reference_price: f64,
    ) -> Result<FillEvent, SimulationError>;

    /// Commission that would be charged for a given quantity and price.
    fn commission(&self, quantity: f64, price: f64) -> f64;
}

/// The base execution simulator: market orders only, fill at reference price.
///
/// Pure: no portfolio state is mutated here; the output is the fill value.
#[derive(Debug, Clone)]
pub struct SimulatedExecution {
    commission: CommissionModel,
}

impl SimulatedExecution {
    pub fn new(commission: CommissionModel) -> Self {
        Self { commission }
    }

    pub fn with_rate(rate: f64) -> Self {
        Self::new(CommissionModel::new(rate))
    }
}

impl ExecutionHandler for SimulatedExecution {
    fn execute(
        &self,
        order: &OrderEvent,
        reference_price: f64,
    ) -> Result<FillEvent, SimulationError> {
        if !reference_price.is_finite() || reference_price <= 0.0 {
            return Err(SimulationError::InvalidPrice {
                symbol: order.symbol().to_string(),
                value: reference_price,
            });
        }
        match order.order_type() {
            OrderType::Market => {}
            other => {
                return Err(SimulationError::UnsupportedOrderType(other.to_string()));
            }
        }
        let commission = self
            .commission
            .commission(order.quantity(), reference_price);
        FillEvent::new(
            order.timestamp(),
            order.symbol(),
            order.quantity(),
            reference_price,
            commission,
            order.direction(),
        )
    }

    fn commission(&self, quantity: f64, price: f64) -> f64 {
        self.commission.commission(quantity, price)
    }
}
