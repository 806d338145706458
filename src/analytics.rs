//! Performance analyzer — return series, Sharpe ratio, and drawdown stats
//! derived from the recorded valuation series.
//!
//! Every metric is a pure function of the series. Metrics that need at least
//! two observations return `None` ("unavailable") rather than a fabricated
//! zero, so a caller can distinguish "flat performance" from "not enough
//! data". Ordering is not enforced here — the orchestrator feeds values in
//! run order.

use crate::domain::EventTime;
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};

/// One recorded portfolio valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationPoint {
    pub timestamp: EventTime,
    pub value: f64,
}

/// Maximum peak-to-trough decline, with the interval that produced it.
///
/// `duration` is the index distance from the peak's position to the trough's
/// position, not to the point of eventual recovery. When several intervals
/// tie in magnitude, the earliest one is reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawdownStats {
    /// Decline as a fraction of the peak (0.25 = 25%).
    pub max_drawdown: f64,
    pub peak: f64,
    pub trough: f64,
    pub duration: usize,
}

/// Bundle of the headline metrics for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub total_return: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: Option<DrawdownStats>,
}

/// Append-only valuation series plus the metric calculations over it.
#[derive(Debug, Default)]
pub struct PerformanceAnalyzer {
    series: Vec<ValuationPoint>,
}

impl PerformanceAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one valuation. The value must be finite.
    pub fn record(&mut self, timestamp: EventTime, value: f64) -> Result<(), SimulationError> {
        if !value.is_finite() {
            return Err(SimulationError::ParameterValidation(format!(
                "portfolio value must be finite, got {value}"
            )));
        }
        self.series.push(ValuationPoint { timestamp, value });
        Ok(())
    }

    pub fn reset(&mut self) {
        self.series.clear();
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn values(&self) -> &[ValuationPoint] {
        &self.series
    }

    /// Per-step simple returns: `(v[i] - v[i-1]) / v[i-1]`.
    pub fn returns(&self) -> Vec<f64> {
        if self.series.len() < 2 {
            return Vec::new();
        }
        self.series
            .windows(2)
            .map(|w| {
                if w[0].value != 0.0 {
                    (w[1].value - w[0].value) / w[0].value
                } else {
                    0.0
                }
            })
            .collect()
    }

    /// `(last - first) / first`. Unavailable with fewer than 2 values.
    pub fn calculate_total_return(&self) -> Option<f64> {
        if self.series.len() < 2 {
            return None;
        }
        let first = self.series[0].value;
        let last = self.series[self.series.len() - 1].value;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first)
    }

    /// Annualized Sharpe ratio over the per-step return series.
    ///
    /// Excess returns are net of the per-period risk-free rate
    /// (`risk_free_rate / periods_per_year`); annualization multiplies by
    /// `sqrt(periods_per_year)`. Unavailable with fewer than 2 returns or a
    /// zero-variance series (division by zero is "unavailable", not
    /// infinity).
    pub fn calculate_sharpe_ratio(
        &self,
        risk_free_rate: f64,
        periods_per_year: f64,
    ) -> Option<f64> {
        let returns = self.returns();
        if returns.len() < 2 {
            return None;
        }
        let per_period_rf = risk_free_rate / periods_per_year;
        let excess: Vec<f64> = returns.iter().map(|r| r - per_period_rf).collect();
        let mean = mean(&excess);
        let std = sample_std_dev(&excess);
        if std < 1e-15 {
            return None;
        }
        Some((mean / std) * periods_per_year.sqrt())
    }

    /// Single scan with a running peak. Unavailable with fewer than 2 values.
    pub fn calculate_max_drawdown(&self) -> Option<DrawdownStats> {
        if self.series.len() < 2 {
            return None;
        }
        let mut peak = self.series[0].value;
        let mut peak_index = 0usize;
        let mut best: Option<DrawdownStats> = None;

        for (i, point) in self.series.iter().enumerate() {
            // Strict comparison keeps the earliest peak among equal highs.
            if point.value > peak {
                peak = point.value;
                peak_index = i;
            }
            if peak > 0.0 {
                let dd = (peak - point.value) / peak;
                // Strict comparison keeps the earliest maximal interval.
                if best.map_or(true, |b| dd > b.max_drawdown) {
                    best = Some(DrawdownStats {
                        max_drawdown: dd,
                        peak,
                        trough: point.value,
                        duration: i - peak_index,
                    });
                }
            }
        }
        best
    }

    /// Compute the full metrics bundle for the run result.
    pub fn report(&self, risk_free_rate: f64, periods_per_year: f64) -> PerformanceReport {
        PerformanceReport {
            total_return: self.calculate_total_return(),
            sharpe_ratio: self.calculate_sharpe_ratio(risk_free_rate, periods_per_year),
            max_drawdown: self.calculate_max_drawdown(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
