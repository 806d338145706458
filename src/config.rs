//! Backtest configuration record.
//!
//! The engine itself trusts an already-validated configuration; `validate`
//! exists for the embedding application so the invariants the core relies
//! on (date ordering, capital bounds, symbol hygiene) are enforced in one
//! place before a run is assembled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest allowed backtest span, in days.
pub const MAX_SPAN_DAYS: i64 = 365 * 20;

/// Capital bounds: `[MIN_CAPITAL, MAX_CAPITAL]`.
pub const MIN_CAPITAL: f64 = 1.0;
pub const MAX_CAPITAL: f64 = 1e12;

/// Longest allowed symbol, in characters.
pub const MAX_SYMBOL_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("start_date {start} must be before end_date {end}")]
    DateOrder { start: NaiveDate, end: NaiveDate },

    #[error("date span of {days} days exceeds maximum of {MAX_SPAN_DAYS}")]
    SpanTooLong { days: i64 },

    #[error("initial_capital {0} outside [{MIN_CAPITAL}, {MAX_CAPITAL}]")]
    CapitalOutOfBounds(f64),

    #[error("symbols list must be non-empty")]
    NoSymbols,

    #[error("invalid symbol {0:?}: blank or longer than {MAX_SYMBOL_LEN} characters")]
    BadSymbol(String),

    #[error("commission_rate {0} must be a finite non-negative fraction")]
    BadCommissionRate(f64),

    #[error("config parse error: {0}")]
    Parse(String),
}

/// Parameters of one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub symbols: Vec<String>,
    /// Commission as a fraction of notional (0.001 = 10 bps).
    #[serde(default)]
    pub commission_rate: f64,
}

impl BacktestConfig {
    /// Parse from a TOML document, then validate.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()
    }

    /// Check every invariant the engine trusts, normalizing the symbol list
    /// (trim, uppercase, de-duplicate preserving first occurrence).
    pub fn validate(&self) -> Result<Self, ConfigError> {
        if self.start_date >= self.end_date {
            return Err(ConfigError::DateOrder {
                start: self.start_date,
                end: self.end_date,
            });
        }
        let days = (self.end_date - self.start_date).num_days();
        if days > MAX_SPAN_DAYS {
            return Err(ConfigError::SpanTooLong { days });
        }
        if !self.initial_capital.is_finite()
            || self.initial_capital < MIN_CAPITAL
            || self.initial_capital > MAX_CAPITAL
        {
            return Err(ConfigError::CapitalOutOfBounds(self.initial_capital));
        }
        if !self.commission_rate.is_finite() || self.commission_rate < 0.0 {
            return Err(ConfigError::BadCommissionRate(self.commission_rate));
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        let mut normalized: Vec<String> = Vec::with_capacity(self.symbols.len());
        for raw in &self.symbols {
            let symbol = raw.trim().to_uppercase();
            if symbol.is_empty() || symbol.chars().count() > MAX_SYMBOL_LEN {
                return Err(ConfigError::BadSymbol(raw.clone()));
            }
            if !normalized.contains(&symbol) {
                normalized.push(symbol);
            }
        }
        Ok(Self {
            symbols: normalized,
            ..self.clone()
        })
    }
}
