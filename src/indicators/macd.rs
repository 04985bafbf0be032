// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(short) - EMA(long)
//   Signal    = EMA(signal) of MACD
//   Histogram = MACD - Signal
//
// All EMAs are seeded by their first input, so every line is defined from
// index 0. Early values are unstable until a few long periods have passed;
// trimming them for display is the caller's decision.

use serde::{Deserialize, Serialize};

use crate::error::{IndicatorError, Result};
use crate::indicators::ema::calculate_ema;
use crate::indicators::ensure_period;
use crate::market_data::PriceSeries;

fn default_short_period() -> usize {
    12
}

fn default_long_period() -> usize {
    26
}

fn default_signal_period() -> usize {
    9
}

/// Look-back periods for the two price EMAs and the signal EMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdParams {
    #[serde(default = "default_short_period")]
    pub short_period: usize,

    /// Must be strictly greater than `short_period`.
    #[serde(default = "default_long_period")]
    pub long_period: usize,

    #[serde(default = "default_signal_period")]
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            short_period: default_short_period(),
            long_period: default_long_period(),
            signal_period: default_signal_period(),
        }
    }
}

impl MacdParams {
    pub fn new(short_period: usize, long_period: usize, signal_period: usize) -> Self {
        Self {
            short_period,
            long_period,
            signal_period,
        }
    }

    /// Reject zero periods and `short_period >= long_period`.
    pub fn validate(&self) -> Result<()> {
        ensure_period("macd_short_period", self.short_period)?;
        ensure_period("macd_long_period", self.long_period)?;
        ensure_period("macd_signal_period", self.signal_period)?;

        if self.short_period >= self.long_period {
            return Err(IndicatorError::InvalidParameters(format!(
                "macd_short_period ({}) must be less than macd_long_period ({})",
                self.short_period, self.long_period
            )));
        }
        Ok(())
    }
}

/// The three MACD lines, each aligned with the input series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// `(macd, signal, histogram)` at the most recent index.
    pub fn latest(&self) -> Option<(f64, f64, f64)> {
        Some((
            *self.macd.last()?,
            *self.signal.last()?,
            *self.histogram.last()?,
        ))
    }
}

/// Compute MACD, signal and histogram for `series`.
///
/// # Errors
/// - `InvalidParameters` for any zero period or `short_period >= long_period`.
///   Parameters are never clamped or swapped.
pub fn compute_macd(series: &PriceSeries, params: &MacdParams) -> Result<MacdSeries> {
    params.validate()?;

    let prices = series.prices();
    let short_ema = calculate_ema(&prices, params.short_period);
    let long_ema = calculate_ema(&prices, params.long_period);

    let macd: Vec<f64> = short_ema
        .iter()
        .zip(&long_ema)
        .map(|(s, l)| s - l)
        .collect();
    let signal = calculate_ema(&macd, params.signal_period);
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    Ok(MacdSeries {
        macd,
        signal,
        histogram,
    })
}
