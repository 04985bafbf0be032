// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Unweighted mean of the trailing `period` prices:
//   SMA_i = (price_{i-period+1} + ... + price_i) / period,   i >= period - 1
//
// Earlier indices have no full window and stay undefined. Partial-window
// averages are never produced.

use crate::error::Result;
use crate::indicators::{ensure_period, IndicatorLine};
use crate::market_data::PriceSeries;

/// Compute the SMA line for `series`.
///
/// One cell per observation; the first `period - 1` cells are `None`. A
/// series shorter than `period` yields an all-`None` line.
///
/// # Errors
/// - `InvalidParameters` when `period == 0`.
pub fn compute_sma(series: &PriceSeries, period: usize) -> Result<IndicatorLine> {
    ensure_period("sma_period", period)?;
    Ok(calculate_sma(&series.prices(), period))
}

fn calculate_sma(prices: &[f64], period: usize) -> IndicatorLine {
    let mut line = vec![None; prices.len()];
    if prices.len() < period {
        return line;
    }

    let period_f = period as f64;
    for (j, window) in prices.windows(period).enumerate() {
        // Scale before summing so a window of large prices cannot overflow.
        let mean = window.iter().map(|p| p / period_f).sum::<f64>();
        if mean.is_finite() {
            line[period - 1 + j] = Some(mean);
        }
    }
    line
}
