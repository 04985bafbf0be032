// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_0      = value_0
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// Seeding with the first value means there is no warm-up window: the series
// is defined from index 0, though it only settles after several periods.
// =============================================================================

use crate::error::Result;
use crate::indicators::ensure_period;
use crate::market_data::PriceSeries;

/// Compute the EMA of the series prices for the given look-back `period`.
///
/// The output has exactly one value per observation.
///
/// # Errors
/// - `InvalidParameters` when `period == 0`.
pub fn compute_ema(series: &PriceSeries, period: usize) -> Result<Vec<f64>> {
    ensure_period("ema_period", period)?;
    Ok(calculate_ema(&series.prices(), period))
}

/// EMA over an arbitrary slice, seeded by its first element.
///
/// Returns an empty `Vec` for empty input. Assumes `period >= 1`.
pub(crate) fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return result;
    };

    let mut prev_ema = first;
    result.push(prev_ema);
    for &value in iter {
        prev_ema = value * multiplier + prev_ema * (1.0 - multiplier);
        result.push(prev_ema);
    }

    result
}
