// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of RSI, SMA, EMA and MACD over a
// validated `PriceSeries`. Every output is aligned one-to-one with the input
// by position. Warm-up cells are `None`, never zero-filled, so "not enough
// history yet" cannot be mistaken for a computed value.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::compute_ema;
pub use macd::{compute_macd, MacdParams, MacdSeries};
pub use rsi::{compute_rsi, compute_rsi_with};
pub use sma::compute_sma;

use crate::error::{IndicatorError, Result};

/// A per-index indicator output with explicit undefined cells.
pub type IndicatorLine = Vec<Option<f64>>;

/// Reject a zero look-back period. The engine never clamps parameters.
pub(crate) fn ensure_period(name: &str, period: usize) -> Result<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameters(format!(
            "{name} must be at least 1"
        )));
    }
    Ok(())
}
