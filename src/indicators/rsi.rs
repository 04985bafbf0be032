// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes: delta[i] = price[i] - price[i-1], i >= 1.
// Step 2 — Split into gain = max(delta, 0) and loss = max(-delta, 0).
// Step 3 — Seed average gain / average loss at index `period` with the SMA of
//          the first `period` gains / losses.
// Step 4 — Apply Wilder's exponential smoothing for i > period:
//            avg_gain = (prev_avg_gain * (period - 1) + gain[i]) / period
//            avg_loss = (prev_avg_loss * (period - 1) + loss[i]) / period
// Step 5 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// `RsiSmoothing::Simple` replaces steps 3–4 with a plain rolling mean of the
// last `period` gains / losses. It is kept as an explicit fallback mode; the
// two methods give materially different values on the same input.
// =============================================================================

use tracing::trace;

use crate::error::{IndicatorError, Result};
use crate::indicators::{ensure_period, IndicatorLine};
use crate::market_data::PriceSeries;
use crate::types::RsiSmoothing;

/// Compute the RSI line with Wilder's smoothing.
///
/// See [`compute_rsi_with`].
pub fn compute_rsi(series: &PriceSeries, period: usize) -> Result<IndicatorLine> {
    compute_rsi_with(series, period, RsiSmoothing::Wilder)
}

/// Compute the RSI line for `series` using the given smoothing method.
///
/// The result has one cell per observation. Cells before index `period` are
/// `None`; a series of `period` or fewer observations yields an all-`None`
/// line rather than an error.
///
/// # Errors
/// - `InvalidParameters` when `period == 0`.
/// - `InsufficientData` when the series has fewer than 2 observations (there
///   is not a single price change to measure).
pub fn compute_rsi_with(
    series: &PriceSeries,
    period: usize,
    smoothing: RsiSmoothing,
) -> Result<IndicatorLine> {
    ensure_period("rsi_period", period)?;
    if series.len() < 2 {
        return Err(IndicatorError::InsufficientData {
            required: 2,
            available: series.len(),
        });
    }

    let line = calculate_rsi(&series.prices(), period, smoothing);
    trace!(
        period,
        smoothing = %smoothing,
        defined = line.iter().filter(|v| v.is_some()).count(),
        "RSI computed"
    );
    Ok(line)
}

/// Core RSI over raw prices. Assumes `period >= 1`.
fn calculate_rsi(prices: &[f64], period: usize, smoothing: RsiSmoothing) -> IndicatorLine {
    let mut line = vec![None; prices.len()];
    if prices.len() <= period {
        return line;
    }

    // gains[j] / losses[j] belong to price index j + 1.
    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            (delta.max(0.0), (-delta).max(0.0))
        })
        .unzip();

    let period_f = period as f64;

    match smoothing {
        RsiSmoothing::Wilder => {
            // --- Seed with SMA of the first `period` gains / losses --------
            let mut avg_gain = mean(&gains[..period], period_f);
            let mut avg_loss = mean(&losses[..period], period_f);
            line[period] = rsi_from_averages(avg_gain, avg_loss);

            // --- Wilder's smoothing for subsequent values -----------------
            let rest = gains[period..].iter().zip(&losses[period..]);
            for (offset, (&gain, &loss)) in rest.enumerate() {
                // Same as (avg * (period - 1) + value) / period, without
                // the intermediate product that overflows for huge prices.
                avg_gain += (gain - avg_gain) / period_f;
                avg_loss += (loss - avg_loss) / period_f;
                line[period + 1 + offset] = rsi_from_averages(avg_gain, avg_loss);
            }
        }
        RsiSmoothing::Simple => {
            for (j, (gain_window, loss_window)) in gains
                .windows(period)
                .zip(losses.windows(period))
                .enumerate()
            {
                let avg_gain = mean(gain_window, period_f);
                let avg_loss = mean(loss_window, period_f);
                line[period + j] = rsi_from_averages(avg_gain, avg_loss);
            }
        }
    }

    line
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Mean of `values`, each term scaled by `1 / period` before summing so the
/// sum stays finite for any finite inputs.
fn mean(values: &[f64], period_f: f64) -> f64 {
    values.iter().map(|v| v / period_f).sum()
}

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// - If both averages are zero, RSI is 50.0 (no movement).
/// - If average loss is zero (only gains), RSI is 100.0.
/// - Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // No movement at all — neutral.
    } else if avg_loss == 0.0 {
        100.0 // All gains, no losses.
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi)
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::PricePoint;
    use crate::types::PriceField;
    use chrono::{Duration, TimeZone, Utc};

    fn series(prices: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(start + Duration::days(i as i64), p))
            .collect();
        PriceSeries::new(points, PriceField::Close).unwrap()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        assert_close_tol(actual, expected, 1e-10);
    }

    fn assert_close_tol(actual: Option<f64>, expected: f64, tol: f64) {
        let v = actual.expect("expected a defined RSI value");
        assert!((v - expected).abs() < tol, "got {v}, expected {expected}");
    }

    // ---- argument checks -------------------------------------------------

    #[test]
    fn rsi_period_zero() {
        let err = compute_rsi(&series(&[1.0, 2.0, 3.0]), 0).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameters(_)));
    }

    #[test]
    fn rsi_single_observation() {
        assert_eq!(
            compute_rsi(&series(&[42.0]), 14),
            Err(IndicatorError::InsufficientData {
                required: 2,
                available: 1
            })
        );
    }

    // ---- undefined warm-up region ------------------------------------------

    #[test]
    fn rsi_short_flat_series_is_all_undefined() {
        // 5 identical points, period 14: no value, not NaN, not a premature 50.
        let line = compute_rsi(&series(&[100.0; 5]), 14).unwrap();
        assert_eq!(line.len(), 5);
        assert!(line.iter().all(|v| v.is_none()));
    }

    #[test]
    fn rsi_exactly_period_observations_is_all_undefined() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        let line = compute_rsi(&series(&closes), 14).unwrap();
        assert!(line.iter().all(|v| v.is_none()));
    }

    #[test]
    fn rsi_defined_from_seed_index() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let line = compute_rsi(&series(&closes), 14).unwrap();
        assert!(line[..14].iter().all(|v| v.is_none()));
        assert!(line[14..].iter().all(|v| v.is_some()));
    }

    // ---- edge-case values ---------------------------------------------------

    #[test]
    fn rsi_all_gains() {
        // Strictly ascending, period 3: avg_loss stays 0 => RSI 100 everywhere.
        let line = compute_rsi(&series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]), 3).unwrap();
        assert_eq!(line.len(), 7);
        assert!(line[..3].iter().all(|v| v.is_none()));
        for &v in &line[3..] {
            assert_close(v, 100.0);
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let line = compute_rsi(&series(&closes), 14).unwrap();
        for &v in &line[14..] {
            assert_close(v, 0.0);
        }
    }

    #[test]
    fn rsi_flat_market() {
        let line = compute_rsi(&series(&[100.0; 30]), 14).unwrap();
        for &v in &line[14..] {
            assert_eq!(v, Some(50.0));
        }
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        for smoothing in [RsiSmoothing::Wilder, RsiSmoothing::Simple] {
            for period in 1..=16 {
                let line = compute_rsi_with(&series(&closes), period, smoothing).unwrap();
                for v in line.into_iter().flatten() {
                    assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
                }
            }
        }
    }

    // ---- smoothing methods -------------------------------------------------

    #[test]
    fn rsi_wilder_known_values() {
        // gains  = [2, 0, 2, 0], losses = [0, 1, 0, 1], period 2
        // i=2: ag=1.0,  al=0.5   => RS=2   => 66.666..
        // i=3: ag=1.5,  al=0.25  => RS=6   => 85.714..
        // i=4: ag=0.75, al=0.625 => RS=1.2 => 54.545..
        let line = compute_rsi(&series(&[10.0, 12.0, 11.0, 13.0, 12.0]), 2).unwrap();
        assert_eq!(line[0], None);
        assert_eq!(line[1], None);
        assert_close(line[2], 100.0 - 100.0 / 3.0);
        assert_close(line[3], 100.0 - 100.0 / 7.0);
        assert_close(line[4], 100.0 - 100.0 / 2.2);
    }

    #[test]
    fn rsi_simple_known_values() {
        // Every 2-wide window holds one +2 and one -1 => RS=2 throughout.
        let line = compute_rsi_with(
            &series(&[10.0, 12.0, 11.0, 13.0, 12.0]),
            2,
            RsiSmoothing::Simple,
        )
        .unwrap();
        assert_eq!(line[1], None);
        for &v in &line[2..] {
            assert_close(v, 100.0 - 100.0 / 3.0);
        }
    }

    #[test]
    fn rsi_methods_diverge() {
        let prices = [10.0, 12.0, 11.0, 13.0, 12.0];
        let wilder = compute_rsi(&series(&prices), 2).unwrap();
        let simple = compute_rsi_with(&series(&prices), 2, RsiSmoothing::Simple).unwrap();
        assert_eq!(wilder[2], simple[2]);
        assert_ne!(wilder[3], simple[3]);
    }

    #[test]
    fn rsi_large_prices_stay_defined() {
        // Gains of 0.6 * f64::MAX: a plain seed sum would overflow to inf.
        let big = f64::MAX * 0.6;
        let prices = [0.0, big, 0.0, big];
        for smoothing in [RsiSmoothing::Wilder, RsiSmoothing::Simple] {
            let line = compute_rsi_with(&series(&prices), 3, smoothing).unwrap();
            assert_close_tol(line[3], 100.0 - 100.0 / 3.0, 1e-9);
        }

        // Alternating full-range swings: the Wilder recurrence must not
        // overflow either.
        let prices = [0.0, f64::MAX, 0.0, f64::MAX, 0.0, f64::MAX];
        let line = compute_rsi(&series(&prices), 2).unwrap();
        assert!(line[..2].iter().all(|v| v.is_none()));
        for v in &line[2..] {
            let v = v.expect("smoothed region must be defined");
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_from_averages_edges() {
        assert_eq!(rsi_from_averages(0.0, 0.0), Some(50.0));
        assert_eq!(rsi_from_averages(1.5, 0.0), Some(100.0));
        assert_eq!(rsi_from_averages(0.0, 1.5), Some(0.0));
        assert_eq!(rsi_from_averages(f64::NAN, 1.0), None);
    }
}
