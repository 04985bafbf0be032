use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndicatorError, Result};
use crate::market_data::source::PriceBar;
use crate::types::PriceField;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single observation: the authoritative price at `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- validated, time-ordered input to every indicator
// ---------------------------------------------------------------------------

/// Non-empty sequence of price observations with strictly ascending
/// timestamps and finite, non-negative prices.
///
/// The invariants are checked once at construction, so holding a
/// `PriceSeries` is proof the data is fit for computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
    field: PriceField,
}

impl PriceSeries {
    /// Validate `points` (in the order given) and wrap them.
    ///
    /// Fails with
    /// * `EmptySeries` when `points` is empty,
    /// * `InvalidPrice` for a NaN, infinite or negative price,
    /// * `NotStrictlyAscending` when a timestamp does not exceed its
    ///   predecessor (this includes duplicates).
    pub fn new(points: Vec<PricePoint>, field: PriceField) -> Result<Self> {
        if points.is_empty() {
            return Err(IndicatorError::EmptySeries);
        }

        if let Some((index, point)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !p.price.is_finite() || p.price < 0.0)
        {
            return Err(IndicatorError::InvalidPrice {
                index,
                price: point.price,
            });
        }

        if let Some(pos) = points
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(IndicatorError::NotStrictlyAscending { index: pos + 1 });
        }

        Ok(Self { points, field })
    }

    /// Build a series from provider bars, selecting `field` as the price.
    ///
    /// Bars are sorted by timestamp first; duplicates survive the sort and are
    /// then rejected by [`PriceSeries::new`]. Every error index refers to the
    /// offending bar's position in `bars`, not in the sorted series.
    pub fn from_bars(bars: &[PriceBar], field: PriceField) -> Result<Self> {
        let mut ordered: Vec<(usize, &PriceBar)> = bars.iter().enumerate().collect();
        ordered.sort_by_key(|(_, bar)| bar.timestamp);

        let origin: Vec<usize> = ordered.iter().map(|(index, _)| *index).collect();
        let points = ordered
            .into_iter()
            .map(|(index, bar)| {
                bar.price(field)
                    .map(|price| PricePoint::new(bar.timestamp, price))
                    .ok_or(IndicatorError::MissingField { index, field })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(bars = bars.len(), field = %field, "price series built from bars");
        Self::new(points, field).map_err(|e| match e {
            IndicatorError::InvalidPrice { index, price } => IndicatorError::InvalidPrice {
                index: origin[index],
                price,
            },
            IndicatorError::NotStrictlyAscending { index } => {
                IndicatorError::NotStrictlyAscending {
                    index: origin[index],
                }
            }
            other => other,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn field(&self) -> PriceField {
        self.field
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Prices in time order.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Timestamps in time order.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Most recent observation. A `PriceSeries` is never empty.
    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(n: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(n)
    }

    fn points(prices: &[f64]) -> Vec<PricePoint> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| PricePoint::new(day(i as i64), p))
            .collect()
    }

    fn bar(n: i64, close: f64, adj_close: Option<f64>) -> PriceBar {
        PriceBar {
            timestamp: day(n),
            close,
            adj_close,
        }
    }

    // ---- PriceSeries::new ------------------------------------------------

    #[test]
    fn empty_series_rejected() {
        assert_eq!(
            PriceSeries::new(Vec::new(), PriceField::Close),
            Err(IndicatorError::EmptySeries)
        );
    }

    #[test]
    fn valid_series_accepted() {
        let series = PriceSeries::new(points(&[1.0, 2.0, 3.0]), PriceField::Close).unwrap();
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
        assert_eq!(series.prices(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last().price, 3.0);
        assert_eq!(series.field(), PriceField::Close);
    }

    #[test]
    fn reversed_series_rejected() {
        let mut pts = points(&[1.0, 2.0, 3.0, 4.0]);
        pts.reverse();
        assert_eq!(
            PriceSeries::new(pts, PriceField::Close),
            Err(IndicatorError::NotStrictlyAscending { index: 1 })
        );
    }

    #[test]
    fn duplicate_timestamp_rejected() {
        let pts = vec![
            PricePoint::new(day(0), 1.0),
            PricePoint::new(day(1), 2.0),
            PricePoint::new(day(1), 2.5),
        ];
        assert_eq!(
            PriceSeries::new(pts, PriceField::Close),
            Err(IndicatorError::NotStrictlyAscending { index: 2 })
        );
    }

    #[test]
    fn negative_and_nan_prices_rejected() {
        let err = PriceSeries::new(points(&[1.0, -2.0]), PriceField::Close).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidPrice { index: 1, .. }));

        let err = PriceSeries::new(points(&[f64::NAN]), PriceField::Close).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidPrice { index: 0, .. }));
    }

    #[test]
    fn zero_price_allowed() {
        assert!(PriceSeries::new(points(&[0.0, 1.0]), PriceField::Close).is_ok());
    }

    // ---- PriceSeries::from_bars -------------------------------------------

    #[test]
    fn from_bars_selects_field() {
        let bars = vec![bar(0, 10.0, Some(9.5)), bar(1, 11.0, Some(10.4))];
        let adj = PriceSeries::from_bars(&bars, PriceField::AdjClose).unwrap();
        let raw = PriceSeries::from_bars(&bars, PriceField::Close).unwrap();
        assert_eq!(adj.prices(), vec![9.5, 10.4]);
        assert_eq!(raw.prices(), vec![10.0, 11.0]);
        assert_eq!(adj.field(), PriceField::AdjClose);
    }

    #[test]
    fn from_bars_sorts_by_timestamp() {
        let bars = vec![bar(2, 3.0, None), bar(0, 1.0, None), bar(1, 2.0, None)];
        let series = PriceSeries::from_bars(&bars, PriceField::Close).unwrap();
        assert_eq!(series.prices(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn from_bars_missing_adj_close() {
        let bars = vec![bar(0, 10.0, Some(9.5)), bar(1, 11.0, None)];
        assert_eq!(
            PriceSeries::from_bars(&bars, PriceField::AdjClose),
            Err(IndicatorError::MissingField {
                index: 1,
                field: PriceField::AdjClose
            })
        );
    }

    #[test]
    fn from_bars_invalid_price_reports_caller_index() {
        // The negative close sits first in the input but last after sorting.
        let bars = vec![bar(2, -1.0, None), bar(0, 1.0, None), bar(1, 2.0, None)];
        assert_eq!(
            PriceSeries::from_bars(&bars, PriceField::Close),
            Err(IndicatorError::InvalidPrice {
                index: 0,
                price: -1.0
            })
        );
    }

    #[test]
    fn from_bars_duplicates_adjacent_only_after_sort() {
        // Day 1 appears at input positions 0 and 2; sorting puts them side by
        // side and the second one is rejected.
        let bars = vec![bar(1, 2.0, None), bar(0, 1.0, None), bar(1, 2.5, None)];
        assert_eq!(
            PriceSeries::from_bars(&bars, PriceField::Close),
            Err(IndicatorError::NotStrictlyAscending { index: 2 })
        );
    }

    #[test]
    fn from_bars_empty() {
        assert_eq!(
            PriceSeries::from_bars(&[], PriceField::Close),
            Err(IndicatorError::EmptySeries)
        );
    }
}
