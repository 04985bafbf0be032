// =============================================================================
// Indicator Engine — one call, one series, one report
// =============================================================================
//
// Pipeline:
//   1. Parameters are validated once, at construction (InvalidParameters)
//   2. RSI  (InsufficientData recovered as an all-undefined line + warning)
//   3. SMA
//   4. MACD / Signal / Histogram
//   5. Classify the latest defined RSI (NoRsiAvailable => no regime + warning)
//
// The engine holds only its parameters. Every call is independent, so one
// engine may be shared freely across threads.
// =============================================================================

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{IndicatorError, Result};
use crate::indicators::{
    compute_macd, compute_rsi_with, compute_sma, ensure_period, IndicatorLine, MacdParams,
};
use crate::market_data::PriceSeries;
use crate::regime::{classify_regime, RegimeClassification};
use crate::types::{PriceField, RsiSmoothing};

/// RSI periods outside this range are accepted but unusual.
pub const TYPICAL_RSI_PERIODS: RangeInclusive<usize> = 7..=30;

fn default_rsi_period() -> usize {
    14
}

fn default_sma_period() -> usize {
    20
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Per-invocation indicator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default)]
    pub rsi_smoothing: RsiSmoothing,

    #[serde(default = "default_sma_period")]
    pub sma_period: usize,

    #[serde(default)]
    pub macd: MacdParams,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            rsi_smoothing: RsiSmoothing::default(),
            sma_period: default_sma_period(),
            macd: MacdParams::default(),
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<()> {
        ensure_period("rsi_period", self.rsi_period)?;
        ensure_period("sma_period", self.sma_period)?;
        self.macd.validate()
    }

    /// Human-readable notes for valid but atypical settings.
    pub fn typical_range_warnings(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if !TYPICAL_RSI_PERIODS.contains(&self.rsi_period) {
            notes.push(format!(
                "rsi_period {} is outside the typical range {}-{}",
                self.rsi_period,
                TYPICAL_RSI_PERIODS.start(),
                TYPICAL_RSI_PERIODS.end()
            ));
        }
        if self.rsi_smoothing == RsiSmoothing::Simple {
            notes.push("rsi_smoothing is Simple; values will differ from standard Wilder RSI".into());
        }
        notes
    }
}

// =============================================================================
// IndicatorReport
// =============================================================================

/// Everything derived from one price series. All lines are aligned with
/// `timestamps`; undefined cells serialise as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub field: PriceField,
    pub params: IndicatorParams,
    pub timestamps: Vec<DateTime<Utc>>,
    pub prices: Vec<f64>,
    pub rsi: IndicatorLine,
    pub sma: IndicatorLine,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
    /// `None` when no RSI value is defined yet.
    pub regime: Option<RegimeClassification>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// One aligned row of an [`IndicatorReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub rsi: Option<f64>,
    pub sma: Option<f64>,
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl IndicatorReport {
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Re-derive the regime, surfacing `NoRsiAvailable` instead of `None`.
    pub fn classify(&self) -> Result<RegimeClassification> {
        classify_regime(&self.rsi, &self.timestamps)
    }

    /// Iterate the report row by row.
    ///
    /// The fields are public, so a caller may have edited one line; iteration
    /// stops at the shortest line instead of indexing past it.
    pub fn rows(&self) -> impl Iterator<Item = IndicatorRow> + '_ {
        (0..self.len()).map_while(move |i| {
            Some(IndicatorRow {
                timestamp: *self.timestamps.get(i)?,
                price: *self.prices.get(i)?,
                rsi: *self.rsi.get(i)?,
                sma: *self.sma.get(i)?,
                macd: *self.macd.get(i)?,
                signal: *self.signal.get(i)?,
                histogram: *self.histogram.get(i)?,
            })
        })
    }
}

// =============================================================================
// IndicatorEngine
// =============================================================================

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    params: IndicatorParams,
}

impl IndicatorEngine {
    /// Build an engine, rejecting invalid parameters up front.
    pub fn new(params: IndicatorParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Compute every indicator for `series`.
    ///
    /// A too-short series degrades the affected indicator to an all-`None`
    /// line and records a warning; the other indicators are still returned.
    pub fn compute(&self, series: &PriceSeries) -> Result<IndicatorReport> {
        let p = &self.params;
        let n = series.len();
        let mut warnings = Vec::new();

        // ── 1. RSI ───────────────────────────────────────────────────────
        let rsi = match compute_rsi_with(series, p.rsi_period, p.rsi_smoothing) {
            Ok(line) => line,
            Err(IndicatorError::InsufficientData {
                required,
                available,
            }) => {
                let msg = format!(
                    "RSI unavailable: need at least {required} observations, got {available}"
                );
                warn!(required, available, "RSI degraded to undefined line");
                warnings.push(msg);
                vec![None; n]
            }
            Err(e) => return Err(e),
        };

        // ── 2. SMA ───────────────────────────────────────────────────────
        let sma = compute_sma(series, p.sma_period)?;
        if n < p.sma_period {
            warn!(period = p.sma_period, available = n, "SMA has no full window");
            warnings.push(format!(
                "SMA({}) unavailable: need {} observations, got {}",
                p.sma_period, p.sma_period, n
            ));
        }

        // ── 3. MACD ──────────────────────────────────────────────────────
        let macd = compute_macd(series, &p.macd)?;

        // ── 4. Regime ────────────────────────────────────────────────────
        let timestamps = series.timestamps();
        let regime = match classify_regime(&rsi, &timestamps) {
            Ok(classification) => Some(classification),
            Err(IndicatorError::NoRsiAvailable) => {
                debug!(
                    rsi_period = p.rsi_period,
                    available = n,
                    "no RSI value defined; regime unavailable"
                );
                warnings.push(format!(
                    "not enough history for RSI({}): {} observations",
                    p.rsi_period, n
                ));
                None
            }
            Err(e) => return Err(e),
        };

        info!(
            observations = n,
            field = %series.field(),
            rsi_defined = rsi.iter().filter(|v| v.is_some()).count(),
            regime = %regime
                .as_ref()
                .map(|c| c.regime.to_string())
                .unwrap_or_else(|| "n/a".into()),
            "indicators computed"
        );

        Ok(IndicatorReport {
            symbol: None,
            field: series.field(),
            params: *p,
            timestamps,
            prices: series.prices(),
            rsi,
            sma,
            macd: macd.macd,
            signal: macd.signal,
            histogram: macd.histogram,
            regime,
            warnings,
        })
    }
}
