// =============================================================================
// RSI Regime Classifier
// =============================================================================
//
// Thresholds are strict on both sides: a reading of exactly 70.0 or 30.0 is
// NEUTRAL. Presentation layers draw their threshold lines from the constants
// below so the chart and the badge can never disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IndicatorError, Result};

/// RSI strictly above this is overbought.
pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;

/// RSI strictly below this is oversold.
pub const OVERSOLD_THRESHOLD: f64 = 30.0;

// =============================================================================
// Types
// =============================================================================

/// Discrete momentum regime derived from RSI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Momentum stretched to the upside; potential for a correction.
    Overbought,
    /// Momentum stretched to the downside; potential buying opportunity.
    Oversold,
    Neutral,
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

impl Regime {
    /// Classify a single RSI reading.
    ///
    /// A NaN reading compares false against both thresholds and therefore
    /// lands in `Neutral`; RSI lines never contain NaN.
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi > OVERBOUGHT_THRESHOLD {
            Self::Overbought
        } else if rsi < OVERSOLD_THRESHOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

/// The regime plus the reading it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeClassification {
    pub regime: Regime,

    /// The RSI value the regime was derived from.
    pub latest_rsi: f64,

    /// Position of `latest_rsi` in the RSI line.
    pub index: usize,

    /// Timestamp of the observation at `index`.
    pub timestamp: DateTime<Utc>,
}

/// Classify the most recent defined value of an RSI line.
///
/// `timestamps` must be aligned with `rsi` (same length, same order).
///
/// # Errors
/// - `NoRsiAvailable` when `rsi` has no defined value.
pub fn classify_regime(
    rsi: &[Option<f64>],
    timestamps: &[DateTime<Utc>],
) -> Result<RegimeClassification> {
    let (index, latest_rsi) = rsi
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, v)| v.map(|value| (i, value)))
        .ok_or(IndicatorError::NoRsiAvailable)?;

    let timestamp = *timestamps
        .get(index)
        .ok_or(IndicatorError::NoRsiAvailable)?;

    let regime = Regime::from_rsi(latest_rsi);
    debug!(
        regime = %regime,
        rsi = format!("{:.2}", latest_rsi),
        index,
        "Regime classified"
    );

    Ok(RegimeClassification {
        regime,
        latest_rsi,
        index,
        timestamp,
    })
}
