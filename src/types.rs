// =============================================================================
// Shared types used across the momentum engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// Which provider column a price series was built from.
///
/// Adjusted and raw closes diverge on instruments with dividends or splits,
/// so the choice is always explicit and travels with the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    AdjClose,
    Close,
}

impl Default for PriceField {
    fn default() -> Self {
        Self::AdjClose
    }
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdjClose => write!(f, "adj_close"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// Averaging method for RSI gains and losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSmoothing {
    /// Wilder's recurrence, seeded by the simple mean of the first `period`
    /// gains/losses.
    Wilder,
    /// Plain rolling mean of the last `period` gains/losses. Lower fidelity.
    Simple,
}

impl Default for RsiSmoothing {
    fn default() -> Self {
        Self::Wilder
    }
}

impl std::fmt::Display for RsiSmoothing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wilder => write!(f, "Wilder"),
            Self::Simple => write!(f, "Simple"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(PriceField::default(), PriceField::AdjClose);
        assert_eq!(RsiSmoothing::default(), RsiSmoothing::Wilder);
    }

    #[test]
    fn serde_names_are_snake_case() {
        assert_eq!(serde_json::to_string(&PriceField::AdjClose).unwrap(), "\"adj_close\"");
        let field: PriceField = serde_json::from_str("\"close\"").unwrap();
        assert_eq!(field, PriceField::Close);
        let smoothing: RsiSmoothing = serde_json::from_str("\"simple\"").unwrap();
        assert_eq!(smoothing, RsiSmoothing::Simple);
    }
}
