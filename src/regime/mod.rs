// =============================================================================
// Regime Classification Module
// =============================================================================
//
// Maps the latest RSI reading onto a discrete trading regime:
// - OVERBOUGHT (RSI strictly above 70)
// - OVERSOLD   (RSI strictly below 30)
// - NEUTRAL    (everything else, including exactly 70 and 30)

pub mod classifier;

pub use classifier::{
    classify_regime, Regime, RegimeClassification, OVERBOUGHT_THRESHOLD, OVERSOLD_THRESHOLD,
};
