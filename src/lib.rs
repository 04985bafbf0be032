// =============================================================================
// Momentum Engine — RSI, SMA and MACD over a single price series
// =============================================================================
//
// The engine is a pure library: hand it a validated `PriceSeries`, get back an
// `IndicatorReport` with every line aligned to the input and a regime
// classification of the latest RSI. Fetching prices and drawing charts belong
// to the callers.

pub mod engine;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod regime;
pub mod runtime_config;
pub mod types;

pub use engine::{IndicatorEngine, IndicatorParams, IndicatorReport, IndicatorRow};
pub use error::{IndicatorError, Result};
pub use market_data::{PriceBar, PricePoint, PriceSeries, PriceSource};
pub use regime::{Regime, RegimeClassification};
pub use types::{PriceField, RsiSmoothing};
