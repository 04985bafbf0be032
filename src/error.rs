// =============================================================================
// Indicator Errors
// =============================================================================
//
// Every failure the engine can report is a variant here. Nothing in the
// library panics on bad input; callers decide how to degrade per indicator.

use thiserror::Error as ThisError;

use crate::types::PriceField;

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("timestamps must be strictly ascending (violated at index {index})")]
    NotStrictlyAscending { index: usize },

    #[error("invalid price {price} at index {index}: must be finite and non-negative")]
    InvalidPrice { index: usize, price: f64 },

    #[error("bar at index {index} has no {field} value")]
    MissingField { index: usize, field: PriceField },

    #[error("insufficient data: need at least {required} observations, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("no RSI value available (series too short for the configured period)")]
    NoRsiAvailable,
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
