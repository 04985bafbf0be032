// =============================================================================
// Market Data Boundary
// =============================================================================
//
// Everything between the price provider and the indicator engine: raw bars as
// the provider returns them, the validated `PriceSeries` the engine consumes,
// and the `PriceSource` seam the fetch collaborator implements.

pub mod series;
pub mod source;

// Re-export for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use series::{PricePoint, PriceSeries};
pub use source::{JsonFileSource, PriceBar, PriceSource};
