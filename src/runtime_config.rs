// =============================================================================
// Runtime Configuration — indicator parameters, price field, instrument choice
// =============================================================================
//
// Every tunable lives here. All fields carry `#[serde(default)]` so an empty
// or partial JSON file loads cleanly. Persistence uses an atomic tmp + rename
// pattern to prevent corruption on crash.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::IndicatorParams;
use crate::types::PriceField;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_instruments() -> Vec<Instrument> {
    [
        ("S&P 500 ETF (SPY)", "SPY"),
        ("Dow Jones Industrial Average (DJIA)", "^DJI"),
        ("Nasdaq Composite Index (Nasdaq)", "^IXIC"),
        ("New York Stock Exchange Composite Index (NYSE)", "^NYA"),
        ("10-Year Treasury (^TNX)", "^TNX"),
        ("2-Year Treasury (^IRX)", "^IRX"),
        ("30-Year Treasury (^TYX)", "^TYX"),
        ("Gold ETF (GLD)", "GLD"),
        ("Crude Oil ETF (USO)", "USO"),
    ]
    .into_iter()
    .map(|(name, symbol)| Instrument::new(name, symbol))
    .collect()
}

fn default_selected_instrument() -> String {
    "S&P 500 ETF (SPY)".to_string()
}

// =============================================================================
// Instrument
// =============================================================================

/// A named entry in the predefined instrument catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub symbol: String,
}

impl Instrument {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for one indicator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// RSI / SMA / MACD periods and RSI smoothing method.
    #[serde(default)]
    pub indicators: IndicatorParams,

    /// Which provider column is authoritative. Adjusted close by default.
    #[serde(default)]
    pub price_field: PriceField,

    /// Directory holding `<SYMBOL>.json` price files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Predefined instrument catalog.
    #[serde(default = "default_instruments")]
    pub instruments: Vec<Instrument>,

    /// Name of the catalog entry to analyse when no custom symbol is set.
    #[serde(default = "default_selected_instrument")]
    pub selected_instrument: String,

    /// Free-form symbol that overrides the catalog selection when non-blank.
    #[serde(default)]
    pub custom_symbol: Option<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorParams::default(),
            price_field: PriceField::default(),
            data_dir: default_data_dir(),
            instruments: default_instruments(),
            selected_instrument: default_selected_instrument(),
            custom_symbol: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning. Atypical-but-valid indicator settings
    /// are logged, not rejected.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        for note in config.indicators.typical_range_warnings() {
            warn!(path = %path.display(), "{note}");
        }

        info!(
            path = %path.display(),
            rsi_period = config.indicators.rsi_period,
            sma_period = config.indicators.sma_period,
            price_field = %config.price_field,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// The symbol to analyse.
    ///
    /// A non-blank `custom_symbol` wins. Otherwise the catalog entry named
    /// `selected_instrument`, falling back to the first catalog entry.
    pub fn resolve_symbol(&self) -> Result<String> {
        if let Some(custom) = self
            .custom_symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            return Ok(custom.to_string());
        }

        if let Some(instrument) = self
            .instruments
            .iter()
            .find(|i| i.name == self.selected_instrument)
        {
            return Ok(instrument.symbol.clone());
        }

        let first = self
            .instruments
            .first()
            .ok_or_else(|| anyhow!("no custom symbol set and the instrument catalog is empty"))?;

        warn!(
            selected = %self.selected_instrument,
            fallback = %first.symbol,
            "selected instrument not in catalog, using first entry"
        );
        Ok(first.symbol.clone())
    }
}
