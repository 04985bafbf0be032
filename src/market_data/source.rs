use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::PriceField;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One daily row as delivered by a market-data provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    /// Split/dividend-adjusted close. Not every provider or instrument has it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adj_close: Option<f64>,
}

impl PriceBar {
    /// The value of the requested column, if the provider supplied it.
    pub fn price(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Close => Some(self.close),
            PriceField::AdjClose => self.adj_close,
        }
    }
}

// ---------------------------------------------------------------------------
// PriceSource -- the fetch collaborator seam
// ---------------------------------------------------------------------------

/// Anything that can produce historical bars for a symbol.
///
/// Implementations report fetch failures (unknown symbol, empty result) as
/// errors so the engine is never invoked on nothing.
pub trait PriceSource {
    fn fetch(&self, symbol: &str) -> Result<Vec<PriceBar>>;
}

/// Reads `<data_dir>/<SYMBOL>.json`, a JSON array of [`PriceBar`]s.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    data_dir: PathBuf,
}

impl JsonFileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{symbol}.json"))
    }

    /// Symbols with a `<SYMBOL>.json` file in the data directory, sorted.
    /// An unreadable directory yields an empty list.
    pub fn available_symbols(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.data_dir) else {
            return Vec::new();
        };
        let mut symbols: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_owned))
            .collect();
        symbols.sort();
        symbols
    }
}

impl PriceSource for JsonFileSource {
    fn fetch(&self, symbol: &str) -> Result<Vec<PriceBar>> {
        let path = self.path_for(symbol);

        if !path.exists() {
            let available = self.available_symbols();
            if available.is_empty() {
                bail!(
                    "no price file for {} at {} (data directory has no *.json files)",
                    symbol,
                    path.display()
                );
            }
            bail!(
                "no price file for {} at {}; available symbols: {} \
                 (e.g. MOMENTUM_SYMBOL={}, or copy momentum_config.example.json to momentum_config.json)",
                symbol,
                path.display(),
                available.join(", "),
                available[0]
            );
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read price data from {}", path.display()))?;

        let bars: Vec<PriceBar> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse price data from {}", path.display()))?;

        if bars.is_empty() {
            bail!("no price data for {} in {}", symbol, path.display());
        }

        info!(symbol, bars = bars.len(), path = %path.display(), "price bars loaded");
        Ok(bars)
    }
}
