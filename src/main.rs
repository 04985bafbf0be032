// =============================================================================
// Momentum Engine — Command-line Runner
// =============================================================================
//
// Loads configuration, reads the selected symbol's price file, computes the
// indicator report and prints it as JSON on stdout. Logs go to stderr so the
// output can be piped straight into a dashboard.
//
// The default config selects SPY, for which no price file ships. To run
// against the bundled sample data:
//   cp momentum_config.example.json momentum_config.json   (selects DEMO)
// or set MOMENTUM_SYMBOL=DEMO.
// =============================================================================

use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use momentum_engine::market_data::JsonFileSource;
use momentum_engine::runtime_config::RuntimeConfig;
use momentum_engine::{IndicatorEngine, PriceSeries, PriceSource};

fn main() -> anyhow::Result<()> {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── 2. Config ────────────────────────────────────────────────────────
    let config_path = std::env::var("MOMENTUM_CONFIG")
        .unwrap_or_else(|_| "momentum_config.json".into());

    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(symbol) = std::env::var("MOMENTUM_SYMBOL") {
        config.custom_symbol = Some(symbol);
    }
    if let Ok(dir) = std::env::var("MOMENTUM_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }

    let symbol = config.resolve_symbol()?;
    info!(
        symbol = %symbol,
        price_field = %config.price_field,
        rsi_period = config.indicators.rsi_period,
        "Computing indicators"
    );

    // ── 3. Fetch & build the series ──────────────────────────────────────
    let source = JsonFileSource::new(&config.data_dir);
    let bars = source.fetch(&symbol)?;
    let series = PriceSeries::from_bars(&bars, config.price_field)
        .with_context(|| format!("price data for {symbol} is unusable"))?;

    // ── 4. Compute ───────────────────────────────────────────────────────
    let engine = IndicatorEngine::new(config.indicators)
        .context("invalid indicator parameters")?;
    let report = engine.compute(&series)?.with_symbol(&symbol);

    match &report.regime {
        Some(c) => info!(
            symbol = %symbol,
            rsi = format!("{:.2}", c.latest_rsi),
            regime = %c.regime,
            "Latest RSI classified"
        ),
        None => warn!(symbol = %symbol, "Not enough history to classify RSI"),
    }
    for note in &report.warnings {
        warn!(symbol = %symbol, "{note}");
    }

    // ── 5. Output ────────────────────────────────────────────────────────
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
