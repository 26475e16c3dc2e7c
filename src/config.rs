// =============================================================================
// Exporter Configuration — environment-driven settings
// =============================================================================
//
// All knobs come from the environment (a `.env` file is honored at startup).
// Unset or unparseable values fall back to defaults, never abort startup.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

/// Runtime configuration for the exporter.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Path of the ticker list file (newline- or comma-separated).
    pub tickers_file: PathBuf,
    /// Inline comma-separated ticker list, used when the file is absent or
    /// empty.
    pub tickers_inline: String,
    /// Hard cap on the number of symbols sampled per cycle.
    pub max_tickers: usize,
    /// Pause between symbols within a cycle (rate limit on the provider).
    pub sleep_per_symbol: Duration,
    /// Pause between full cycles over the symbol list.
    pub refresh: Duration,
    /// Fall back to synthetic data when a live fetch fails.
    pub demo_mode: bool,
    /// Never attempt a live fetch; every sample is synthetic.
    pub demo_only: bool,
    /// Listen address for the metrics endpoint.
    pub bind_addr: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            tickers_file: PathBuf::from("/app/tickers.txt"),
            tickers_inline: String::new(),
            max_tickers: 120,
            sleep_per_symbol: Duration::from_secs_f64(0.15),
            refresh: Duration::from_secs(60),
            demo_mode: false,
            demo_only: false,
            bind_addr: "0.0.0.0:9400".to_string(),
        }
    }
}

impl ExporterConfig {
    /// Build the configuration from environment variables, falling back to
    /// defaults for anything unset or malformed.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            tickers_file: std::env::var("TICKERS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.tickers_file),
            tickers_inline: std::env::var("TICKERS").unwrap_or_default(),
            max_tickers: env_parse("MAX_TICKERS").unwrap_or(defaults.max_tickers),
            sleep_per_symbol: env_parse::<f64>("SLEEP_PER_SYMBOL")
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or(defaults.sleep_per_symbol),
            refresh: env_parse::<u64>("REFRESH_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh),
            demo_mode: env_bool("DEMO_MODE"),
            demo_only: env_bool("DEMO_ONLY"),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
        };

        info!(
            tickers_file = %config.tickers_file.display(),
            max_tickers = config.max_tickers,
            refresh_secs = config.refresh.as_secs(),
            demo_mode = config.demo_mode,
            demo_only = config.demo_only,
            "configuration loaded"
        );

        config
    }

    /// Load the symbol list: file first, inline env list as fallback;
    /// upper-cased, deduplicated order-preserving, truncated to
    /// `max_tickers`.
    ///
    /// Called once per cycle, so edits to the ticker file are picked up
    /// without a restart.
    pub fn load_tickers(&self) -> Vec<String> {
        let raw_file = std::fs::read_to_string(&self.tickers_file).unwrap_or_default();
        let mut items = parse_ticker_list(&raw_file);
        if items.is_empty() {
            items = parse_ticker_list(&self.tickers_inline);
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for ticker in items {
            if seen.insert(ticker.clone()) {
                out.push(ticker);
            }
        }
        out.truncate(self.max_tickers);
        out
    }
}

/// Split a newline- or comma-separated ticker list, trimming and
/// upper-casing each entry. Duplicates are preserved; the caller dedupes.
pub fn parse_ticker_list(raw: &str) -> Vec<String> {
    raw.replace(',', "\n")
        .lines()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn env_bool(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
