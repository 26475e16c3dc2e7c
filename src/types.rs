// =============================================================================
// Shared types used across the stocks exporter
// =============================================================================

/// A single daily bar from the history provider.
///
/// Only the close and the session volume are retained; the indicator pipeline
/// has no use for open/high/low. Missing sessions are simply absent from the
/// window, never interpolated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyBar {
    pub close: f64,
    pub volume: f64,
}

/// The full set of gauges computed for one symbol in one sampling cycle.
///
/// Every field is a plain f64. `f64::NAN` is the "undefined" sentinel for
/// values that cannot be computed from the available data (for example the
/// Bollinger %B of a zero-variance window); it is never coerced to 0, which
/// would read as a real measurement.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSet {
    pub price: f64,
    pub rsi14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bbp_20d: f64,
    pub return_1d_pct: f64,
    pub return_5d_pct: f64,
    pub return_20d_pct: f64,
    pub realized_vol_20d_pct: f64,
    pub volume: f64,
    pub volume_avg_20d: f64,
    pub volume_ratio: f64,
}

impl IndicatorSet {
    /// A record carrying only a price. Used when a symbol's live fetch fails
    /// and the last known price is republished without any indicator data.
    pub fn price_only(price: f64) -> Self {
        Self {
            price,
            rsi14: f64::NAN,
            macd: f64::NAN,
            macd_signal: f64::NAN,
            macd_hist: f64::NAN,
            bbp_20d: f64::NAN,
            return_1d_pct: f64::NAN,
            return_5d_pct: f64::NAN,
            return_20d_pct: f64::NAN,
            realized_vol_20d_pct: f64::NAN,
            volume: f64::NAN,
            volume_avg_20d: f64::NAN,
            volume_ratio: f64::NAN,
        }
    }
}

/// Outcome of one sampling cycle for one symbol.
///
/// `success == false` means the indicator set is synthetic, or a stale
/// carry-over where only the price is current.
#[derive(Debug, Clone)]
pub struct SampleResult {
    pub symbol: String,
    pub indicators: IndicatorSet,
    pub success: bool,
}
