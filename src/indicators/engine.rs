// =============================================================================
// Indicator Engine — Window => IndicatorSet
// =============================================================================
//
// Pure composition of the individual indicator functions. No I/O, no shared
// state. Any window-length shortfall fails the whole sample for the symbol
// with a typed error so the caller can take the fallback path; a partial
// indicator set never escapes as a success.

use crate::error::IndicatorError;
use crate::types::{DailyBar, IndicatorSet};

use super::{bollinger, macd, returns, rsi, volatility, volume};

pub const RSI_PERIOD: usize = 14;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_NUM_STD: f64 = 2.0;
pub const VOL_PERIOD: usize = 20;
pub const VOLUME_PERIOD: usize = 20;
/// Minimum closes for MACD(12, 26, 9): the slow EMA's full look-back.
pub const MACD_MIN_POINTS: usize = 26;

fn too_short(indicator: &'static str, needed: usize, got: usize) -> IndicatorError {
    IndicatorError::InsufficientWindow {
        indicator,
        needed,
        got,
    }
}

/// Compute the full indicator set from a chronological window of daily bars.
pub fn compute(bars: &[DailyBar]) -> Result<IndicatorSet, IndicatorError> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let n = closes.len();

    let price = *closes.last().ok_or_else(|| too_short("price", 1, 0))?;

    let rsi14 = rsi::rsi(&closes, RSI_PERIOD)
        .ok_or_else(|| too_short("rsi14", RSI_PERIOD + 1, n))?;

    let macd_out =
        macd::macd(&closes).ok_or_else(|| too_short("macd", MACD_MIN_POINTS, n))?;

    let bbp_20d = bollinger::percent_b(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD)
        .ok_or_else(|| too_short("bbp_20d", BOLLINGER_PERIOD, n))?;

    let return_1d_pct =
        returns::pct_change(&closes, 1).ok_or_else(|| too_short("return_1d", 2, n))?;
    let return_5d_pct =
        returns::pct_change(&closes, 5).ok_or_else(|| too_short("return_5d", 6, n))?;
    let return_20d_pct = returns::pct_change(&closes, 20)
        .ok_or_else(|| too_short("return_20d", 21, n))?;

    let realized_vol_20d_pct = volatility::realized_vol(&closes, VOL_PERIOD)
        .ok_or_else(|| too_short("realized_vol_20d", VOL_PERIOD + 1, n))?;

    // Volume is self-guarding: a short or silent window degrades to 0.
    let vol = volume::volume_stats(&volumes, VOLUME_PERIOD);

    Ok(IndicatorSet {
        price,
        rsi14,
        macd: macd_out.macd,
        macd_signal: macd_out.signal,
        macd_hist: macd_out.hist,
        bbp_20d,
        return_1d_pct,
        return_5d_pct,
        return_20d_pct,
        realized_vol_20d_pct,
        volume: vol.latest,
        volume_avg_20d: vol.average,
        volume_ratio: vol.ratio,
    })
}
