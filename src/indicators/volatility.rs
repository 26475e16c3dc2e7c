// =============================================================================
// Realized Volatility (annualized)
// =============================================================================
//
// Population standard deviation (ddof = 0) of the trailing `period` daily
// log-returns, annualized by sqrt(252) and expressed in percent.

/// Trading sessions per year used for annualization.
const TRADING_DAYS: f64 = 252.0;

/// Annualized realized volatility over the trailing `period` log-returns.
///
/// Returns `None` when `period == 0` or fewer than `period + 1` closes are
/// available (`period` log-returns require `period + 1` prices).
pub fn realized_vol(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    // Log-returns of the trailing period+1 closes.
    let window = &closes[closes.len() - period - 1..];
    let returns: Vec<f64> = window.windows(2).map(|w| (w[1] / w[0]).ln()).collect();

    let mean = returns.iter().sum::<f64>() / period as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / period as f64;

    Some(variance.sqrt() * TRADING_DAYS.sqrt() * 100.0)
}
