// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split into gains (positive deltas) and losses (negated negative
//          deltas).
// Step 3 — Smooth each stream with a recursive EMA of alpha = 1/period
//          (Wilder-style, seeded by the first delta — not a simple average).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// When the smoothed average loss is exactly zero RS is undefined; RSI is
// defined as 100 in that case (all-gain window), never a division crash.

use crate::indicators::ema::ewm_alpha;

/// Compute the latest RSI value over `period` from the given closes.
///
/// Returns `None` when `period == 0` or fewer than `period + 1` closes are
/// available (at least `period` deltas are required).
pub fn rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = *ewm_alpha(&gains, alpha).last()?;
    let avg_loss = *ewm_alpha(&losses, alpha).last()?;

    // All-gain window: RS is undefined, RSI pegs at 100.
    if avg_loss == 0.0 {
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}
