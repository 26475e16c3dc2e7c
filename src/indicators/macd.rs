// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   MACD line = EMA(12) - EMA(26) of close
//   Signal    = EMA(9) of the MACD line
//   Histogram = MACD - Signal
//
// All three EMAs use the recursive span-based smoothing seeded by the first
// value of their input series.

use crate::indicators::ema::ema_span;

const FAST_SPAN: usize = 12;
const SLOW_SPAN: usize = 26;
const SIGNAL_SPAN: usize = 9;

/// Latest MACD line, signal, and histogram values.
#[derive(Debug, Clone, Copy)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub hist: f64,
}

/// Compute the latest MACD(12, 26, 9) values from the given closes.
///
/// Returns `None` when fewer than 26 closes are available — the slow EMA
/// needs its full look-back before the line is considered defined — or when
/// a non-finite value appears in the smoothed series.
pub fn macd(closes: &[f64]) -> Option<MacdOutput> {
    if closes.len() < SLOW_SPAN {
        return None;
    }

    let fast = ema_span(closes, FAST_SPAN);
    let slow = ema_span(closes, SLOW_SPAN);

    let line: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
    let signal_series = ema_span(&line, SIGNAL_SPAN);

    let macd = *line.last()?;
    let signal = *signal_series.last()?;
    if !macd.is_finite() || !signal.is_finite() {
        return None;
    }

    Some(MacdOutput {
        macd,
        signal,
        hist: macd - signal,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_insufficient_data() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64).collect();
        assert!(macd(&closes).is_none());
    }

    #[test]
    fn macd_defined_at_26_points() {
        let closes: Vec<f64> = (1..=26).map(|x| x as f64).collect();
        let out = macd(&closes).unwrap();
        assert!(out.macd.is_finite());
        assert!(out.signal.is_finite());
        assert!(out.hist.is_finite());
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // In a steady uptrend the fast EMA sits above the slow EMA.
        let closes: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let out = macd(&closes).unwrap();
        assert!(out.macd > 0.0);
    }

    #[test]
    fn macd_negative_in_downtrend() {
        let closes: Vec<f64> = (1..=60).rev().map(|x| x as f64).collect();
        let out = macd(&closes).unwrap();
        assert!(out.macd < 0.0);
    }

    #[test]
    fn macd_zero_on_constant_series() {
        let closes = vec![100.0; 40];
        let out = macd(&closes).unwrap();
        assert!(out.macd.abs() < 1e-12);
        assert!(out.signal.abs() < 1e-12);
        assert!(out.hist.abs() < 1e-12);
    }

    #[test]
    fn hist_is_line_minus_signal() {
        let closes: Vec<f64> = (0..50).map(|x| 100.0 + (x as f64 * 0.7).sin() * 5.0).collect();
        let out = macd(&closes).unwrap();
        assert!((out.hist - (out.macd - out.signal)).abs() < 1e-12);
    }
}
