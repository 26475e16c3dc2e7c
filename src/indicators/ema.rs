// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Recursive exponential weighting seeded by the first value of the series:
//
//   EMA_0 = x_0
//   EMA_t = alpha * x_t + (1 - alpha) * EMA_{t-1}
//
// Span form: alpha = 2 / (span + 1).  The output has the same length as the
// input, one smoothed value per sample.

/// Compute the EMA series for `values` with a span-based smoothing factor.
///
/// # Edge cases
/// - `span == 0` => empty vec (division guard)
/// - empty input => empty vec
pub fn ema_span(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }
    ewm_alpha(values, 2.0 / (span as f64 + 1.0))
}

/// Compute the EMA series for `values` with an explicit smoothing factor
/// `alpha` in (0, 1].  Used directly for Wilder-style smoothing
/// (alpha = 1 / period).
///
/// Returns an empty vec when the input is empty or `alpha` is out of range.
pub fn ewm_alpha(values: &[f64], alpha: f64) -> Vec<f64> {
    if values.is_empty() || !(alpha > 0.0 && alpha <= 1.0) {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len());
    let mut prev = values[0];
    result.push(prev);

    for &v in &values[1..] {
        prev = alpha * v + (1.0 - alpha) * prev;
        result.push(prev);
    }

    result
}
