// =============================================================================
// Bollinger %B
// =============================================================================
//
// Position of the latest close within the Bollinger band, as a percentage:
//
//   middle = SMA(period)
//   upper  = middle + num_std * sigma      (population std, ddof = 0)
//   lower  = middle - num_std * sigma
//   %B     = (close - lower) / (upper - lower) * 100
//
// A zero-variance window collapses the band (upper == lower); %B is NaN in
// that case, a documented sentinel rather than a division crash.

/// Compute %B of the latest close over the trailing `period` closes.
///
/// Returns `None` when `period == 0` or fewer than `period` closes are
/// available.
pub fn percent_b(closes: &[f64], period: usize, num_std: f64) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let variance =
        window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period as f64;
    let sigma = variance.sqrt();

    let upper = middle + num_std * sigma;
    let lower = middle - num_std * sigma;
    if upper == lower {
        return Some(f64::NAN);
    }

    let close = closes[closes.len() - 1];
    Some((close - lower) / (upper - lower) * 100.0)
}
