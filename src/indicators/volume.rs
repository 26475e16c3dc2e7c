// =============================================================================
// Volume Statistics
// =============================================================================

/// Latest session volume, its trailing average, and their ratio.
#[derive(Debug, Clone, Copy)]
pub struct VolumeStats {
    pub latest: f64,
    pub average: f64,
    pub ratio: f64,
}

/// Compute volume statistics over the trailing `period` sessions.
///
/// Volume never fails a sample: with fewer than `period` sessions the
/// average is reported as 0, and a zero average forces the ratio to 0
/// (explicit guard, no division error).
pub fn volume_stats(volumes: &[f64], period: usize) -> VolumeStats {
    let latest = volumes.last().copied().unwrap_or(0.0);

    let average = if period > 0 && volumes.len() >= period {
        volumes[volumes.len() - period..].iter().sum::<f64>() / period as f64
    } else {
        0.0
    };

    let ratio = if average > 0.0 { latest / average } else { 0.0 };

    VolumeStats {
        latest,
        average,
        ratio,
    }
}
