// =============================================================================
// Synthetic Sample Generator — per-symbol random walk
// =============================================================================
//
// Keeps the whole pipeline exercised end-to-end when live data is disabled
// or unreachable. Prices follow a continuous multiplicative random walk
// seeded from the last-price cache (uniform [100, 120) on first use); every
// other field is a plausible but uncorrelated draw. Synthetic output is
// always published with success = false so it can never be mistaken for
// real data.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::state::LastPriceCache;
use crate::types::IndicatorSet;

pub struct SyntheticGenerator {
    rng: StdRng,
    walk_step: Normal<f64>,
    rsi: Normal<f64>,
    macd: Normal<f64>,
    ret_1d: Normal<f64>,
    ret_5d: Normal<f64>,
    ret_20d: Normal<f64>,
    vol_20d: Normal<f64>,
}

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic generator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            walk_step: Normal::new(0.0, 0.002).expect("valid std dev"),
            rsi: Normal::new(50.0, 10.0).expect("valid std dev"),
            macd: Normal::new(0.0, 1.0).expect("valid std dev"),
            ret_1d: Normal::new(0.0, 1.0).expect("valid std dev"),
            ret_5d: Normal::new(0.0, 3.0).expect("valid std dev"),
            ret_20d: Normal::new(0.0, 6.0).expect("valid std dev"),
            vol_20d: Normal::new(25.0, 5.0).expect("valid std dev"),
        }
    }

    /// Produce the next synthetic indicator set for `symbol`, advancing the
    /// price walk and writing the new price back into the cache.
    pub fn sample(&mut self, symbol: &str, cache: &LastPriceCache) -> IndicatorSet {
        let base = cache
            .get(symbol)
            .unwrap_or_else(|| 100.0 + self.rng.gen::<f64>() * 20.0);
        let price = base * (1.0 + self.walk_step.sample(&mut self.rng));
        cache.set(symbol, price);

        IndicatorSet {
            price,
            rsi14: self.rsi.sample(&mut self.rng),
            macd: self.macd.sample(&mut self.rng),
            macd_signal: self.macd.sample(&mut self.rng),
            macd_hist: self.macd.sample(&mut self.rng),
            bbp_20d: self.rng.gen_range(0.0..100.0),
            return_1d_pct: self.ret_1d.sample(&mut self.rng),
            return_5d_pct: self.ret_5d.sample(&mut self.rng),
            return_20d_pct: self.ret_20d.sample(&mut self.rng),
            realized_vol_20d_pct: self.vol_20d.sample(&mut self.rng).abs(),
            volume: self.rng.gen_range(1_000_000..5_000_000) as f64,
            volume_avg_20d: self.rng.gen_range(1_000_000..5_000_000) as f64,
            volume_ratio: self.rng.gen_range(0.5..2.5),
        }
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}
