// =============================================================================
// Sampler / Publisher Loop
// =============================================================================
//
// One long-lived task that walks the symbol list once per refresh cycle,
// strictly one symbol at a time (the per-symbol pause is the rate limit on
// the provider). Per symbol, exactly one of three outcomes:
//
//   1. Synthetic-only (demo-only config, or no provider capability):
//      synthetic sample, success = false.
//   2. Live: provider window -> indicator engine; publish success = true and
//      refresh the last-price cache.
//   3. Live failure (provider error, empty data, short window): synthetic
//      sample when demo-mode is on; otherwise pin the last known price with
//      success = false; otherwise publish nothing.
//
// The loop never terminates and has no backoff — the next cycle is the
// retry. A symbol that fails every cycle just stays unsuccessful with a
// frozen price. No per-symbol failure may abort the cycle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::provider::HistoryProvider;
use crate::state::AppState;
use crate::synth::SyntheticGenerator;
use crate::types::{IndicatorSet, SampleResult};

/// Outcome counts for one full pass over the symbol list.
#[derive(Debug, Default)]
pub struct CycleStats {
    pub symbols: usize,
    pub live_ok: usize,
    pub fallback: usize,
}

/// Run the sampling loop forever.
pub async fn run(state: Arc<AppState>, provider: Option<Arc<dyn HistoryProvider>>) {
    let mut synth = SyntheticGenerator::new();
    info!(
        demo_only = state.config.demo_only,
        live_capable = provider.is_some(),
        "sampler loop starting"
    );

    loop {
        let stats = run_cycle(&state, provider.as_deref(), &mut synth).await;
        let cycle = state.finish_cycle();
        info!(
            cycle,
            symbols = stats.symbols,
            live_ok = stats.live_ok,
            fallback = stats.fallback,
            "sampling cycle complete"
        );
        tokio::time::sleep(state.config.refresh).await;
    }
}

/// One full pass over the (freshly reloaded) symbol list.
pub(crate) async fn run_cycle(
    state: &AppState,
    provider: Option<&dyn HistoryProvider>,
    synth: &mut SyntheticGenerator,
) -> CycleStats {
    let tickers = state.config.load_tickers();
    let mut stats = CycleStats {
        symbols: tickers.len(),
        ..CycleStats::default()
    };

    for symbol in &tickers {
        if sample_symbol(state, provider, synth, symbol).await {
            stats.live_ok += 1;
        } else {
            stats.fallback += 1;
        }
        tokio::time::sleep(state.config.sleep_per_symbol).await;
    }

    stats
}

/// Sample one symbol and publish the outcome. Returns whether the sample
/// was a live success.
pub(crate) async fn sample_symbol(
    state: &AppState,
    provider: Option<&dyn HistoryProvider>,
    synth: &mut SyntheticGenerator,
    symbol: &str,
) -> bool {
    // Synthetic-only mode: the provider must not even be consulted.
    let provider = match provider {
        Some(p) if !state.config.demo_only => p,
        _ => {
            publish_synthetic(state, synth, symbol);
            return false;
        }
    };

    match live_sample(provider, symbol).await {
        Ok(set) => {
            state.last_price.set(symbol, set.price);
            state.snapshot.publish(SampleResult {
                symbol: symbol.to_string(),
                indicators: set,
                success: true,
            });
            debug!(symbol, "live sample published");
            true
        }
        Err(e) => {
            warn!(symbol, error = %e, "live sample failed");
            if state.config.demo_mode {
                publish_synthetic(state, synth, symbol);
            } else if let Some(price) = state.last_price.get(symbol) {
                state.snapshot.mark_failed(symbol, price);
            }
            // No last-known price: nothing to publish this cycle.
            false
        }
    }
}

async fn live_sample(
    provider: &dyn HistoryProvider,
    symbol: &str,
) -> anyhow::Result<IndicatorSet> {
    let bars = provider.daily_history(symbol).await?;
    let set = crate::indicators::engine::compute(&bars)?;
    Ok(set)
}

fn publish_synthetic(state: &AppState, synth: &mut SyntheticGenerator, symbol: &str) {
    let set = synth.sample(symbol, &state.last_price);
    state.snapshot.publish(SampleResult {
        symbol: symbol.to_string(),
        indicators: set,
        success: false,
    });
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;

    use crate::config::ExporterConfig;
    use crate::types::DailyBar;

    struct FailingProvider {
        calls: AtomicUsize,
    }

    impl FailingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HistoryProvider for FailingProvider {
        async fn daily_history(&self, _symbol: &str) -> Result<Vec<DailyBar>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            anyhow::bail!("provider down")
        }
    }

    struct FixedProvider {
        bars: Vec<DailyBar>,
    }

    impl FixedProvider {
        fn with_window(n: usize) -> Self {
            let bars = (0..n)
                .map(|i| DailyBar {
                    close: 100.0 + i as f64 * 0.5,
                    volume: 2_000_000.0,
                })
                .collect();
            Self { bars }
        }
    }

    #[async_trait]
    impl HistoryProvider for FixedProvider {
        async fn daily_history(&self, _symbol: &str) -> Result<Vec<DailyBar>> {
            Ok(self.bars.clone())
        }
    }

    fn test_state(inline: &str, demo_mode: bool, demo_only: bool) -> AppState {
        let config = ExporterConfig {
            tickers_file: PathBuf::from("/nonexistent/tickers.txt"),
            tickers_inline: inline.to_string(),
            sleep_per_symbol: Duration::ZERO,
            demo_mode,
            demo_only,
            ..ExporterConfig::default()
        };
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn demo_only_never_invokes_provider() {
        let state = test_state("AAA,BBB", false, true);
        let provider = FailingProvider::new();
        let mut synth = SyntheticGenerator::with_seed(42);

        let stats = run_cycle(&state, Some(&provider), &mut synth).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(stats.symbols, 2);
        assert_eq!(stats.live_ok, 0);
        assert_eq!(state.snapshot.len(), 2);
        for symbol in ["AAA", "BBB"] {
            let entry = state.snapshot.get(symbol).unwrap();
            assert!(!entry.success);
            // First cycle: random-walk seed range [100, 120) plus one step.
            assert!(
                entry.indicators.price > 99.0 && entry.indicators.price < 121.0,
                "{symbol} price {}",
                entry.indicators.price
            );
        }
    }

    #[tokio::test]
    async fn missing_capability_routes_to_synthetic() {
        let state = test_state("AAA", false, false);
        let mut synth = SyntheticGenerator::with_seed(1);

        let stats = run_cycle(&state, None, &mut synth).await;

        assert_eq!(stats.fallback, 1);
        let entry = state.snapshot.get("AAA").unwrap();
        assert!(!entry.success);
    }

    #[tokio::test]
    async fn live_success_publishes_and_caches() {
        let state = test_state("AAA", false, false);
        let provider = FixedProvider::with_window(90);
        let mut synth = SyntheticGenerator::with_seed(1);

        let stats = run_cycle(&state, Some(&provider), &mut synth).await;

        assert_eq!(stats.live_ok, 1);
        let entry = state.snapshot.get("AAA").unwrap();
        assert!(entry.success);
        let expected_price = 100.0 + 89.0 * 0.5;
        assert_eq!(entry.indicators.price, expected_price);
        assert_eq!(state.last_price.get("AAA"), Some(expected_price));
    }

    #[tokio::test]
    async fn short_window_is_a_failure_not_a_partial_success() {
        // 10 bars cannot satisfy the indicator look-backs; with no cached
        // price the symbol publishes nothing at all.
        let state = test_state("AAA", false, false);
        let provider = FixedProvider::with_window(10);
        let mut synth = SyntheticGenerator::with_seed(1);

        run_cycle(&state, Some(&provider), &mut synth).await;

        assert!(state.snapshot.is_empty());
    }

    #[tokio::test]
    async fn failing_provider_pins_last_known_price() {
        let state = test_state("AAA", false, false);
        let provider = FailingProvider::new();
        let mut synth = SyntheticGenerator::with_seed(1);
        state.last_price.set("AAA", 55.5);

        for _ in 0..3 {
            run_cycle(&state, Some(&provider), &mut synth).await;
        }

        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        let entry = state.snapshot.get("AAA").unwrap();
        assert!(!entry.success);
        assert_eq!(entry.indicators.price, 55.5);
    }

    #[tokio::test]
    async fn failing_provider_without_cache_publishes_nothing() {
        let state = test_state("AAA", false, false);
        let provider = FailingProvider::new();
        let mut synth = SyntheticGenerator::with_seed(1);

        run_cycle(&state, Some(&provider), &mut synth).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(state.snapshot.is_empty());
    }

    #[tokio::test]
    async fn demo_mode_substitutes_synthetic_on_failure() {
        let state = test_state("AAA", true, false);
        let provider = FailingProvider::new();
        let mut synth = SyntheticGenerator::with_seed(1);

        run_cycle(&state, Some(&provider), &mut synth).await;

        // The live fetch was attempted, then synthetic stood in.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        let entry = state.snapshot.get("AAA").unwrap();
        assert!(!entry.success);
        assert!(entry.indicators.price > 0.0);
    }

    #[tokio::test]
    async fn failure_after_success_freezes_price_and_keeps_fields() {
        let state = test_state("AAA", false, false);
        let mut synth = SyntheticGenerator::with_seed(1);

        let good = FixedProvider::with_window(90);
        run_cycle(&state, Some(&good), &mut synth).await;
        let live = state.snapshot.get("AAA").unwrap();
        assert!(live.success);

        let bad = FailingProvider::new();
        for _ in 0..5 {
            run_cycle(&state, Some(&bad), &mut synth).await;
        }

        let stale = state.snapshot.get("AAA").unwrap();
        assert!(!stale.success);
        // Price frozen at the last live value; carried fields untouched.
        assert_eq!(stale.indicators.price, live.indicators.price);
        assert_eq!(stale.indicators.rsi14, live.indicators.rsi14);
        assert_eq!(stale.indicators.macd, live.indicators.macd);
        assert_eq!(stale.indicators.volume, live.indicators.volume);
    }
}
