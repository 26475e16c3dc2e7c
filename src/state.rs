// =============================================================================
// Shared State — Snapshot, Last-Price Cache, AppState
// =============================================================================
//
// The sampler loop is the sole writer of both structures; axum scrape
// handlers only read. Records are replaced whole under the write lock and
// cloned out under the read lock, so a reader always observes a fully-formed
// record from a single cycle — never a mix of fields from two cycles.
//
// Thread safety:
//   - parking_lot::RwLock around each map.
//   - Atomic counter for cycle tracking.
//   - Arc<AppState> shared between the sampler task and the HTTP handlers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use parking_lot::RwLock;

use crate::config::ExporterConfig;
use crate::metrics::MetricsRegistry;
use crate::types::{IndicatorSet, SampleResult};

// =============================================================================
// Snapshot
// =============================================================================

/// Latest published sample per symbol — the only state scrapes read from.
///
/// Entries are created on first publish and updated in place every cycle.
/// They are never evicted: a symbol removed from the ticker list simply
/// stops being updated and keeps serving its last value. That staleness is
/// deliberate and matches the exporter's latest-value-only contract.
#[derive(Default)]
pub struct Snapshot {
    inner: RwLock<HashMap<String, SampleResult>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole record for a symbol.
    pub fn publish(&self, result: SampleResult) {
        self.inner.write().insert(result.symbol.clone(), result);
    }

    /// Record a failed cycle for a symbol: pin the price to the last known
    /// value, flip the success flag, and leave every other field at its
    /// last published value.
    pub fn mark_failed(&self, symbol: &str, price: f64) {
        let mut map = self.inner.write();
        match map.get_mut(symbol) {
            Some(entry) => {
                entry.indicators.price = price;
                entry.success = false;
            }
            None => {
                map.insert(
                    symbol.to_string(),
                    SampleResult {
                        symbol: symbol.to_string(),
                        indicators: IndicatorSet::price_only(price),
                        success: false,
                    },
                );
            }
        }
    }

    /// Clone out every record, sorted by symbol for a stable exposition
    /// order.
    pub fn all(&self) -> Vec<SampleResult> {
        let mut results: Vec<SampleResult> = self.inner.read().values().cloned().collect();
        results.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        results
    }

    pub fn get(&self, symbol: &str) -> Option<SampleResult> {
        self.inner.read().get(symbol).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

// =============================================================================
// LastPriceCache
// =============================================================================

/// Last observed price per symbol, live for the process lifetime.
///
/// Seeds the synthetic random walk and backs the stale-price fallback when a
/// live fetch fails.
#[derive(Default)]
pub struct LastPriceCache {
    inner: RwLock<HashMap<String, f64>>,
}

impl LastPriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.inner.read().get(symbol).copied()
    }

    pub fn set(&self, symbol: &str, price: f64) {
        self.inner.write().insert(symbol.to_string(), price);
    }
}

// =============================================================================
// AppState
// =============================================================================

/// Everything shared between the sampler task and the scrape handlers.
pub struct AppState {
    pub config: ExporterConfig,
    pub snapshot: Snapshot,
    pub last_price: LastPriceCache,
    pub metrics: MetricsRegistry,
    /// Completed sampling cycles since startup.
    pub cycles_completed: AtomicU64,
}

impl AppState {
    pub fn new(config: ExporterConfig) -> Result<Self> {
        Ok(Self {
            config,
            snapshot: Snapshot::new(),
            last_price: LastPriceCache::new(),
            metrics: MetricsRegistry::new()?,
            cycles_completed: AtomicU64::new(0),
        })
    }

    /// Render the current snapshot as the text exposition payload.
    pub fn render_metrics(&self) -> Result<String> {
        self.metrics.render(&self.snapshot.all())
    }

    pub fn finish_cycle(&self) -> u64 {
        self.cycles_completed.fetch_add(1, Ordering::SeqCst) + 1
    }
}
