// =============================================================================
// Prometheus Exposition — fixed gauge set, one series per (metric, symbol)
// =============================================================================
//
// The snapshot is the source of truth; the registry here is a render buffer
// that is refreshed from the snapshot on every scrape. Metric names are a
// stable contract with existing dashboards and alert rules — do not rename.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::types::SampleResult;

/// The registry of exported gauges, all labelled by `symbol`.
pub struct MetricsRegistry {
    registry: Registry,
    // Serializes render passes so one scrape's gauge writes can never
    // interleave with another's encode.
    render_lock: Mutex<()>,

    price: GaugeVec,
    scrape_success: GaugeVec,
    rsi14: GaugeVec,
    macd: GaugeVec,
    macd_signal: GaugeVec,
    macd_hist: GaugeVec,
    bbp_20d: GaugeVec,
    return_1d: GaugeVec,
    return_5d: GaugeVec,
    return_20d: GaugeVec,
    vol_20d: GaugeVec,
    volume: GaugeVec,
    volume_avg_20d: GaugeVec,
    volume_ratio: GaugeVec,
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<GaugeVec> {
    let vec = GaugeVec::new(Opts::new(name, help), &["symbol"])
        .with_context(|| format!("failed to build gauge {name}"))?;
    registry
        .register(Box::new(vec.clone()))
        .with_context(|| format!("failed to register gauge {name}"))?;
    Ok(vec)
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        Ok(Self {
            price: gauge(&registry, "stock_price", "Last trade/close price")?,
            scrape_success: gauge(&registry, "stock_scrape_success", "1=ok,0=fail")?,
            rsi14: gauge(&registry, "stock_rsi14", "RSI(14)")?,
            macd: gauge(&registry, "stock_macd", "MACD line (12-26)")?,
            macd_signal: gauge(&registry, "stock_macd_signal", "MACD signal (9)")?,
            macd_hist: gauge(&registry, "stock_macd_hist", "MACD histogram")?,
            bbp_20d: gauge(&registry, "stock_bbp_20d", "Bollinger %B (20d)")?,
            return_1d: gauge(&registry, "stock_return_1d_percent", "1d return %")?,
            return_5d: gauge(&registry, "stock_return_5d_percent", "5d return %")?,
            return_20d: gauge(&registry, "stock_return_20d_percent", "20d return %")?,
            vol_20d: gauge(
                &registry,
                "stock_vol_20d_annualized",
                "Realized vol 20d (annualized, %)",
            )?,
            volume: gauge(&registry, "stock_volume", "Volume (shares)")?,
            volume_avg_20d: gauge(&registry, "stock_volume_avg_20d", "Avg vol 20d (shares)")?,
            volume_ratio: gauge(&registry, "stock_volume_ratio", "Volume/Avg20d")?,
            registry,
            render_lock: Mutex::new(()),
        })
    }

    /// Refresh every gauge from the given sample results and encode the
    /// full text exposition payload.
    pub fn render(&self, results: &[SampleResult]) -> Result<String> {
        let _guard = self.render_lock.lock();

        for r in results {
            let sym = r.symbol.as_str();
            let set = &r.indicators;

            self.price.with_label_values(&[sym]).set(set.price);
            self.scrape_success
                .with_label_values(&[sym])
                .set(if r.success { 1.0 } else { 0.0 });
            self.rsi14.with_label_values(&[sym]).set(set.rsi14);
            self.macd.with_label_values(&[sym]).set(set.macd);
            self.macd_signal
                .with_label_values(&[sym])
                .set(set.macd_signal);
            self.macd_hist.with_label_values(&[sym]).set(set.macd_hist);
            self.bbp_20d.with_label_values(&[sym]).set(set.bbp_20d);
            self.return_1d
                .with_label_values(&[sym])
                .set(set.return_1d_pct);
            self.return_5d
                .with_label_values(&[sym])
                .set(set.return_5d_pct);
            self.return_20d
                .with_label_values(&[sym])
                .set(set.return_20d_pct);
            self.vol_20d
                .with_label_values(&[sym])
                .set(set.realized_vol_20d_pct);
            self.volume.with_label_values(&[sym]).set(set.volume);
            self.volume_avg_20d
                .with_label_values(&[sym])
                .set(set.volume_avg_20d);
            self.volume_ratio
                .with_label_values(&[sym])
                .set(set.volume_ratio);
        }

        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .context("failed to encode metrics exposition")?;
        String::from_utf8(buf).context("metrics exposition was not valid UTF-8")
    }
}
