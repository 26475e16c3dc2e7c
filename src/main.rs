// =============================================================================
// Stocks Exporter — Main Entry Point
// =============================================================================
//
// Wiring order: env + logging, config, shared state, provider capability,
// sampler task, metrics endpoint. The sampler and the HTTP handlers share
// nothing but the snapshot inside AppState.
// =============================================================================

mod api;
mod config;
mod error;
mod indicators;
mod metrics;
mod provider;
mod sampler;
mod state;
mod synth;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::ExporterConfig;
use crate::provider::{HistoryProvider, YahooFinanceProvider};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ExporterConfig::from_env();

    let tickers = config.load_tickers();
    if tickers.is_empty() {
        warn!("no tickers configured — the exporter will serve an empty snapshot");
    } else {
        info!(count = tickers.len(), tickers = ?tickers, "tickers configured");
    }

    let state = Arc::new(AppState::new(config)?);

    // Live-data capability is resolved exactly once, here. In demo-only mode
    // no provider is constructed at all, so a live fetch cannot happen.
    let provider: Option<Arc<dyn HistoryProvider>> = if state.config.demo_only {
        info!("demo-only mode — live fetches disabled");
        None
    } else {
        Some(Arc::new(YahooFinanceProvider::new()))
    };

    tokio::spawn(sampler::run(state.clone(), provider));

    let bind_addr = state.config.bind_addr.clone();
    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(addr = %bind_addr, "metrics endpoint listening");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("metrics server failed");
    });

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received — exiting");
    Ok(())
}
