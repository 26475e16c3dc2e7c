// =============================================================================
// History Provider — daily bar window source
// =============================================================================
//
// The sampler only ever sees the `HistoryProvider` trait; the Yahoo Finance
// chart API implementation below is the single live source. No retries here:
// the sampler's next refresh cycle is the retry.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::types::DailyBar;

/// Calendar days of daily history requested per sample.
const HISTORY_DAYS: i64 = 90;

/// Source of chronological daily (close, volume) windows for a symbol.
///
/// Implementations fail with an error for any unusable response, including
/// an empty series — the caller treats every failure the same way.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>>;
}

// =============================================================================
// Yahoo Finance chart API
// =============================================================================

pub struct YahooFinanceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        // The chart endpoint rejects requests without a browser-ish UA.
        default_headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            base_url: "https://query1.finance.yahoo.com".to_string(),
        }
    }
}

impl Default for YahooFinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryProvider for YahooFinanceProvider {
    #[instrument(skip(self), name = "yahoo::daily_history")]
    async fn daily_history(&self, symbol: &str) -> Result<Vec<DailyBar>> {
        let period2 = Utc::now().timestamp();
        let period1 = (Utc::now() - Duration::days(HISTORY_DAYS)).timestamp();
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url, symbol, period1, period2
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("chart request for {symbol} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("chart request for {symbol} returned {status}");
        }

        let body: ChartResponse = resp
            .json()
            .await
            .with_context(|| format!("failed to parse chart response for {symbol}"))?;

        let bars = bars_from_chart(body)?;
        if bars.is_empty() {
            anyhow::bail!("empty history for {symbol}");
        }

        debug!(symbol, bars = bars.len(), "daily history fetched");
        Ok(bars)
    }
}

// =============================================================================
// Response parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Option<Vec<Option<f64>>>,
    #[serde(default)]
    volume: Option<Vec<Option<f64>>>,
}

/// Flatten the chart payload into chronological bars. Sessions with a null
/// close are skipped (absent, not interpolated); a null volume becomes 0.
fn bars_from_chart(resp: ChartResponse) -> Result<Vec<DailyBar>> {
    let result = resp
        .chart
        .result
        .and_then(|mut v| if v.is_empty() { None } else { Some(v.remove(0)) })
        .context("chart response missing result")?;

    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .context("chart response missing quote data")?;

    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut bars = Vec::with_capacity(closes.len());
    for (i, close) in closes.into_iter().enumerate() {
        let Some(close) = close else { continue };
        let volume = volumes.get(i).copied().flatten().unwrap_or(0.0);
        bars.push(DailyBar { close, volume });
    }

    Ok(bars)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ChartResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_well_formed_chart() {
        let resp = parse(
            r#"{
                "chart": {
                    "result": [{
                        "indicators": {
                            "quote": [{
                                "close": [10.0, 11.5, 12.0],
                                "volume": [1000, 2000, 3000]
                            }]
                        }
                    }]
                }
            }"#,
        );
        let bars = bars_from_chart(resp).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[1], DailyBar { close: 11.5, volume: 2000.0 });
    }

    #[test]
    fn skips_null_close_sessions() {
        let resp = parse(
            r#"{
                "chart": {
                    "result": [{
                        "indicators": {
                            "quote": [{
                                "close": [10.0, null, 12.0],
                                "volume": [1000, 2000, null]
                            }]
                        }
                    }]
                }
            }"#,
        );
        let bars = bars_from_chart(resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0], DailyBar { close: 10.0, volume: 1000.0 });
        // Null volume on a kept session degrades to 0.
        assert_eq!(bars[1], DailyBar { close: 12.0, volume: 0.0 });
    }

    #[test]
    fn missing_result_is_an_error() {
        let resp = parse(r#"{ "chart": { "result": null } }"#);
        assert!(bars_from_chart(resp).is_err());

        let resp = parse(r#"{ "chart": { "result": [] } }"#);
        assert!(bars_from_chart(resp).is_err());
    }

    #[test]
    fn missing_quote_arrays_yield_no_bars() {
        let resp = parse(
            r#"{
                "chart": {
                    "result": [{ "indicators": { "quote": [{}] } }]
                }
            }"#,
        );
        let bars = bars_from_chart(resp).unwrap();
        assert!(bars.is_empty());
    }
}
