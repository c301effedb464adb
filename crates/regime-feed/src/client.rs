//! HTTP client for the public market data endpoints.
//!
//! Three endpoints are used:
//! - `GET {exchange}/klines?symbol=..&interval=..&limit=N` for closing prices
//! - `GET {sentiment}/fng/?limit=1` for the fear & greed index
//! - `GET {exchange}/ticker/price?symbol=..` as a fallback spot price
//!
//! Every request is issued once with its source's timeout; failures are
//! returned as [`FeedError`] and never retried here.

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::source::{BoxFuture, MarketDataSource};
use regime_core::SentimentReading;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Index of the close price inside a kline array.
const KLINE_CLOSE_INDEX: usize = 4;

/// Raw fear & greed response.
#[derive(Debug, Deserialize)]
struct RawFngResponse {
    #[serde(default)]
    data: Option<Vec<RawFngEntry>>,
}

/// One fear & greed data point. `value` is sent as a string.
#[derive(Debug, Deserialize)]
struct RawFngEntry {
    value: serde_json::Value,
    #[serde(default)]
    value_classification: Option<String>,
}

/// Raw ticker response (`{"symbol":"BTCUSDT","price":"67000.00"}`).
#[derive(Debug, Deserialize)]
struct RawTickerResponse {
    price: serde_json::Value,
}

/// Client for the candle, sentiment and ticker endpoints.
pub struct HttpMarketData {
    /// HTTP client.
    client: Client,
    /// Endpoints and timeouts.
    config: FeedConfig,
}

impl HttpMarketData {
    /// Create a new market data client.
    pub fn new(config: FeedConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("regime-monitor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetch `limit` most recent closes.
    pub async fn fetch_closes(&self, limit: usize) -> FeedResult<Vec<f64>> {
        let url = format!("{}/klines", self.config.exchange_base_url);
        debug!(%url, symbol = %self.config.symbol, limit, "Fetching klines");

        let limit = limit.to_string();
        let body = self
            .get_json(
                &url,
                &[
                    ("symbol", self.config.symbol.as_str()),
                    ("interval", self.config.interval.as_str()),
                    ("limit", limit.as_str()),
                ],
                self.config.exchange_timeout(),
            )
            .await?;

        parse_kline_closes(&body)
    }

    /// Fetch the latest fear & greed data point.
    pub async fn fetch_sentiment(&self) -> FeedResult<SentimentReading> {
        let url = format!("{}/fng/", self.config.sentiment_base_url);
        debug!(%url, "Fetching fear & greed index");

        let body = self
            .get_json(&url, &[("limit", "1")], self.config.sentiment_timeout())
            .await?;

        let raw: RawFngResponse = serde_json::from_value(body)?;
        parse_sentiment(raw)
    }

    /// Fetch the latest spot price.
    pub async fn fetch_ticker_price(&self) -> FeedResult<f64> {
        let url = format!("{}/ticker/price", self.config.exchange_base_url);
        debug!(%url, symbol = %self.config.symbol, "Fetching ticker price");

        let body = self
            .get_json(
                &url,
                &[("symbol", self.config.symbol.as_str())],
                self.config.ticker_timeout(),
            )
            .await?;

        let raw: RawTickerResponse = serde_json::from_value(body)?;
        parse_number(&raw.price, "price")
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> FeedResult<serde_json::Value> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FeedError::HttpClient(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::Parse(format!("Failed to parse response: {e}")))
    }
}

impl MarketDataSource for HttpMarketData {
    fn hourly_closes(&self, limit: usize) -> BoxFuture<'_, FeedResult<Vec<f64>>> {
        Box::pin(self.fetch_closes(limit))
    }

    fn latest_sentiment(&self) -> BoxFuture<'_, FeedResult<SentimentReading>> {
        Box::pin(self.fetch_sentiment())
    }

    fn latest_price(&self) -> BoxFuture<'_, FeedResult<f64>> {
        Box::pin(self.fetch_ticker_price())
    }
}

/// Numbers arrive either as JSON strings ("67000.01") or plain numbers.
fn parse_number(value: &serde_json::Value, field: &str) -> FeedResult<f64> {
    let parsed = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| FeedError::Parse(format!("{field} is not a number: {value}")))
}

/// Extract close prices from a kline array-of-arrays, oldest first.
pub fn parse_kline_closes(body: &serde_json::Value) -> FeedResult<Vec<f64>> {
    let rows = body
        .as_array()
        .ok_or_else(|| FeedError::Parse("klines response is not an array".to_string()))?;

    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let close = row
                .as_array()
                .and_then(|fields| fields.get(KLINE_CLOSE_INDEX))
                .ok_or_else(|| FeedError::MissingField(format!("kline {idx} close")))?;
            parse_number(close, "close")
        })
        .collect()
}

fn parse_sentiment(raw: RawFngResponse) -> FeedResult<SentimentReading> {
    let entries = raw
        .data
        .ok_or_else(|| FeedError::MissingField("data".to_string()))?;

    let entry = entries
        .into_iter()
        .next()
        .ok_or(FeedError::InsufficientData { needed: 1, got: 0 })?;

    let value = match &entry.value {
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        _ => None,
    }
    .ok_or_else(|| {
        FeedError::Parse(format!(
            "sentiment value is not an integer: {}",
            entry.value
        ))
    })?;

    Ok(SentimentReading {
        value,
        classification: entry.value_classification,
    })
}
