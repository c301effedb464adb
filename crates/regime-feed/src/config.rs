//! Market data endpoint configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoints and per-source timeouts for the public market data APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Exchange REST base (serves `/klines` and `/ticker/price`).
    #[serde(default = "default_exchange_base_url")]
    pub exchange_base_url: String,
    /// Sentiment index API base (serves `/fng/`).
    #[serde(default = "default_sentiment_base_url")]
    pub sentiment_base_url: String,
    /// Instrument whose candles drive RSI and price change.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Candle interval. Default: "1h".
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Timeout for candle requests (ms). Default: 10,000.
    #[serde(default = "default_exchange_timeout_ms")]
    pub exchange_timeout_ms: u64,
    /// Timeout for sentiment requests (ms). Default: 10,000.
    #[serde(default = "default_sentiment_timeout_ms")]
    pub sentiment_timeout_ms: u64,
    /// Timeout for the fallback ticker request (ms). Default: 5,000.
    #[serde(default = "default_ticker_timeout_ms")]
    pub ticker_timeout_ms: u64,
}

fn default_exchange_base_url() -> String {
    "https://api.binance.com/api/v3".to_string()
}

fn default_sentiment_base_url() -> String {
    "https://api.alternative.me".to_string()
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_interval() -> String {
    "1h".to_string()
}

fn default_exchange_timeout_ms() -> u64 {
    10_000
}

fn default_sentiment_timeout_ms() -> u64 {
    10_000
}

fn default_ticker_timeout_ms() -> u64 {
    5_000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            exchange_base_url: default_exchange_base_url(),
            sentiment_base_url: default_sentiment_base_url(),
            symbol: default_symbol(),
            interval: default_interval(),
            exchange_timeout_ms: default_exchange_timeout_ms(),
            sentiment_timeout_ms: default_sentiment_timeout_ms(),
            ticker_timeout_ms: default_ticker_timeout_ms(),
        }
    }
}

impl FeedConfig {
    /// Point every source at one base URL (mock servers, local proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base = base_url.into();
        Self {
            exchange_base_url: base.clone(),
            sentiment_base_url: base,
            ..Self::default()
        }
    }

    pub fn exchange_timeout(&self) -> Duration {
        Duration::from_millis(self.exchange_timeout_ms)
    }

    pub fn sentiment_timeout(&self) -> Duration {
        Duration::from_millis(self.sentiment_timeout_ms)
    }

    pub fn ticker_timeout(&self) -> Duration {
        Duration::from_millis(self.ticker_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_feed_config() {
        let config = FeedConfig::default();
        assert_eq!(config.symbol, "BTCUSDT");
        assert_eq!(config.interval, "1h");
        assert_eq!(config.ticker_timeout(), Duration::from_secs(5));
        assert_eq!(config.exchange_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FeedConfig = serde_json::from_str(r#"{"symbol": "ETHUSDT"}"#).unwrap();
        assert_eq!(config.symbol, "ETHUSDT");
        assert_eq!(config.sentiment_base_url, "https://api.alternative.me");
    }

    #[test]
    fn test_with_base_url() {
        let config = FeedConfig::with_base_url("http://127.0.0.1:9000");
        assert_eq!(config.exchange_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.sentiment_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.symbol, "BTCUSDT");
    }
}
