//! Market data source trait.
//!
//! The monitor only sees [`MarketDataSource`], which allows for:
//! - Unit testing with scripted responses ([`MockMarketData`])
//! - Swapping the HTTP backend without touching indicator logic

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use regime_core::SentimentReading;

use crate::error::{FeedError, FeedResult};

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Read-only access to the three upstream feeds.
pub trait MarketDataSource: Send + Sync {
    /// Closing prices of the `limit` most recent candles, oldest first.
    ///
    /// May return fewer than `limit` closes if the upstream has fewer.
    fn hourly_closes(&self, limit: usize) -> BoxFuture<'_, FeedResult<Vec<f64>>>;

    /// Latest sentiment index data point.
    fn latest_sentiment(&self) -> BoxFuture<'_, FeedResult<SentimentReading>>;

    /// Latest traded price.
    fn latest_price(&self) -> BoxFuture<'_, FeedResult<f64>>;
}

/// Arc wrapper for MarketDataSource trait objects.
pub type DynMarketDataSource = Arc<dyn MarketDataSource>;

fn not_scripted(what: &str) -> FeedError {
    FeedError::HttpClient(format!("{what} not scripted"))
}

/// Scripted market data source for testing.
///
/// Candle requests are answered from a per-limit override when one is set,
/// otherwise from the tail of the scripted close series (as the exchange
/// returns the most recent candles).
#[derive(Debug)]
pub struct MockMarketData {
    closes: parking_lot::Mutex<FeedResult<Vec<f64>>>,
    closes_by_limit: parking_lot::Mutex<HashMap<usize, FeedResult<Vec<f64>>>>,
    sentiment: parking_lot::Mutex<FeedResult<SentimentReading>>,
    price: parking_lot::Mutex<FeedResult<f64>>,
    candle_calls: AtomicUsize,
    sentiment_calls: AtomicUsize,
    price_calls: AtomicUsize,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    /// Create a mock where every feed fails until scripted.
    pub fn new() -> Self {
        Self {
            closes: parking_lot::Mutex::new(Err(not_scripted("closes"))),
            closes_by_limit: parking_lot::Mutex::new(HashMap::new()),
            sentiment: parking_lot::Mutex::new(Err(not_scripted("sentiment"))),
            price: parking_lot::Mutex::new(Err(not_scripted("price"))),
            candle_calls: AtomicUsize::new(0),
            sentiment_calls: AtomicUsize::new(0),
            price_calls: AtomicUsize::new(0),
        }
    }

    /// Script the close series served for any limit.
    pub fn set_closes(&self, closes: FeedResult<Vec<f64>>) {
        *self.closes.lock() = closes;
    }

    /// Script the exact response for one `limit` value.
    pub fn set_closes_for_limit(&self, limit: usize, closes: FeedResult<Vec<f64>>) {
        self.closes_by_limit.lock().insert(limit, closes);
    }

    /// Script the sentiment response.
    pub fn set_sentiment(&self, sentiment: FeedResult<SentimentReading>) {
        *self.sentiment.lock() = sentiment;
    }

    /// Script a sentiment value with no label.
    pub fn set_sentiment_value(&self, value: u32) {
        self.set_sentiment(Ok(SentimentReading {
            value,
            classification: None,
        }));
    }

    /// Script the ticker response.
    pub fn set_price(&self, price: FeedResult<f64>) {
        *self.price.lock() = price;
    }

    pub fn candle_calls(&self) -> usize {
        self.candle_calls.load(Ordering::SeqCst)
    }

    pub fn sentiment_calls(&self) -> usize {
        self.sentiment_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    fn closes_for(&self, limit: usize) -> FeedResult<Vec<f64>> {
        if let Some(scripted) = self.closes_by_limit.lock().get(&limit) {
            return scripted.clone();
        }
        self.closes.lock().clone().map(|series| {
            let start = series.len().saturating_sub(limit);
            series[start..].to_vec()
        })
    }
}

impl MarketDataSource for MockMarketData {
    fn hourly_closes(&self, limit: usize) -> BoxFuture<'_, FeedResult<Vec<f64>>> {
        Box::pin(async move {
            self.candle_calls.fetch_add(1, Ordering::SeqCst);
            self.closes_for(limit)
        })
    }

    fn latest_sentiment(&self) -> BoxFuture<'_, FeedResult<SentimentReading>> {
        Box::pin(async move {
            self.sentiment_calls.fetch_add(1, Ordering::SeqCst);
            self.sentiment.lock().clone()
        })
    }

    fn latest_price(&self) -> BoxFuture<'_, FeedResult<f64>> {
        Box::pin(async move {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            self.price.lock().clone()
        })
    }
}
