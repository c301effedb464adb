//! Market conditions monitor.
//!
//! Derives three indicators from public feeds (BTC hourly RSI, the fear &
//! greed index, BTC hourly price change), caches them for a short TTL and
//! turns them into bull/conservative switch recommendations.

pub mod cache;
pub mod config;
pub mod evaluator;
pub mod history;
pub mod monitor;

pub use cache::{CacheEntry, CachedValue, IndicatorCache, DEFAULT_CACHE_TTL};
pub use config::{CombinationPolicy, MonitorConfig, Thresholds};
pub use evaluator::{
    change_trigger, evaluate_any_trigger, evaluate_require_all, price_trigger, sentiment_trigger,
    INSUFFICIENT_DATA,
};
pub use history::{PriceHistory, DEFAULT_HISTORY_CAPACITY};
pub use monitor::MarketMonitor;
