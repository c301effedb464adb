//! Market data sources for the regime monitor.
//!
//! Wraps the public exchange candle/ticker API and the fear & greed index
//! API behind the [`MarketDataSource`] trait.

pub mod client;
pub mod config;
pub mod error;
pub mod source;

pub use client::{parse_kline_closes, HttpMarketData};
pub use config::FeedConfig;
pub use error::{FeedError, FeedResult};
pub use source::{BoxFuture, DynMarketDataSource, MarketDataSource, MockMarketData};
