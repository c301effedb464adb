//! Core domain types for the market regime monitor.
//!
//! This crate provides the fundamental types shared by the feed, monitor
//! and bot crates:
//! - `ConditionSnapshot`: one reading of all three indicators
//! - `SwitchDecision`: a mode-switch verdict with its justification
//! - `PriceObservation`, `PriceSnapshot`: price history records
//! - `TradingMode`: the two postures the decision feeds into
//! - `calculate_rsi`: the pure momentum oscillator
//! - `Clock`: time source abstraction for TTL checks

pub mod clock;
pub mod rsi;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use rsi::{calculate_rsi, DEFAULT_RSI_PERIOD, NEUTRAL_RSI};
pub use types::{
    ConditionSnapshot, IndicatorKey, PriceObservation, PriceSnapshot, SentimentReading,
    SwitchDecision, TradingMode,
};
