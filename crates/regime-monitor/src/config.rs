//! Monitor configuration and decision thresholds.

use crate::history::DEFAULT_HISTORY_CAPACITY;
use regime_core::DEFAULT_RSI_PERIOD;
use serde::{Deserialize, Serialize};

/// How individual indicator checks combine into one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationPolicy {
    /// RSI, sentiment and price change must all pass.
    #[default]
    RequireAll,
    /// First passing trigger wins: price breakout, then growth/decline, then sentiment.
    AnyTrigger,
}

/// Threshold set for one switch direction.
///
/// For the bull direction indicators must be strictly above these values,
/// for the conservative direction strictly below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// RSI threshold (0-100).
    pub rsi: f64,
    /// Sentiment index threshold (0-100).
    pub sentiment: u32,
    /// Hourly price change threshold in percent (growth for bull, decline for conservative).
    pub price_change_pct: f64,
    /// Optional absolute price breakout level.
    #[serde(default)]
    pub price: Option<f64>,
}

impl Thresholds {
    /// Defaults for switching into the bull posture.
    pub fn bull_default() -> Self {
        Self {
            rsi: 60.0,
            sentiment: 60,
            price_change_pct: 3.0,
            price: None,
        }
    }

    /// Defaults for switching into the conservative posture.
    pub fn conservative_default() -> Self {
        Self {
            rsi: 40.0,
            sentiment: 50,
            price_change_pct: -2.0,
            price: None,
        }
    }

    /// Reject non-finite numbers and out-of-range indices.
    pub fn validate(&self) -> Result<(), String> {
        if !self.rsi.is_finite() || !(0.0..=100.0).contains(&self.rsi) {
            return Err(format!("rsi threshold ({}) must be within 0-100", self.rsi));
        }
        if self.sentiment > 100 {
            return Err(format!(
                "sentiment threshold ({}) must be within 0-100",
                self.sentiment
            ));
        }
        if !self.price_change_pct.is_finite() {
            return Err(format!(
                "price change threshold ({}) must be finite",
                self.price_change_pct
            ));
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price <= 0.0 {
                return Err(format!("price threshold ({price}) must be positive"));
            }
        }
        Ok(())
    }
}

/// Monitor configuration.
///
/// The indicator cache TTL is fixed at [`crate::DEFAULT_CACHE_TTL`] and is
/// not configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Price history ring size. Default: 100.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// RSI lookback in candles. Default: 14.
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    /// Decision combination policy. Default: require_all.
    #[serde(default)]
    pub policy: CombinationPolicy,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            rsi_period: default_rsi_period(),
            policy: CombinationPolicy::default(),
        }
    }
}

impl MonitorConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.rsi_period == 0 {
            return Err("rsi_period must be positive".to_string());
        }
        if self.history_capacity == 0 {
            return Err("history_capacity must be positive".to_string());
        }
        Ok(())
    }
}
