//! Indicator readings, decisions and trading modes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cache key for each derived indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKey {
    /// BTC hourly RSI.
    Rsi,
    /// Fear & greed sentiment index.
    Sentiment,
    /// BTC change over the last completed hour, in percent.
    PriceChange1h,
}

impl IndicatorKey {
    /// Stable label used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Sentiment => "sentiment",
            Self::PriceChange1h => "price_change_1h",
        }
    }
}

impl fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest sentiment data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// 0 = extreme fear, 100 = extreme greed.
    pub value: u32,
    /// Source label, e.g. "Greed".
    pub classification: Option<String>,
}

/// One price sample recorded by the price-change fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub observed_at: DateTime<Utc>,
    pub price: f64,
    pub change_1h_pct: f64,
}

/// Absolute price plus hourly growth, for price-breakout checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub price: f64,
    /// Falls back to 0.0 when the change could not be derived.
    pub growth_1h_pct: f64,
}

/// All three indicators captured at one moment.
///
/// Any field may be `None` when its source failed; that is a normal state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSnapshot {
    pub rsi: Option<f64>,
    pub sentiment_index: Option<u32>,
    pub price_change_1h_pct: Option<f64>,
    pub captured_at: DateTime<Utc>,
}

impl ConditionSnapshot {
    /// Snapshot with every indicator missing.
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        Self {
            rsi: None,
            sentiment_index: None,
            price_change_1h_pct: None,
            captured_at,
        }
    }

    /// True when all three indicators are present.
    pub fn is_complete(&self) -> bool {
        self.rsi.is_some() && self.sentiment_index.is_some() && self.price_change_1h_pct.is_some()
    }

    /// Names of the indicators that are missing.
    pub fn missing(&self) -> Vec<IndicatorKey> {
        let mut missing = Vec::new();
        if self.rsi.is_none() {
            missing.push(IndicatorKey::Rsi);
        }
        if self.sentiment_index.is_none() {
            missing.push(IndicatorKey::Sentiment);
        }
        if self.price_change_1h_pct.is_none() {
            missing.push(IndicatorKey::PriceChange1h);
        }
        missing
    }
}

impl fmt::Display for ConditionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rsi = self
            .rsi
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "N/A".to_string());
        let fg = self
            .sentiment_index
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let change = self
            .price_change_1h_pct
            .map(|v| format!("{v:+.2}%"))
            .unwrap_or_else(|| "N/A".to_string());
        write!(f, "RSI={rsi}, F&G={fg}, BTC 1h={change}")
    }
}

/// Verdict of a mode-switch check.
///
/// `reason` is human-readable log text, not a stable protocol. Callers
/// should branch on `should_switch`; a reason starting with
/// `"Insufficient data for decision"` or `"Error: "` accompanies a
/// negative verdict caused by missing inputs or invalid thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchDecision {
    pub should_switch: bool,
    pub reason: String,
}

impl SwitchDecision {
    /// Positive decision.
    pub fn switch(reason: impl Into<String>) -> Self {
        Self {
            should_switch: true,
            reason: reason.into(),
        }
    }

    /// Negative decision with an explanation.
    pub fn hold(reason: impl Into<String>) -> Self {
        Self {
            should_switch: false,
            reason: reason.into(),
        }
    }

    /// Negative decision with no explanation.
    pub fn no_signal() -> Self {
        Self::hold(String::new())
    }

    /// Tuple form used by callers that only branch on the flag.
    pub fn into_parts(self) -> (bool, String) {
        (self.should_switch, self.reason)
    }
}

/// Trading posture selected from the decision output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    /// Defensive posture.
    #[default]
    Conservative,
    /// Aggressive posture.
    Bull,
}

impl TradingMode {
    /// The mode a switch from `self` leads to.
    pub fn opposite(self) -> Self {
        match self {
            Self::Conservative => Self::Bull,
            Self::Bull => Self::Conservative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Bull => "bull",
        }
    }
}

impl fmt::Display for TradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
