//! Prometheus metrics for the regime monitor.
//!
//! Covers:
//! - Indicator fetch outcomes
//! - Cache hit/miss counts
//! - Last computed indicator values
//! - Mode-switch decisions and the active mode
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A failure means duplicate metric
//! names, which is a startup bug; it can only happen on first access.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, CounterVec, Encoder, GaugeVec, TextEncoder,
};

/// Indicator fetch attempts.
/// Labels: indicator (rsi/sentiment/price_change_1h/ticker), outcome (ok/error/insufficient)
pub static FETCH_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "regime_fetch_total",
        "Indicator fetch attempts by outcome",
        &["indicator", "outcome"]
    )
    .unwrap()
});

/// Indicator cache lookups.
/// Labels: indicator, result (hit/miss)
pub static CACHE_LOOKUPS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "regime_cache_lookups_total",
        "Indicator cache lookups",
        &["indicator", "result"]
    )
    .unwrap()
});

/// Last freshly computed value per indicator.
pub static INDICATOR_VALUE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "regime_indicator_value",
        "Last computed indicator value",
        &["indicator"]
    )
    .unwrap()
});

/// Mode-switch evaluations.
/// Labels: direction (bull/conservative), outcome (switch/hold)
pub static DECISIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "regime_decisions_total",
        "Mode-switch evaluations by outcome",
        &["direction", "outcome"]
    )
    .unwrap()
});

/// Active trading mode (1 = active, 0 = inactive).
pub static MODE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "regime_mode",
        "Active trading mode (1=active)",
        &["mode"]
    )
    .unwrap()
});

/// Known mode labels, kept in sync with `TradingMode::as_str`.
const MODE_LABELS: [&str; 2] = ["conservative", "bull"];

/// Metrics helper for recording values.
pub struct Metrics;

impl Metrics {
    /// Record a fetch outcome.
    pub fn fetch(indicator: &str, outcome: &str) {
        FETCH_TOTAL.with_label_values(&[indicator, outcome]).inc();
    }

    /// Record a cache hit.
    pub fn cache_hit(indicator: &str) {
        CACHE_LOOKUPS_TOTAL
            .with_label_values(&[indicator, "hit"])
            .inc();
    }

    /// Record a cache miss.
    pub fn cache_miss(indicator: &str) {
        CACHE_LOOKUPS_TOTAL
            .with_label_values(&[indicator, "miss"])
            .inc();
    }

    /// Record a freshly computed indicator value.
    pub fn indicator_value(indicator: &str, value: f64) {
        INDICATOR_VALUE.with_label_values(&[indicator]).set(value);
    }

    /// Record a decision.
    pub fn decision(direction: &str, should_switch: bool) {
        let outcome = if should_switch { "switch" } else { "hold" };
        DECISIONS_TOTAL
            .with_label_values(&[direction, outcome])
            .inc();
    }

    /// Set the active mode.
    pub fn mode_set(mode: &str) {
        for label in MODE_LABELS {
            let value = if label == mode { 1.0 } else { 0.0 };
            MODE.with_label_values(&[label]).set(value);
        }
    }

    /// Render the default registry in text exposition format.
    pub fn gather_text() -> TelemetryResult<String> {
        let families = prometheus::gather();
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buf)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buf).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_counter_increments() {
        let before = FETCH_TOTAL.with_label_values(&["rsi", "ok"]).get();
        Metrics::fetch("rsi", "ok");
        let after = FETCH_TOTAL.with_label_values(&["rsi", "ok"]).get();
        assert_eq!(after, before + 1.0);
    }

    #[test]
    fn test_mode_set_is_exclusive() {
        Metrics::mode_set("bull");
        assert_eq!(MODE.with_label_values(&["bull"]).get(), 1.0);
        assert_eq!(MODE.with_label_values(&["conservative"]).get(), 0.0);

        Metrics::mode_set("conservative");
        assert_eq!(MODE.with_label_values(&["bull"]).get(), 0.0);
        assert_eq!(MODE.with_label_values(&["conservative"]).get(), 1.0);
    }

    #[test]
    fn test_gather_text_contains_registered_metrics() {
        Metrics::decision("bull", true);
        Metrics::indicator_value("sentiment", 65.0);
        let text = Metrics::gather_text().unwrap();
        assert!(text.contains("regime_decisions_total"));
        assert!(text.contains("regime_indicator_value"));
    }
}
