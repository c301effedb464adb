//! Market conditions monitor.
//!
//! Owns the indicator cache and the price history ring and exposes the
//! surface the trading engine consults:
//! - per-indicator getters (RSI, sentiment, hourly price change)
//! - `check_all_conditions` for a full snapshot
//! - `should_switch_to_bull` / `should_switch_to_conservative`
//!
//! Every public method is infallible from the caller's view: upstream and
//! parse failures are logged and surface as `None` or a negative decision.
//! Each call fetches at most once per indicator and never retries.

use crate::cache::{CachedValue, IndicatorCache, DEFAULT_CACHE_TTL};
use crate::config::{CombinationPolicy, MonitorConfig, Thresholds};
use crate::evaluator::{change_trigger, evaluate_require_all, price_trigger, sentiment_trigger};
use crate::history::PriceHistory;
use chrono::{DateTime, Utc};
use regime_core::{
    calculate_rsi, Clock, ConditionSnapshot, IndicatorKey, PriceObservation, PriceSnapshot,
    SwitchDecision, SystemClock, TradingMode,
};
use regime_feed::{DynMarketDataSource, FeedError, FeedResult};
use regime_telemetry::Metrics;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Metric label for the fallback ticker fetch.
const TICKER_LABEL: &str = "ticker";

fn outcome_label(err: &FeedError) -> &'static str {
    match err {
        FeedError::InsufficientData { .. } => "insufficient",
        _ => "error",
    }
}

/// Market conditions monitor.
///
/// Construct once and share as `Arc<MarketMonitor>`; the cache and ring
/// are safe for concurrent callers.
pub struct MarketMonitor {
    source: DynMarketDataSource,
    cache: IndicatorCache,
    history: PriceHistory,
    clock: Arc<dyn Clock>,
    config: MonitorConfig,
}

impl MarketMonitor {
    /// Create a monitor using the system clock.
    pub fn new(source: DynMarketDataSource, config: MonitorConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    /// Create a monitor with an explicit time source.
    pub fn with_clock(
        source: DynMarketDataSource,
        config: MonitorConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = IndicatorCache::new(DEFAULT_CACHE_TTL, clock.clone());
        let history = PriceHistory::new(config.history_capacity);
        Self {
            source,
            cache,
            history,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn policy(&self) -> CombinationPolicy {
        self.config.policy
    }

    pub fn history(&self) -> &PriceHistory {
        &self.history
    }

    pub fn cache(&self) -> &IndicatorCache {
        &self.cache
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.clock.now_ms() as i64).unwrap_or_else(Utc::now)
    }

    fn cached(&self, key: IndicatorKey) -> Option<CachedValue> {
        match self.cache.get(key) {
            Some(value) => {
                Metrics::cache_hit(key.as_str());
                debug!(indicator = %key, ?value, "Cache hit");
                Some(value)
            }
            None => {
                Metrics::cache_miss(key.as_str());
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // RSI
    // ------------------------------------------------------------------

    /// BTC RSI over `period` hourly candles.
    ///
    /// A fresh cached value is returned regardless of `period`.
    pub async fn get_btc_rsi(&self, period: usize) -> Option<f64> {
        if let Some(value) = self.cached(IndicatorKey::Rsi).and_then(|v| v.as_number()) {
            return Some(value);
        }

        match self.fetch_rsi(period).await {
            Ok(rsi) => {
                Metrics::fetch(IndicatorKey::Rsi.as_str(), "ok");
                Metrics::indicator_value(IndicatorKey::Rsi.as_str(), rsi);
                Some(rsi)
            }
            Err(e) => {
                Metrics::fetch(IndicatorKey::Rsi.as_str(), outcome_label(&e));
                warn!(error = %e, period, "BTC RSI unavailable");
                None
            }
        }
    }

    /// RSI with the configured default period.
    pub async fn get_btc_rsi_default(&self) -> Option<f64> {
        self.get_btc_rsi(self.config.rsi_period).await
    }

    async fn fetch_rsi(&self, period: usize) -> FeedResult<f64> {
        let needed = period.checked_add(1).ok_or(FeedError::InsufficientData {
            needed: usize::MAX,
            got: 0,
        })?;
        let closes = self.source.hourly_closes(needed).await?;
        if closes.len() < needed {
            return Err(FeedError::InsufficientData {
                needed,
                got: closes.len(),
            });
        }

        let rsi = calculate_rsi(&closes, period);
        self.cache.put(IndicatorKey::Rsi, CachedValue::Number(rsi));
        info!(rsi = format!("{rsi:.2}"), period, "BTC RSI computed");
        Ok(rsi)
    }

    // ------------------------------------------------------------------
    // Sentiment
    // ------------------------------------------------------------------

    /// Fear & greed index, 0 (extreme fear) to 100 (extreme greed).
    pub async fn get_fear_greed_index(&self) -> Option<u32> {
        if let Some(value) = self
            .cached(IndicatorKey::Sentiment)
            .and_then(|v| v.as_index())
        {
            return Some(value);
        }

        match self.fetch_sentiment().await {
            Ok(value) => {
                Metrics::fetch(IndicatorKey::Sentiment.as_str(), "ok");
                Metrics::indicator_value(IndicatorKey::Sentiment.as_str(), f64::from(value));
                Some(value)
            }
            Err(e) => {
                Metrics::fetch(IndicatorKey::Sentiment.as_str(), outcome_label(&e));
                warn!(error = %e, "Fear & Greed index unavailable");
                None
            }
        }
    }

    async fn fetch_sentiment(&self) -> FeedResult<u32> {
        let reading = self.source.latest_sentiment().await?;
        self.cache
            .put(IndicatorKey::Sentiment, CachedValue::Index(reading.value));
        info!(
            value = reading.value,
            classification = reading.classification.as_deref().unwrap_or("unknown"),
            "Fear & Greed index fetched"
        );
        Ok(reading.value)
    }

    // ------------------------------------------------------------------
    // Price change
    // ------------------------------------------------------------------

    /// Signed BTC percentage change over the last completed hour.
    pub async fn get_btc_price_change_1h(&self) -> Option<f64> {
        if let Some(value) = self
            .cached(IndicatorKey::PriceChange1h)
            .and_then(|v| v.as_number())
        {
            return Some(value);
        }

        match self.fetch_price_change().await {
            Ok(change) => {
                Metrics::fetch(IndicatorKey::PriceChange1h.as_str(), "ok");
                Metrics::indicator_value(IndicatorKey::PriceChange1h.as_str(), change);
                Some(change)
            }
            Err(e) => {
                Metrics::fetch(IndicatorKey::PriceChange1h.as_str(), outcome_label(&e));
                warn!(error = %e, "BTC 1h price change unavailable");
                None
            }
        }
    }

    async fn fetch_price_change(&self) -> FeedResult<f64> {
        let closes = self.source.hourly_closes(2).await?;
        let &[.., prior, current] = closes.as_slice() else {
            return Err(FeedError::InsufficientData {
                needed: 2,
                got: closes.len(),
            });
        };
        if prior == 0.0 {
            return Err(FeedError::Parse("prior close is zero".to_string()));
        }

        let change = (current - prior) / prior * 100.0;

        self.history.push(PriceObservation {
            observed_at: self.now(),
            price: current,
            change_1h_pct: change,
        });
        self.cache
            .put(IndicatorKey::PriceChange1h, CachedValue::Number(change));

        info!(
            change_pct = format!("{change:+.2}"),
            prior = format!("{prior:.2}"),
            current = format!("{current:.2}"),
            "BTC 1h price change computed"
        );
        Ok(change)
    }

    // ------------------------------------------------------------------
    // Composite price
    // ------------------------------------------------------------------

    /// Current BTC price plus hourly growth.
    ///
    /// Refreshes the price change first (filling the history ring), then
    /// takes the newest ring price, falling back to the ticker when the
    /// ring is empty. `None` only when no price can be found at all.
    pub async fn get_price_snapshot(&self) -> Option<PriceSnapshot> {
        let growth = self.get_btc_price_change_1h().await;

        let price = match self.history.latest() {
            Some(observation) => observation.price,
            None => match self.source.latest_price().await {
                Ok(price) => {
                    Metrics::fetch(TICKER_LABEL, "ok");
                    price
                }
                Err(e) => {
                    Metrics::fetch(TICKER_LABEL, outcome_label(&e));
                    warn!(error = %e, "BTC ticker price unavailable");
                    return None;
                }
            },
        };

        Some(PriceSnapshot {
            price,
            growth_1h_pct: growth.unwrap_or(0.0),
        })
    }

    // ------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------

    /// Snapshot of all three indicators.
    ///
    /// Each indicator is fetched independently; one failure leaves only
    /// its own field empty.
    pub async fn check_all_conditions(&self) -> ConditionSnapshot {
        let rsi = self.get_btc_rsi(self.config.rsi_period).await;
        let sentiment = self.get_fear_greed_index().await;
        let change = self.get_btc_price_change_1h().await;

        let snapshot = ConditionSnapshot {
            rsi,
            sentiment_index: sentiment,
            price_change_1h_pct: change,
            captured_at: self.now(),
        };

        info!(conditions = %snapshot, "Market conditions");
        snapshot
    }

    // ------------------------------------------------------------------
    // Decisions
    // ------------------------------------------------------------------

    /// Should the engine switch into the bull posture?
    pub async fn should_switch_to_bull(&self, thresholds: &Thresholds) -> SwitchDecision {
        self.evaluate(TradingMode::Bull, thresholds).await
    }

    /// Should the engine switch into the conservative posture?
    pub async fn should_switch_to_conservative(&self, thresholds: &Thresholds) -> SwitchDecision {
        self.evaluate(TradingMode::Conservative, thresholds).await
    }

    /// Evaluate a switch into `target` under the configured policy.
    pub async fn evaluate(&self, target: TradingMode, thresholds: &Thresholds) -> SwitchDecision {
        if let Err(e) = thresholds.validate() {
            error!(%target, error = %e, "Invalid switch thresholds");
            let decision = SwitchDecision::hold(format!("Error: {e}"));
            Metrics::decision(target.as_str(), decision.should_switch);
            return decision;
        }

        let decision = match self.config.policy {
            CombinationPolicy::RequireAll => {
                let snapshot = self.check_all_conditions().await;
                let price = match thresholds.price {
                    Some(_) => self.get_price_snapshot().await.map(|p| p.price),
                    None => None,
                };
                evaluate_require_all(target, &snapshot, price, thresholds)
            }
            CombinationPolicy::AnyTrigger => self.first_trigger(target, thresholds).await,
        };

        Metrics::decision(target.as_str(), decision.should_switch);
        info!(
            %target,
            policy = ?self.config.policy,
            should_switch = decision.should_switch,
            reason = %decision.reason,
            "Mode switch evaluated"
        );
        decision
    }

    /// Any-trigger evaluation. Each input is fetched only once every
    /// earlier trigger has failed to fire.
    async fn first_trigger(&self, target: TradingMode, thresholds: &Thresholds) -> SwitchDecision {
        if thresholds.price.is_some() {
            let price = self.get_price_snapshot().await.map(|p| p.price);
            if let Some(decision) = price_trigger(target, price, thresholds) {
                return decision;
            }
        }

        let change = self.get_btc_price_change_1h().await;
        if let Some(decision) = change_trigger(target, change, thresholds) {
            return decision;
        }

        let sentiment = self.get_fear_greed_index().await;
        sentiment_trigger(target, sentiment, thresholds)
            .unwrap_or_else(SwitchDecision::no_signal)
    }
}
