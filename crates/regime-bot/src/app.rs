//! Application wiring and the poll loop.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::mode::ModeSwitcher;
use regime_core::{ConditionSnapshot, SwitchDecision};
use regime_feed::{DynMarketDataSource, HttpMarketData};
use regime_monitor::MarketMonitor;
use regime_telemetry::Metrics;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    monitor: Arc<MarketMonitor>,
    switcher: ModeSwitcher,
}

impl Application {
    /// Create the application against the live HTTP feeds.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let source: DynMarketDataSource = Arc::new(HttpMarketData::new(config.feed.clone())?);
        Ok(Self::with_source(config, source))
    }

    /// Create the application against any market data source.
    pub fn with_source(config: AppConfig, source: DynMarketDataSource) -> Self {
        let monitor = Arc::new(MarketMonitor::new(source, config.monitor.clone()));
        let switcher = ModeSwitcher::new(
            monitor.clone(),
            config.initial_mode,
            config.bull,
            config.conservative,
        );
        Self {
            config,
            monitor,
            switcher,
        }
    }

    pub fn monitor(&self) -> &Arc<MarketMonitor> {
        &self.monitor
    }

    pub fn switcher(&self) -> &ModeSwitcher {
        &self.switcher
    }

    /// Fetch every indicator once.
    pub async fn snapshot(&self) -> ConditionSnapshot {
        self.monitor.check_all_conditions().await
    }

    /// Evaluate both directions once: (to bull, to conservative).
    pub async fn check(&self) -> (SwitchDecision, SwitchDecision) {
        let bull = self.monitor.should_switch_to_bull(&self.config.bull).await;
        let conservative = self
            .monitor
            .should_switch_to_conservative(&self.config.conservative)
            .await;
        (bull, conservative)
    }

    /// Poll until Ctrl-C.
    pub async fn run(self) -> AppResult<()> {
        info!(
            mode = %self.switcher.mode(),
            interval_secs = self.config.poll_interval_secs,
            policy = ?self.config.monitor.policy,
            "Starting mode monitor"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut transitions = 0u64;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Some(transition) = self.switcher.tick().await {
                        transitions += 1;
                        info!(
                            from = %transition.from,
                            to = %transition.to,
                            transitions,
                            "Mode transition"
                        );
                    }
                    if self.config.metrics_dump {
                        self.dump_metrics();
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!(mode = %self.switcher.mode(), transitions, "Shutting down");
        Ok(())
    }

    fn dump_metrics(&self) {
        match Metrics::gather_text() {
            Ok(text) => info!(metrics = %text, "Metrics snapshot"),
            Err(e) => warn!(error = %e, "Failed to gather metrics"),
        }
    }
}
