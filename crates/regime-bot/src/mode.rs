//! Trading posture state machine.
//!
//! Holds the current [`TradingMode`] and, on each tick, asks the monitor
//! only about the direction that would change it.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use regime_core::TradingMode;
use regime_monitor::{MarketMonitor, Thresholds};
use regime_telemetry::Metrics;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A completed mode change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeTransition {
    pub from: TradingMode,
    pub to: TradingMode,
    pub reason: String,
    pub at: DateTime<Utc>,
}

/// Switches between conservative and bull postures.
pub struct ModeSwitcher {
    monitor: Arc<MarketMonitor>,
    bull: Thresholds,
    conservative: Thresholds,
    mode: Mutex<TradingMode>,
    last_reason: Mutex<Option<String>>,
}

impl ModeSwitcher {
    pub fn new(
        monitor: Arc<MarketMonitor>,
        initial: TradingMode,
        bull: Thresholds,
        conservative: Thresholds,
    ) -> Self {
        Metrics::mode_set(initial.as_str());
        Self {
            monitor,
            bull,
            conservative,
            mode: Mutex::new(initial),
            last_reason: Mutex::new(None),
        }
    }

    pub fn mode(&self) -> TradingMode {
        *self.mode.lock()
    }

    /// Reason attached to the most recent evaluation.
    pub fn last_reason(&self) -> Option<String> {
        self.last_reason.lock().clone()
    }

    pub fn monitor(&self) -> &Arc<MarketMonitor> {
        &self.monitor
    }

    /// Evaluate once. Returns the transition when the mode flipped.
    pub async fn tick(&self) -> Option<ModeTransition> {
        let from = self.mode();
        let to = from.opposite();
        let decision = match to {
            TradingMode::Bull => self.monitor.should_switch_to_bull(&self.bull).await,
            TradingMode::Conservative => {
                self.monitor
                    .should_switch_to_conservative(&self.conservative)
                    .await
            }
        };

        *self.last_reason.lock() = Some(decision.reason.clone());

        if !decision.should_switch {
            debug!(mode = %from, reason = %decision.reason, "Mode unchanged");
            return None;
        }

        *self.mode.lock() = to;
        Metrics::mode_set(to.as_str());
        info!(%from, %to, reason = %decision.reason, "Trading mode switched");

        Some(ModeTransition {
            from,
            to,
            reason: decision.reason,
            at: Utc::now(),
        })
    }
}
