//! Bounded log of recent price observations.
//!
//! Chronological FIFO: once `capacity` is reached, each push evicts the
//! oldest observation.

use parking_lot::Mutex;
use regime_core::PriceObservation;
use std::collections::VecDeque;

/// Default number of observations retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Price history ring.
pub struct PriceHistory {
    observations: Mutex<VecDeque<PriceObservation>>,
    capacity: usize,
}

impl PriceHistory {
    /// Create an empty ring. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            observations: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append an observation, evicting the oldest beyond capacity.
    pub fn push(&self, observation: PriceObservation) {
        let mut observations = self.observations.lock();
        observations.push_back(observation);
        while observations.len() > self.capacity {
            observations.pop_front();
        }
    }

    /// Most recent observation.
    pub fn latest(&self) -> Option<PriceObservation> {
        self.observations.lock().back().copied()
    }

    /// Copy of all observations, oldest first.
    pub fn snapshot(&self) -> Vec<PriceObservation> {
        self.observations.lock().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.observations.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PriceHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn obs(i: i64) -> PriceObservation {
        PriceObservation {
            observed_at: Utc.timestamp_opt(1_700_000_000 + i, 0).unwrap(),
            price: 60_000.0 + i as f64,
            change_1h_pct: 0.1,
        }
    }

    #[test]
    fn test_empty_history() {
        let history = PriceHistory::default();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.capacity(), 100);
    }

    #[test]
    fn test_latest_is_last_pushed() {
        let history = PriceHistory::default();
        history.push(obs(1));
        history.push(obs(2));
        assert_eq!(history.latest().unwrap().price, 60_002.0);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_bound_after_150_pushes() {
        let history = PriceHistory::default();
        for i in 0..150 {
            history.push(obs(i));
            assert!(history.len() <= 100);
        }

        let all = history.snapshot();
        assert_eq!(all.len(), 100);
        assert_eq!(all.first().unwrap().price, 60_050.0);
        assert_eq!(all.last().unwrap().price, 60_149.0);
        assert!(all.windows(2).all(|w| w[0].observed_at < w[1].observed_at));
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let history = PriceHistory::new(0);
        history.push(obs(1));
        history.push(obs(2));
        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().unwrap().price, 60_002.0);
    }
}
