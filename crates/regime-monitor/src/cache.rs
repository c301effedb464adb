//! Time-to-live cache for derived indicators.
//!
//! One entry per [`IndicatorKey`]. Entries are never removed: `put`
//! overwrites, and `get` ignores entries older than the TTL.

use dashmap::DashMap;
use regime_core::{Clock, IndicatorKey};
use std::sync::Arc;
use std::time::Duration;

/// Default entry lifetime.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// A cached indicator value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CachedValue {
    /// Continuous indicator (RSI, percent change).
    Number(f64),
    /// Integer index (sentiment).
    Index(u32),
}

impl CachedValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<u32> {
        match self {
            Self::Index(v) => Some(*v),
            Self::Number(_) => None,
        }
    }
}

/// Cache entry with capture time.
#[derive(Debug, Clone, Copy)]
pub struct CacheEntry {
    pub captured_at_ms: u64,
    pub value: CachedValue,
}

/// Indicator cache keyed by [`IndicatorKey`].
pub struct IndicatorCache {
    entries: DashMap<IndicatorKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl IndicatorCache {
    /// Create a cache with the given TTL and time source.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Fresh value for `key`, or `None` if absent or expired.
    pub fn get(&self, key: IndicatorKey) -> Option<CachedValue> {
        let entry = self.entries.get(&key)?;
        let age_ms = self.clock.now_ms().saturating_sub(entry.captured_at_ms);
        if u128::from(age_ms) < self.ttl.as_millis() {
            Some(entry.value)
        } else {
            None
        }
    }

    /// Store `value`, replacing any previous entry and stamping the current time.
    pub fn put(&self, key: IndicatorKey, value: CachedValue) {
        let entry = CacheEntry {
            captured_at_ms: self.clock.now_ms(),
            value,
        };
        self.entries.insert(key, entry);
    }

    /// Raw entry regardless of age.
    pub fn entry(&self, key: IndicatorKey) -> Option<CacheEntry> {
        self.entries.get(&key).map(|e| *e)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
