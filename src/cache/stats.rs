//! Cache counters
//!
//! Lookup outcomes plus the two ways an entry can leave without a `del`:
//! LRU eviction and lazy TTL purge.

use serde::Serialize;

// == Cache Stats ==
/// Running counters for one [`CacheStore`](super::CacheStore).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// `get` calls that found a live value
    pub hits: u64,
    /// `get` calls on absent or expired keys
    pub misses: u64,
    /// Entries dropped from the tail of the recency list
    pub evictions: u64,
    /// Expired entries purged on access or by `purge_expired`
    pub expirations: u64,
    /// Entries held right now, including expired ones not yet purged
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total `get` calls seen.
    pub fn lookups(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }

    /// Share of lookups that hit, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits = self.hits.saturating_add(1);
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses = self.misses.saturating_add(1);
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions = self.evictions.saturating_add(1);
    }

    pub(crate) fn record_expirations(&mut self, purged: usize) {
        self.expirations = self.expirations.saturating_add(purged as u64);
    }

    pub(crate) fn set_total_entries(&mut self, held: usize) {
        self.total_entries = held;
    }
}
