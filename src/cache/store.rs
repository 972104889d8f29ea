//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and lazy
//! TTL expiration. Expired entries are only noticed when a command touches
//! them (or when the caller asks for `purge_expired`); nothing sweeps in the
//! background.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::cache::{
    CacheEntry, CacheStats, CacheValue, LruTracker, Ttl, ValueKind, MAX_KEY_LENGTH,
};
use crate::clock::{Clock, SystemClock};
use crate::error::{IndexError, Result};

// == Cache Store ==
/// Key/value store with optional LRU capacity and per-key TTL.
///
/// Every key in `entries` is tracked by `lru` and vice versa.
#[derive(Debug)]
pub struct CacheStore<C: Clock = SystemClock> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, None = unbounded
    capacity: Option<usize>,
    clock: C,
}

impl CacheStore<SystemClock> {
    // == Constructor ==
    /// Creates a store driven by the system clock.
    ///
    /// A capacity of `Some(0)` is treated as unbounded.
    pub fn new(capacity: Option<usize>) -> Self {
        Self::with_clock(capacity, SystemClock::new())
    }
}

impl<C: Clock> CacheStore<C> {
    /// Creates a store reading time from `clock`.
    pub fn with_clock(capacity: Option<usize>, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: capacity.filter(|&c| c > 0),
            clock,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns None if the key is missing or expired; an expired entry is
    /// removed on the way. A hit moves the key to the head of the LRU order.
    pub fn get(&mut self, key: &str) -> Option<CacheValue> {
        let now = self.clock.now();
        self.purge_if_expired(key, now);

        let value = self.entries.get(key).map(|entry| entry.value.clone());
        match value {
            Some(value) => {
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Batched `get`, one slot per requested key.
    pub fn mget(&mut self, keys: &[&str]) -> Vec<Option<CacheValue>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL in seconds.
    ///
    /// Overwriting resets the TTL: to `now + ttl` when given, cleared
    /// otherwise. If the insertion takes the store over capacity, least
    /// recently used entries are evicted until it fits.
    pub fn set(&mut self, key: &str, value: CacheValue, ttl: Option<f64>) -> Result<()> {
        validate_key(key)?;
        if let Some(ttl) = ttl {
            validate_ttl(ttl)?;
        }

        let now = self.clock.now();
        self.insert(key, CacheEntry::new(value, ttl, now));
        Ok(())
    }

    /// Sets the key only if it holds no live value.
    ///
    /// Returns `Ok(false)` without touching anything when the key exists.
    pub fn setnx(&mut self, key: &str, value: CacheValue) -> Result<bool> {
        validate_key(key)?;

        let now = self.clock.now();
        self.purge_if_expired(key, now);
        if self.entries.contains_key(key) {
            return Ok(false);
        }

        self.insert(key, CacheEntry::new(value, None, now));
        Ok(true)
    }

    /// `set` with a mandatory TTL.
    pub fn setex(&mut self, key: &str, ttl: f64, value: CacheValue) -> Result<()> {
        self.set(key, value, Some(ttl))
    }

    /// Sets the key and returns the live value it held before, if any.
    pub fn getset(&mut self, key: &str, value: CacheValue) -> Result<Option<CacheValue>> {
        validate_key(key)?;

        let now = self.clock.now();
        self.purge_if_expired(key, now);
        let previous = self.entries.get(key).map(|entry| entry.value.clone());

        self.insert(key, CacheEntry::new(value, None, now));
        Ok(previous)
    }

    /// Sets several keys without TTL. No key is written if any is invalid.
    pub fn mset(&mut self, pairs: &[(&str, CacheValue)]) -> Result<()> {
        for (key, _) in pairs {
            validate_key(key)?;
        }

        let now = self.clock.now();
        for (key, value) in pairs {
            self.insert(key, CacheEntry::new(value.clone(), None, now));
        }
        Ok(())
    }

    // == Delete ==
    /// Removes the given keys and returns how many live keys were deleted.
    ///
    /// Expired keys are purged but not counted.
    pub fn del(&mut self, keys: &[&str]) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        for key in keys {
            if self.purge_if_expired(key, now) {
                continue;
            }
            if self.entries.remove(*key).is_some() {
                self.lru.remove(key);
                removed += 1;
            }
        }

        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Exists ==
    /// True if the key holds a live value. Does not touch recency.
    pub fn exists(&self, key: &str) -> bool {
        self.live(key).is_some()
    }

    // == Counters ==
    /// Adds one to the number stored at `key`.
    pub fn incr(&mut self, key: &str) -> Result<f64> {
        self.incr_by(key, 1.0)
    }

    /// Subtracts one from the number stored at `key`.
    pub fn decr(&mut self, key: &str) -> Result<f64> {
        self.incr_by(key, -1.0)
    }

    pub fn decr_by(&mut self, key: &str, amount: f64) -> Result<f64> {
        self.incr_by(key, -amount)
    }

    /// Adds `amount` to the number stored at `key` and returns the result.
    ///
    /// Missing keys count as zero. Numeric strings are coerced and the
    /// result is stored as a number. A live TTL is kept. Non-numeric values
    /// fail with `NotNumeric`, and a sum that leaves the finite range fails
    /// with `InvalidRequest`; either way the entry stays untouched.
    pub fn incr_by(&mut self, key: &str, amount: f64) -> Result<f64> {
        validate_key(key)?;
        if !amount.is_finite() {
            return Err(IndexError::InvalidRequest(format!(
                "Increment must be a finite number, got {}",
                amount
            )));
        }

        let now = self.clock.now();
        self.purge_if_expired(key, now);

        let (current, expires_at) = match self.entries.get(key) {
            Some(entry) => match entry.value.as_number() {
                Some(number) => (number, entry.expires_at),
                None => return Err(IndexError::NotNumeric(key.to_string())),
            },
            None => (0.0, None),
        };

        let next = current + amount;
        if !next.is_finite() {
            return Err(IndexError::InvalidRequest(format!(
                "Counter '{}' would overflow",
                key
            )));
        }

        self.insert(
            key,
            CacheEntry {
                value: CacheValue::Number(next),
                expires_at,
            },
        );
        Ok(next)
    }

    // == Keys ==
    /// Returns the live keys matching a regular expression, sorted.
    ///
    /// Patterns are unanchored, so a plain word matches as a substring and
    /// `^`/`$` anchor as usual. An invalid pattern yields no keys.
    pub fn keys(&self, pattern: &str) -> Vec<String> {
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                warn!(pattern, error = %err, "rejected key pattern");
                return Vec::new();
            }
        };

        let now = self.clock.now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && regex.is_match(key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort_unstable();
        keys
    }

    // == Type ==
    /// Returns the type label of the value at `key`.
    pub fn value_type(&self, key: &str) -> ValueKind {
        self.live(key)
            .map(|entry| entry.value.kind())
            .unwrap_or(ValueKind::Absent)
    }

    // == TTL ==
    /// Remaining lifetime of `key`, None if absent or expired.
    pub fn ttl(&self, key: &str) -> Option<Ttl> {
        let now = self.clock.now();
        self.live(key).map(|entry| match entry.ttl_remaining(now) {
            Some(remaining) => Ttl::Remaining(remaining),
            None => Ttl::Persistent,
        })
    }

    /// Sets a new TTL on a live key. Returns false if the key is absent.
    ///
    /// A non-positive TTL expires the key immediately.
    pub fn expire(&mut self, key: &str, seconds: f64) -> bool {
        if !seconds.is_finite() {
            return false;
        }

        let now = self.clock.now();
        self.purge_if_expired(key, now);

        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        entry.expires_at = Some(now + seconds);

        if seconds <= 0.0 {
            self.purge_if_expired(key, now);
        }
        true
    }

    /// Removes the TTL from a live key. Returns false if the key is absent.
    pub fn persist(&mut self, key: &str) -> bool {
        let now = self.clock.now();
        self.purge_if_expired(key, now);

        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = None;
                true
            }
            None => false,
        }
    }

    // == Size ==
    /// Number of live keys.
    pub fn dbsize(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Removes every entry.
    pub fn flushdb(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Cleanup Expired ==
    /// Physically removes all expired entries and returns how many went.
    ///
    /// Only runs when called; the store never schedules it.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        let count = expired_keys.len();
        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of entries held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys from most to least recently used, expired-but-unpurged included.
    pub fn recency_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.lru.iter()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    // == Internals ==
    fn live(&self, key: &str) -> Option<&CacheEntry> {
        let now = self.clock.now();
        self.entries.get(key).filter(|entry| !entry.is_expired(now))
    }

    /// Drops `key` if it is expired at `now`. Returns true if it was.
    fn purge_if_expired(&mut self, key: &str, now: f64) -> bool {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(now));

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            debug!(key, "purged expired entry");
        }
        expired
    }

    /// Writes an entry, marks it most recent and enforces capacity.
    fn insert(&mut self, key: &str, entry: CacheEntry) {
        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);

        if let Some(capacity) = self.capacity {
            while self.entries.len() > capacity {
                let Some(evicted) = self.lru.evict_oldest() else {
                    break;
                };
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, capacity, "evicted least recently used entry");
            }
        }

        debug_assert_eq!(self.entries.len(), self.lru.len());
        self.stats.set_total_entries(self.entries.len());
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(IndexError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(IndexError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

fn validate_ttl(ttl: f64) -> Result<()> {
    if ttl.is_finite() && ttl > 0.0 {
        Ok(())
    } else {
        Err(IndexError::InvalidRequest(format!(
            "TTL must be a positive number of seconds, got {}",
            ttl
        )))
    }
}
