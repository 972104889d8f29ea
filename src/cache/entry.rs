//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use crate::cache::CacheValue;

// == Cache Entry ==
/// Represents a single cache entry with value and expiry metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored value
    pub value: CacheValue,
    /// Absolute expiry time in clock seconds, None = no expiration
    pub expires_at: Option<f64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    /// * `now` - Current clock reading used to anchor the TTL
    pub fn new(value: CacheValue, ttl_seconds: Option<f64>, now: f64) -> Self {
        Self {
            value,
            expires_at: ttl_seconds.map(|ttl| now + ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to the expiration time.
    pub fn is_expired(&self, now: f64) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0.0)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self, now: f64) -> Option<f64> {
        self.expires_at.map(|expires| (expires - now).max(0.0))
    }
}

// == TTL Reading ==
/// Remaining lifetime of a live key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ttl {
    /// Key never expires
    Persistent,
    /// Seconds left before the key expires
    Remaining(f64),
}

impl Ttl {
    /// Redis-style number: remaining seconds, or `-1` for persistent keys.
    pub fn as_seconds(&self) -> f64 {
        match self {
            Ttl::Persistent => -1.0,
            Ttl::Remaining(seconds) => *seconds,
        }
    }
}
