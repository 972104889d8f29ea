//! Response DTOs for the host API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, CacheValue, Ttl, ValueKind};

/// TTL reported for a key that is missing or expired.
pub const TTL_MISSING: f64 = -2.0;

/// Response body for GET /cache/get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: CacheValue,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: CacheValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /cache/set and PUT /cache/setnx
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Human readable outcome
    pub message: String,
    pub key: String,
    /// False when setnx found the key already present
    pub stored: bool,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, stored: bool) -> Self {
        let key = key.into();
        let message = if stored {
            format!("Key '{}' set successfully", key)
        } else {
            format!("Key '{}' already exists", key)
        };
        Self {
            message,
            key,
            stored,
        }
    }
}

/// Response body for DELETE /cache/del/:key and DELETE /grid/entities/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub key: String,
    /// Number of keys or entities actually removed
    pub removed: usize,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, removed: usize) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
            removed,
        }
    }
}

/// Response body for POST /cache/incr and POST /cache/decr
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    pub key: String,
    pub value: f64,
}

/// Response body for GET /cache/keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub pattern: String,
    pub keys: Vec<String>,
}

/// Response body for GET /cache/type/:key
#[derive(Debug, Clone, Serialize)]
pub struct TypeResponse {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ValueKind,
}

/// Response body for GET /cache/ttl/:key
///
/// `ttl` is the remaining seconds, `-1` for keys without expiry and `-2`
/// for missing keys.
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    pub ttl: f64,
}

impl TtlResponse {
    pub fn new(key: impl Into<String>, ttl: Option<Ttl>) -> Self {
        Self {
            key: key.into(),
            ttl: ttl.map(|t| t.as_seconds()).unwrap_or(TTL_MISSING),
        }
    }
}

/// Response body for boolean commands (expire, persist)
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub key: String,
    pub ok: bool,
}

/// Response body for GET /cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Entries held, expired-but-unpurged included
    pub total_entries: usize,
    /// Live keys only
    pub live_keys: usize,
    pub capacity: Option<usize>,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, live_keys: usize, capacity: Option<usize>) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            live_keys,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for GET /grid/stats
#[derive(Debug, Clone, Serialize)]
pub struct GridStatsResponse {
    pub size: usize,
    pub cells: usize,
    pub cell_size: f64,
    pub kinds: Vec<String>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
