//! Request DTOs for the host API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::{CacheValue, MAX_KEY_LENGTH};
use crate::geo::Point;

/// Request body for PUT /cache/set
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON boolean, number, string or object
/// - `ttl`: Optional TTL in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: CacheValue,
    #[serde(default)]
    pub ttl: Option<f64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(error_msg) = validate_key(&self.key) {
            return Some(error_msg);
        }
        if let Some(ttl) = self.ttl {
            if !ttl.is_finite() || ttl <= 0.0 {
                return Some("TTL must be a positive number of seconds".to_string());
            }
        }
        None
    }
}

/// Request body for PUT /cache/setnx
///
/// setnx never sets an expiry, so a `ttl` field is rejected rather than
/// silently dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetNxRequest {
    pub key: String,
    pub value: CacheValue,
}

impl SetNxRequest {
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} characters",
            MAX_KEY_LENGTH
        ));
    }
    None
}

fn default_amount() -> f64 {
    1.0
}

/// Request body for POST /cache/incr and POST /cache/decr
#[derive(Debug, Clone, Deserialize)]
pub struct CounterRequest {
    pub key: String,
    #[serde(default = "default_amount")]
    pub amount: f64,
}

/// Request body for POST /cache/expire
#[derive(Debug, Clone, Deserialize)]
pub struct ExpireRequest {
    pub key: String,
    pub seconds: f64,
}

/// Query string for GET /cache/keys
#[derive(Debug, Clone, Deserialize)]
pub struct KeysQuery {
    #[serde(default = "match_all")]
    pub pattern: String,
}

fn match_all() -> String {
    ".*".to_string()
}

/// Request body for POST /grid/entities
#[derive(Debug, Clone, Deserialize)]
pub struct AddEntityRequest {
    pub kind: String,
    pub id: String,
    pub x: f64,
    pub z: f64,
}

impl AddEntityRequest {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.z)
    }
}

/// Request body for PUT /grid/entities/:id/position
#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntityRequest {
    pub x: f64,
    pub z: f64,
}

/// Request body for PUT /grid/entities/:id/kind
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeKindRequest {
    pub kind: String,
}

/// Request body for POST /grid/query
#[derive(Debug, Clone, Deserialize)]
pub struct RadiusQueryRequest {
    pub x: f64,
    pub z: f64,
    pub radius: f64,
    pub kinds: Vec<String>,
}
