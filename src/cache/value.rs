//! Cache Value Module
//!
//! Closed set of value shapes the cache can hold.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// == Cache Value ==
/// A value stored in the cache.
///
/// Serializes untagged, so JSON `true`, `4.5`, `"text"` and `{...}` map
/// directly onto the variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CacheValue {
    Boolean(bool),
    Number(f64),
    String(String),
    Table(BTreeMap<String, CacheValue>),
}

impl CacheValue {
    // == Kind ==
    /// Returns the type label reported by `TYPE`.
    pub fn kind(&self) -> ValueKind {
        match self {
            CacheValue::Boolean(_) => ValueKind::Boolean,
            CacheValue::Number(_) => ValueKind::Number,
            CacheValue::String(_) => ValueKind::String,
            CacheValue::Table(_) => ValueKind::Table,
        }
    }

    // == Numeric Coercion ==
    /// Coerces the value to a number the way `INCR` needs it.
    ///
    /// Numbers pass through and strings holding a finite decimal number are
    /// parsed. Everything else is non-numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CacheValue::Number(n) => Some(*n),
            CacheValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CacheValue::Boolean(_) | CacheValue::Table(_) => None,
        }
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        CacheValue::String(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        CacheValue::String(value)
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        CacheValue::Number(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        CacheValue::Number(value as f64)
    }
}

impl From<bool> for CacheValue {
    fn from(value: bool) -> Self {
        CacheValue::Boolean(value)
    }
}

impl From<BTreeMap<String, CacheValue>> for CacheValue {
    fn from(value: BTreeMap<String, CacheValue>) -> Self {
        CacheValue::Table(value)
    }
}

// == Value Kind ==
/// Type label of a key, `Absent` when the key is missing or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Table,
    #[serde(rename = "none")]
    Absent,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Table => "table",
            ValueKind::Absent => "none",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(CacheValue::from(3.5_f64).as_number(), Some(3.5));
        assert_eq!(CacheValue::from(" 42 ").as_number(), Some(42.0));
        assert_eq!(CacheValue::from("abc").as_number(), None);
        assert_eq!(CacheValue::from("inf").as_number(), None);
        assert_eq!(CacheValue::from(true).as_number(), None);
        assert_eq!(CacheValue::Table(BTreeMap::new()).as_number(), None);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(CacheValue::from("x").kind().as_str(), "string");
        assert_eq!(CacheValue::from(1i64).kind().as_str(), "number");
        assert_eq!(CacheValue::from(false).kind().as_str(), "boolean");
        assert_eq!(CacheValue::Table(BTreeMap::new()).kind().as_str(), "table");
        assert_eq!(ValueKind::Absent.to_string(), "none");
    }

    #[test]
    fn test_untagged_json() {
        let value: CacheValue =
            serde_json::from_str(r#"{"callsign":"Enfield","alive":true,"fuel":0.6}"#).unwrap();

        let CacheValue::Table(map) = &value else {
            panic!("expected table, got {value:?}");
        };
        assert_eq!(map["callsign"], CacheValue::from("Enfield"));
        assert_eq!(map["alive"], CacheValue::from(true));
        assert_eq!(map["fuel"], CacheValue::from(0.6_f64));

        assert_eq!(serde_json::to_string(&ValueKind::Absent).unwrap(), r#""none""#);
    }
}
