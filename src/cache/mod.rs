//! Cache Module
//!
//! Provides in-memory caching with lazy TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::{CacheEntry, Ttl};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use value::{CacheValue, ValueKind};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
