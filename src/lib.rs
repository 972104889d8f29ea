//! Mission Index - in-memory indexing engine for mission scripting hosts
//!
//! Two independent primitives that callers own and feed:
//! - [`cache::CacheStore`]: Redis-like key/value store with LRU eviction and lazy TTL expiry
//! - [`geo::GeoGrid`]: uniform-cell spatial index answering radius queries over typed entities
//!
//! The [`api`] module wraps one instance of each behind an HTTP host.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;

pub use api::AppState;
pub use cache::{CacheStore, CacheValue};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{IndexError, Result};
pub use geo::{GeoGrid, Point, QueryResult};
