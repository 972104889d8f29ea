//! API Module
//!
//! HTTP handlers and routing for the host that owns the engine instances.
//!
//! # Endpoints
//! - `/cache/*` - Key/value commands (set, setnx, get, del, incr, keys, ttl, ...)
//! - `/grid/*` - Entity tracking and radius queries
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
