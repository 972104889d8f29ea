//! API Routes
//!
//! Configures the Axum router with all host endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_entity_handler, change_kind_handler, decr_handler, delete_handler, expire_handler,
    flush_handler, get_handler, grid_stats_handler, health_handler, incr_handler, keys_handler,
    move_entity_handler, persist_handler, query_handler, remove_entity_handler, set_handler,
    setnx_handler, stats_handler, ttl_handler, type_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cache_routes = Router::new()
        .route("/set", put(set_handler))
        .route("/setnx", put(setnx_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/flush", delete(flush_handler))
        .route("/incr", post(incr_handler))
        .route("/decr", post(decr_handler))
        .route("/keys", get(keys_handler))
        .route("/ttl/:key", get(ttl_handler))
        .route("/type/:key", get(type_handler))
        .route("/expire", post(expire_handler))
        .route("/persist/:key", post(persist_handler))
        .route("/stats", get(stats_handler));

    let grid_routes = Router::new()
        .route("/entities", post(add_entity_handler))
        .route("/entities/:id", delete(remove_entity_handler))
        .route("/entities/:id/position", put(move_entity_handler))
        .route("/entities/:id/kind", put(change_kind_handler))
        .route("/query", post(query_handler))
        .route("/stats", get(grid_stats_handler));

    Router::new()
        .nest("/cache", cache_routes)
        .nest("/grid", grid_routes)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
