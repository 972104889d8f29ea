//! API Handlers
//!
//! HTTP request handlers for the cache and grid endpoints.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{IndexError, Result};
use crate::geo::{Entity, GeoGrid, Point, QueryResult};
use crate::models::{
    AckResponse, AddEntityRequest, ChangeKindRequest, CounterRequest, CounterResponse,
    DeleteResponse, ExpireRequest, GetResponse, GridStatsResponse, HealthResponse, KeysQuery,
    KeysResponse, MoveEntityRequest, RadiusQueryRequest, SetNxRequest, SetRequest, SetResponse,
    StatsResponse, TtlResponse, TypeResponse,
};

/// Application state shared across all handlers.
///
/// The engine is single threaded, so each instance sits behind its own
/// lock and every handler takes it for the duration of one command.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<CacheStore>>,
    pub grid: Arc<RwLock<GeoGrid>>,
}

impl AppState {
    /// Creates a new AppState owning the given instances.
    pub fn new(cache: CacheStore, grid: GeoGrid) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            grid: Arc::new(RwLock::new(grid)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.build_cache(), config.build_grid()?))
    }
}

// == Cache Handlers ==

/// Handler for PUT /cache/set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(IndexError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.set(&req.key, req.value, req.ttl)?;

    Ok(Json(SetResponse::new(req.key, true)))
}

/// Handler for PUT /cache/setnx
pub async fn setnx_handler(
    State(state): State<AppState>,
    Json(req): Json<SetNxRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(IndexError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    let stored = cache.setnx(&req.key, req.value)?;

    Ok(Json(SetResponse::new(req.key, stored)))
}

/// Handler for GET /cache/get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: a hit moves the key in the LRU order
    let mut cache = state.cache.write().await;
    let value = cache
        .get(&key)
        .ok_or_else(|| IndexError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    let removed = cache.del(&[key.as_str()]);
    if removed == 0 {
        return Err(IndexError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for DELETE /cache/flush
pub async fn flush_handler(State(state): State<AppState>) -> Json<DeleteResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.dbsize();
    cache.flushdb();

    Json(DeleteResponse::new("*", removed))
}

/// Handler for POST /cache/incr
pub async fn incr_handler(
    State(state): State<AppState>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<CounterResponse>> {
    let mut cache = state.cache.write().await;
    let value = cache.incr_by(&req.key, req.amount)?;

    Ok(Json(CounterResponse {
        key: req.key,
        value,
    }))
}

/// Handler for POST /cache/decr
pub async fn decr_handler(
    State(state): State<AppState>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<CounterResponse>> {
    let mut cache = state.cache.write().await;
    let value = cache.decr_by(&req.key, req.amount)?;

    Ok(Json(CounterResponse {
        key: req.key,
        value,
    }))
}

/// Handler for GET /cache/keys?pattern=
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(query): Query<KeysQuery>,
) -> Json<KeysResponse> {
    let cache = state.cache.read().await;
    let keys = cache.keys(&query.pattern);

    Json(KeysResponse {
        pattern: query.pattern,
        keys,
    })
}

/// Handler for GET /cache/ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<TtlResponse> {
    let cache = state.cache.read().await;
    let ttl = cache.ttl(&key);

    Json(TtlResponse::new(key, ttl))
}

/// Handler for GET /cache/type/:key
pub async fn type_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<TypeResponse> {
    let cache = state.cache.read().await;
    let kind = cache.value_type(&key);

    Json(TypeResponse { key, kind })
}

/// Handler for POST /cache/expire
pub async fn expire_handler(
    State(state): State<AppState>,
    Json(req): Json<ExpireRequest>,
) -> Result<Json<AckResponse>> {
    let mut cache = state.cache.write().await;
    if !cache.expire(&req.key, req.seconds) {
        return Err(IndexError::NotFound(req.key));
    }

    Ok(Json(AckResponse {
        key: req.key,
        ok: true,
    }))
}

/// Handler for POST /cache/persist/:key
pub async fn persist_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<AckResponse>> {
    let mut cache = state.cache.write().await;
    if !cache.persist(&key) {
        return Err(IndexError::NotFound(key));
    }

    Ok(Json(AckResponse { key, ok: true }))
}

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;

    Json(StatsResponse::new(
        &cache.stats(),
        cache.dbsize(),
        cache.capacity(),
    ))
}

// == Grid Handlers ==

/// Handler for POST /grid/entities
pub async fn add_entity_handler(
    State(state): State<AppState>,
    Json(req): Json<AddEntityRequest>,
) -> Result<(StatusCode, Json<Entity<String>>)> {
    let mut grid = state.grid.write().await;
    grid.add(&req.kind, req.id.clone(), req.position())?;

    let entity = grid
        .get(&req.id)
        .cloned()
        .ok_or_else(|| IndexError::Internal(format!("entity {} vanished after add", req.id)))?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// Handler for DELETE /grid/entities/:id
pub async fn remove_entity_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut grid = state.grid.write().await;
    if !grid.remove(&id) {
        return Err(IndexError::UnknownId(id));
    }

    Ok(Json(DeleteResponse::new(id, 1)))
}

/// Handler for PUT /grid/entities/:id/position
pub async fn move_entity_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveEntityRequest>,
) -> Result<Json<Entity<String>>> {
    let mut grid = state.grid.write().await;
    grid.update_position(&id, Point::new(req.x, req.z))?;

    entity_snapshot(&grid, id)
}

/// Handler for PUT /grid/entities/:id/kind
pub async fn change_kind_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChangeKindRequest>,
) -> Result<Json<Entity<String>>> {
    let mut grid = state.grid.write().await;
    grid.change_type(&id, &req.kind)?;

    entity_snapshot(&grid, id)
}

/// Handler for POST /grid/query
pub async fn query_handler(
    State(state): State<AppState>,
    Json(req): Json<RadiusQueryRequest>,
) -> Json<QueryResult<String>> {
    let grid = state.grid.read().await;
    let kinds: Vec<&str> = req.kinds.iter().map(String::as_str).collect();

    Json(grid.query_radius(Point::new(req.x, req.z), req.radius, &kinds))
}

/// Handler for GET /grid/stats
pub async fn grid_stats_handler(State(state): State<AppState>) -> Json<GridStatsResponse> {
    let grid = state.grid.read().await;

    Json(GridStatsResponse {
        size: grid.size(),
        cells: grid.cell_count(),
        cell_size: grid.cell_size(),
        kinds: grid.kinds().to_vec(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

fn entity_snapshot(grid: &GeoGrid, id: String) -> Result<Json<Entity<String>>> {
    grid.get(&id)
        .cloned()
        .map(Json)
        .ok_or(IndexError::UnknownId(id))
}
