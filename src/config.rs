//! Configuration Module
//!
//! Handles loading and managing host configuration from environment variables.

use std::env;

use crate::cache::CacheStore;
use crate::error::Result;
use crate::geo::GeoGrid;

/// Host configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum number of cache entries, None = unbounded
    pub cache_capacity: Option<usize>,
    /// Edge length of a grid cell, in map units
    pub grid_cell_size: f64,
    /// Entity kinds the grid accepts
    pub grid_kinds: Vec<String>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries, 0 = unbounded (default: 1000)
    /// - `GRID_CELL_SIZE` - Grid cell edge length (default: 2000)
    /// - `GRID_KINDS` - Comma separated kinds (default: Unit,Static,Track)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .map(|c| (c > 0).then_some(c))
                .unwrap_or(defaults.cache_capacity),
            grid_cell_size: env::var("GRID_CELL_SIZE")
                .ok()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|size| size.is_finite() && *size > 0.0)
                .unwrap_or(defaults.grid_cell_size),
            grid_kinds: env::var("GRID_KINDS")
                .ok()
                .map(|v| parse_kinds(&v))
                .filter(|kinds| !kinds.is_empty())
                .unwrap_or(defaults.grid_kinds),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.server_port),
        }
    }

    /// Builds the cache instance described by this configuration.
    pub fn build_cache(&self) -> CacheStore {
        CacheStore::new(self.cache_capacity)
    }

    /// Builds the grid instance described by this configuration.
    pub fn build_grid(&self) -> Result<GeoGrid> {
        GeoGrid::new(self.grid_cell_size, self.grid_kinds.iter().cloned())
    }
}

fn parse_kinds(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|kind| !kind.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: Some(1000),
            grid_cell_size: 2000.0,
            grid_kinds: parse_kinds("Unit,Static,Track"),
            server_port: 3000,
        }
    }
}
