//! Request and Response models for the host API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AddEntityRequest, ChangeKindRequest, CounterRequest, ExpireRequest, KeysQuery,
    MoveEntityRequest, RadiusQueryRequest, SetNxRequest, SetRequest,
};
pub use responses::{
    AckResponse, CounterResponse, DeleteResponse, ErrorResponse, GetResponse, GridStatsResponse,
    HealthResponse, KeysResponse, SetResponse, StatsResponse, TtlResponse, TypeResponse,
};
