//! Geo Module
//!
//! Uniform-cell spatial index over typed, moving entities on the x/z plane.

mod grid;
mod point;
mod query;

#[cfg(test)]
mod property_tests;

pub use grid::{Entity, GeoGrid};
pub use point::{CellKey, Point};
pub use query::{result_key, QueryResult};
