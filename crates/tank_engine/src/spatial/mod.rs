//! Spatial partitioning data structures
//!
//! Provides broad-phase indexing so collision code only runs narrow-phase
//! rectangle tests against objects that share grid cells with the query.

mod grid;
mod spatial_query;

pub use grid::{GridError, GridLocation, MapGrid, DEFAULT_GRID_SIZE};
pub use spatial_query::SpatialIndex;
