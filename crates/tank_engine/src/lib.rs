//! # Tank Engine
//!
//! Geometry and simulation support for the Angry Tanks client.
//!
//! ## Features
//!
//! - **Parametric Line Colliders**: line and ray queries against lines, discs,
//!   boxes, triangles, planes and spheres in 2D and 3D
//! - **Rotated Rectangles**: separating-axis overlap tests with minimum
//!   translation vectors for tank and shot collision response
//! - **Spatial Indexing**: a uniform map grid that pre-filters collision candidates
//! - **Foundation**: nalgebra math aliases, frame timing, logging setup
//! - **Configuration**: TOML/RON backed configuration files
//!
//! ## Quick Start
//!
//! ```rust
//! use tank_engine::prelude::*;
//!
//! let contacts = line2::disc_contacts(Vec2::new(-3.0, 0.0), Vec2::x(), 2.0)
//!     .expect("line crosses the disc");
//! assert!((contacts.entry_time - 1.0).abs() < 1e-6);
//! assert!((contacts.exit_time - 5.0).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig},
        foundation::{
            math::{Vec2, Vec3},
            time::{GameTime, Timer},
        },
        physics::collision::{
            line2, line3, ray2, ray3, LineContacts, LineShape2, LineShape3, Penetration,
            Projection, RotatedRectangle,
        },
        spatial::{GridError, MapGrid, SpatialIndex},
    };
}
