//! Physics module for collision detection and response
//!
//! Provides parametric line/ray colliders for hit scanning and rotated
//! rectangle overlap resolution for tank, shot and map-object collisions.

pub mod collision;

pub use collision::{LineContacts, Penetration, Projection, RotatedRectangle};
