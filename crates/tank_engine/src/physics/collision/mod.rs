//! Collision detection primitives
//!
//! Provides narrow-phase collision tests between lines (or rays) and simple
//! shapes, plus separating-axis overlap tests between rotated rectangles.
//!
//! # Architecture
//!
//! - **Parametric Results**: line colliders report where along the line the
//!   shape is entered and left, as multiples of the direction vector
//! - **Pure Functions**: every collider is a stateless function of its inputs;
//!   identical inputs always produce identical results
//! - **Explicit Misses**: "no contact" is `None`, never a NaN sentinel
//! - **Rays by Clipping**: ray queries run the line query and clip the
//!   resulting interval to non-negative time
//!
//! # Module Organization
//!
//! - [`contacts`] - The [`LineContacts`] interval type
//! - [`line2`] / [`line3`] - Infinite line colliders in 2D and 3D
//! - [`ray2`] / [`ray3`] - Half-line adapters over the line colliders
//! - [`primitives`] - Line, ray and shape value types with trait-based queries
//! - [`projection`] - Interval projections used by the separating axis test
//! - [`rotated_rectangle`] - Oriented rectangle overlap and minimum translation
//!
//! # Key Types
//!
//! - [`LineContacts`] - Entry/exit parametric times of a line crossing a shape
//! - [`RotatedRectangle`] - Oriented bounds of sprites and map objects
//! - [`Penetration`] - Overlap depth and separation axis of two rectangles

pub mod contacts;
pub mod line2;
pub mod line3;
pub mod primitives;
pub mod projection;
pub mod ray2;
pub mod ray3;
pub mod rotated_rectangle;

mod slab;

#[cfg(test)]
mod properties;

// Re-export commonly used types
pub use contacts::LineContacts;
pub use primitives::{
    Aabb2, Aabb3, Disc2, Line2, Line3, LineShape2, LineShape3, Plane3, Ray2, Ray3, Segment2,
    Side, Sphere3, Triangle2, Triangle3,
};
pub use projection::Projection;
pub use rotated_rectangle::{Penetration, RotatedRectangle};
