//! Abstract spatial query interface for broad-phase collision detection
//!
//! The world talks to its index only through [`SpatialIndex`], so the uniform
//! grid can be swapped for another partitioning scheme without touching the
//! collision code.

use crate::physics::collision::RotatedRectangle;

/// Broad-phase index over keyed objects with rotated-rectangle bounds
pub trait SpatialIndex<K: Copy> {
    /// Insert an object; re-inserting an existing key replaces its bounds
    fn insert(&mut self, key: K, bounds: RotatedRectangle);

    /// Remove an object, returning whether it was present
    fn remove(&mut self, key: K) -> bool;

    /// Move an object to new bounds
    fn update(&mut self, key: K, bounds: RotatedRectangle) {
        self.remove(key);
        self.insert(key, bounds);
    }

    /// Keys of every object that may intersect `bounds`.
    ///
    /// Each key appears once; the order carries no meaning. Callers still
    /// have to run the exact narrow-phase test.
    fn potential_intersects(&self, bounds: &RotatedRectangle) -> Vec<K>;

    /// Remove every object
    fn clear(&mut self);

    /// Number of indexed objects
    fn len(&self) -> usize;

    /// Whether the index holds no objects
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
