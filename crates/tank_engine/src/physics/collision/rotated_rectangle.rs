//! Oriented rectangles with separating-axis overlap resolution
//!
//! Tanks, shots and map objects all collide as rotated rectangles. Two
//! rectangles are tested on the four axes given by their edge normals; if any
//! axis separates their projections they do not touch. Otherwise the axis with
//! the smallest overlap gives the minimum translation vector that pushes the
//! first rectangle out of the second.
//!
//! Screen conventions apply: y grows downwards, so the "upper" corners have the
//! smaller local y, and positive rotation turns clockwise on screen.

use super::Projection;
use crate::foundation::math::{utils::rotate, Vec2};

/// Result of an overlap test between two rectangles that touch or intersect.
///
/// Moving the first rectangle by `projection * overlap` separates the pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Penetration depth along `projection`; zero for rectangles that only touch
    pub overlap: f32,
    /// Unit separation axis pointing away from the other rectangle
    pub projection: Vec2,
}

impl Penetration {
    /// Translation that resolves the overlap
    pub fn translation(&self) -> Vec2 {
        self.projection * self.overlap
    }
}

/// A rectangle rotated about its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatedRectangle {
    position: Vec2,
    size: Vec2,
    rotation: f32,
}

impl RotatedRectangle {
    /// Creates a rectangle centered on `position`, rotated by `rotation` radians
    pub const fn new(position: Vec2, size: Vec2, rotation: f32) -> Self {
        Self {
            position,
            size,
            rotation,
        }
    }

    /// Creates an unrotated rectangle centered on `position`
    pub const fn axis_aligned(position: Vec2, size: Vec2) -> Self {
        Self::new(position, size, 0.0)
    }

    /// Creates an unrotated rectangle from its upper-left corner
    pub fn from_upper_left(corner: Vec2, size: Vec2) -> Self {
        Self::axis_aligned(corner + size / 2.0, size)
    }

    /// Center of the rectangle
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Width and height before rotation
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Rotation in radians
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Move the center to `position`
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Change the width and height
    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Change the rotation
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    /// Move the center by `offset`
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Copy of this rectangle moved to `position` and `rotation`
    #[must_use]
    pub const fn moved_to(&self, position: Vec2, rotation: f32) -> Self {
        Self::new(position, self.size, rotation)
    }

    fn corner(&self, local: Vec2) -> Vec2 {
        self.position + rotate(&local, self.rotation)
    }

    /// Upper-left corner in world space
    pub fn upper_left(&self) -> Vec2 {
        self.corner(Vec2::new(-self.size.x, -self.size.y) / 2.0)
    }

    /// Upper-right corner in world space
    pub fn upper_right(&self) -> Vec2 {
        self.corner(Vec2::new(self.size.x, -self.size.y) / 2.0)
    }

    /// Lower-right corner in world space
    pub fn lower_right(&self) -> Vec2 {
        self.corner(Vec2::new(self.size.x, self.size.y) / 2.0)
    }

    /// Lower-left corner in world space
    pub fn lower_left(&self) -> Vec2 {
        self.corner(Vec2::new(-self.size.x, self.size.y) / 2.0)
    }

    /// All four corners, clockwise on screen from the upper-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.upper_left(),
            self.upper_right(),
            self.lower_right(),
            self.lower_left(),
        ]
    }

    /// The two unit edge normals of this rectangle
    pub fn axes(&self) -> [Vec2; 2] {
        let (sin, cos) = self.rotation.sin_cos();
        [Vec2::new(cos, sin), Vec2::new(-sin, cos)]
    }

    /// Smallest axis-aligned `(min, max)` box containing the rectangle
    pub fn bounding_box(&self) -> (Vec2, Vec2) {
        let corners = self.corners();
        corners[1..].iter().fold((corners[0], corners[0]), |(min, max), corner| {
            (min.inf(corner), max.sup(corner))
        })
    }

    /// Project the corners onto `axis`
    pub fn project(&self, axis: &Vec2) -> Projection {
        let [a, b, c, d] = self.corners().map(|corner| corner.dot(axis));
        Projection::new(a.min(b).min(c).min(d), a.max(b).max(c).max(d))
    }

    /// Whether the two rectangles touch or overlap
    pub fn intersects(&self, other: &Self) -> bool {
        self.separating_axes(other)
            .iter()
            .all(|axis| self.project(axis).overlaps(&other.project(axis)))
    }

    /// Minimum translation that pushes this rectangle out of `other`.
    ///
    /// Returns `None` when a separating axis exists. Rectangles that share only
    /// an edge or corner report a penetration with zero overlap.
    pub fn penetration(&self, other: &Self) -> Option<Penetration> {
        let mut best: Option<(f32, Vec2)> = None;

        for axis in self.separating_axes(other) {
            let ours = self.project(&axis);
            let theirs = other.project(&axis);
            if !ours.overlaps(&theirs) {
                return None;
            }

            let overlap = ours.overlap(&theirs);
            if best.map_or(true, |(smallest, _)| overlap < smallest) {
                best = Some((overlap, axis));
            }
        }

        let (overlap, mut axis) = best?;
        if (self.position - other.position).dot(&axis) < 0.0 {
            axis = -axis;
        }

        Some(Penetration {
            overlap: overlap.max(0.0),
            projection: axis,
        })
    }

    fn separating_axes(&self, other: &Self) -> [Vec2; 4] {
        let [a, b] = self.axes();
        let [c, d] = other.axes();
        [a, b, c, d]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::{HALF_PI, QUARTER_PI};
    use approx::assert_relative_eq;

    fn square(x: f32, y: f32, side: f32) -> RotatedRectangle {
        RotatedRectangle::axis_aligned(Vec2::new(x, y), Vec2::new(side, side))
    }

    #[test]
    fn test_corners_follow_rotation() {
        let rect = RotatedRectangle::new(Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0), HALF_PI);
        let upper_left = rect.upper_left();
        // (-2, -1) turned a quarter clockwise on screen lands on (1, -2)
        assert_relative_eq!(upper_left.x, 11.0, epsilon = 1e-5);
        assert_relative_eq!(upper_left.y, 8.0, epsilon = 1e-5);

        let (min, max) = rect.bounding_box();
        assert_relative_eq!(min.x, 9.0, epsilon = 1e-5);
        assert_relative_eq!(min.y, 8.0, epsilon = 1e-5);
        assert_relative_eq!(max.x, 11.0, epsilon = 1e-5);
        assert_relative_eq!(max.y, 12.0, epsilon = 1e-5);
    }

    #[test]
    fn test_from_upper_left() {
        let rect = RotatedRectangle::from_upper_left(Vec2::new(-10.0, 0.0), Vec2::new(4.0, 6.0));
        assert_eq!(rect.position(), Vec2::new(-8.0, 3.0));
        assert_eq!(rect.upper_left(), Vec2::new(-10.0, 0.0));
        assert_eq!(rect.lower_right(), Vec2::new(-6.0, 6.0));
    }

    #[test]
    fn test_mutation_updates_corners() {
        let mut rect = square(0.0, 0.0, 2.0);
        let before = rect.upper_left();
        rect.translate(Vec2::new(5.0, 0.0));
        assert_eq!(rect.upper_left(), before + Vec2::new(5.0, 0.0));

        rect.set_size(Vec2::new(4.0, 4.0));
        assert_eq!(rect.upper_left(), Vec2::new(3.0, -2.0));

        rect.set_position(Vec2::zeros());
        rect.set_rotation(QUARTER_PI);
        let (min, _) = rect.bounding_box();
        assert_relative_eq!(min.x, -(8.0_f32).sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_separated_rectangles() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(5.0, 0.0, 2.0);
        assert!(!a.intersects(&b));
        assert!(a.penetration(&b).is_none());
    }

    #[test]
    fn test_rotated_separation_found_on_other_axes() {
        // Bounding boxes overlap, but the diamond's own axes separate them
        let a = square(0.0, 0.0, 2.0);
        let diamond = RotatedRectangle::new(Vec2::new(2.3, 2.3), Vec2::new(2.0, 2.0), QUARTER_PI);
        assert!(!a.intersects(&diamond));
        assert!(!diamond.intersects(&a));
    }

    #[test]
    fn test_penetration_pushes_out_along_smallest_axis() {
        let tank = square(0.0, 0.0, 4.0);
        let wall = RotatedRectangle::axis_aligned(Vec2::new(3.5, 0.0), Vec2::new(4.0, 20.0));

        let hit = tank.penetration(&wall).unwrap();
        assert_relative_eq!(hit.overlap, 0.5, epsilon = 1e-5);
        assert_relative_eq!(hit.projection.x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.projection.y, 0.0, epsilon = 1e-5);

        let mut resolved = tank;
        resolved.translate(hit.translation());
        let after = resolved.penetration(&wall).unwrap();
        assert_relative_eq!(after.overlap, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_penetration_is_symmetric() {
        let a = RotatedRectangle::new(Vec2::new(0.0, 0.0), Vec2::new(6.0, 4.86), 0.3);
        let b = RotatedRectangle::new(Vec2::new(3.0, 1.0), Vec2::new(10.0, 10.0), -0.2);

        assert_eq!(a.intersects(&b), b.intersects(&a));

        let ab = a.penetration(&b).unwrap();
        let ba = b.penetration(&a).unwrap();
        assert_relative_eq!(ab.overlap, ba.overlap, epsilon = 1e-4);
        assert_relative_eq!(ab.projection.x, -ba.projection.x, epsilon = 1e-5);
        assert_relative_eq!(ab.projection.y, -ba.projection.y, epsilon = 1e-5);
    }

    #[test]
    fn test_touching_is_a_zero_depth_collision() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(2.0, 0.0, 2.0);
        assert!(a.intersects(&b));

        let hit = a.penetration(&b).unwrap();
        assert_relative_eq!(hit.overlap, 0.0);
        assert_relative_eq!(hit.projection.x, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_contained_rectangle_escapes_the_short_way() {
        let big = square(0.0, 0.0, 100.0);
        let small = square(45.0, 0.0, 4.0);

        let hit = small.penetration(&big).unwrap();
        // Leaving through the near (right) edge needs 7 units
        assert_relative_eq!(hit.overlap, 7.0, epsilon = 1e-4);
        assert_relative_eq!(hit.projection.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_overlap_is_idempotent() {
        let a = RotatedRectangle::new(Vec2::new(1.0, 2.0), Vec2::new(6.0, 4.86), 1.1);
        let b = RotatedRectangle::new(Vec2::new(3.0, 1.0), Vec2::new(5.0, 5.0), 0.4);
        let first = a.penetration(&b).unwrap();
        let second = a.penetration(&b).unwrap();
        assert_eq!(first.overlap.to_bits(), second.overlap.to_bits());
        assert_eq!(first.projection, second.projection);
    }
}
