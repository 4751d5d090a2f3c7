//! Primitive lines and shapes for parametric collision queries
//!
//! Wraps the free functions in [`line2`], [`line3`], [`ray2`] and [`ray3`]
//! behind small value types so callers can write
//! `Ray2::new(origin, heading).contacts_with(&target)`.

use super::{line2, line3, LineContacts};
use crate::foundation::math::{utils::cross2, Vec2, Vec3};

/// A 2D shape that an infinite line can be tested against
pub trait LineShape2 {
    /// Contacts of the line through `offset` along `direction` with this shape
    fn line_contacts(&self, offset: Vec2, direction: Vec2) -> Option<LineContacts>;

    /// Contacts of the ray from `origin` along `direction` with this shape
    fn ray_contacts(&self, origin: Vec2, direction: Vec2) -> Option<LineContacts> {
        self.line_contacts(origin, direction)?.clip_to_ray()
    }
}

/// A 3D shape that an infinite line can be tested against
pub trait LineShape3 {
    /// Contacts of the line through `offset` along `direction` with this shape
    fn line_contacts(&self, offset: Vec3, direction: Vec3) -> Option<LineContacts>;

    /// Contacts of the ray from `origin` along `direction` with this shape
    fn ray_contacts(&self, origin: Vec3, direction: Vec3) -> Option<LineContacts> {
        self.line_contacts(origin, direction)?.clip_to_ray()
    }
}

/// Which side of a directed line a point lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left of the line, or exactly on it
    Positive,
    /// Right of the line
    Negative,
}

/// An infinite line in 2D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    /// A point the line passes through
    pub offset: Vec2,
    /// Direction of the line; its length sets the unit of parametric time
    pub direction: Vec2,
}

impl Line2 {
    /// Creates a new line
    pub const fn new(offset: Vec2, direction: Vec2) -> Self {
        Self { offset, direction }
    }

    /// Get a point along the line at parametric time t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.offset + self.direction * t
    }

    /// The point on the line nearest to `location`
    pub fn closest_point_to(&self, location: Vec2) -> Vec2 {
        let t = (location - self.offset).dot(&self.direction) / self.direction.norm_squared();
        self.point_at(t)
    }

    /// Contacts of this line with a shape
    pub fn contacts_with(&self, shape: &impl LineShape2) -> Option<LineContacts> {
        shape.line_contacts(self.offset, self.direction)
    }
}

impl LineShape2 for Line2 {
    fn line_contacts(&self, offset: Vec2, direction: Vec2) -> Option<LineContacts> {
        line2::line_contacts(offset, direction, self.offset, self.direction)
    }
}

/// A half-line in 2D starting at `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray2 {
    /// The origin point of the ray
    pub origin: Vec2,
    /// Direction of the ray; its length sets the unit of parametric time
    pub direction: Vec2,
}

impl Ray2 {
    /// Creates a new ray
    pub const fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parametric time t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// The point on the ray nearest to `location`, never behind the origin
    pub fn closest_point_to(&self, location: Vec2) -> Vec2 {
        let t = (location - self.origin).dot(&self.direction) / self.direction.norm_squared();
        self.point_at(t.max(0.0))
    }

    /// Contacts of this ray with a shape
    pub fn contacts_with(&self, shape: &impl LineShape2) -> Option<LineContacts> {
        shape.ray_contacts(self.origin, self.direction)
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    /// Starting point
    pub start: Vec2,
    /// Ending point
    pub end: Vec2,
}

impl Segment2 {
    /// Creates a new segment
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        (self.end - self.start).norm()
    }

    /// The point on the segment nearest to `location`
    pub fn closest_point_to(&self, location: Vec2) -> Vec2 {
        let delta = self.end - self.start;
        let length_squared = delta.norm_squared();
        if length_squared == 0.0 {
            return self.start;
        }

        let t = (location - self.start).dot(&delta) / length_squared;
        self.start + delta * t.clamp(0.0, 1.0)
    }

    /// Which side of the segment's supporting line `point` lies on
    pub fn orientation(&self, point: Vec2) -> Side {
        if cross2(&(self.end - self.start), &(point - self.start)) >= 0.0 {
            Side::Positive
        } else {
            Side::Negative
        }
    }

    /// Contacts of the segment's supporting line with a shape, limited to
    /// the part between `start` (t = 0) and `end` (t = 1)
    pub fn contacts_with(&self, shape: &impl LineShape2) -> Option<LineContacts> {
        let contacts = shape.line_contacts(self.start, self.end - self.start)?;
        if contacts.exit_time < 0.0 || contacts.entry_time > 1.0 {
            return None;
        }
        Some(LineContacts::new(contacts.entry_time.max(0.0), contacts.exit_time.min(1.0)))
    }
}

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc2 {
    /// Center of the disc
    pub center: Vec2,
    /// Radius of the disc
    pub radius: f32,
}

impl Disc2 {
    /// Creates a new disc
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl LineShape2 for Disc2 {
    fn line_contacts(&self, offset: Vec2, direction: Vec2) -> Option<LineContacts> {
        line2::disc_contacts_at(offset, direction, self.center, self.radius)
    }
}

/// Axis-aligned box in 2D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb2 {
    /// Creates a box from its corners
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a box from its center and half-size
    pub fn from_center(center: Vec2, extents: Vec2) -> Self {
        Self::new(center - extents, center + extents)
    }

    /// Center of the box
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Half-size of the box
    pub fn extents(&self) -> Vec2 {
        (self.max - self.min) / 2.0
    }
}

impl LineShape2 for Aabb2 {
    fn line_contacts(&self, offset: Vec2, direction: Vec2) -> Option<LineContacts> {
        line2::aabb_contacts_between(offset, direction, self.min, self.max)
    }
}

/// A triangle in 2D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle2 {
    /// First vertex
    pub a: Vec2,
    /// Second vertex
    pub b: Vec2,
    /// Third vertex
    pub c: Vec2,
}

impl Triangle2 {
    /// Creates a new triangle
    pub const fn new(a: Vec2, b: Vec2, c: Vec2) -> Self {
        Self { a, b, c }
    }

    /// Average of the three vertices
    pub fn centroid(&self) -> Vec2 {
        (self.a + self.b + self.c) / 3.0
    }
}

impl LineShape2 for Triangle2 {
    fn line_contacts(&self, offset: Vec2, direction: Vec2) -> Option<LineContacts> {
        line2::triangle_contacts(offset, direction, self.a, self.b, self.c)
    }
}

/// An infinite line in 3D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    /// A point the line passes through
    pub offset: Vec3,
    /// Direction of the line; its length sets the unit of parametric time
    pub direction: Vec3,
}

impl Line3 {
    /// Creates a new line
    pub const fn new(offset: Vec3, direction: Vec3) -> Self {
        Self { offset, direction }
    }

    /// Get a point along the line at parametric time t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.offset + self.direction * t
    }

    /// The point on the line nearest to `location`
    pub fn closest_point_to(&self, location: Vec3) -> Vec3 {
        let t = (location - self.offset).dot(&self.direction) / self.direction.norm_squared();
        self.point_at(t)
    }

    /// Contacts of this line with a shape
    pub fn contacts_with(&self, shape: &impl LineShape3) -> Option<LineContacts> {
        shape.line_contacts(self.offset, self.direction)
    }
}

/// A half-line in 3D starting at `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray3 {
    /// The origin point of the ray
    pub origin: Vec3,
    /// Direction of the ray; its length sets the unit of parametric time
    pub direction: Vec3,
}

impl Ray3 {
    /// Creates a new ray
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at parametric time t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The point on the ray nearest to `location`, never behind the origin
    pub fn closest_point_to(&self, location: Vec3) -> Vec3 {
        let t = (location - self.origin).dot(&self.direction) / self.direction.norm_squared();
        self.point_at(t.max(0.0))
    }

    /// Contacts of this ray with a shape
    pub fn contacts_with(&self, shape: &impl LineShape3) -> Option<LineContacts> {
        shape.ray_contacts(self.origin, self.direction)
    }
}

/// An infinite plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3 {
    /// A point on the plane
    pub offset: Vec3,
    /// Plane normal, not necessarily unit length
    pub normal: Vec3,
}

impl Plane3 {
    /// Creates a new plane
    pub const fn new(offset: Vec3, normal: Vec3) -> Self {
        Self { offset, normal }
    }

    /// Signed distance of `point` from the plane in units of `normal`
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(&(point - self.offset)) / self.normal.norm()
    }
}

impl LineShape3 for Plane3 {
    fn line_contacts(&self, offset: Vec3, direction: Vec3) -> Option<LineContacts> {
        line3::plane_contacts(offset, direction, self.offset, self.normal)
    }
}

/// A solid sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere3 {
    /// Center of the sphere
    pub center: Vec3,
    /// Radius of the sphere
    pub radius: f32,
}

impl Sphere3 {
    /// Creates a new sphere
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Self) -> bool {
        let radius_sum = self.radius + other.radius;
        (self.center - other.center).norm_squared() <= radius_sum * radius_sum
    }
}

impl LineShape3 for Sphere3 {
    fn line_contacts(&self, offset: Vec3, direction: Vec3) -> Option<LineContacts> {
        line3::sphere_contacts_at(offset, direction, self.center, self.radius)
    }
}

/// Axis-aligned box in 3D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb3 {
    /// Creates a box from its corners
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box from its center and half-size
    pub fn from_center(center: Vec3, extents: Vec3) -> Self {
        Self::new(center - extents, center + extents)
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) / 2.0
    }

    /// Half-size of the box
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) / 2.0
    }
}

impl LineShape3 for Aabb3 {
    fn line_contacts(&self, offset: Vec3, direction: Vec3) -> Option<LineContacts> {
        line3::aabb_contacts_between(offset, direction, self.min, self.max)
    }
}

/// A triangle in 3D
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle3 {
    /// First vertex
    pub a: Vec3,
    /// Second vertex
    pub b: Vec3,
    /// Third vertex
    pub c: Vec3,
}

impl Triangle3 {
    /// Creates a new triangle
    pub const fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unnormalized face normal following the vertex winding
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(&(self.c - self.b))
    }

    /// Plane containing the triangle
    pub fn plane(&self) -> Plane3 {
        Plane3::new(self.a, self.normal())
    }
}

impl LineShape3 for Triangle3 {
    fn line_contacts(&self, offset: Vec3, direction: Vec3) -> Option<LineContacts> {
        line3::triangle_contacts(offset, direction, self.a, self.b, self.c)
    }
}
