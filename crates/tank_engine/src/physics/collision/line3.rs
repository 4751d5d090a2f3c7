//! Infinite line colliders in three dimensions

use super::slab::SlabInterval;
use super::LineContacts;
use crate::foundation::math::Vec3;

/// Intersection of a line with the plane through `plane_offset` with `plane_normal`.
///
/// A line parallel to the plane reports no contact, even when it lies inside it.
pub fn plane_contacts(
    offset: Vec3,
    direction: Vec3,
    plane_offset: Vec3,
    plane_normal: Vec3,
) -> Option<LineContacts> {
    let dot = plane_normal.dot(&direction);
    if dot == 0.0 {
        return None;
    }

    let time = -plane_normal.dot(&(offset - plane_offset)) / dot;
    Some(LineContacts::touching(time))
}

/// Intersection of a line with a sphere centered on the origin
pub fn sphere_contacts(offset: Vec3, direction: Vec3, radius: f32) -> Option<LineContacts> {
    let a = direction.norm_squared();
    let b = direction.dot(&offset);
    let c = offset.norm_squared() - radius * radius;

    let discriminant = b * b - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    Some(LineContacts::new((-b - root) / a, (-b + root) / a))
}

/// Intersection of a line with a sphere at `center`
pub fn sphere_contacts_at(
    offset: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<LineContacts> {
    sphere_contacts(offset - center, direction, radius)
}

/// Intersection of a line with an axis-aligned box centered on the origin
pub fn aabb_contacts(offset: Vec3, direction: Vec3, extents: Vec3) -> Option<LineContacts> {
    let mut interval = SlabInterval::new();
    let inside = interval.clip_axis(offset.x, direction.x, extents.x)
        && interval.clip_axis(offset.y, direction.y, extents.y)
        && interval.clip_axis(offset.z, direction.z, extents.z);

    if inside {
        interval.finish()
    } else {
        None
    }
}

/// Intersection of a line with the axis-aligned box spanning `min` to `max`
pub fn aabb_contacts_between(
    offset: Vec3,
    direction: Vec3,
    min: Vec3,
    max: Vec3,
) -> Option<LineContacts> {
    let extents = (max - min) / 2.0;
    let center = min + extents;
    aabb_contacts(offset - center, direction, extents)
}

/// Intersection of a line with the triangle `a`, `b`, `c`.
///
/// The line meets the triangle's plane at a single point, which must lie on
/// the same side of all three edges.
pub fn triangle_contacts(
    offset: Vec3,
    direction: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
) -> Option<LineContacts> {
    let normal = (b - a).cross(&(c - b));
    let contacts = plane_contacts(offset, direction, a, normal)?;

    let point = contacts.entry_point(&offset, &direction);
    let ab = is_on_positive_side(a, b, point, normal);
    let bc = is_on_positive_side(b, c, point, normal);
    let ca = is_on_positive_side(c, a, point, normal);

    if ab == bc && bc == ca {
        Some(contacts)
    } else {
        None
    }
}

/// Whether `point` lies to the left of the edge `start -> end` when viewed
/// against `normal`
fn is_on_positive_side(start: Vec3, end: Vec3, point: Vec3, normal: Vec3) -> bool {
    (end - start).cross(&(point - start)).dot(&normal) >= 0.0
}
