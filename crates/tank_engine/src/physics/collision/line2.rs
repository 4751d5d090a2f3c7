//! Infinite line colliders in two dimensions
//!
//! Every function takes the line as an `offset` it passes through and a
//! `direction` (not necessarily unit length) and reports the contact interval
//! in multiples of `direction`. A zero-length direction is a precondition
//! violation; the results are then meaningless.

use super::slab::SlabInterval;
use super::LineContacts;
use crate::foundation::math::{utils::perpendicular, Vec2};

/// Intersection of line A with line B, as a time on line A.
///
/// Parallel lines, including coincident ones, report no contact.
pub fn line_contacts(
    offset_a: Vec2,
    direction_a: Vec2,
    offset_b: Vec2,
    direction_b: Vec2,
) -> Option<LineContacts> {
    let normal_b = perpendicular(&direction_b);
    let dot = normal_b.dot(&direction_a);
    if dot == 0.0 {
        return None;
    }

    let time = normal_b.dot(&(offset_b - offset_a)) / dot;
    Some(LineContacts::touching(time))
}

/// Intersection of a line with a disc centered on the origin.
///
/// A line that only grazes the rim (zero discriminant) does not count.
pub fn disc_contacts(offset: Vec2, direction: Vec2, radius: f32) -> Option<LineContacts> {
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

/// Intersection of a line with a disc at `center`
pub fn disc_contacts_at(
    offset: Vec2,
    direction: Vec2,
    center: Vec2,
    radius: f32,
) -> Option<LineContacts> {
    disc_contacts(offset - center, direction, radius)
}

/// Intersection of a line with an axis-aligned box centered on the origin
pub fn aabb_contacts(offset: Vec2, direction: Vec2, extents: Vec2) -> Option<LineContacts> {
    let mut interval = SlabInterval::new();
    let inside = interval.clip_axis(offset.x, direction.x, extents.x)
        && interval.clip_axis(offset.y, direction.y, extents.y);

    if inside {
        interval.finish()
    } else {
        None
    }
}

/// Intersection of a line with the axis-aligned box spanning `min` to `max`
pub fn aabb_contacts_between(
    offset: Vec2,
    direction: Vec2,
    min: Vec2,
    max: Vec2,
) -> Option<LineContacts> {
    let extents = (max - min) / 2.0;
    let center = min + extents;
    aabb_contacts(offset - center, direction, extents)
}

/// Intersection of a line with the triangle `a`, `b`, `c`.
///
/// A line crossing a triangle enters through one edge and leaves through
/// another, and at least one of them is AB or BC. Edge hits use the half-open
/// range `[0, length)` so a crossing through a vertex is only counted once.
pub fn triangle_contacts(
    offset: Vec2,
    direction: Vec2,
    a: Vec2,
    b: Vec2,
    c: Vec2,
) -> Option<LineContacts> {
    let ab = b - a;
    let bc = c - b;
    let ca = a - c;

    let ab_length = ab.norm();
    let bc_length = bc.norm();

    let ab_unit = ab / ab_length;
    let bc_unit = bc / bc_length;
    let ca_unit = ca.normalize();

    // Edge-local crossing times; unit edge directions make them distances
    let crosses = |start: Vec2, unit: Vec2, length: f32| {
        line_contacts(start, unit, offset, direction)
            .is_some_and(|hit| hit.entry_time >= 0.0 && hit.entry_time < length)
    };
    // Convert an edge into the line's own parametric time
    let line_time = |start: Vec2, unit: Vec2| {
        line_contacts(offset, direction, start, unit).map(|hit| hit.entry_time)
    };

    let (first, second) = if crosses(a, ab_unit, ab_length) {
        let first = line_time(a, ab_unit)?;
        let second = if crosses(b, bc_unit, bc_length) {
            line_time(b, bc_unit)?
        } else {
            line_time(c, ca_unit)?
        };
        (first, second)
    } else if crosses(b, bc_unit, bc_length) {
        (line_time(b, bc_unit)?, line_time(c, ca_unit)?)
    } else {
        return None;
    };

    Some(LineContacts::ordered(first, second))
}
