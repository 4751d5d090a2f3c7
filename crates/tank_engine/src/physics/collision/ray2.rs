//! Ray colliders in two dimensions
//!
//! A ray is the half of a line with non-negative parametric time. Each
//! function runs the matching [`line2`](super::line2) query and clips its
//! interval: contacts wholly behind the origin are dropped, and an origin
//! inside the shape clamps the entry time to zero.

use super::{line2, LineContacts};
use crate::foundation::math::Vec2;

/// Intersection of a ray with an infinite line, as a time on the ray
pub fn line_contacts(
    origin: Vec2,
    direction: Vec2,
    line_offset: Vec2,
    line_direction: Vec2,
) -> Option<LineContacts> {
    line2::line_contacts(origin, direction, line_offset, line_direction)?.clip_to_ray()
}

/// Intersection of a ray with a disc centered on the origin
pub fn disc_contacts(origin: Vec2, direction: Vec2, radius: f32) -> Option<LineContacts> {
    line2::disc_contacts(origin, direction, radius)?.clip_to_ray()
}

/// Intersection of a ray with a disc at `center`
pub fn disc_contacts_at(
    origin: Vec2,
    direction: Vec2,
    center: Vec2,
    radius: f32,
) -> Option<LineContacts> {
    line2::disc_contacts_at(origin, direction, center, radius)?.clip_to_ray()
}

/// Intersection of a ray with an axis-aligned box centered on the origin
pub fn aabb_contacts(origin: Vec2, direction: Vec2, extents: Vec2) -> Option<LineContacts> {
    line2::aabb_contacts(origin, direction, extents)?.clip_to_ray()
}

/// Intersection of a ray with the axis-aligned box spanning `min` to `max`
pub fn aabb_contacts_between(
    origin: Vec2,
    direction: Vec2,
    min: Vec2,
    max: Vec2,
) -> Option<LineContacts> {
    line2::aabb_contacts_between(origin, direction, min, max)?.clip_to_ray()
}

/// Intersection of a ray with the triangle `a`, `b`, `c`
pub fn triangle_contacts(
    origin: Vec2,
    direction: Vec2,
    a: Vec2,
    b: Vec2,
    c: Vec2,
) -> Option<LineContacts> {
    line2::triangle_contacts(origin, direction, a, b, c)?.clip_to_ray()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_starting_inside_box() {
        let contacts = aabb_contacts(Vec2::zeros(), Vec2::x(), Vec2::new(2.0, 2.0)).unwrap();
        assert_relative_eq!(contacts.entry_time, 0.0);
        assert_relative_eq!(contacts.exit_time, 2.0);
    }

    #[test]
    fn test_ray_pointing_away_from_disc() {
        assert!(disc_contacts(Vec2::new(3.0, 0.0), Vec2::x(), 2.0).is_none());
        assert!(line2::disc_contacts(Vec2::new(3.0, 0.0), Vec2::x(), 2.0).is_some());
    }

    #[test]
    fn test_ray_ahead_of_disc_is_unchanged() {
        let ray = disc_contacts_at(Vec2::new(7.0, 10.0), Vec2::x(), Vec2::new(10.0, 10.0), 2.0);
        let line =
            line2::disc_contacts_at(Vec2::new(7.0, 10.0), Vec2::x(), Vec2::new(10.0, 10.0), 2.0);
        assert_eq!(ray, line);
    }

    #[test]
    fn test_ray_line_behind_origin() {
        let behind = line_contacts(Vec2::new(5.0, 0.0), Vec2::x(), Vec2::zeros(), Vec2::y());
        assert!(behind.is_none());

        let ahead = line_contacts(Vec2::new(-5.0, 0.0), Vec2::x(), Vec2::zeros(), Vec2::y()).unwrap();
        assert_relative_eq!(ahead.entry_time, 5.0);
    }

    #[test]
    fn test_ray_triangle_from_inside() {
        let contacts = triangle_contacts(
            Vec2::new(0.75, 0.5),
            Vec2::x(),
            Vec2::x(),
            Vec2::new(1.0, 1.0),
            Vec2::zeros(),
        )
        .unwrap();
        assert_relative_eq!(contacts.entry_time, 0.0);
        assert_relative_eq!(contacts.exit_time, 0.25, epsilon = 1e-5);
    }

    #[test]
    fn test_ray_box_between_corners_behind() {
        let contacts = aabb_contacts_between(
            Vec2::new(0.0, 0.0),
            Vec2::x(),
            Vec2::new(-10.0, -1.0),
            Vec2::new(-5.0, 1.0),
        );
        assert!(contacts.is_none());
    }
}
