//! Ray colliders in three dimensions
//!
//! Same clipping rules as [`ray2`](super::ray2), applied to the
//! [`line3`](super::line3) queries.

use super::{line3, LineContacts};
use crate::foundation::math::Vec3;

/// Intersection of a ray with a plane
pub fn plane_contacts(
    origin: Vec3,
    direction: Vec3,
    plane_offset: Vec3,
    plane_normal: Vec3,
) -> Option<LineContacts> {
    line3::plane_contacts(origin, direction, plane_offset, plane_normal)?.clip_to_ray()
}

/// Intersection of a ray with a sphere centered on the origin
pub fn sphere_contacts(origin: Vec3, direction: Vec3, radius: f32) -> Option<LineContacts> {
    line3::sphere_contacts(origin, direction, radius)?.clip_to_ray()
}

/// Intersection of a ray with a sphere at `center`
pub fn sphere_contacts_at(
    origin: Vec3,
    direction: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<LineContacts> {
    line3::sphere_contacts_at(origin, direction, center, radius)?.clip_to_ray()
}

/// Intersection of a ray with an axis-aligned box centered on the origin
pub fn aabb_contacts(origin: Vec3, direction: Vec3, extents: Vec3) -> Option<LineContacts> {
    line3::aabb_contacts(origin, direction, extents)?.clip_to_ray()
}

/// Intersection of a ray with the axis-aligned box spanning `min` to `max`
pub fn aabb_contacts_between(
    origin: Vec3,
    direction: Vec3,
    min: Vec3,
    max: Vec3,
) -> Option<LineContacts> {
    line3::aabb_contacts_between(origin, direction, min, max)?.clip_to_ray()
}

/// Intersection of a ray with the triangle `a`, `b`, `c`
pub fn triangle_contacts(
    origin: Vec3,
    direction: Vec3,
    a: Vec3,
    b: Vec3,
    c: Vec3,
) -> Option<LineContacts> {
    line3::triangle_contacts(origin, direction, a, b, c)?.clip_to_ray()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_plane_behind_origin() {
        let origin = Vec3::new(10.0, 0.0, 0.0);
        assert!(plane_contacts(origin, Vec3::x(), Vec3::zeros(), Vec3::x()).is_none());
        assert!(line3::plane_contacts(origin, Vec3::x(), Vec3::zeros(), Vec3::x()).is_some());
    }

    #[test]
    fn test_ray_inside_sphere() {
        let contacts =
            sphere_contacts_at(Vec3::new(0.0, 0.0, 10.0), Vec3::z(), Vec3::new(0.0, 0.0, 10.0), 3.0)
                .unwrap();
        assert_relative_eq!(contacts.entry_time, 0.0);
        assert_relative_eq!(contacts.exit_time, 3.0);
    }

    #[test]
    fn test_ray_sphere_ahead() {
        let contacts = sphere_contacts(Vec3::new(-3.0, 0.0, 0.0), Vec3::x(), 2.0).unwrap();
        assert_relative_eq!(contacts.entry_time, 1.0);
        assert_relative_eq!(contacts.exit_time, 5.0);
    }

    #[test]
    fn test_ray_inside_box() {
        let contacts = aabb_contacts(Vec3::zeros(), Vec3::x(), Vec3::new(2.0, 2.0, 2.0)).unwrap();
        assert_relative_eq!(contacts.entry_time, 0.0);
        assert_relative_eq!(contacts.exit_time, 2.0);

        let between = aabb_contacts_between(
            Vec3::zeros(),
            -Vec3::z(),
            Vec3::new(-1.0, -1.0, -4.0),
            Vec3::new(1.0, 1.0, 2.0),
        )
        .unwrap();
        assert_relative_eq!(between.entry_time, 0.0);
        assert_relative_eq!(between.exit_time, 4.0);
    }

    #[test]
    fn test_ray_triangle_behind_origin() {
        let (a, b, c) = (Vec3::zeros(), Vec3::x(), Vec3::y());
        assert!(triangle_contacts(Vec3::new(0.25, 0.25, 5.0), Vec3::z(), a, b, c).is_none());
        let hit = triangle_contacts(Vec3::new(0.25, 0.25, -5.0), Vec3::z(), a, b, c).unwrap();
        assert_relative_eq!(hit.entry_time, 5.0);
    }
}
