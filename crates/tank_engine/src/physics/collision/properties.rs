//! Cross-collider properties checked over small grids of inputs.

use super::{line2, line3, ray2, ray3, LineContacts};
use crate::foundation::math::{
    utils::{cross2, rotate},
    Vec2, Vec3,
};
use approx::assert_relative_eq;

fn sample_directions() -> Vec<Vec2> {
    (0..12)
        .map(|step| rotate(&Vec2::x(), step as f32 * 0.53 + 0.1) * (0.5 + step as f32 * 0.25))
        .collect()
}

fn sample_offsets() -> Vec<Vec2> {
    vec![
        Vec2::new(-12.0, 3.0),
        Vec2::new(0.0, 0.0),
        Vec2::new(4.5, -7.25),
        Vec2::new(30.0, 30.0),
    ]
}

/// The ray result must be the line result clipped, never anything new.
fn assert_ray_clips_line(line: Option<LineContacts>, ray: Option<LineContacts>) {
    match (line, ray) {
        (None, ray) => assert!(ray.is_none(), "ray reported {ray:?} where the line missed"),
        (Some(line), None) => assert!(line.exit_time < 0.0),
        (Some(line), Some(ray)) => {
            assert!(line.exit_time >= 0.0);
            assert_eq!(ray.exit_time, line.exit_time);
            assert_eq!(ray.entry_time, line.entry_time.max(0.0));
        }
    }
}

#[test]
fn test_line_line_intersection_point_is_swap_consistent() {
    for &offset_a in &sample_offsets() {
        for &direction_a in &sample_directions() {
            for &offset_b in &sample_offsets() {
                for &direction_b in &sample_directions() {
                    let Some(ab) = line2::line_contacts(offset_a, direction_a, offset_b, direction_b)
                    else {
                        assert!(
                            line2::line_contacts(offset_b, direction_b, offset_a, direction_a)
                                .is_none()
                        );
                        continue;
                    };
                    let cross = cross2(&direction_a, &direction_b).abs();
                    if cross < 1e-2 * direction_a.norm() * direction_b.norm() {
                        // Nearly parallel; the point is too ill-conditioned to compare
                        continue;
                    }

                    let ba = line2::line_contacts(offset_b, direction_b, offset_a, direction_a)
                        .expect("swapped query must also intersect");
                    let from_a = ab.entry_point(&offset_a, &direction_a);
                    let from_b = ba.entry_point(&offset_b, &direction_b);
                    assert_relative_eq!(from_a, from_b, epsilon = 1e-2, max_relative = 1e-3);
                }
            }
        }
    }
}

#[test]
fn test_ray_adapters_only_clip_2d() {
    let extents = Vec2::new(3.0, 5.0);
    let (a, b, c) = (Vec2::new(-4.0, -2.0), Vec2::new(6.0, -1.0), Vec2::new(1.0, 7.0));

    for &offset in &sample_offsets() {
        for &direction in &sample_directions() {
            assert_ray_clips_line(
                line2::disc_contacts(offset, direction, 6.0),
                ray2::disc_contacts(offset, direction, 6.0),
            );
            assert_ray_clips_line(
                line2::aabb_contacts(offset, direction, extents),
                ray2::aabb_contacts(offset, direction, extents),
            );
            assert_ray_clips_line(
                line2::triangle_contacts(offset, direction, a, b, c),
                ray2::triangle_contacts(offset, direction, a, b, c),
            );
            assert_ray_clips_line(
                line2::line_contacts(offset, direction, a, b - a),
                ray2::line_contacts(offset, direction, a, b - a),
            );
        }
    }
}

#[test]
fn test_ray_adapters_only_clip_3d() {
    let extents = Vec3::new(3.0, 5.0, 2.0);
    let (a, b, c) = (
        Vec3::new(-4.0, -2.0, 1.0),
        Vec3::new(6.0, -1.0, 0.0),
        Vec3::new(1.0, 7.0, -1.0),
    );

    for &offset in &sample_offsets() {
        for &direction in &sample_directions() {
            let offset = Vec3::new(offset.x, offset.y, 0.5);
            let direction = Vec3::new(direction.x, direction.y, 0.3);

            assert_ray_clips_line(
                line3::sphere_contacts(offset, direction, 6.0),
                ray3::sphere_contacts(offset, direction, 6.0),
            );
            assert_ray_clips_line(
                line3::aabb_contacts(offset, direction, extents),
                ray3::aabb_contacts(offset, direction, extents),
            );
            assert_ray_clips_line(
                line3::triangle_contacts(offset, direction, a, b, c),
                ray3::triangle_contacts(offset, direction, a, b, c),
            );
            assert_ray_clips_line(
                line3::plane_contacts(offset, direction, a, Vec3::z()),
                ray3::plane_contacts(offset, direction, a, Vec3::z()),
            );
        }
    }
}

#[test]
fn test_ray_behind_shape_misses_where_line_hits() {
    let origin = Vec2::new(10.0, 0.0);
    assert!(line2::aabb_contacts(origin, Vec2::x(), Vec2::new(2.0, 2.0)).is_some());
    assert!(ray2::aabb_contacts(origin, Vec2::x(), Vec2::new(2.0, 2.0)).is_none());

    let origin = Vec3::new(0.0, 0.0, 10.0);
    assert!(line3::sphere_contacts(origin, Vec3::z(), 2.0).is_some());
    assert!(ray3::sphere_contacts(origin, Vec3::z(), 2.0).is_none());
}

#[test]
fn test_entry_never_exceeds_exit() {
    let extents = Vec2::new(3.0, 5.0);
    for &offset in &sample_offsets() {
        for &direction in &sample_directions() {
            let results = [
                line2::disc_contacts(offset, direction, 6.0),
                line2::aabb_contacts(offset, direction, extents),
                line2::triangle_contacts(
                    offset,
                    direction,
                    Vec2::new(-4.0, -2.0),
                    Vec2::new(6.0, -1.0),
                    Vec2::new(1.0, 7.0),
                ),
            ];
            for contacts in results.into_iter().flatten() {
                assert!(contacts.entry_time <= contacts.exit_time, "{contacts:?}");
            }
        }
    }
}

#[test]
fn test_zero_length_direction_is_a_precondition_violation() {
    // Callers must not pass a zero direction. The colliders stay total but
    // whatever they return carries no meaning, so only termination is checked.
    let _ = line2::disc_contacts(Vec2::new(1.0, 0.0), Vec2::zeros(), 2.0);
    let _ = line2::aabb_contacts(Vec2::new(1.0, 0.0), Vec2::zeros(), Vec2::new(2.0, 2.0));
    let _ = line2::line_contacts(Vec2::zeros(), Vec2::zeros(), Vec2::x(), Vec2::y());
    let _ = line3::sphere_contacts(Vec3::x(), Vec3::zeros(), 2.0);
}
