//! Math utilities and types
//!
//! Provides the concrete `f32` vector types used by the collision core and
//! the 2D helpers the tank simulation needs (heading vectors, angle wrapping).

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Wrap an angle in radians into the range `(-PI, PI]`
    pub fn wrap_angle(angle: f32) -> f32 {
        let mut wrapped = angle % constants::TAU;
        if wrapped <= -constants::PI {
            wrapped += constants::TAU;
        } else if wrapped > constants::PI {
            wrapped -= constants::TAU;
        }
        wrapped
    }

    /// Rotate a 2D vector by 90 degrees counter-clockwise
    pub fn perpendicular(vector: &Vec2) -> Vec2 {
        Vec2::new(-vector.y, vector.x)
    }

    /// Rotate a 2D vector by `angle` radians
    pub fn rotate(vector: &Vec2, angle: f32) -> Vec2 {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(vector.x * cos - vector.y * sin, vector.x * sin + vector.y * cos)
    }

    /// Unit heading for a sprite rotation.
    ///
    /// A rotation of zero faces up the screen (negative y), matching the way
    /// tank textures are authored.
    pub fn heading(rotation: f32) -> Vec2 {
        let angle = rotation - constants::HALF_PI;
        Vec2::new(angle.cos(), angle.sin())
    }

    /// 2D cross product (z component of the 3D cross product)
    pub fn cross2(a: &Vec2, b: &Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }
}

#[cfg(test)]
mod tests {
    use super::constants::{HALF_PI, PI, TAU};
    use super::utils::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wrap_angle_stays_in_half_open_range() {
        assert_relative_eq!(wrap_angle(0.0), 0.0);
        assert_relative_eq!(wrap_angle(PI), PI);
        assert_relative_eq!(wrap_angle(-PI), PI, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(wrap_angle(-HALF_PI * 3.0), HALF_PI, epsilon = 1e-5);
    }

    #[test]
    fn test_heading_zero_faces_up() {
        let up = heading(0.0);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(up.y, -1.0, epsilon = 1e-6);

        let right = heading(HALF_PI);
        assert_relative_eq!(right.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_perpendicular_and_rotate_agree() {
        let v = Vec2::new(3.0, -1.0);
        let p = perpendicular(&v);
        let r = rotate(&v, HALF_PI);
        assert_relative_eq!(p.x, r.x, epsilon = 1e-5);
        assert_relative_eq!(p.y, r.y, epsilon = 1e-5);
        assert_relative_eq!(p.dot(&v), 0.0);
    }

    #[test]
    fn test_cross2_sign() {
        assert!(cross2(&Vec2::x(), &Vec2::y()) > 0.0);
        assert!(cross2(&Vec2::y(), &Vec2::x()) < 0.0);
    }
}
