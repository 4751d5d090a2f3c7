//! Sprites: things with a pose in the world
//!
//! Map objects never move and are plain [`StaticSprite`]s. Tanks and shots are
//! [`DynamicSprite`]s, whose setters notify registered listeners of every
//! change.

use std::fmt;

use tank_engine::foundation::math::Vec2;
use tank_engine::physics::{Penetration, RotatedRectangle};

/// Common view of anything with a rotated-rectangle footprint
pub trait Sprite {
    /// Center
    fn position(&self) -> Vec2;

    /// Width and height before rotation
    fn size(&self) -> Vec2;

    /// Rotation in radians
    fn rotation(&self) -> f32;

    /// Collision bounds
    fn bounds(&self) -> RotatedRectangle {
        RotatedRectangle::new(self.position(), self.size(), self.rotation())
    }
}

/// A sprite that never moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticSprite {
    /// Center
    pub position: Vec2,
    /// Width and height
    pub size: Vec2,
    /// Rotation in radians
    pub rotation: f32,
}

impl StaticSprite {
    /// Creates a sprite centered on `position`
    pub const fn new(position: Vec2, size: Vec2, rotation: f32) -> Self {
        Self {
            position,
            size,
            rotation,
        }
    }
}

impl Sprite for StaticSprite {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }
}

/// A change to one property of a [`DynamicSprite`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteChange {
    /// Position moved
    Position {
        /// Before
        old: Vec2,
        /// After
        new: Vec2,
    },
    /// Size changed
    Size {
        /// Before
        old: Vec2,
        /// After
        new: Vec2,
    },
    /// Rotation changed
    Rotation {
        /// Before
        old: f32,
        /// After
        new: f32,
    },
    /// Velocity changed
    Velocity {
        /// Before
        old: Vec2,
        /// After
        new: Vec2,
    },
}

/// Callback invoked for every [`SpriteChange`]
pub type ChangeListener = Box<dyn FnMut(&SpriteChange)>;

/// A sprite whose pose changes over time
pub struct DynamicSprite {
    position: Vec2,
    size: Vec2,
    rotation: f32,
    velocity: Vec2,
    listeners: Vec<ChangeListener>,
}

impl DynamicSprite {
    /// Creates a stationary sprite
    pub fn new(position: Vec2, size: Vec2, rotation: f32) -> Self {
        Self::with_velocity(position, size, rotation, Vec2::zeros())
    }

    /// Creates a moving sprite. Construction notifies nobody.
    pub fn with_velocity(position: Vec2, size: Vec2, rotation: f32, velocity: Vec2) -> Self {
        Self {
            position,
            size,
            rotation,
            velocity,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for every later change
    pub fn subscribe(&mut self, listener: impl FnMut(&SpriteChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Velocity in world units per second
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Move the center
    pub fn set_position(&mut self, position: Vec2) {
        let change = SpriteChange::Position {
            old: self.position,
            new: position,
        };
        self.position = position;
        self.notify(&change);
    }

    /// Change width and height
    pub fn set_size(&mut self, size: Vec2) {
        let change = SpriteChange::Size {
            old: self.size,
            new: size,
        };
        self.size = size;
        self.notify(&change);
    }

    /// Change the rotation
    pub fn set_rotation(&mut self, rotation: f32) {
        let change = SpriteChange::Rotation {
            old: self.rotation,
            new: rotation,
        };
        self.rotation = rotation;
        self.notify(&change);
    }

    /// Change the velocity
    pub fn set_velocity(&mut self, velocity: Vec2) {
        let change = SpriteChange::Velocity {
            old: self.velocity,
            new: velocity,
        };
        self.velocity = velocity;
        self.notify(&change);
    }

    fn notify(&mut self, change: &SpriteChange) {
        log::trace!("Sprite changed: {change:?}");
        for listener in &mut self.listeners {
            listener(change);
        }
    }
}

impl Sprite for DynamicSprite {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Vec2 {
        self.size
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }
}

impl fmt::Debug for DynamicSprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicSprite")
            .field("position", &self.position)
            .field("size", &self.size)
            .field("rotation", &self.rotation)
            .field("velocity", &self.velocity)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Penetration of `bounds` into the candidate it overlaps the most.
///
/// The deepest overlap wins, not the nearest object. On ties the earlier
/// candidate is kept.
pub fn find_largest_collision<'a>(
    bounds: &RotatedRectangle,
    candidates: impl IntoIterator<Item = &'a RotatedRectangle>,
) -> Option<Penetration> {
    candidates
        .into_iter()
        .filter_map(|candidate| bounds.penetration(candidate))
        .fold(None, |largest: Option<Penetration>, hit| match largest {
            Some(best) if best.overlap >= hit.overlap => Some(best),
            _ => Some(hit),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_setters_notify_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sprite = DynamicSprite::new(Vec2::zeros(), Vec2::new(4.0, 6.0), 0.0);

        let sink = Rc::clone(&seen);
        sprite.subscribe(move |change| sink.borrow_mut().push(*change));

        sprite.set_position(Vec2::new(1.0, 2.0));
        sprite.set_rotation(0.5);
        sprite.set_velocity(Vec2::new(0.0, -3.0));
        sprite.set_size(Vec2::new(1.0, 1.0));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(
            seen[0],
            SpriteChange::Position {
                old: Vec2::zeros(),
                new: Vec2::new(1.0, 2.0)
            }
        );
        assert_eq!(seen[1], SpriteChange::Rotation { old: 0.0, new: 0.5 });
        assert!(matches!(seen[3], SpriteChange::Size { .. }));
        assert_eq!(sprite.position(), Vec2::new(1.0, 2.0));
        assert_eq!(sprite.velocity(), Vec2::new(0.0, -3.0));
    }

    #[test]
    fn test_construction_is_silent() {
        let sprite = DynamicSprite::with_velocity(Vec2::zeros(), Vec2::new(1.0, 1.0), 0.0, Vec2::x());
        assert_eq!(sprite.velocity(), Vec2::x());
        assert!(format!("{sprite:?}").contains("listeners: 0"));
    }

    #[test]
    fn test_bounds_follow_pose() {
        let sprite = StaticSprite::new(Vec2::new(10.0, 0.0), Vec2::new(2.0, 2.0), 0.0);
        let bounds = sprite.bounds();
        assert_eq!(bounds.position(), Vec2::new(10.0, 0.0));
        assert_eq!(bounds.upper_left(), Vec2::new(9.0, -1.0));
    }

    #[test]
    fn test_largest_overlap_wins_over_nearest() {
        let tank = RotatedRectangle::axis_aligned(Vec2::zeros(), Vec2::new(4.0, 4.0));
        // Barely touched on the right, deeply overlapped from below
        let shallow = RotatedRectangle::axis_aligned(Vec2::new(3.9, 0.0), Vec2::new(4.0, 4.0));
        let deep = RotatedRectangle::axis_aligned(Vec2::new(0.0, 3.0), Vec2::new(40.0, 4.0));

        let hit = find_largest_collision(&tank, [&shallow, &deep]).unwrap();
        assert_relative_eq!(hit.overlap, 1.0, epsilon = 1e-5);
        assert_relative_eq!(hit.projection.y, -1.0, epsilon = 1e-5);

        let same = find_largest_collision(&tank, [&deep, &shallow]).unwrap();
        assert_eq!(hit, same);
    }

    #[test]
    fn test_no_candidates_no_collision() {
        let tank = RotatedRectangle::axis_aligned(Vec2::zeros(), Vec2::new(4.0, 4.0));
        let far = RotatedRectangle::axis_aligned(Vec2::new(50.0, 0.0), Vec2::new(4.0, 4.0));
        assert!(find_largest_collision(&tank, [&far]).is_none());
        assert!(find_largest_collision(&tank, std::iter::empty()).is_none());
    }
}
