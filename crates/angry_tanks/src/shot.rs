//! Shots fired by tanks

use tank_engine::foundation::math::Vec2;
use tank_engine::foundation::time::GameTime;

use crate::sprite::{find_largest_collision, DynamicSprite, Sprite};
use crate::variables::TankTunables;
use crate::world::World;

/// Lifecycle of a shot
///
/// `None -> Starting -> Active -> Ending -> None`. A shot spends exactly one
/// update in `Starting` and one in `Ending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShotState {
    /// Finished; the owner may drop it
    #[default]
    None,
    /// Just fired, not moved yet
    Starting,
    /// In flight
    Active,
    /// Stopped, removed on the next update
    Ending,
}

/// Why a shot stopped by itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotEnding {
    /// Travelled further than the shot range
    RangeExceeded,
    /// Hit a map object
    Collided,
}

impl ShotEnding {
    /// Whether the shot ends in an explosion
    pub const fn explodes(self) -> bool {
        matches!(self, Self::Collided)
    }
}

/// One shot in flight
#[derive(Debug)]
pub struct Shot {
    slot: u8,
    state: ShotState,
    initial_position: Vec2,
    range: f32,
    sprite: DynamicSprite,
}

impl Shot {
    /// Fire a shot from `position`
    pub fn new(slot: u8, position: Vec2, rotation: f32, velocity: Vec2, tunables: &TankTunables) -> Self {
        let side = tunables.shot_radius * 2.0;
        Self {
            slot,
            state: ShotState::Starting,
            initial_position: position,
            range: tunables.shot_range,
            sprite: DynamicSprite::with_velocity(position, Vec2::new(side, side), rotation, velocity),
        }
    }

    /// Shot slot of the owner this shot occupies
    pub const fn slot(&self) -> u8 {
        self.slot
    }

    /// Current lifecycle state
    pub const fn state(&self) -> ShotState {
        self.state
    }

    /// Where the shot was fired from
    pub const fn initial_position(&self) -> Vec2 {
        self.initial_position
    }

    /// Distance from the muzzle
    pub fn travelled(&self) -> f32 {
        (self.sprite.position() - self.initial_position).norm()
    }

    /// Pose and velocity
    pub const fn sprite(&self) -> &DynamicSprite {
        &self.sprite
    }

    /// Whether the shot still occupies its slot
    pub fn is_live(&self) -> bool {
        self.state != ShotState::None
    }

    /// Advance one frame. Returns why the shot stopped if it stopped by itself
    /// during this update.
    pub fn update(&mut self, time: &GameTime, world: &World) -> Option<ShotEnding> {
        match self.state {
            ShotState::None => None,
            ShotState::Starting => {
                self.state = ShotState::Active;
                None
            }
            ShotState::Active => self.advance(time.delta_seconds(), world),
            ShotState::Ending => {
                self.state = ShotState::None;
                None
            }
        }
    }

    fn advance(&mut self, delta: f32, world: &World) -> Option<ShotEnding> {
        let mut position = self.sprite.position() + self.sprite.velocity() * delta;

        let bounds = self.sprite.bounds().moved_to(position, self.sprite.rotation());
        let candidates = world.potential_bounds(&bounds);
        let collision = find_largest_collision(&bounds, &candidates);
        if let Some(hit) = collision {
            position += hit.translation();
        }
        self.sprite.set_position(position);

        let ending = if collision.is_some() {
            Some(ShotEnding::Collided)
        } else if self.travelled() > self.range {
            Some(ShotEnding::RangeExceeded)
        } else {
            None
        };

        if let Some(reason) = ending {
            log::debug!("Shot {} ended: {reason:?}", self.slot);
            self.end();
        }
        ending
    }

    /// Stop the shot. Has no effect once it is ending or finished.
    pub fn end(&mut self) {
        if matches!(self.state, ShotState::None | ShotState::Ending) {
            return;
        }
        self.sprite.set_velocity(Vec2::zeros());
        self.state = ShotState::Ending;
    }
}
