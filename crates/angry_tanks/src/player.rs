//! Tanks and the messages that drive them

use std::collections::HashMap;

use tank_engine::foundation::math::{utils::heading, Vec2};
use tank_engine::foundation::time::GameTime;

use crate::protocol::{Message, PlayerInformation, Score, TeamType};
use crate::shot::{Shot, ShotEnding};
use crate::sprite::{DynamicSprite, Sprite};
use crate::variables::TankTunables;
use crate::world::World;

/// Lifecycle of a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Joined but never spawned
    #[default]
    None,
    /// Driving around
    Alive,
    /// Just killed
    Exploding,
    /// Waiting to respawn
    Dead,
}

/// A tank on the field, local or remote
#[derive(Debug)]
pub struct Player {
    information: PlayerInformation,
    state: PlayerState,
    score: Score,
    sprite: DynamicSprite,
    shots: HashMap<u8, Shot>,
    tunables: TankTunables,
}

impl Player {
    /// A player that has not spawned yet
    pub fn new(information: PlayerInformation, tunables: TankTunables) -> Self {
        let size = Vec2::new(tunables.tank_width, tunables.tank_length);
        Self {
            information,
            state: PlayerState::None,
            score: Score::default(),
            sprite: DynamicSprite::new(Vec2::zeros(), size, 0.0),
            shots: HashMap::new(),
            tunables,
        }
    }

    /// Identity as announced by the server
    pub const fn information(&self) -> &PlayerInformation {
        &self.information
    }

    /// Server-assigned slot
    pub const fn slot(&self) -> u8 {
        self.information.slot
    }

    /// Display name
    pub fn callsign(&self) -> &str {
        &self.information.callsign
    }

    /// Tag shown next to the callsign
    pub fn tag(&self) -> &str {
        &self.information.tag
    }

    /// Team
    pub const fn team(&self) -> TeamType {
        self.information.team
    }

    /// Lifecycle state
    pub const fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether the tank is driving around
    pub fn is_alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    /// Current score
    pub const fn score(&self) -> Score {
        self.score
    }

    /// Pose and velocity
    pub const fn sprite(&self) -> &DynamicSprite {
        &self.sprite
    }

    pub(crate) fn sprite_mut(&mut self) -> &mut DynamicSprite {
        &mut self.sprite
    }

    /// Tunables the tank was built with
    pub const fn tunables(&self) -> &TankTunables {
        &self.tunables
    }

    /// Shots by shot slot
    pub const fn shots(&self) -> &HashMap<u8, Shot> {
        &self.shots
    }

    /// Advance one frame. Returns the shots that stopped by themselves.
    pub fn update(&mut self, time: &GameTime, world: &World) -> Vec<(u8, ShotEnding)> {
        // No explosion animation yet
        if self.state == PlayerState::Exploding {
            self.state = PlayerState::Dead;
        }

        let mut endings = Vec::new();
        for (shot_slot, shot) in &mut self.shots {
            if let Some(ending) = shot.update(time, world) {
                endings.push((*shot_slot, ending));
            }
        }
        self.shots.retain(|_, shot| shot.is_live());

        endings
    }

    /// React to a server message. Messages about other players are ignored.
    pub fn handle_message(&mut self, message: &Message) {
        if message.player_slot() != Some(self.slot()) {
            return;
        }

        match message {
            Message::Spawn { position, rotation, .. } => self.spawn(*position, *rotation),
            Message::Death { killer, .. } => self.die(Some(*killer)),
            Message::Score { score, .. } => self.score = *score,
            Message::PlayerServerUpdate { position, rotation, .. } => {
                self.sprite.set_position(*position);
                self.sprite.set_rotation(*rotation);
            }
            Message::ShotBegin {
                shot_slot,
                position,
                rotation,
                velocity,
                ..
            } => {
                if self.shots.get(shot_slot).is_some_and(Shot::is_live) {
                    log::debug!("{} already has shot {shot_slot} in flight", self.callsign());
                    return;
                }
                let shot = Shot::new(*shot_slot, *position, *rotation, *velocity, &self.tunables);
                self.shots.insert(*shot_slot, shot);
            }
            Message::ShotEnd { shot_slot, .. } => match self.shots.get_mut(shot_slot) {
                Some(shot) => shot.end(),
                None => log::warn!("{} has no shot in slot {shot_slot} to end", self.callsign()),
            },
            _ => {}
        }
    }

    /// Place the tank and bring it to life. Shots still in flight end.
    pub fn spawn(&mut self, position: Vec2, rotation: f32) {
        for shot in self.shots.values_mut() {
            shot.end();
        }

        self.sprite.set_position(position);
        self.sprite.set_rotation(rotation);
        self.sprite.set_velocity(Vec2::zeros());
        self.state = PlayerState::Alive;
        log::debug!("{} spawned at {position:?}", self.callsign());
    }

    /// Kill the tank. `killer` is the slot of whoever did it.
    pub fn die(&mut self, killer: Option<u8>) {
        self.state = PlayerState::Exploding;
        match killer {
            Some(killer) if killer == self.slot() => log::debug!("{} blew up", self.callsign()),
            Some(killer) => log::debug!("{} was killed by slot {killer}", self.callsign()),
            None => log::debug!("{} died", self.callsign()),
        }
    }

    /// Fire from the muzzle into `shot_slot`, returning the matching
    /// [`Message::ShotBegin`]
    pub fn fire_shot(&mut self, shot_slot: u8) -> Message {
        let forward = heading(self.sprite.rotation());
        let position = self.sprite.position() + forward * (self.tunables.tank_length / 2.0);
        let rotation = self.sprite.rotation();
        let velocity = forward * self.tunables.shot_speed + self.sprite.velocity();

        self.shots
            .insert(shot_slot, Shot::new(shot_slot, position, rotation, velocity, &self.tunables));

        Message::ShotBegin {
            slot: self.slot(),
            shot_slot,
            position,
            rotation,
            velocity,
        }
    }
}
