//! The tank driven from this client

use bitflags::bitflags;
use tank_engine::foundation::math::utils::{heading, wrap_angle};
use tank_engine::foundation::time::GameTime;

use crate::player::Player;
use crate::protocol::{Message, PlayerInformation};
use crate::session::{DeliveryMethod, MessageSink, SessionError};
use crate::sprite::{find_largest_collision, Sprite};
use crate::variables::TankTunables;
use crate::world::World;

bitflags! {
    /// Controls held down during a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TankControls: u8 {
        /// Drive forward
        const FORWARD = 1 << 0;
        /// Drive backward
        const REVERSE = 1 << 1;
        /// Turn counter-clockwise
        const LEFT = 1 << 2;
        /// Turn clockwise
        const RIGHT = 1 << 3;
        /// Fire a shot
        const FIRE = 1 << 4;
        /// Blow up your own tank
        const SELF_DESTRUCT = 1 << 5;
    }
}

impl TankControls {
    /// -1, 0 or 1 along the heading
    fn velocity_factor(self) -> f32 {
        match (self.contains(Self::FORWARD), self.contains(Self::REVERSE)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// -1, 0 or 1 around the center
    fn angular_factor(self) -> f32 {
        match (self.contains(Self::LEFT), self.contains(Self::RIGHT)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// The player this client controls
#[derive(Debug)]
pub struct LocalPlayer {
    player: Player,
    angular_velocity: f32,
    update_interval: f32,
    last_update_sent: f32,
    previous_controls: TankControls,
}

impl LocalPlayer {
    /// Wrap the player the server assigned to us
    pub fn new(information: PlayerInformation, tunables: TankTunables) -> Self {
        let update_interval = if tunables.updates_per_second == 0 {
            f32::INFINITY
        } else {
            1.0 / f32::from(tunables.updates_per_second)
        };

        Self {
            player: Player::new(information, tunables),
            angular_velocity: 0.0,
            update_interval,
            last_update_sent: 0.0,
            previous_controls: TankControls::empty(),
        }
    }

    /// The underlying tank
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The underlying tank, mutably
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Turning speed after the last update
    pub const fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Apply one frame of input, move, and tell the server about it
    ///
    /// # Errors
    ///
    /// Fails if a message cannot be sent.
    pub fn update<S: MessageSink>(
        &mut self,
        time: &GameTime,
        controls: TankControls,
        world: &World,
        sink: &mut S,
    ) -> Result<(), SessionError> {
        let pressed = controls.difference(self.previous_controls);
        self.previous_controls = controls;

        if self.player.is_alive() {
            if pressed.contains(TankControls::SELF_DESTRUCT) {
                log::info!("{} self-destructs", self.player.callsign());
                let slot = self.player.slot();
                self.player.die(Some(slot));
            } else if pressed.contains(TankControls::FIRE) {
                self.shoot(sink)?;
            }
        }

        if self.player.is_alive() {
            self.update_position(time, controls, world);

            if self.last_update_sent + self.update_interval < time.total_seconds() {
                self.last_update_sent = time.total_seconds();
                let sprite = self.player.sprite();
                sink.send_message(
                    &Message::PlayerClientUpdate {
                        position: sprite.position(),
                        rotation: sprite.rotation(),
                    },
                    DeliveryMethod::UnreliableSequenced,
                )?;
            }
        }

        let slot = self.player.slot();
        for (shot_slot, ending) in self.player.update(time, world) {
            sink.send_message(
                &Message::ShotEnd {
                    slot,
                    shot_slot,
                    explode: ending.explodes(),
                },
                DeliveryMethod::ReliableOrdered,
            )?;
        }

        Ok(())
    }

    fn shoot<S: MessageSink>(&mut self, sink: &mut S) -> Result<(), SessionError> {
        let shots = self.player.shots();
        let free = (0..self.player.tunables().shot_slots)
            .filter_map(|slot| u8::try_from(slot).ok())
            .find(|slot| !shots.get(slot).is_some_and(|shot| shot.is_live()));

        let Some(shot_slot) = free else {
            log::debug!("All shot slots are in use");
            return Ok(());
        };

        let begin = self.player.fire_shot(shot_slot);
        sink.send_message(&begin, DeliveryMethod::ReliableOrdered)
    }

    fn update_position(&mut self, time: &GameTime, controls: TankControls, world: &World) {
        let delta = time.delta_seconds();
        let tunables = *self.player.tunables();
        let sprite = self.player.sprite();

        let new_velocity = heading(sprite.rotation()) * (controls.velocity_factor() * tunables.tank_speed);
        let new_angular_velocity = controls.angular_factor() * tunables.tank_angular_velocity;

        let velocity = (sprite.velocity() + new_velocity) * 0.5;
        let mut position = sprite.position() + velocity * delta;

        self.angular_velocity = wrap_angle((self.angular_velocity + new_angular_velocity) * 0.5);
        let rotation = sprite.rotation() + self.angular_velocity * delta;

        let bounds = sprite.bounds().moved_to(position, rotation);
        let candidates = world.potential_bounds(&bounds);
        if let Some(hit) = find_largest_collision(&bounds, &candidates) {
            position += hit.translation();
        }

        let sprite = self.player.sprite_mut();
        sprite.set_velocity(velocity);
        sprite.set_position(position);
        sprite.set_rotation(rotation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TeamType;
    use crate::world::MapDescription;
    use approx::assert_relative_eq;
    use tank_engine::foundation::math::Vec2;
    use tank_engine::spatial::DEFAULT_GRID_SIZE;

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<(Message, DeliveryMethod)>,
    }

    impl MessageSink for RecordingSink {
        fn send_message(&mut self, message: &Message, method: DeliveryMethod) -> Result<(), SessionError> {
            self.sent.push((message.clone(), method));
            Ok(())
        }
    }

    fn local(tunables: TankTunables) -> LocalPlayer {
        let mut local = LocalPlayer::new(
            PlayerInformation {
                slot: 0,
                callsign: "me".to_string(),
                tag: String::new(),
                team: TeamType::Red,
            },
            tunables,
        );
        local.player_mut().spawn(Vec2::zeros(), 0.0);
        local
    }

    fn open_world() -> World {
        World::empty(Vec2::new(800.0, 800.0), DEFAULT_GRID_SIZE).unwrap()
    }

    #[test]
    fn test_velocity_is_averaged() {
        let world = open_world();
        let mut sink = RecordingSink::default();
        let mut tank = local(TankTunables::default());

        tank.update(&GameTime::from_secs(1.0, 1.0), TankControls::FORWARD, &world, &mut sink)
            .unwrap();
        assert_relative_eq!(tank.player().sprite().position().y, -12.5, epsilon = 1e-4);

        tank.update(&GameTime::from_secs(1.0, 2.0), TankControls::FORWARD, &world, &mut sink)
            .unwrap();
        assert_relative_eq!(tank.player().sprite().position().y, -31.25, epsilon = 1e-4);
        assert_relative_eq!(tank.player().sprite().velocity().y, -18.75, epsilon = 1e-4);
    }

    #[test]
    fn test_opposing_controls_cancel() {
        assert_relative_eq!((TankControls::FORWARD | TankControls::REVERSE).velocity_factor(), 0.0);
        assert_relative_eq!((TankControls::LEFT | TankControls::RIGHT).angular_factor(), 0.0);
        assert_relative_eq!(TankControls::REVERSE.velocity_factor(), -1.0);
        assert_relative_eq!(TankControls::LEFT.angular_factor(), -1.0);
    }

    #[test]
    fn test_turning_averages_angular_velocity() {
        let world = open_world();
        let mut sink = RecordingSink::default();
        let mut tank = local(TankTunables::default());

        tank.update(&GameTime::from_secs(0.5, 0.5), TankControls::RIGHT, &world, &mut sink)
            .unwrap();
        let half = TankTunables::default().tank_angular_velocity / 2.0;
        assert_relative_eq!(tank.angular_velocity(), half, epsilon = 1e-6);
        assert_relative_eq!(tank.player().sprite().rotation(), half * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_box_pushes_tank_back() {
        let world = World::from_description(&MapDescription::test_arena(), DEFAULT_GRID_SIZE).unwrap();
        let mut sink = RecordingSink::default();
        let mut tank = local(TankTunables::default());
        tank.player_mut().spawn(Vec2::new(100.0, 45.0), 0.0);

        // Backing into the box whose top edge is at y = 50
        tank.update(&GameTime::from_secs(0.5, 0.5), TankControls::REVERSE, &world, &mut sink)
            .unwrap();
        let position = tank.player().sprite().position();
        assert_relative_eq!(position.y, 47.0, epsilon = 1e-3);
        assert_relative_eq!(position.x, 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_client_updates_are_rate_limited() {
        let world = open_world();
        let mut sink = RecordingSink::default();
        let mut tank = local(TankTunables::default());

        for total in [0.05, 0.15, 0.2, 0.3] {
            tank.update(&GameTime::from_secs(0.05, total), TankControls::empty(), &world, &mut sink)
                .unwrap();
        }

        let updates: Vec<_> = sink
            .sent
            .iter()
            .filter(|(message, _)| matches!(message, Message::PlayerClientUpdate { .. }))
            .collect();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].1, DeliveryMethod::UnreliableSequenced);
    }

    #[test]
    fn test_fire_is_edge_triggered_and_uses_free_slots() {
        let world = open_world();
        let mut sink = RecordingSink::default();
        let mut tank = local(TankTunables {
            shot_slots: 2,
            ..TankTunables::default()
        });
        let frame = |total: f32| GameTime::from_secs(0.01, total);

        tank.update(&frame(0.01), TankControls::FIRE, &world, &mut sink).unwrap();
        tank.update(&frame(0.02), TankControls::FIRE, &world, &mut sink).unwrap();
        tank.update(&frame(0.03), TankControls::empty(), &world, &mut sink).unwrap();
        tank.update(&frame(0.04), TankControls::FIRE, &world, &mut sink).unwrap();
        tank.update(&frame(0.05), TankControls::empty(), &world, &mut sink).unwrap();
        tank.update(&frame(0.06), TankControls::FIRE, &world, &mut sink).unwrap();

        let begun: Vec<u8> = sink
            .sent
            .iter()
            .filter_map(|(message, _)| match message {
                Message::ShotBegin { shot_slot, .. } => Some(*shot_slot),
                _ => None,
            })
            .collect();
        // The third press finds both slots busy
        assert_eq!(begun, vec![0, 1]);
        assert_eq!(tank.player().shots().len(), 2);
    }

    #[test]
    fn test_shot_out_of_range_reports_end() {
        let world = open_world();
        let mut sink = RecordingSink::default();
        let mut tank = local(TankTunables {
            shot_range: 10.0,
            ..TankTunables::default()
        });

        tank.update(&GameTime::from_secs(0.1, 0.1), TankControls::FIRE, &world, &mut sink)
            .unwrap();
        tank.update(&GameTime::from_secs(0.2, 0.3), TankControls::empty(), &world, &mut sink)
            .unwrap();

        assert!(sink.sent.iter().any(|(message, method)| {
            *message
                == Message::ShotEnd {
                    slot: 0,
                    shot_slot: 0,
                    explode: false,
                }
                && *method == DeliveryMethod::ReliableOrdered
        }));
    }

    #[test]
    fn test_self_destruct_stops_driving() {
        let world = open_world();
        let mut sink = RecordingSink::default();
        let mut tank = local(TankTunables::default());

        tank.update(
            &GameTime::from_secs(0.1, 0.1),
            TankControls::SELF_DESTRUCT | TankControls::FORWARD,
            &world,
            &mut sink,
        )
        .unwrap();
        assert_eq!(tank.player().sprite().position(), Vec2::zeros());
        assert!(!tank.player().is_alive());
    }
}
