//! Everyone in the game, keyed by slot

use std::collections::BTreeMap;

use tank_engine::foundation::time::GameTime;

use crate::local_player::{LocalPlayer, TankControls};
use crate::player::Player;
use crate::protocol::Message;
use crate::session::{LinkStatus, MessageSink, SessionError};
use crate::variables::TankTunables;
use crate::world::World;

/// The local tank plus every remote one
#[derive(Debug, Default)]
pub struct PlayerManager {
    local: Option<LocalPlayer>,
    remotes: BTreeMap<u8, Player>,
}

impl PlayerManager {
    /// No players
    pub fn new() -> Self {
        Self::default()
    }

    /// The tank this client drives, once the server has added it
    pub const fn local_player(&self) -> Option<&LocalPlayer> {
        self.local.as_ref()
    }

    /// Any player by slot, local included
    pub fn get_player_by_slot(&self, slot: u8) -> Option<&Player> {
        self.local
            .as_ref()
            .map(LocalPlayer::player)
            .filter(|player| player.slot() == slot)
            .or_else(|| self.remotes.get(&slot))
    }

    /// Every player, local first
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.local.iter().map(LocalPlayer::player).chain(self.remotes.values())
    }

    /// Number of players, local included
    pub fn player_count(&self) -> usize {
        self.remotes.len() + usize::from(self.local.is_some())
    }

    /// Forget everyone
    pub fn clear(&mut self) {
        self.local = None;
        self.remotes.clear();
    }

    /// Apply a server message. `status` is the link state it arrived in.
    pub fn handle_message(&mut self, status: LinkStatus, message: &Message, tunables: &TankTunables) {
        match message {
            Message::AddPlayer { player, add_myself } => {
                if status == LinkStatus::Connected {
                    log::info!("{} has joined the {}", player.callsign, player.team);
                } else {
                    log::info!("{} is on the {}", player.callsign, player.team);
                }

                if *add_myself {
                    self.local = Some(LocalPlayer::new(player.clone(), *tunables));
                } else {
                    self.remotes.insert(player.slot, Player::new(player.clone(), *tunables));
                }
            }
            Message::RemovePlayer { slot, reason } => self.remove_player(*slot, reason),
            _ => {
                if let Message::Death { slot, killer } = message {
                    self.log_death(*slot, *killer);
                }

                if let Some(local) = &mut self.local {
                    local.player_mut().handle_message(message);
                }
                for player in self.remotes.values_mut() {
                    player.handle_message(message);
                }
            }
        }
    }

    fn remove_player(&mut self, slot: u8, reason: &str) {
        let removed = if self.local.as_ref().is_some_and(|local| local.player().slot() == slot) {
            self.local.take().map(|local| local.player().callsign().to_string())
        } else {
            self.remotes.remove(&slot).map(|player| player.callsign().to_string())
        };

        match removed {
            Some(callsign) => log::info!("{callsign} has left the server ({reason})"),
            None => log::warn!("Asked to remove unknown player in slot {slot}"),
        }
    }

    fn log_death(&self, slot: u8, killer: u8) {
        let name = |slot: u8| self.get_player_by_slot(slot).map_or("someone", Player::callsign);
        if slot == killer {
            log::info!("{} blew up", name(slot));
        } else {
            log::info!("{} was destroyed by {}", name(slot), name(killer));
        }
    }

    /// Advance every player one frame
    ///
    /// # Errors
    ///
    /// Fails if the local player cannot reach the server.
    pub fn update<S: MessageSink>(
        &mut self,
        time: &GameTime,
        controls: TankControls,
        world: &World,
        sink: &mut S,
    ) -> Result<(), SessionError> {
        if let Some(local) = &mut self.local {
            local.update(time, controls, world, sink)?;
        }

        // Remote shots are ended by the server, not by what we see locally
        for player in self.remotes.values_mut() {
            player.update(time, world);
        }
        Ok(())
    }
}
