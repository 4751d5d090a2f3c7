//! Headless game client tying the link, world and players together

use rand::seq::SliceRandom;
use rand::Rng;
use tank_engine::config::ConfigError;
use tank_engine::foundation::math::Vec2;
use tank_engine::foundation::time::GameTime;

use crate::config::ClientConfig;
use crate::local_player::TankControls;
use crate::player_manager::PlayerManager;
use crate::protocol::{Message, PROTOCOL_VERSION};
use crate::session::{LinkEvent, LinkStatus, ServerLink, SessionError, Transport};
use crate::variables::{TankTunables, VariableDatabase, VariableError};
use crate::world::{World, WorldError};

/// World size used until the server sends a map
pub const DEFAULT_WORLD_SIZE: (f32, f32) = (800.0, 800.0);

/// Anything that can go wrong while running the client
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Connection failure
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Bad map
    #[error(transparent)]
    World(#[from] WorldError),

    /// Bad game variable
    #[error(transparent)]
    Variable(#[from] VariableError),

    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Pick a callsign for players who did not configure one
pub fn random_callsign<R: Rng>(rng: &mut R) -> String {
    const NAMES: [&str; 8] = [
        "Rookie", "Tread", "Howitzer", "Sprocket", "Bulldog", "Rattler", "Ironsides", "Gunner",
    ];
    let name = NAMES.choose(rng).copied().unwrap_or("Tank");
    format!("{name}{}", rng.gen_range(10..100))
}

/// One client session: the server link, the world and everyone in it
#[derive(Debug)]
pub struct GameClient<T: Transport> {
    link: ServerLink<T>,
    world: World,
    players: PlayerManager,
    variables: VariableDatabase,
    tunables: TankTunables,
    grid_size: (u16, u16),
}

impl<T: Transport> GameClient<T> {
    /// A disconnected client
    ///
    /// # Errors
    ///
    /// Fails if a built-in variable is missing or the grid size is invalid.
    pub fn new(transport: T, variables: VariableDatabase, grid_size: (u16, u16)) -> Result<Self, GameError> {
        let (width, height) = DEFAULT_WORLD_SIZE;
        Ok(Self {
            link: ServerLink::new(transport),
            world: World::empty(Vec2::new(width, height), grid_size)?,
            players: PlayerManager::new(),
            tunables: TankTunables::from_variables(&variables)?,
            variables,
            grid_size,
        })
    }

    /// Connection state
    pub const fn status(&self) -> LinkStatus {
        self.link.status()
    }

    /// The server link
    pub const fn link(&self) -> &ServerLink<T> {
        &self.link
    }

    /// The current map
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Everyone in the game
    pub const fn players(&self) -> &PlayerManager {
        &self.players
    }

    /// Game variables
    pub const fn variables(&self) -> &VariableDatabase {
        &self.variables
    }

    /// Connect using `config`
    ///
    /// # Errors
    ///
    /// Fails if already connected or the hail cannot be sent.
    pub fn connect(&mut self, config: &ClientConfig) -> Result<(), GameError> {
        // Variables may have been overridden since construction
        self.tunables = TankTunables::from_variables(&self.variables)?;

        let callsign = config
            .callsign
            .clone()
            .unwrap_or_else(|| random_callsign(&mut rand::thread_rng()));
        let hail = Message::Enter {
            protocol_version: PROTOCOL_VERSION,
            team: config.team,
            callsign,
            tag: config.tag.clone(),
        };

        self.link.connect(&config.host, config.port, &hail)?;
        Ok(())
    }

    /// Leave the server and forget the session
    pub fn disconnect(&mut self, reason: &str) {
        self.link.disconnect(reason);
        self.reset();
    }

    fn reset(&mut self) {
        self.players.clear();
        self.world.clear();
    }

    /// Run one frame: network, then players
    ///
    /// # Errors
    ///
    /// Fails on send errors or when the server sends an unusable map.
    pub fn update(&mut self, time: &GameTime, controls: TankControls) -> Result<(), GameError> {
        for event in self.link.update() {
            match event {
                LinkEvent::StatusChanged { to: LinkStatus::Disconnected, .. } => self.reset(),
                LinkEvent::StatusChanged { from, to } => log::debug!("Session {from} -> {to}"),
                LinkEvent::Message {
                    message: Message::World { raw },
                    ..
                } => {
                    if raw.is_empty() {
                        log::warn!("Server sent an empty world");
                        continue;
                    }
                    self.world = World::from_raw(&raw, self.grid_size)?;
                }
                LinkEvent::Message { status, message } => {
                    self.players.handle_message(status, &message, &self.tunables);
                }
            }
        }

        if matches!(self.link.status(), LinkStatus::GettingState | LinkStatus::Connected) {
            self.players.update(time, controls, &self.world, &mut self.link)?;
        }
        Ok(())
    }
}
