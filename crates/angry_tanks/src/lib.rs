//! # Angry Tanks
//!
//! Headless client for a networked tank arena built on `tank_engine`.
//!
//! ## Architecture
//!
//! - **Protocol**: a little-endian message codec shared with the server
//! - **Session**: the connection state machine over a pluggable transport
//! - **World**: the static map, indexed by a uniform grid
//! - **Players**: local and remote tanks with their shots
//! - **Variables**: server-tunable game constants
//!
//! [`GameClient`](game::GameClient) owns all of them and runs one frame per
//! call to `update`.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod game;
pub mod local_player;
pub mod player;
pub mod player_manager;
pub mod protocol;
pub mod session;
pub mod shot;
pub mod sprite;
pub mod variables;
pub mod world;

/// Common imports for client code
pub mod prelude {
    pub use crate::{
        config::{ClientConfig, GameConfig, SimulationConfig},
        game::{GameClient, GameError},
        local_player::{LocalPlayer, TankControls},
        player::{Player, PlayerState},
        player_manager::PlayerManager,
        protocol::{Message, MessageType, PlayerInformation, Score, TeamType},
        session::{
            loopback, DeliveryMethod, LinkEvent, LinkStatus, LoopbackServer, LoopbackTransport,
            MessageSink, ServerLink, SessionError, Transport, TransportEvent,
        },
        shot::{Shot, ShotEnding, ShotState},
        sprite::{DynamicSprite, Sprite, SpriteChange, StaticSprite},
        variables::{TankTunables, VariableDatabase, VariableError},
        world::{MapDescription, MapObjectId, MapObjectKind, World, WorldError},
    };
}
