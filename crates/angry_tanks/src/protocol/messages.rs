//! Message set exchanged with the game server

use std::fmt;

use serde::{Deserialize, Serialize};
use tank_engine::foundation::math::Vec2;

use super::{MessageReader, MessageWriter, ProtocolError};

/// Leading byte identifying a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Connection hail sent by the client
    MsgEnter = 1,
    /// State request (client) or end-of-state marker (server)
    MsgState = 2,
    /// World request (client) or map payload (server)
    MsgWorld = 3,
    /// A player joined
    MsgAddPlayer = 4,
    /// A player left
    MsgRemovePlayer = 5,
    /// Local tank pose sent to the server
    MsgPlayerClientUpdate = 6,
    /// Remote tank pose relayed by the server
    MsgPlayerServerUpdate = 7,
    /// A player (re)spawned
    MsgSpawn = 8,
    /// A player was killed
    MsgDeath = 9,
    /// A player's score changed
    MsgScore = 10,
    /// A shot was fired
    MsgShotBegin = 11,
    /// A shot ended
    MsgShotEnd = 12,
}

impl TryFrom<u8> for MessageType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::MsgEnter,
            2 => Self::MsgState,
            3 => Self::MsgWorld,
            4 => Self::MsgAddPlayer,
            5 => Self::MsgRemovePlayer,
            6 => Self::MsgPlayerClientUpdate,
            7 => Self::MsgPlayerServerUpdate,
            8 => Self::MsgSpawn,
            9 => Self::MsgDeath,
            10 => Self::MsgScore,
            11 => Self::MsgShotBegin,
            12 => Self::MsgShotEnd,
            other => return Err(ProtocolError::UnknownMessageType(other)),
        })
    }
}

/// Team a player plays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TeamType {
    /// Let the server choose
    Automatic = 0,
    /// Fights everyone
    #[default]
    Rogue = 1,
    /// Red team
    Red = 2,
    /// Green team
    Green = 3,
    /// Blue team
    Blue = 4,
    /// Purple team
    Purple = 5,
    /// Watches without playing
    Observer = 6,
}

impl TryFrom<u8> for TeamType {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Automatic,
            1 => Self::Rogue,
            2 => Self::Red,
            3 => Self::Green,
            4 => Self::Blue,
            5 => Self::Purple,
            6 => Self::Observer,
            other => return Err(ProtocolError::UnknownTeam(other)),
        })
    }
}

impl fmt::Display for TeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Automatic => "Automatic Team",
            Self::Rogue => "Rogue Team",
            Self::Red => "Red Team",
            Self::Green => "Green Team",
            Self::Blue => "Blue Team",
            Self::Purple => "Purple Team",
            Self::Observer => "Observers",
        };
        f.write_str(name)
    }
}

/// Identity of a player as announced by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInformation {
    /// Server-assigned slot, unique among connected players
    pub slot: u8,
    /// Display name
    pub callsign: String,
    /// Free-form tag shown next to the callsign
    pub tag: String,
    /// Team
    pub team: TeamType,
}

impl PlayerInformation {
    fn write(&self, writer: &mut MessageWriter) -> Result<(), ProtocolError> {
        writer.write_u8(self.slot);
        writer.write_string(&self.callsign)?;
        writer.write_string(&self.tag)?;
        writer.write_u8(self.team as u8);
        Ok(())
    }

    fn read(reader: &mut MessageReader<'_>) -> Result<Self, ProtocolError> {
        Ok(Self {
            slot: reader.read_u8()?,
            callsign: reader.read_string()?,
            tag: reader.read_string()?,
            team: TeamType::try_from(reader.read_u8()?)?,
        })
    }
}

/// Win/loss tally of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    /// Kills
    pub wins: u16,
    /// Deaths
    pub losses: u16,
}

impl Score {
    /// Wins minus losses
    pub fn total(&self) -> i32 {
        i32::from(self.wins) - i32::from(self.losses)
    }
}

/// One protocol message
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Connection hail
    Enter {
        /// Protocol version the client speaks
        protocol_version: u16,
        /// Requested team
        team: TeamType,
        /// Requested callsign
        callsign: String,
        /// Requested tag
        tag: String,
    },
    /// Empty state request or end-of-state marker
    State,
    /// World request when `raw` is empty, otherwise the RON map description
    World {
        /// Map payload
        raw: Vec<u8>,
    },
    /// A player joined
    AddPlayer {
        /// Who joined
        player: PlayerInformation,
        /// Whether the new player is the receiving client
        add_myself: bool,
    },
    /// A player left
    RemovePlayer {
        /// Slot of the leaving player
        slot: u8,
        /// Reason shown to others
        reason: String,
    },
    /// Local tank pose
    PlayerClientUpdate {
        /// Tank center
        position: Vec2,
        /// Tank rotation in radians
        rotation: f32,
    },
    /// Remote tank pose
    PlayerServerUpdate {
        /// Player slot
        slot: u8,
        /// Tank center
        position: Vec2,
        /// Tank rotation in radians
        rotation: f32,
    },
    /// A player spawned
    Spawn {
        /// Player slot
        slot: u8,
        /// Spawn position
        position: Vec2,
        /// Spawn rotation in radians
        rotation: f32,
    },
    /// A player died
    Death {
        /// Player slot
        slot: u8,
        /// Slot of the killer
        killer: u8,
    },
    /// New score of a player
    Score {
        /// Player slot
        slot: u8,
        /// Updated tally
        score: Score,
    },
    /// A shot was fired
    ShotBegin {
        /// Slot of the shooter
        slot: u8,
        /// Shot slot of the shooter
        shot_slot: u8,
        /// Muzzle position
        position: Vec2,
        /// Shooter rotation in radians
        rotation: f32,
        /// Shot velocity
        velocity: Vec2,
    },
    /// A shot ended
    ShotEnd {
        /// Slot of the shooter
        slot: u8,
        /// Shot slot of the shooter
        shot_slot: u8,
        /// Whether the shot ended by hitting something
        explode: bool,
    },
}

impl Message {
    /// Type byte of this message
    pub const fn message_type(&self) -> MessageType {
        match self {
            Self::Enter { .. } => MessageType::MsgEnter,
            Self::State => MessageType::MsgState,
            Self::World { .. } => MessageType::MsgWorld,
            Self::AddPlayer { .. } => MessageType::MsgAddPlayer,
            Self::RemovePlayer { .. } => MessageType::MsgRemovePlayer,
            Self::PlayerClientUpdate { .. } => MessageType::MsgPlayerClientUpdate,
            Self::PlayerServerUpdate { .. } => MessageType::MsgPlayerServerUpdate,
            Self::Spawn { .. } => MessageType::MsgSpawn,
            Self::Death { .. } => MessageType::MsgDeath,
            Self::Score { .. } => MessageType::MsgScore,
            Self::ShotBegin { .. } => MessageType::MsgShotBegin,
            Self::ShotEnd { .. } => MessageType::MsgShotEnd,
        }
    }

    /// Slot of the player a message is about, if any
    pub const fn player_slot(&self) -> Option<u8> {
        match self {
            Self::AddPlayer { player, .. } => Some(player.slot),
            Self::RemovePlayer { slot, .. }
            | Self::PlayerServerUpdate { slot, .. }
            | Self::Spawn { slot, .. }
            | Self::Death { slot, .. }
            | Self::Score { slot, .. }
            | Self::ShotBegin { slot, .. }
            | Self::ShotEnd { slot, .. } => Some(*slot),
            Self::Enter { .. }
            | Self::State
            | Self::World { .. }
            | Self::PlayerClientUpdate { .. } => None,
        }
    }

    /// Serialize to a datagram payload
    ///
    /// # Errors
    ///
    /// Fails if a string field is longer than the protocol allows.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut writer = MessageWriter::new();
        writer.write_u8(self.message_type() as u8);

        match self {
            Self::Enter {
                protocol_version,
                team,
                callsign,
                tag,
            } => {
                writer.write_u16(*protocol_version).write_u8(*team as u8);
                writer.write_string(callsign)?.write_string(tag)?;
            }
            Self::State => {}
            Self::World { raw } => {
                // The map runs to the end of the datagram, so it has no length prefix
                for byte in raw {
                    writer.write_u8(*byte);
                }
            }
            Self::AddPlayer { player, add_myself } => {
                player.write(&mut writer)?;
                writer.write_bool(*add_myself);
            }
            Self::RemovePlayer { slot, reason } => {
                writer.write_u8(*slot).write_string(reason)?;
            }
            Self::PlayerClientUpdate { position, rotation } => {
                writer.write_vec2(position).write_f32(*rotation);
            }
            Self::PlayerServerUpdate {
                slot,
                position,
                rotation,
            }
            | Self::Spawn {
                slot,
                position,
                rotation,
            } => {
                writer.write_u8(*slot).write_vec2(position).write_f32(*rotation);
            }
            Self::Death { slot, killer } => {
                writer.write_u8(*slot).write_u8(*killer);
            }
            Self::Score { slot, score } => {
                writer.write_u8(*slot).write_u16(score.wins).write_u16(score.losses);
            }
            Self::ShotBegin {
                slot,
                shot_slot,
                position,
                rotation,
                velocity,
            } => {
                writer
                    .write_u8(*slot)
                    .write_u8(*shot_slot)
                    .write_vec2(position)
                    .write_f32(*rotation)
                    .write_vec2(velocity);
            }
            Self::ShotEnd {
                slot,
                shot_slot,
                explode,
            } => {
                writer.write_u8(*slot).write_u8(*shot_slot).write_bool(*explode);
            }
        }

        Ok(writer.finish())
    }

    /// Parse a datagram payload
    ///
    /// # Errors
    ///
    /// Fails on unknown type bytes, truncated fields, invalid strings or
    /// leftover bytes.
    pub fn decode(payload: &[u8]) -> Result<Self, ProtocolError> {
        let mut reader = MessageReader::new(payload);
        let message_type = MessageType::try_from(reader.read_u8()?)?;

        let message = match message_type {
            MessageType::MsgEnter => Self::Enter {
                protocol_version: reader.read_u16()?,
                team: TeamType::try_from(reader.read_u8()?)?,
                callsign: reader.read_string()?,
                tag: reader.read_string()?,
            },
            MessageType::MsgState => Self::State,
            MessageType::MsgWorld => Self::World {
                raw: reader.read_remaining(),
            },
            MessageType::MsgAddPlayer => Self::AddPlayer {
                player: PlayerInformation::read(&mut reader)?,
                add_myself: reader.read_bool()?,
            },
            MessageType::MsgRemovePlayer => Self::RemovePlayer {
                slot: reader.read_u8()?,
                reason: reader.read_string()?,
            },
            MessageType::MsgPlayerClientUpdate => Self::PlayerClientUpdate {
                position: reader.read_vec2()?,
                rotation: reader.read_f32()?,
            },
            MessageType::MsgPlayerServerUpdate => Self::PlayerServerUpdate {
                slot: reader.read_u8()?,
                position: reader.read_vec2()?,
                rotation: reader.read_f32()?,
            },
            MessageType::MsgSpawn => Self::Spawn {
                slot: reader.read_u8()?,
                position: reader.read_vec2()?,
                rotation: reader.read_f32()?,
            },
            MessageType::MsgDeath => Self::Death {
                slot: reader.read_u8()?,
                killer: reader.read_u8()?,
            },
            MessageType::MsgScore => Self::Score {
                slot: reader.read_u8()?,
                score: Score {
                    wins: reader.read_u16()?,
                    losses: reader.read_u16()?,
                },
            },
            MessageType::MsgShotBegin => Self::ShotBegin {
                slot: reader.read_u8()?,
                shot_slot: reader.read_u8()?,
                position: reader.read_vec2()?,
                rotation: reader.read_f32()?,
                velocity: reader.read_vec2()?,
            },
            MessageType::MsgShotEnd => Self::ShotEnd {
                slot: reader.read_u8()?,
                shot_slot: reader.read_u8()?,
                explode: reader.read_bool()?,
            },
        };

        reader.finish()?;
        Ok(message)
    }
}
