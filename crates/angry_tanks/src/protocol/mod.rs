//! Wire protocol between the client and the game server
//!
//! Every datagram carries one [`Message`]: a [`MessageType`] byte followed by
//! the message fields in little-endian order. Strings and byte blobs carry a
//! `u16` length prefix.

mod codec;
mod messages;

pub use codec::{MessageReader, MessageWriter, ProtocolError};
pub use messages::{Message, MessageType, PlayerInformation, Score, TeamType};

/// Version sent in the connection hail; servers refuse other versions
pub const PROTOCOL_VERSION: u16 = 1;

/// Port the server listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 5150;
