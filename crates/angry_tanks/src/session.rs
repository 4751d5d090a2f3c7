//! Client side of the server connection
//!
//! [`ServerLink`] drives the connection state machine on top of a
//! [`Transport`], which only moves opaque payloads. The link decodes every
//! payload into a [`Message`] and reports what happened during the frame as a
//! list of [`LinkEvent`]s.
//!
//! ```text
//! Disconnected --connect()--> Connecting --Connected--> GettingState --MsgState--> Connected
//!      ^                                                                              |
//!      +------------------------ Disconnected event / disconnect() -------------------+
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::protocol::{Message, ProtocolError};

/// Errors raised by the connection layer
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    /// `connect` was called while a connection exists or is being made
    #[error("already connected or connecting")]
    AlreadyConnected,

    /// A message was sent before the server accepted us
    #[error("not connected to a server")]
    NotConnected,

    /// A message could not be encoded
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The underlying transport failed
    #[error("transport error: {0}")]
    Transport(String),
}

/// Delivery guarantee requested for an outgoing payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryMethod {
    /// May be lost, duplicated or reordered
    Unreliable,
    /// May be lost; late packets are dropped
    UnreliableSequenced,
    /// Always arrives, in any order
    ReliableUnordered,
    /// Always arrives, in send order
    ReliableOrdered,
}

/// Something the transport observed since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The server accepted the connection
    Connected,
    /// The connection was closed or refused
    Disconnected {
        /// Reason given by the closing side
        reason: String,
    },
    /// One datagram payload
    Data(Vec<u8>),
}

/// A datagram transport to one server
pub trait Transport {
    /// Start connecting to `host:port`, presenting `hail` to the server
    ///
    /// # Errors
    ///
    /// Fails if the transport cannot start the attempt.
    fn connect(&mut self, host: &str, port: u16, hail: Vec<u8>) -> Result<(), SessionError>;

    /// Close the connection
    fn disconnect(&mut self, reason: &str);

    /// Queue one payload for the server
    ///
    /// # Errors
    ///
    /// Fails if the transport can no longer reach the server.
    fn send(&mut self, payload: Vec<u8>, method: DeliveryMethod, channel: u8) -> Result<(), SessionError>;

    /// Next pending event, without blocking
    fn poll(&mut self) -> Option<TransportEvent>;
}

/// Connection state as seen by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkStatus {
    /// No connection
    #[default]
    Disconnected,
    /// Waiting for the server to accept the hail
    Connecting,
    /// Accepted; receiving the world and the current players
    GettingState,
    /// Fully in the game
    Connected,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::GettingState => "getting state",
            Self::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// What happened on the link during one update
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// The connection state changed
    StatusChanged {
        /// Previous state
        from: LinkStatus,
        /// New state
        to: LinkStatus,
    },
    /// A message arrived
    Message {
        /// Link state when the message arrived
        status: LinkStatus,
        /// The decoded message
        message: Message,
    },
}

/// Anything messages can be sent through
pub trait MessageSink {
    /// Encode and send `message`
    ///
    /// # Errors
    ///
    /// Fails when not connected or when the message cannot be encoded.
    fn send_message(&mut self, message: &Message, method: DeliveryMethod) -> Result<(), SessionError>;
}

/// Connection to the game server over some [`Transport`]
#[derive(Debug)]
pub struct ServerLink<T: Transport> {
    transport: T,
    status: LinkStatus,
}

impl<T: Transport> ServerLink<T> {
    /// Wraps an idle transport
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            status: LinkStatus::Disconnected,
        }
    }

    /// Current connection state
    pub const fn status(&self) -> LinkStatus {
        self.status
    }

    /// The wrapped transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Start connecting, sending `hail` (normally [`Message::Enter`])
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyConnected`] unless disconnected.
    pub fn connect(&mut self, host: &str, port: u16, hail: &Message) -> Result<(), SessionError> {
        if self.status != LinkStatus::Disconnected {
            return Err(SessionError::AlreadyConnected);
        }

        log::info!("Connecting to {host}:{port}");
        self.transport.connect(host, port, hail.encode()?)?;
        self.status = LinkStatus::Connecting;
        Ok(())
    }

    /// Close the connection. Does nothing while disconnected.
    pub fn disconnect(&mut self, reason: &str) {
        if self.status == LinkStatus::Disconnected {
            return;
        }

        log::info!("Disconnecting: {reason}");
        self.transport.disconnect(reason);
        self.status = LinkStatus::Disconnected;
    }

    /// Drain every pending transport event.
    ///
    /// A world request that cannot be sent after the server accepts us drops
    /// the connection; the caller sees it as a status change.
    pub fn update(&mut self) -> Vec<LinkEvent> {
        let mut events = Vec::new();

        while let Some(event) = self.transport.poll() {
            match event {
                TransportEvent::Connected => {
                    if self.status != LinkStatus::Connecting {
                        log::warn!("Unexpected connect event while {}", self.status);
                        continue;
                    }
                    self.change_status(LinkStatus::GettingState, &mut events);

                    log::debug!("Requesting world");
                    if let Err(error) =
                        self.send_message(&Message::World { raw: Vec::new() }, DeliveryMethod::ReliableOrdered)
                    {
                        log::error!("Failed to request world: {error}");
                        self.transport.disconnect("failed to request world");
                        self.change_status(LinkStatus::Disconnected, &mut events);
                    }
                }
                TransportEvent::Disconnected { reason } => {
                    log::info!("Disconnected from server: {reason}");
                    self.change_status(LinkStatus::Disconnected, &mut events);
                }
                TransportEvent::Data(payload) => self.handle_data(&payload, &mut events),
            }
        }

        events
    }

    fn handle_data(&mut self, payload: &[u8], events: &mut Vec<LinkEvent>) {
        if self.status == LinkStatus::Disconnected {
            log::debug!("Dropping {} bytes received while disconnected", payload.len());
            return;
        }

        let message = match Message::decode(payload) {
            Ok(message) => message,
            Err(error) => {
                log::warn!("Dropping undecodable message: {error}");
                return;
            }
        };

        if message == Message::State {
            if self.status == LinkStatus::GettingState {
                self.change_status(LinkStatus::Connected, events);
            } else {
                log::warn!("Got MsgState while {}", self.status);
            }
            return;
        }

        log::trace!("Got {:?}", message.message_type());
        events.push(LinkEvent::Message {
            status: self.status,
            message,
        });
    }

    fn change_status(&mut self, to: LinkStatus, events: &mut Vec<LinkEvent>) {
        let from = self.status;
        if from == to {
            return;
        }

        log::debug!("Link status {from} -> {to}");
        self.status = to;
        events.push(LinkEvent::StatusChanged { from, to });
    }
}

impl<T: Transport> MessageSink for ServerLink<T> {
    fn send_message(&mut self, message: &Message, method: DeliveryMethod) -> Result<(), SessionError> {
        if !matches!(self.status, LinkStatus::GettingState | LinkStatus::Connected) {
            return Err(SessionError::NotConnected);
        }
        self.transport.send(message.encode()?, method, 0)
    }
}

/// What the client side of a loopback pair did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientPacket {
    /// Connection attempt
    Connect {
        /// Requested host
        host: String,
        /// Requested port
        port: u16,
        /// Hail payload
        hail: Vec<u8>,
    },
    /// Connection closed by the client
    Disconnect {
        /// Reason given
        reason: String,
    },
    /// One datagram
    Data {
        /// Payload
        payload: Vec<u8>,
        /// Requested delivery
        method: DeliveryMethod,
        /// Requested channel
        channel: u8,
    },
}

/// Client half of an in-memory transport pair
#[derive(Debug)]
pub struct LoopbackTransport {
    outgoing: Sender<ClientPacket>,
    incoming: Receiver<TransportEvent>,
}

/// Server half of an in-memory transport pair
#[derive(Debug)]
pub struct LoopbackServer {
    incoming: Receiver<ClientPacket>,
    outgoing: Sender<TransportEvent>,
    pending: VecDeque<ClientPacket>,
}

/// Create a connected client/server pair
pub fn loopback() -> (LoopbackTransport, LoopbackServer) {
    let (client_tx, server_rx) = mpsc::channel();
    let (server_tx, client_rx) = mpsc::channel();

    (
        LoopbackTransport {
            outgoing: client_tx,
            incoming: client_rx,
        },
        LoopbackServer {
            incoming: server_rx,
            outgoing: server_tx,
            pending: VecDeque::new(),
        },
    )
}

impl LoopbackTransport {
    fn push(&self, packet: ClientPacket) -> Result<(), SessionError> {
        self.outgoing
            .send(packet)
            .map_err(|_| SessionError::Transport("loopback server dropped".to_string()))
    }
}

impl Transport for LoopbackTransport {
    fn connect(&mut self, host: &str, port: u16, hail: Vec<u8>) -> Result<(), SessionError> {
        self.push(ClientPacket::Connect {
            host: host.to_string(),
            port,
            hail,
        })
    }

    fn disconnect(&mut self, reason: &str) {
        if self
            .push(ClientPacket::Disconnect {
                reason: reason.to_string(),
            })
            .is_err()
        {
            log::debug!("Loopback server already gone");
        }
    }

    fn send(&mut self, payload: Vec<u8>, method: DeliveryMethod, channel: u8) -> Result<(), SessionError> {
        self.push(ClientPacket::Data {
            payload,
            method,
            channel,
        })
    }

    fn poll(&mut self) -> Option<TransportEvent> {
        self.incoming.try_recv().ok()
    }
}

impl LoopbackServer {
    fn push(&self, event: TransportEvent) -> Result<(), SessionError> {
        self.outgoing
            .send(event)
            .map_err(|_| SessionError::Transport("loopback client dropped".to_string()))
    }

    /// Accept the client's connection
    ///
    /// # Errors
    ///
    /// Fails if the client half was dropped.
    pub fn accept(&self) -> Result<(), SessionError> {
        self.push(TransportEvent::Connected)
    }

    /// Close the client's connection
    ///
    /// # Errors
    ///
    /// Fails if the client half was dropped.
    pub fn kick(&self, reason: &str) -> Result<(), SessionError> {
        self.push(TransportEvent::Disconnected {
            reason: reason.to_string(),
        })
    }

    /// Send a message to the client
    ///
    /// # Errors
    ///
    /// Fails if the message cannot be encoded or the client half was dropped.
    pub fn send_message(&self, message: &Message) -> Result<(), SessionError> {
        self.push(TransportEvent::Data(message.encode()?))
    }

    /// Send a raw payload to the client
    ///
    /// # Errors
    ///
    /// Fails if the client half was dropped.
    pub fn send_raw(&self, payload: Vec<u8>) -> Result<(), SessionError> {
        self.push(TransportEvent::Data(payload))
    }

    /// Everything the client did since the last call
    pub fn drain(&mut self) -> Vec<ClientPacket> {
        self.pending.extend(self.incoming.try_iter());
        self.pending.drain(..).collect()
    }

    /// Decoded messages the client sent since the last call, skipping other
    /// packets and anything undecodable
    pub fn received_messages(&mut self) -> Vec<Message> {
        self.drain()
            .into_iter()
            .filter_map(|packet| match packet {
                ClientPacket::Data { payload, .. } => Message::decode(&payload).ok(),
                ClientPacket::Connect { .. } | ClientPacket::Disconnect { .. } => None,
            })
            .collect()
    }
}
