//! Socket.IO session steps between raw websocket text and the controller.
//!
//! Transports own the socket and the reconnect loop; `Link` owns the protocol
//! state of one socket lifetime. Feed every inbound text message through
//! [`Link::receive_text`] and write back whatever reply it returns.

#[cfg(test)]
#[path = "link_test.rs"]
mod link_test;

use wire::{Handshake, Packet, decode_packet, encode_packet};

use crate::controller::{Outbox, ViewSync};
use crate::event::ClientEvent;
use crate::render::Renderer;

/// Path and query of the Engine.IO websocket endpoint.
pub const SOCKET_PATH: &str = "/socket.io/?EIO=4&transport=websocket";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("invalid server origin: {0}")]
    InvalidOrigin(String),
}

/// What a transport must do after one inbound packet.
#[derive(Clone, Debug, PartialEq)]
pub enum LinkStep {
    /// Write this packet back on the socket.
    Reply(Packet),
    /// Namespace connect acknowledged.
    Connected,
    /// Hand this event to the controller.
    Deliver(wire::Event),
    /// The server closed the session.
    Closed,
    /// The server refused the namespace connect.
    Refused(String),
    /// Nothing to do.
    Idle,
}

/// Protocol state for one socket lifetime. Create a fresh one per reconnect.
#[derive(Clone, Debug, Default)]
pub struct Link {
    handshake: Option<Handshake>,
    connected: bool,
    closed: bool,
}

impl Link {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine.IO handshake, once received.
    #[must_use]
    pub fn handshake(&self) -> Option<&Handshake> {
        self.handshake.as_ref()
    }

    /// Whether the namespace connect was acknowledged.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Whether the server ended the session. The socket should be dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Advance the session by one decoded packet.
    pub fn step(&mut self, packet: Packet) -> LinkStep {
        match packet {
            Packet::Open(handshake) => {
                log::debug!(
                    "engine open: sid={} ping_interval={}ms",
                    handshake.sid,
                    handshake.ping_interval
                );
                self.handshake = Some(handshake);
                LinkStep::Reply(Packet::Connect(None))
            }
            Packet::Connect(_) => {
                self.connected = true;
                LinkStep::Connected
            }
            Packet::Ping => LinkStep::Reply(Packet::Pong),
            Packet::Event(event) => LinkStep::Deliver(event),
            Packet::Close | Packet::Disconnect => {
                self.connected = false;
                self.closed = true;
                LinkStep::Closed
            }
            Packet::ConnectError(message) => LinkStep::Refused(message),
            Packet::Pong | Packet::Noop => LinkStep::Idle,
        }
    }

    /// Decode one websocket text message, apply it to `view`, and return the
    /// reply text to write back, if any. Undecodable messages are logged and
    /// dropped.
    pub fn receive_text<R: Renderer, O: Outbox>(
        &mut self,
        text: &str,
        view: &mut ViewSync<R, O>,
    ) -> Option<String> {
        let packet = match decode_packet(text) {
            Ok(packet) => packet,
            Err(e) => {
                log::warn!("dropping packet: {e}");
                return None;
            }
        };
        match self.step(packet) {
            LinkStep::Reply(packet) => return Some(encode_packet(&packet)),
            LinkStep::Connected => view.on_connected(),
            LinkStep::Deliver(event) => view.receive(&event),
            LinkStep::Closed => view.on_disconnected(),
            LinkStep::Refused(message) => view.on_refused(&message),
            LinkStep::Idle => {}
        }
        None
    }
}

/// Websocket text for one outbound client event.
#[must_use]
pub fn encode_client_event(event: &ClientEvent) -> String {
    encode_packet(&Packet::Event(event.to_wire()))
}

/// Websocket URL for an HTTP(S) server origin.
///
/// # Errors
///
/// Returns [`LinkError::InvalidOrigin`] when `origin` has no `http`, `https`,
/// `ws` or `wss` scheme or no host.
pub fn socket_url(origin: &str) -> Result<String, LinkError> {
    let origin = origin.trim().trim_end_matches('/');
    let (scheme, host) = match origin.split_once("://") {
        Some(("http" | "ws", host)) => ("ws", host),
        Some(("https" | "wss", host)) => ("wss", host),
        _ => return Err(LinkError::InvalidOrigin(origin.to_owned())),
    };
    if host.is_empty() {
        return Err(LinkError::InvalidOrigin(origin.to_owned()));
    }
    Ok(format!("{scheme}://{host}{SOCKET_PATH}"))
}
