//! Text packet codec for the realtime game channel.
//!
//! The game server speaks Socket.IO v5 over an Engine.IO v4 websocket. This
//! crate owns that framing for both front ends (`client` and `cli`) and keeps
//! event payloads flexible (`serde_json::Value`); typed decoding of the game
//! events happens one layer up in `viewsync`.
//!
//! FRAMING
//! =======
//! One websocket text message carries exactly one packet. The first digit is
//! the Engine.IO packet type; `4` ("message") is followed by a second digit
//! holding the Socket.IO packet type:
//!
//! ```text
//! 0{"sid":"...","pingInterval":25000,...}   engine open (handshake)
//! 2 / 3                                     engine ping / pong
//! 40                                        socket connect (default namespace)
//! 42["new_question",{"question":{...}}]     socket event
//! 44{"message":"not allowed"}               socket connect error
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned by [`decode_packet`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The websocket message was empty.
    #[error("empty packet")]
    Empty,
    /// The leading type digit does not map to a supported packet.
    #[error("unsupported packet type: {0}")]
    UnsupportedType(String),
    /// An event packet did not carry a `["name", data]` array.
    #[error("malformed event packet: {0}")]
    MalformedEvent(String),
    /// The JSON body of the packet could not be parsed.
    #[error("invalid packet JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Engine.IO open handshake sent by the server right after the upgrade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    /// Engine.IO session identifier.
    pub sid: String,
    /// Transports the connection may upgrade to (empty over websocket).
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Server heartbeat interval in milliseconds.
    pub ping_interval: u64,
    /// Grace period after a missed heartbeat in milliseconds.
    pub ping_timeout: u64,
    /// Largest payload the server accepts, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_payload: Option<u64>,
}

/// A named event with its JSON payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Event name, e.g. `"new_question"`.
    pub name: String,
    /// Event payload; an empty object when the sender attached none.
    pub data: Value,
}

impl Event {
    /// Build an event from a name and payload.
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// One packet on the realtime channel.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    /// Engine.IO open handshake.
    Open(Handshake),
    /// Engine.IO close.
    Close,
    /// Engine.IO heartbeat from the server.
    Ping,
    /// Engine.IO heartbeat reply.
    Pong,
    /// Engine.IO no-op.
    Noop,
    /// Socket.IO namespace connect (request from client, ack from server).
    Connect(Option<Value>),
    /// Socket.IO namespace disconnect.
    Disconnect,
    /// Socket.IO event.
    Event(Event),
    /// Socket.IO connect refusal with the server's message.
    ConnectError(String),
}

/// Encode a packet into its websocket text form.
#[must_use]
pub fn encode_packet(packet: &Packet) -> String {
    match packet {
        Packet::Open(handshake) => {
            let body = serde_json::to_string(handshake).unwrap_or_default();
            format!("0{body}")
        }
        Packet::Close => "1".to_owned(),
        Packet::Ping => "2".to_owned(),
        Packet::Pong => "3".to_owned(),
        Packet::Noop => "6".to_owned(),
        Packet::Connect(None) => "40".to_owned(),
        Packet::Connect(Some(auth)) => format!("40{auth}"),
        Packet::Disconnect => "41".to_owned(),
        Packet::Event(event) => {
            let body = serde_json::json!([event.name, event.data]);
            format!("42{body}")
        }
        Packet::ConnectError(message) => {
            format!("44{}", serde_json::json!({ "message": message }))
        }
    }
}

/// Decode one websocket text message into a packet.
///
/// # Errors
///
/// Returns [`CodecError::Empty`] for an empty message,
/// [`CodecError::UnsupportedType`] for packet types this client never
/// handles (binary events, acks, upgrades), and [`CodecError::MalformedEvent`]
/// or [`CodecError::Json`] when a body cannot be parsed.
pub fn decode_packet(text: &str) -> Result<Packet, CodecError> {
    let Some((engine_type, rest)) = split_type(text) else {
        return Err(CodecError::Empty);
    };

    match engine_type {
        '0' => Ok(Packet::Open(serde_json::from_str(rest)?)),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '6' => Ok(Packet::Noop),
        '4' => decode_socket_packet(rest),
        other => Err(CodecError::UnsupportedType(other.to_string())),
    }
}

fn decode_socket_packet(text: &str) -> Result<Packet, CodecError> {
    let Some((socket_type, rest)) = split_type(text) else {
        return Err(CodecError::UnsupportedType("4".to_owned()));
    };
    let body = strip_ack_id(strip_namespace(rest));

    match socket_type {
        '0' => {
            if body.trim().is_empty() {
                Ok(Packet::Connect(None))
            } else {
                Ok(Packet::Connect(Some(serde_json::from_str(body)?)))
            }
        }
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(body).map(Packet::Event),
        '4' => Ok(Packet::ConnectError(connect_error_message(body)?)),
        other => Err(CodecError::UnsupportedType(format!("4{other}"))),
    }
}

fn decode_event(body: &str) -> Result<Event, CodecError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(mut items) = value else {
        return Err(CodecError::MalformedEvent("expected JSON array".to_owned()));
    };
    if items.is_empty() {
        return Err(CodecError::MalformedEvent("missing event name".to_owned()));
    }
    let Value::String(name) = items.remove(0) else {
        return Err(CodecError::MalformedEvent("event name must be a string".to_owned()));
    };
    let data = match items.into_iter().next() {
        Some(Value::Null) | None => Value::Object(Map::new()),
        Some(data) => data,
    };
    Ok(Event { name, data })
}

fn connect_error_message(body: &str) -> Result<String, CodecError> {
    if body.trim().is_empty() {
        return Ok(String::new());
    }
    let value: Value = serde_json::from_str(body)?;
    let message = match value {
        Value::String(message) => message,
        Value::Object(ref map) => map
            .get("message")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), ToOwned::to_owned),
        other => other.to_string(),
    };
    Ok(message)
}

fn split_type(text: &str) -> Option<(char, &str)> {
    let first = text.chars().next()?;
    Some((first, &text[first.len_utf8()..]))
}

/// Drop a `/namespace,` prefix; only the default namespace is used.
fn strip_namespace(text: &str) -> &str {
    if !text.starts_with('/') {
        return text;
    }
    match text.find(',') {
        Some(idx) => &text[idx + 1..],
        None => "",
    }
}

fn strip_ack_id(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
