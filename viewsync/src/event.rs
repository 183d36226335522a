//! Typed game events and the inbound dispatch table.
//!
//! DESIGN
//! ======
//! Inbound events arrive as `wire::Event { name, data }`. [`DISPATCH`] maps
//! each event name (including the aliases older servers emit) to a decoder
//! that turns the JSON payload into a [`ServerEvent`]. Names missing from the
//! table are not errors; the server may broadcast events this client does not
//! render.
//!
//! Identifiers are carried as [`WireId`] and echoed back exactly as the
//! server sent them, string or integer.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error decoding a known event's payload.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("invalid `{name}` payload: {source}")]
    Payload {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Opaque server identifier (the server uses integer keys, tests use strings).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One roster row. Older servers send bare names instead of objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRosterEntry")]
pub struct RosterEntry {
    pub id: Option<WireId>,
    pub name: String,
    pub is_host: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRosterEntry {
    Name(String),
    Full {
        #[serde(default)]
        id: Option<WireId>,
        name: String,
        #[serde(default)]
        is_host: bool,
    },
}

impl From<RawRosterEntry> for RosterEntry {
    fn from(raw: RawRosterEntry) -> Self {
        match raw {
            RawRosterEntry::Name(name) => Self {
                id: None,
                name,
                is_host: false,
            },
            RawRosterEntry::Full { id, name, is_host } => Self { id, name, is_host },
        }
    }
}

/// A question as pushed by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawQuestion")]
pub struct Question {
    pub id: Option<WireId>,
    pub text: String,
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuestion {
    Text(String),
    Full {
        #[serde(default)]
        id: Option<WireId>,
        text: String,
        #[serde(default)]
        category: Option<String>,
    },
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        match raw {
            RawQuestion::Text(text) => Self {
                id: None,
                text,
                category: None,
            },
            RawQuestion::Full { id, text, category } => Self { id, text, category },
        }
    }
}

/// One player's answer inside a tally broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    #[serde(default)]
    pub player_id: Option<WireId>,
    #[serde(alias = "playerName")]
    pub player_name: String,
    pub answer: bool,
}

/// Decoded inbound event.
#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
    /// `join_success` / `room_update`: full roster replacement.
    Roster(Vec<RosterEntry>),
    /// `player_joined` / `joined`.
    PlayerJoined {
        name: Option<String>,
        players: Option<Vec<RosterEntry>>,
    },
    /// `player_left`.
    PlayerLeft {
        name: Option<String>,
        players: Option<Vec<RosterEntry>>,
    },
    /// `game_started`; some servers follow up with a separate `new_question`.
    GameStarted { question: Option<Question> },
    /// `new_question`.
    NewQuestion {
        question: Question,
        number: Option<u32>,
        total: Option<u32>,
    },
    /// `answer_submitted`: full tally for one question.
    AnswerSubmitted {
        question_id: Option<WireId>,
        answers: Vec<AnswerEntry>,
    },
    /// `game_over`.
    GameOver,
    /// `error`: server-reported failure.
    Error { message: Option<String> },
}

/// Payload decoder for one inbound event name.
pub type Decoder = fn(&Value) -> Result<ServerEvent, serde_json::Error>;

/// Inbound dispatch table: event name to payload decoder.
pub const DISPATCH: &[(&str, Decoder)] = &[
    ("join_success", decode_roster),
    ("room_update", decode_roster),
    ("player_joined", decode_player_joined),
    ("joined", decode_player_joined),
    ("player_left", decode_player_left),
    ("game_started", decode_game_started),
    ("new_question", decode_new_question),
    ("answer_submitted", decode_answer_submitted),
    ("game_over", decode_game_over),
    ("error", decode_error),
];

/// Look up the decoder registered for an event name.
#[must_use]
pub fn decoder_for(name: &str) -> Option<Decoder> {
    DISPATCH
        .iter()
        .find(|(event_name, _)| *event_name == name)
        .map(|(_, decoder)| *decoder)
}

/// Decode a wire event through the dispatch table.
///
/// Returns `Ok(None)` for event names the table does not list.
///
/// # Errors
///
/// Returns [`EventError::Payload`] when a known event carries a payload that
/// does not match its schema.
pub fn decode_server_event(event: &wire::Event) -> Result<Option<ServerEvent>, EventError> {
    let Some(decoder) = decoder_for(&event.name) else {
        return Ok(None);
    };
    match decoder(&event.data) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(source) => Err(EventError::Payload {
            name: event.name.clone(),
            source,
        }),
    }
}

#[derive(Deserialize)]
struct RosterPayload {
    #[serde(default)]
    players: Vec<RosterEntry>,
}

#[derive(Deserialize)]
struct PresencePayload {
    #[serde(default)]
    player: Option<RosterEntry>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    players: Option<Vec<RosterEntry>>,
}

impl PresencePayload {
    fn into_parts(self) -> (Option<String>, Option<Vec<RosterEntry>>) {
        let name = self.player.map(|p| p.name).or(self.username);
        (name, self.players)
    }
}

#[derive(Deserialize)]
struct GameStartedPayload {
    #[serde(default)]
    question: Option<Question>,
}

#[derive(Deserialize)]
struct NewQuestionPayload {
    question: Question,
    #[serde(default)]
    question_number: Option<u32>,
    #[serde(default)]
    total_questions: Option<u32>,
}

#[derive(Deserialize)]
struct AnswerSubmittedPayload {
    #[serde(default)]
    question_id: Option<WireId>,
    #[serde(default)]
    all_answers: Vec<AnswerEntry>,
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: Option<String>,
}

fn decode_roster(data: &Value) -> Result<ServerEvent, serde_json::Error> {
    let payload = RosterPayload::deserialize(data)?;
    Ok(ServerEvent::Roster(payload.players))
}

fn decode_player_joined(data: &Value) -> Result<ServerEvent, serde_json::Error> {
    let (name, players) = PresencePayload::deserialize(data)?.into_parts();
    Ok(ServerEvent::PlayerJoined { name, players })
}

fn decode_player_left(data: &Value) -> Result<ServerEvent, serde_json::Error> {
    let (name, players) = PresencePayload::deserialize(data)?.into_parts();
    Ok(ServerEvent::PlayerLeft { name, players })
}

fn decode_game_started(data: &Value) -> Result<ServerEvent, serde_json::Error> {
    let payload = GameStartedPayload::deserialize(data)?;
    Ok(ServerEvent::GameStarted {
        question: payload.question,
    })
}

fn decode_new_question(data: &Value) -> Result<ServerEvent, serde_json::Error> {
    let payload = NewQuestionPayload::deserialize(data)?;
    Ok(ServerEvent::NewQuestion {
        question: payload.question,
        number: payload.question_number,
        total: payload.total_questions,
    })
}

fn decode_answer_submitted(data: &Value) -> Result<ServerEvent, serde_json::Error> {
    let payload = AnswerSubmittedPayload::deserialize(data)?;
    Ok(ServerEvent::AnswerSubmitted {
        question_id: payload.question_id,
        answers: payload.all_answers,
    })
}

#[allow(clippy::unnecessary_wraps)]
fn decode_game_over(_data: &Value) -> Result<ServerEvent, serde_json::Error> {
    Ok(ServerEvent::GameOver)
}

fn decode_error(data: &Value) -> Result<ServerEvent, serde_json::Error> {
    // Some transports push a bare string for errors.
    if let Value::String(message) = data {
        return Ok(ServerEvent::Error {
            message: Some(message.clone()),
        });
    }
    let payload = ErrorPayload::deserialize(data)?;
    Ok(ServerEvent::Error {
        message: payload.message,
    })
}

/// Outbound request. Each is fire-and-forget; no reply is correlated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    JoinGame {
        game_id: String,
        player_id: String,
    },
    StartGame {
        game_id: String,
        player_id: String,
    },
    SubmitAnswer {
        game_id: String,
        player_id: String,
        question_id: WireId,
        answer: bool,
    },
    NextQuestion {
        game_id: String,
        player_id: String,
        current_question_id: WireId,
    },
}

impl ClientEvent {
    /// Event name on the channel.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinGame { .. } => "join_game",
            Self::StartGame { .. } => "start_game",
            Self::SubmitAnswer { .. } => "submit_answer",
            Self::NextQuestion { .. } => "next_question",
        }
    }

    /// Convert into a channel event ready for encoding.
    #[must_use]
    pub fn to_wire(&self) -> wire::Event {
        let data = match self {
            Self::JoinGame { game_id, player_id } | Self::StartGame { game_id, player_id } => {
                serde_json::json!({ "game_id": game_id, "player_id": player_id })
            }
            Self::SubmitAnswer {
                game_id,
                player_id,
                question_id,
                answer,
            } => {
                serde_json::json!({
                    "game_id": game_id,
                    "player_id": player_id,
                    "question_id": question_id,
                    "answer": answer,
                })
            }
            Self::NextQuestion {
                game_id,
                player_id,
                current_question_id,
            } => {
                serde_json::json!({
                    "game_id": game_id,
                    "player_id": player_id,
                    "current_question_id": current_question_id,
                })
            }
        };
        wire::Event::new(self.name(), data)
    }
}
