//! Launch parameters read once from the page query string.
//!
//! ERROR HANDLING
//! ==============
//! A missing game or player id is fatal: the front end shows the error and
//! never opens a connection. There is nothing to retry.

#[cfg(test)]
#[path = "launch_test.rs"]
mod launch_test;

use serde::{Deserialize, Serialize};

/// Fatal configuration error raised before any connection is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("No game ID provided")]
    MissingGameId,
    #[error("No player ID provided")]
    MissingPlayerId,
    #[error("invalid launch query: {0}")]
    InvalidQuery(String),
}

/// Session identity for the lifetime of the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchParams {
    /// Game (room) identifier.
    pub game_id: String,
    /// Local player identifier issued by the server when the player joined.
    pub player_id: String,
    /// Whether the local player may start the game and advance questions.
    pub is_host: bool,
}

#[derive(Debug, Default, Deserialize)]
struct RawLaunchQuery {
    game: Option<String>,
    room: Option<String>,
    player: Option<String>,
    host: Option<String>,
}

impl LaunchParams {
    /// Build launch parameters, rejecting blank identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::MissingGameId`] or [`LaunchError::MissingPlayerId`]
    /// when the corresponding identifier is empty after trimming.
    pub fn new(game_id: &str, player_id: &str, is_host: bool) -> Result<Self, LaunchError> {
        let game_id = game_id.trim();
        if game_id.is_empty() {
            return Err(LaunchError::MissingGameId);
        }
        let player_id = player_id.trim();
        if player_id.is_empty() {
            return Err(LaunchError::MissingPlayerId);
        }
        Ok(Self {
            game_id: game_id.to_owned(),
            player_id: player_id.to_owned(),
            is_host,
        })
    }

    /// Parse `game`/`room`, `player` and `host` from a query string.
    ///
    /// The leading `?` is optional. `game` wins over `room` when both are set.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::InvalidQuery`] for an unparseable query and the
    /// missing-identifier variants from [`LaunchParams::new`].
    pub fn from_query(query: &str) -> Result<Self, LaunchError> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let raw: RawLaunchQuery = serde_urlencoded::from_str(query)
            .map_err(|e| LaunchError::InvalidQuery(e.to_string()))?;

        let game_id = raw
            .game
            .filter(|g| !g.trim().is_empty())
            .or(raw.room)
            .unwrap_or_default();
        let player_id = raw.player.unwrap_or_default();
        let is_host = raw.host.as_deref().is_some_and(parse_host_flag);

        Self::new(&game_id, &player_id, is_host)
    }
}

#[derive(Serialize)]
struct LaunchQuery<'a> {
    game: &'a str,
    player: &'a str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    host: bool,
}

impl LaunchParams {
    /// Query string (without `?`) that [`LaunchParams::from_query`] reads back.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::InvalidQuery`] if the identifiers cannot be
    /// encoded.
    pub fn to_query(&self) -> Result<String, LaunchError> {
        let query = LaunchQuery {
            game: &self.game_id,
            player: &self.player_id,
            host: self.is_host,
        };
        serde_urlencoded::to_string(query).map_err(|e| LaunchError::InvalidQuery(e.to_string()))
    }
}

fn parse_host_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
