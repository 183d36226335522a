//! HTTP collaborator shapes shared by the browser and terminal front ends.
//!
//! Only paths and DTOs live here; each front end does its own fetching.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::Deserialize;
use serde_json::Value;

use crate::event::RosterEntry;

/// Path for creating a new room.
pub const CREATE_ROOM_PATH: &str = "/api/create-room";

/// Title used when a game mixes categories or names none.
pub const MIXED_TITLE: &str = "Never Have I Ever: Mixed Categories";

/// `GET` path for a game record. The id is percent-encoded as one segment.
#[must_use]
pub fn game_path(game_id: &str) -> String {
    format!("/api/games/{}", urlencoding::encode(game_id))
}

/// `GET` path for the question list of a game.
#[must_use]
pub fn questions_path(game_id: &str) -> String {
    format!("{}/questions", game_path(game_id))
}

/// Game record returned by `GET /api/games/{id}`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct GameInfo {
    /// Comma-separated category list, if any.
    #[serde(default)]
    pub game_modes: Option<String>,
    #[serde(default)]
    pub players: Vec<RosterEntry>,
}

/// Response body of `POST /api/create-room`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CreatedRoom {
    pub room_id: String,
}

/// Header title for a game's mode list.
#[must_use]
pub fn game_title(game_modes: Option<&str>) -> String {
    match game_modes.map(str::trim) {
        Some(mode) if !mode.is_empty() && !mode.contains(',') => {
            format!("Never Have I Ever: {mode}")
        }
        _ => MIXED_TITLE.to_owned(),
    }
}

/// Question total from a questions endpoint body.
///
/// Accepts a bare array or an object wrapping one under `questions`, and an
/// explicit `total`/`count` field when the server sends one.
#[must_use]
pub fn question_count(body: &Value) -> Option<u32> {
    let len = match body {
        Value::Array(items) => items.len(),
        Value::Object(map) => {
            let explicit = map.get("total").or_else(|| map.get("count"));
            if let Some(n) = explicit.and_then(Value::as_u64) {
                return Some(u32::try_from(n).unwrap_or(u32::MAX));
            }
            map.get("questions").and_then(Value::as_array)?.len()
        }
        _ => return None,
    };
    Some(u32::try_from(len).unwrap_or(u32::MAX))
}
