//! REST API helpers for the game server.
//!
//! Browser (csr): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning an error, since these endpoints are only
//! reachable from the page.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result<_, String>` so a failed fetch becomes an error notice
//! instead of a crash; the realtime channel keeps working either way.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use viewsync::api::GameInfo;

#[cfg(any(test, feature = "csr"))]
fn game_failed_message(status: u16) -> String {
    if status == 404 {
        "Game not found".to_owned()
    } else {
        format!("Failed to load game: {status}")
    }
}

#[cfg(any(test, feature = "csr"))]
fn questions_failed_message(status: u16) -> String {
    format!("Failed to fetch questions: {status}")
}

#[cfg(any(test, feature = "csr"))]
fn create_room_failed_message(status: u16) -> String {
    format!("Failed to create room: {status}")
}

/// Fetch the game record from `GET /api/games/{id}`.
///
/// # Errors
///
/// Returns an error string if the request fails or the game does not exist.
pub async fn fetch_game_info(game_id: &str) -> Result<GameInfo, String> {
    #[cfg(feature = "csr")]
    {
        let url = viewsync::api::game_path(game_id);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(game_failed_message(resp.status()));
        }
        resp.json::<GameInfo>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = game_id;
        Err("not available outside the browser".to_owned())
    }
}

/// Fetch the number of questions from `GET /api/games/{id}/questions`.
///
/// # Errors
///
/// Returns an error string if the request fails or the body has no
/// recognisable question list.
pub async fn fetch_question_count(game_id: &str) -> Result<u32, String> {
    #[cfg(feature = "csr")]
    {
        let url = viewsync::api::questions_path(game_id);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(questions_failed_message(resp.status()));
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| e.to_string())?;
        let count = viewsync::api::question_count(&body);
        count.ok_or_else(|| "Failed to fetch questions".to_owned())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = game_id;
        Err("not available outside the browser".to_owned())
    }
}

/// Create a new room via `POST /api/create-room` and return its id.
///
/// # Errors
///
/// Returns an error string if the request fails or the server responds with a
/// non-OK status.
pub async fn create_room() -> Result<String, String> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::post(viewsync::api::CREATE_ROOM_PATH)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(create_room_failed_message(resp.status()));
        }
        let body: viewsync::api::CreatedRoom = resp.json().await.map_err(|e| e.to_string())?;
        Ok(body.room_id)
    }
    #[cfg(not(feature = "csr"))]
    {
        Err("not available outside the browser".to_owned())
    }
}
