//! HTTP calls to the game server.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;
use viewsync::api::{
    CREATE_ROOM_PATH, CreatedRoom, GameInfo, game_path, question_count, questions_path,
};
use viewsync::config::ClientConfig;

use crate::CliError;

/// Human-readable message from an error response body.
fn error_message(value: &Value) -> String {
    value
        .get("error")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map_or_else(|| value.to_string(), ToOwned::to_owned)
}

async fn api_request(
    client: &reqwest::Client,
    method: reqwest::Method,
    config: &ClientConfig,
    path: &str,
) -> Result<Value, CliError> {
    let url = config.url(path);
    tracing::debug!(%method, %url, "api request");
    let response = client.request(method, &url).send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError {
            status: status.as_u16(),
            message: error_message(&value),
        });
    }

    Ok(value)
}

pub(crate) async fn fetch_game_info(
    client: &reqwest::Client,
    config: &ClientConfig,
    game_id: &str,
) -> Result<GameInfo, CliError> {
    let path = game_path(game_id);
    let method = reqwest::Method::GET;
    let value = api_request(client, method, config, &path).await?;
    Ok(serde_json::from_value(value)?)
}

pub(crate) async fn fetch_question_count(
    client: &reqwest::Client,
    config: &ClientConfig,
    game_id: &str,
) -> Result<u32, CliError> {
    let path = questions_path(game_id);
    let method = reqwest::Method::GET;
    let value = api_request(client, method, config, &path).await?;
    question_count(&value).ok_or_else(|| CliError::ServerError {
        status: 200,
        message: "question list missing from response".to_owned(),
    })
}

pub(crate) async fn create_room(
    client: &reqwest::Client,
    config: &ClientConfig,
) -> Result<String, CliError> {
    let method = reqwest::Method::POST;
    let value = api_request(client, method, config, CREATE_ROOM_PATH).await?;
    let room: CreatedRoom = serde_json::from_value(value)?;
    Ok(room.room_id)
}
