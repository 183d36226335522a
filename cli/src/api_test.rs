use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::*;

/// Serve one canned HTTP response on a local port.
async fn serve_once(status: &'static str, body: &'static str) -> ClientConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let origin = format!("http://{}/", listener.local_addr().expect("addr"));
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut request = vec![0; 4096];
        let _ = stream.read(&mut request).await;
        let head = format!(
            "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).await.expect("head");
        stream.write_all(body.as_bytes()).await.expect("body");
    });
    ClientConfig::with_origin(origin)
}

// =============================================================
// Error bodies
// =============================================================

#[test]
fn error_message_prefers_error_then_message() {
    let both = json!({"error": "Game not found", "message": "ignored"});
    assert_eq!(error_message(&both), "Game not found");
    let message = json!({"message": "Room is full"});
    assert_eq!(error_message(&message), "Room is full");
}

#[test]
fn error_message_falls_back_to_raw_body() {
    assert_eq!(error_message(&Value::Null), "null");
    assert_eq!(error_message(&json!({"code": 7})), r#"{"code":7}"#);
}

// =============================================================
// Requests
// =============================================================

#[tokio::test]
async fn missing_game_is_a_server_error() {
    let config = serve_once("404 Not Found", r#"{"error":"Game not found"}"#).await;
    let client = reqwest::Client::new();

    let result = fetch_game_info(&client, &config, "AB12").await;
    let err = result.expect_err("404");
    let CliError::ServerError { status, message } = &err else {
        panic!("expected server error, got {err:?}");
    };
    assert_eq!(*status, 404);
    assert_eq!(message, "Game not found");
}

#[tokio::test]
async fn question_count_reads_wrapped_list() {
    let body = r#"{"questions":[{"id":1},{"id":2},{"id":3}]}"#;
    let config = serve_once("200 OK", body).await;
    let client = reqwest::Client::new();

    let count = fetch_question_count(&client, &config, "AB12").await;
    assert_eq!(count.expect("count"), 3);
}

#[tokio::test]
async fn create_room_returns_room_id() {
    let config = serve_once("200 OK", r#"{"room_id":"QX7K2P"}"#).await;
    let client = reqwest::Client::new();

    let room = create_room(&client, &config).await.expect("room");
    assert_eq!(room, "QX7K2P");
}
