use serde_json::Value;
use tokio::io::{AsyncWriteExt, DuplexStream};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;

use super::*;

type ServerSocket = WebSocketStream<TcpStream>;
type TestView = PlayView<Vec<u8>>;

const OPEN: &str = r#"0{"sid":"e-1","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;
const ACK: &str = r#"40{"sid":"s-1"}"#;

fn args(attempts: u32, delay_ms: u64) -> PlayArgs {
    PlayArgs {
        game: "AB12".to_owned(),
        player: "p1".to_owned(),
        host: false,
        reconnect_attempts: attempts,
        reconnect_delay_ms: delay_ms,
    }
}

fn fast_policy() -> ReconnectPolicy {
    ReconnectPolicy {
        max_attempts: 2,
        delay: Duration::from_millis(10),
    }
}

fn test_view(is_host: bool) -> (TestView, UnboundedReceiver<ClientEvent>) {
    let params = LaunchParams::new("AB12", "p1", is_host).expect("params");
    let (tx, rx) = unbounded_channel();
    let renderer = TerminalRenderer::new(Vec::new());
    (ViewSync::new(params, renderer, ChannelOutbox(tx)), rx)
}

/// Stdin stand-in: the writer types commands, the reader feeds `play`.
fn stdin() -> (DuplexStream, Lines<BufReader<DuplexStream>>) {
    let (typed, read) = tokio::io::duplex(256);
    (typed, BufReader::new(read).lines())
}

async fn listen() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let url = socket_url(&format!("http://{addr}")).expect("url");
    (listener, url)
}

async fn accept(listener: &TcpListener) -> ServerSocket {
    let (stream, _) = listener.accept().await.expect("accept");
    tokio_tungstenite::accept_async(stream)
        .await
        .expect("upgrade")
}

async fn next_text(ws: &mut ServerSocket) -> String {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return text.as_str().to_owned(),
            Some(Ok(Message::Close(_))) | None => panic!("client hung up"),
            Some(Ok(_)) => {}
            Some(Err(e)) => panic!("server read failed: {e}"),
        }
    }
}

/// Name and payload of a `42[...]` frame.
fn event_frame(text: &str) -> (String, Value) {
    let body = text.strip_prefix("42").expect("event frame");
    let value: Value = serde_json::from_str(body).expect("event json");
    let name = value[0].as_str().unwrap_or_default().to_owned();
    (name, value[1].clone())
}

async fn assert_silent(ws: &mut ServerSocket) {
    let early = tokio::time::timeout(Duration::from_millis(50), ws.next()).await;
    assert!(early.is_err(), "unexpected frame {early:?}");
}

/// Open one Engine.IO session and return the client's first event frame.
async fn handshake(ws: &mut ServerSocket) -> String {
    ws.send(Message::text(OPEN)).await.expect("open");
    assert_eq!(next_text(ws).await, "40");
    ws.send(Message::text(ACK)).await.expect("ack");
    next_text(ws).await
}

// =============================================================
// Reconnect schedule
// =============================================================

#[test]
fn next_attempt_counts_up_until_server_reached() {
    assert_eq!(next_attempt(0, false), 1);
    assert_eq!(next_attempt(3, false), 4);
    assert_eq!(next_attempt(4, true), 1);
    assert_eq!(next_attempt(u32::MAX, false), u32::MAX);
}

#[test]
fn policy_from_args_uses_flags() {
    let policy = policy_from_args(&args(2, 250));
    assert_eq!(policy.delay_for(1), Some(Duration::from_millis(250)));
    assert_eq!(policy.delay_for(2), Some(Duration::from_millis(250)));
    assert_eq!(policy.delay_for(3), None);
}

#[test]
fn default_flags_match_default_policy() {
    let policy = policy_from_args(&args(5, 1000));
    assert_eq!(policy, ReconnectPolicy::default());
}

#[test]
fn channel_outbox_reports_closed_receiver() {
    let (tx, mut rx) = unbounded_channel();
    let mut outbox = ChannelOutbox(tx);
    let event = ClientEvent::JoinGame {
        game_id: "AB12".to_owned(),
        player_id: "p1".to_owned(),
    };

    assert!(outbox.send(event.clone()));
    assert_eq!(rx.try_recv().ok(), Some(event.clone()));

    drop(rx);
    assert!(!outbox.send(event));
}

// =============================================================
// Sessions against a local server
// =============================================================

#[tokio::test]
async fn queued_events_wait_for_namespace_ack() {
    let (listener, url) = listen().await;
    let (mut view, rx) = test_view(true);
    let (mut typed, lines) = stdin();
    view.start_game().expect("queued start");

    let server = async {
        let mut ws = accept(&listener).await;
        assert_silent(&mut ws).await;
        ws.send(Message::text(OPEN)).await.expect("open");
        let connect = next_text(&mut ws).await;
        assert_silent(&mut ws).await;
        ws.send(Message::text(ACK)).await.expect("ack");

        let first = event_frame(&next_text(&mut ws).await);
        let second = event_frame(&next_text(&mut ws).await);
        typed.write_all(b"quit\n").await.expect("type quit");
        let closing = ws.next().await;
        (connect, [first.0, second.0], closing)
    };
    let client = play(&url, fast_policy(), &mut view, rx, lines);

    let session = async { tokio::join!(client, server) };
    let limit = Duration::from_secs(5);
    let (result, (connect, names, closing)) = tokio::time::timeout(limit, session)
        .await
        .expect("session finished");

    assert!(result.is_ok());
    assert_eq!(connect, "40");
    assert_eq!(names, ["start_game", "join_game"]);
    assert!(matches!(closing, Some(Ok(Message::Close(_)))));
}

#[tokio::test]
async fn every_reconnect_rejoins_then_budget_runs_out() {
    let (listener, url) = listen().await;
    let (mut view, rx) = test_view(false);
    let (_typed, lines) = stdin();

    let server = async move {
        let mut joins = Vec::new();
        for _ in 0..2 {
            let mut ws = accept(&listener).await;
            let (name, data) = event_frame(&handshake(&mut ws).await);
            joins.push((name, data["game_id"].clone()));
        }
        joins
    };
    let client = play(&url, fast_policy(), &mut view, rx, lines);

    let session = async { tokio::join!(client, server) };
    let limit = Duration::from_secs(5);
    let (result, joins) = tokio::time::timeout(limit, session)
        .await
        .expect("session finished");

    assert_eq!(joins.len(), 2);
    for (name, game_id) in &joins {
        assert_eq!(name, "join_game");
        assert_eq!(game_id, "AB12");
    }
    assert!(matches!(result, Err(CliError::ReconnectExhausted(2))));
    assert_eq!(view.state().connection, ConnectionStatus::Disconnected);
}

#[tokio::test]
async fn unreachable_server_exhausts_reconnects() {
    let (listener, url) = listen().await;
    drop(listener);
    let (mut view, rx) = test_view(false);
    let (_typed, lines) = stdin();

    let client = play(&url, fast_policy(), &mut view, rx, lines);
    let result = tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .expect("gave up");

    assert!(matches!(result, Err(CliError::ReconnectExhausted(2))));
}

#[tokio::test]
async fn closed_stdin_quits_while_waiting_to_reconnect() {
    let (listener, url) = listen().await;
    drop(listener);
    let (mut view, rx) = test_view(false);
    let (typed, lines) = stdin();
    drop(typed);

    let policy = ReconnectPolicy {
        max_attempts: 3,
        delay: Duration::from_secs(30),
    };
    let client = play(&url, policy, &mut view, rx, lines);
    let result = tokio::time::timeout(Duration::from_secs(5), client)
        .await
        .expect("quit");

    assert!(result.is_ok());
}
