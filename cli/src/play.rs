//! Interactive session: websocket, stdin and the outbound queue multiplexed
//! over one controller, with bounded reconnects.

#[cfg(test)]
#[path = "play_test.rs"]
mod play_test;

use std::io::Write;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use viewsync::config::{ClientConfig, ReconnectPolicy};
use viewsync::event::ClientEvent;
use viewsync::link::{Link, encode_client_event, socket_url};
use viewsync::state::ConnectionStatus;
use viewsync::{LaunchParams, Outbox, ViewSync};

use crate::input::{Flow, handle_line};
use crate::terminal::TerminalRenderer;
use crate::{CliError, PlayArgs, api};

/// Outbound events queued for whichever connection is live.
pub(crate) struct ChannelOutbox(UnboundedSender<ClientEvent>);

impl Outbox for ChannelOutbox {
    fn send(&mut self, event: ClientEvent) -> bool {
        self.0.send(event).is_ok()
    }
}

type PlayView<W> = ViewSync<TerminalRenderer<W>, ChannelOutbox>;

enum SessionEnd {
    Closed,
    Quit,
}

/// Attempt number for the next reconnect. A session that completed the
/// handshake resets the count.
pub(crate) fn next_attempt(previous: u32, reached_server: bool) -> u32 {
    if reached_server {
        1
    } else {
        previous.saturating_add(1)
    }
}

pub(crate) fn policy_from_args(args: &PlayArgs) -> ReconnectPolicy {
    ReconnectPolicy {
        max_attempts: args.reconnect_attempts,
        delay: Duration::from_millis(args.reconnect_delay_ms),
    }
}

fn ws_error(e: tokio_tungstenite::tungstenite::Error) -> CliError {
    CliError::WsConnect(Box::new(e))
}

pub(crate) async fn run_play(config: &ClientConfig, args: PlayArgs) -> Result<(), CliError> {
    let params = LaunchParams::new(&args.game, &args.player, args.host)?;
    let url = socket_url(&config.origin)
        .map_err(|e| CliError::InvalidBaseUrl(e.to_string()))?;

    let (tx, rx) = unbounded_channel();
    let renderer = TerminalRenderer::new(std::io::stdout());
    let mut view = ViewSync::new(params, renderer, ChannelOutbox(tx));
    load_game(config, &mut view).await;
    view.renderer_mut().help();

    let lines = BufReader::new(tokio::io::stdin()).lines();
    play(&url, config.reconnect, &mut view, rx, lines).await
}

/// Reconnect loop around one socket session at a time. Returns when the
/// player quits or the reconnect budget is spent.
pub(crate) async fn play<W, B>(
    url: &str,
    policy: ReconnectPolicy,
    view: &mut PlayView<W>,
    mut rx: UnboundedReceiver<ClientEvent>,
    mut lines: Lines<B>,
) -> Result<(), CliError>
where
    W: Write,
    B: AsyncBufRead + Unpin,
{
    let mut attempt = 0;

    loop {
        view.on_connecting();
        let mut link = Link::new();
        match run_session(url, view, &mut link, &mut rx, &mut lines).await {
            Ok(SessionEnd::Quit) => return Ok(()),
            Ok(SessionEnd::Closed) => tracing::info!("connection closed"),
            Err(e) => tracing::warn!("connection lost: {e}"),
        }
        if view.state().connection != ConnectionStatus::Disconnected {
            view.on_disconnected();
        }

        attempt = next_attempt(attempt, link.handshake().is_some());
        let max = policy.max_attempts;
        let Some(delay) = policy.delay_for(attempt) else {
            return Err(CliError::ReconnectExhausted(max));
        };
        let delay_ms = delay.as_millis();
        tracing::info!(attempt, max, "reconnecting in {delay_ms}ms");

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(()) };
                if handle_line(view, &line) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}

/// Title, roster and question total from the HTTP API. Failures are shown
/// as notices and the session continues over the socket.
async fn load_game<W: Write>(config: &ClientConfig, view: &mut PlayView<W>) {
    let client = reqwest::Client::new();
    let game_id = view.session().game_id.clone();

    match api::fetch_game_info(&client, config, &game_id).await {
        Ok(info) => view.apply_game_info(info),
        Err(CliError::ServerError { status: 404, .. }) => view.report_error("Game not found"),
        Err(e) => view.report_error(&format!("Failed to load game: {e}")),
    }
    match api::fetch_question_count(&client, config, &game_id).await {
        Ok(total) => view.apply_question_count(total),
        Err(e) => tracing::warn!("question total unavailable: {e}"),
    }
}

async fn run_session<W, B>(
    url: &str,
    view: &mut PlayView<W>,
    link: &mut Link,
    rx: &mut UnboundedReceiver<ClientEvent>,
    lines: &mut Lines<B>,
) -> Result<SessionEnd, CliError>
where
    W: Write,
    B: AsyncBufRead + Unpin,
{
    let (stream, _) = connect_async(url).await.map_err(ws_error)?;
    let (mut write, mut read) = stream.split();
    tracing::debug!(%url, "websocket open");

    loop {
        // Queued events wait until the namespace connect is acknowledged.
        let online = link.is_connected();
        tokio::select! {
            message = read.next() => {
                let Some(message) = message else { return Ok(SessionEnd::Closed) };
                match message.map_err(ws_error)? {
                    Message::Text(text) => {
                        if let Some(reply) = link.receive_text(text.as_str(), view) {
                            write.send(Message::text(reply)).await.map_err(ws_error)?;
                        }
                        if link.is_closed() {
                            return Ok(SessionEnd::Closed);
                        }
                    }
                    Message::Close(_) => return Ok(SessionEnd::Closed),
                    _ => {}
                }
            }
            Some(event) = rx.recv(), if online => {
                tracing::debug!(event = event.name(), "send");
                let text = encode_client_event(&event);
                write.send(Message::text(text)).await.map_err(ws_error)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { return Ok(SessionEnd::Quit) };
                match handle_line(view, &line) {
                    Flow::Continue => {}
                    Flow::Help => view.renderer_mut().help(),
                    Flow::Quit => {
                        if let Err(e) = write.send(Message::Close(None)).await {
                            tracing::debug!("close frame not sent: {e}");
                        }
                        return Ok(SessionEnd::Quit);
                    }
                }
            }
        }
    }
}
