//! Socket.IO websocket client for the game page.
//!
//! One local task owns the socket for the lifetime of the page. It opens the
//! websocket, runs the Engine.IO/Socket.IO handshake through
//! `viewsync::link::Link`, feeds inbound events to the controller in order,
//! and pumps queued outbound events once the namespace connect is
//! acknowledged. After a drop it reconnects on a bounded, fixed-delay
//! schedule.
//!
//! The outbound queue outlives individual sockets: events queued while
//! reconnecting go out on the next session. Once the reconnect budget is
//! spent the queue's receiver is dropped and further sends fail.
//!
//! All websocket logic is gated behind `#[cfg(feature = "csr")]` since it
//! requires a browser environment.

#[cfg(test)]
#[path = "socket_test.rs"]
mod socket_test;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use viewsync::event::ClientEvent;
use viewsync::{Outbox, ViewSync};

use crate::state::view::SignalRenderer;

/// Controller type the game page stores.
pub type GameView = ViewSync<SignalRenderer, EventSender>;

/// Outbound half of the page's event queue.
#[derive(Clone, Debug)]
pub struct EventSender(UnboundedSender<ClientEvent>);

impl Outbox for EventSender {
    fn send(&mut self, event: ClientEvent) -> bool {
        self.0.unbounded_send(event).is_ok()
    }
}

/// Create the page's outbound event queue.
pub fn event_queue() -> (EventSender, UnboundedReceiver<ClientEvent>) {
    let (tx, rx) = unbounded();
    (EventSender(tx), rx)
}

/// Server origin for the current page, e.g. `https://nhie.example`.
#[cfg(feature = "csr")]
pub fn page_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:5000".to_owned())
}

/// Spawn the websocket lifecycle as a local async task.
#[cfg(feature = "csr")]
pub fn spawn_game_socket(
    view: leptos::prelude::StoredValue<GameView>,
    rx: UnboundedReceiver<ClientEvent>,
    url: String,
    policy: viewsync::config::ReconnectPolicy,
) {
    leptos::task::spawn_local(socket_loop(view, rx, url, policy));
}

/// Main connection loop with bounded reconnect.
#[cfg(feature = "csr")]
async fn socket_loop(
    view: leptos::prelude::StoredValue<GameView>,
    mut rx: UnboundedReceiver<ClientEvent>,
    url: String,
    policy: viewsync::config::ReconnectPolicy,
) {
    use leptos::prelude::UpdateValue;

    let mut attempt: u32 = 0;
    loop {
        view.update_value(GameView::on_connecting);

        let mut link = viewsync::link::Link::new();
        match connect_and_run(&url, view, &mut link, &mut rx).await {
            Ok(()) => log::info!("websocket closed"),
            Err(e) => log::warn!("websocket error: {e}"),
        }
        view.update_value(GameView::on_disconnected);

        let reached = link.is_connected() || link.handshake().is_some();
        attempt = next_attempt(attempt, reached);
        let max = policy.max_attempts;
        let Some(delay) = policy.delay_for(attempt) else {
            log::warn!("giving up after {max} reconnect attempts");
            let message = "Unable to reach game server. Reload the page to retry.";
            view.update_value(|v| v.report_error(message));
            return;
        };
        log::info!("reconnecting in {delay:?} (attempt {attempt}/{max})");
        gloo_timers::future::sleep(delay).await;
    }
}

/// Connect to the websocket and process messages until it closes.
#[cfg(feature = "csr")]
async fn connect_and_run(
    url: &str,
    view: leptos::prelude::StoredValue<GameView>,
    link: &mut viewsync::link::Link,
    rx: &mut UnboundedReceiver<ClientEvent>,
) -> Result<(), String> {
    use futures::future::Either;
    use futures::{SinkExt, StreamExt};
    use gloo_net::websocket::Message;
    use gloo_net::websocket::futures::WebSocket;
    use leptos::prelude::UpdateValue;

    let ws = WebSocket::open(url).map_err(|e| e.to_string())?;
    let (mut ws_write, mut ws_read) = ws.split();

    loop {
        // Outbound events wait until the namespace connect is acknowledged.
        let online = link.is_connected();
        let inbound = ws_read.next();
        let outbound = async {
            if online {
                rx.next().await
            } else {
                futures::future::pending().await
            }
        };
        futures::pin_mut!(inbound, outbound);

        let text = match futures::future::select(inbound, outbound).await {
            Either::Left((Some(Ok(Message::Text(text))), _)) => {
                let reply = view
                    .try_update_value(|v| link.receive_text(&text, v))
                    .flatten();
                match reply {
                    Some(reply) => reply,
                    None if link.is_closed() => return Ok(()),
                    None => continue,
                }
            }
            Either::Left((Some(Ok(Message::Bytes(_))), _)) => {
                log::debug!("ignoring binary websocket message");
                continue;
            }
            Either::Left((Some(Err(e)), _)) => return Err(e.to_string()),
            Either::Left((None, _)) => return Ok(()),
            Either::Right((Some(event), _)) => viewsync::link::encode_client_event(&event),
            Either::Right((None, _)) => return Ok(()),
        };
        ws_write
            .send(Message::Text(text))
            .await
            .map_err(|e| e.to_string())?;
    }
}

/// Reconnect attempt counter: a session that got through the handshake
/// resets the budget.
#[cfg(any(test, feature = "csr"))]
fn next_attempt(previous: u32, reached_server: bool) -> u32 {
    if reached_server {
        1
    } else {
        previous.saturating_add(1)
    }
}
