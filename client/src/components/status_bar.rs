//! Bottom status bar showing connection status and session identity.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lets players see at a glance whether the realtime channel is up and which
//! role they joined with, without reading the notice history.

#[cfg(test)]
#[path = "status_bar_test.rs"]
mod status_bar_test;

use leptos::prelude::*;
use viewsync::LaunchParams;
use viewsync::state::ConnectionStatus;

use crate::net::socket::GameView;
use crate::state::view::ViewState;

/// Status bar at the bottom of the game page.
#[component]
pub fn StatusBar() -> impl IntoView {
    let view_state = expect_context::<RwSignal<ViewState>>();
    let controller = expect_context::<StoredValue<GameView>>();

    let status = move || view_state.with(|v| v.connection);
    let status_class = move || connection_status_class(status());
    let status_label = move || connection_status_label(status());
    let session = controller.with_value(|c| session_label(c.session()));

    view! {
        <div class="status-bar">
            <div class="status-bar__section">
                <span class="status-bar__item">
                    <span class=status_class></span>
                    {status_label}
                </span>
                <span class="status-bar__divider"></span>
                <span class="status-bar__item">{session}</span>
            </div>
        </div>
    }
}

fn connection_status_class(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "status-bar__dot status-bar__dot--connected",
        ConnectionStatus::Connecting => "status-bar__dot status-bar__dot--connecting",
        ConnectionStatus::Disconnected => "status-bar__dot status-bar__dot--disconnected",
    }
}

fn connection_status_label(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "Connected",
        ConnectionStatus::Connecting => "Connecting...",
        ConnectionStatus::Disconnected => "Disconnected",
    }
}

fn session_label(session: &LaunchParams) -> String {
    let role = if session.is_host { " (host)" } else { "" };
    let player = &session.player_id;
    format!("Room {} · Player {player}{role}", session.game_id)
}
