//! Waiting room: roster, player count and the host's start button.

#[cfg(test)]
#[path = "waiting_room_test.rs"]
mod waiting_room_test;

use leptos::prelude::*;
use viewsync::event::RosterEntry;

use super::run_action;
use crate::net::socket::GameView;
use crate::state::view::ViewState;

#[component]
pub fn WaitingRoom() -> impl IntoView {
    let view_state = expect_context::<RwSignal<ViewState>>();
    let controller = expect_context::<StoredValue<GameView>>();

    let on_start = move |_| run_action(controller, "start_game", GameView::start_game);
    let count = move || view_state.with(ViewState::player_count_label);

    view! {
        <section class="waiting-room">
            <h2>"Players " <span class="waiting-room__count">{count}</span></h2>
            <PlayerList/>
            <Show
                when=move || view_state.with(ViewState::start_visible)
                fallback=|| view! {
                    <p class="waiting-room__hint">"Waiting for the host to start the game..."</p>
                }
            >
                <button class="game-button game-button--primary" on:click=on_start>
                    "Start Game"
                </button>
            </Show>
        </section>
    }
}

/// Roster list, shared by the waiting room and the game-over view.
#[component]
pub fn PlayerList() -> impl IntoView {
    let view_state = expect_context::<RwSignal<ViewState>>();

    view! {
        <ul class="player-list">
            {move || {
                view_state
                    .with(|v| v.players.iter().map(player_label).collect::<Vec<_>>())
                    .into_iter()
                    .map(|label| view! { <li class="player-list__item">{label}</li> })
                    .collect_view()
            }}
        </ul>
    }
}

fn player_label(player: &RosterEntry) -> String {
    if player.is_host {
        format!("{} (Host)", player.name)
    } else {
        player.name.clone()
    }
}
