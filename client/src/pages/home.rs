//! Home page: create a room or join one by code.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use viewsync::{LaunchError, LaunchParams};

/// Game page link for the join form. Room codes are matched upper-case.
fn join_href(room: &str, player: &str, host: bool) -> Result<String, LaunchError> {
    let room = room.trim().to_uppercase();
    let query = LaunchParams::new(&room, player, host)?.to_query()?;
    Ok(format!("/game?{query}"))
}

#[component]
pub fn HomePage() -> impl IntoView {
    let room = RwSignal::new(String::new());
    let player = RwSignal::new(String::new());
    let host = RwSignal::new(false);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let navigate = use_navigate();

    let on_create = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        info.set("Creating room...".to_owned());

        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match crate::net::api::create_room().await {
                Ok(room_id) => {
                    let hint = "Enter your player ID to join as host.";
                    info.set(format!("Room {room_id} created. {hint}"));
                    room.set(room_id);
                    host.set(true);
                }
                Err(e) => info.set(e),
            }
            busy.set(false);
        });
    };

    let on_join = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        match join_href(&room.get(), &player.get(), host.get()) {
            Ok(href) => navigate(&href, NavigateOptions::default()),
            Err(e) => info.set(e.to_string()),
        }
    };

    view! {
        <div class="home-page">
            <div class="home-card">
                <h1>"Never Have I Ever"</h1>
                <button class="home-button" on:click=on_create disabled=move || busy.get()>
                    "Create Room"
                </button>
                <div class="home-divider"></div>
                <form class="home-form" on:submit=on_join>
                    <input
                        class="home-input"
                        type="text"
                        placeholder="Room code"
                        prop:value=move || room.get()
                        on:input=move |ev| room.set(event_target_value(&ev))
                    />
                    <input
                        class="home-input"
                        type="text"
                        placeholder="Player ID"
                        prop:value=move || player.get()
                        on:input=move |ev| player.set(event_target_value(&ev))
                    />
                    <label class="home-checkbox">
                        <input
                            type="checkbox"
                            prop:checked=move || host.get()
                            on:change=move |ev| host.set(event_target_checked(&ev))
                        />
                        "I am the host"
                    </label>
                    <button class="home-button" type="submit">"Join Game"</button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="home-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
