//! Game page: launch parameters, controller wiring and phase views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Launch parameters are read once from the query string. A missing game or
//! player id renders the fatal view and never opens a connection. Otherwise
//! the page builds one `ViewSync` controller, provides it and the `ViewState`
//! signal as context, starts the websocket task and loads the game record.

use leptos::prelude::*;
use leptos_router::hooks::use_location;
use viewsync::config::ClientConfig;
use viewsync::state::Phase;
use viewsync::{LaunchParams, ViewSync};

use crate::components::game_over_panel::GameOverPanel;
use crate::components::notice_banner::NoticeBanner;
use crate::components::question_panel::QuestionPanel;
use crate::components::status_bar::StatusBar;
use crate::components::tally_panel::TallyPanel;
use crate::components::waiting_room::WaitingRoom;
use crate::net::socket::{GameView, event_queue};
use crate::state::view::{SignalRenderer, ViewState};

#[component]
pub fn GamePage() -> impl IntoView {
    let location = use_location();
    match LaunchParams::from_query(&location.search.get_untracked()) {
        Ok(params) => view! { <GameScreen params=params/> }.into_any(),
        Err(e) => {
            log::warn!("cannot launch game: {e}");
            view! { <FatalError message=e.to_string()/> }.into_any()
        }
    }
}

#[component]
fn FatalError(message: String) -> impl IntoView {
    view! {
        <div class="fatal-error">
            <h2>"Unable to join game"</h2>
            <p class="fatal-error__message">{message}</p>
            <a href="/" class="home-button">"Back to home"</a>
        </div>
    }
}

#[component]
fn GameScreen(params: LaunchParams) -> impl IntoView {
    let config = ClientConfig::default();
    let view_state = RwSignal::new(ViewState::default());
    let renderer = SignalRenderer::new(view_state, config.notice_ttl);
    let (sender, rx) = event_queue();
    let game_id = params.game_id.clone();
    let sync = ViewSync::new(params, renderer, sender);
    let controller: StoredValue<GameView> = StoredValue::new(sync);

    provide_context(view_state);
    provide_context(controller);

    #[cfg(feature = "csr")]
    {
        let origin = if config.origin.is_empty() {
            crate::net::socket::page_origin()
        } else {
            config.origin.clone()
        };
        match viewsync::link::socket_url(&origin) {
            Ok(url) => crate::net::socket::spawn_game_socket(controller, rx, url, config.reconnect),
            Err(e) => controller.update_value(|c| c.report_error(&e.to_string())),
        }
        leptos::task::spawn_local(load_game(controller, game_id));
    }
    #[cfg(not(feature = "csr"))]
    drop((rx, game_id));

    let phase = move || view_state.with(|v| v.phase);

    view! {
        <div class="game-page">
            <header class="game-header">
                <h1 class="game-header__title">{move || view_state.with(|v| v.title.clone())}</h1>
            </header>
            <NoticeBanner/>
            {move || match phase() {
                Phase::Waiting => view! { <WaitingRoom/> }.into_any(),
                Phase::Question => view! { <QuestionPanel/> <TallyPanel/> }.into_any(),
                Phase::Over => view! { <GameOverPanel/> }.into_any(),
            }}
            <StatusBar/>
        </div>
    }
}

/// Load the game record, then the question total.
#[cfg(feature = "csr")]
async fn load_game(controller: StoredValue<GameView>, game_id: String) {
    match crate::net::api::fetch_game_info(&game_id).await {
        Ok(info) => controller.update_value(|c| c.apply_game_info(info)),
        Err(e) => {
            controller.update_value(|c| c.report_error(&e));
            return;
        }
    }
    match crate::net::api::fetch_question_count(&game_id).await {
        Ok(total) => controller.update_value(|c| c.apply_question_count(total)),
        Err(e) => controller.update_value(|c| c.report_error(&e)),
    }
}
