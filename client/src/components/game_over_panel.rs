//! Terminal view shown once the server ends the game. No inputs.

use leptos::prelude::*;
use viewsync::state::CurrentQuestion;

use super::waiting_room::PlayerList;
use crate::state::view::ViewState;

#[component]
pub fn GameOverPanel() -> impl IntoView {
    let view_state = expect_context::<RwSignal<ViewState>>();

    let last_question = move || {
        view_state.with(|v| v.question.as_ref().map(CurrentQuestion::counter_label))
    };
    let count = move || view_state.with(ViewState::player_count_label);

    view! {
        <section class="game-over-panel">
            <h2>"Game Over!"</h2>
            <p>"You've gone through all the questions."</p>
            {move || {
                last_question().map(|label| {
                    view! { <p class="game-over-panel__last">"Last played: " {label}</p> }
                })
            }}
            <h3>"Players " {count}</h3>
            <PlayerList/>
            <a href="/" class="home-button">"Back to home"</a>
        </section>
    }
}
