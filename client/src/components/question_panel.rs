//! Current question with the yes/no answer buttons and the host's next button.

#[cfg(test)]
#[path = "question_panel_test.rs"]
mod question_panel_test;

use leptos::prelude::*;
use viewsync::state::CurrentQuestion;

use super::run_action;
use crate::net::socket::GameView;
use crate::state::view::ViewState;

#[component]
pub fn QuestionPanel() -> impl IntoView {
    let view_state = expect_context::<RwSignal<ViewState>>();
    let controller = expect_context::<StoredValue<GameView>>();

    let question_text = move || view_state.with(question_text);
    let counter = move || view_state.with(counter_text);
    let category = move || view_state.with(category_text);
    let disabled = move || !view_state.with(ViewState::answers_enabled);
    let selected = move || view_state.with(|v| v.selected);

    let on_yes = move |_| run_action(controller, "submit_answer", |c| c.submit_answer(true));
    let on_no = move |_| run_action(controller, "submit_answer", |c| c.submit_answer(false));
    let on_next = move |_| run_action(controller, "next_question", GameView::advance_question);

    view! {
        <section class="question-panel">
            <p class="question-panel__counter">{counter}</p>
            {move || category().map(|c| view! { <p class="question-panel__category">{c}</p> })}
            <h2 class="question-panel__text">{question_text}</h2>
            <div class="question-panel__answers">
                <button
                    class=move || answer_button_class(true, selected())
                    disabled=disabled
                    on:click=on_yes
                >
                    "I Have"
                </button>
                <button
                    class=move || answer_button_class(false, selected())
                    disabled=disabled
                    on:click=on_no
                >
                    "I Have Not"
                </button>
            </div>
            <Show when=move || view_state.with(|v| v.host_controls)>
                <button
                    class="game-button game-button--secondary"
                    disabled=move || !view_state.with(ViewState::next_enabled)
                    on:click=on_next
                >
                    "Next Question"
                </button>
            </Show>
        </section>
    }
}

fn question_text(view: &ViewState) -> String {
    view.question
        .as_ref()
        .map_or_else(|| "Get ready...".to_owned(), CurrentQuestion::display_text)
}

fn counter_text(view: &ViewState) -> String {
    view.question
        .as_ref()
        .map(CurrentQuestion::counter_label)
        .unwrap_or_default()
}

fn category_text(view: &ViewState) -> Option<String> {
    view.question.as_ref().and_then(|q| q.category.clone())
}

fn answer_button_class(answer: bool, selected: Option<bool>) -> &'static str {
    match (answer, selected == Some(answer)) {
        (true, true) => "answer-button answer-button--yes answer-button--selected",
        (true, false) => "answer-button answer-button--yes",
        (false, true) => "answer-button answer-button--no answer-button--selected",
        (false, false) => "answer-button answer-button--no",
    }
}
