//! Answer tally for the current question, split into "I have" and "I have not".

#[cfg(test)]
#[path = "tally_panel_test.rs"]
mod tally_panel_test;

use leptos::prelude::*;

use crate::state::view::ViewState;

#[component]
pub fn TallyPanel() -> impl IntoView {
    let view_state = expect_context::<RwSignal<ViewState>>();
    let have = Signal::derive(move || view_state.with(|v| group_names(v, true)));
    let have_not = Signal::derive(move || view_state.with(|v| group_names(v, false)));

    view! {
        <Show when=move || view_state.with(|v| v.tally.is_some())>
            <section class="tally-panel">
                <h2>"Answers"</h2>
                <TallyGroup
                    title="I Have:"
                    class="answer-group yes-answers"
                    names=have
                />
                <TallyGroup
                    title="I Have Not:"
                    class="answer-group no-answers"
                    names=have_not
                />
            </section>
        </Show>
    }
}

#[component]
fn TallyGroup(
    title: &'static str,
    class: &'static str,
    names: Signal<Vec<String>>,
) -> impl IntoView {
    let count = move || names.with(Vec::len);

    view! {
        <div class=class>
            <h3>{title} " " <span class="answer-group__count">{count}</span></h3>
            <ul>
                {move || {
                    let names = names.get();
                    if names.is_empty() {
                        view! { <li class="answer-group__empty">{empty_group_label()}</li> }
                            .into_any()
                    } else {
                        names
                            .into_iter()
                            .map(|name| view! { <li>{name}</li> })
                            .collect_view()
                            .into_any()
                    }
                }}
            </ul>
        </div>
    }
}

fn empty_group_label() -> &'static str {
    "Nobody yet"
}

/// One side of the tally, empty while no tally is shown.
fn group_names(view: &ViewState, have: bool) -> Vec<String> {
    let Some(tally) = view.tally.as_ref() else {
        return Vec::new();
    };
    if have {
        tally.have.clone()
    } else {
        tally.have_not.clone()
    }
}
