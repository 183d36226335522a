//! Transient notices stacked at the top of the game page.

#[cfg(test)]
#[path = "notice_banner_test.rs"]
mod notice_banner_test;

use leptos::prelude::*;
use viewsync::NoticeKind;

use crate::state::view::ViewState;

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let view_state = expect_context::<RwSignal<ViewState>>();

    view! {
        <div class="notice-stack" role="status">
            <For
                each=move || view_state.with(|v| v.notices.clone())
                key=|shown| shown.id
                children=move |shown| {
                    let id = shown.id;
                    view! {
                        <div
                            class=notice_class(shown.notice.kind)
                            on:click=move |_| view_state.update(|v| v.dismiss(id))
                        >
                            {shown.notice.message}
                        </div>
                    }
                }
            />
        </div>
    }
}

fn notice_class(kind: NoticeKind) -> String {
    format!("notice notice--{}", kind.as_str())
}
