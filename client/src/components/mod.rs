//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the `ViewState` signal from context and route user intent
//! to the `ViewSync` controller stored in context. None of them mutate view
//! state directly.

pub mod game_over_panel;
pub mod notice_banner;
pub mod question_panel;
pub mod status_bar;
pub mod tally_panel;
pub mod waiting_room;

use leptos::prelude::*;
use viewsync::ActionError;

use crate::net::socket::GameView;

/// Run a controller action, logging local rejections.
pub(crate) fn run_action(
    controller: StoredValue<GameView>,
    name: &str,
    action: impl FnOnce(&mut GameView) -> Result<(), ActionError>,
) {
    if let Some(Err(e)) = controller.try_update_value(action) {
        log::debug!("{name} rejected: {e}");
    }
}
