//! Render projection of the game page.
//!
//! DESIGN
//! ======
//! `ViewState` is a plain struct implementing `Renderer`, so every render rule
//! is testable without a browser. `SignalRenderer` wraps it in an `RwSignal`
//! for the live page and schedules notice dismissal.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use std::time::Duration;

use leptos::prelude::*;
use viewsync::event::RosterEntry;
use viewsync::state::{ConnectionStatus, CurrentQuestion, Phase, Tally};
use viewsync::{Notice, Renderer};

/// Title shown until the game record arrives.
pub const DEFAULT_TITLE: &str = "Never Have I Ever";

/// A notice currently on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShownNotice {
    pub id: u64,
    pub notice: Notice,
}

/// Everything the game page draws.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub title: String,
    pub host_controls: bool,
    pub connection: ConnectionStatus,
    pub phase: Phase,
    pub players: Vec<RosterEntry>,
    pub question: Option<CurrentQuestion>,
    pub selected: Option<bool>,
    pub answers_locked: bool,
    /// Present only while the tally panel is revealed.
    pub tally: Option<Tally>,
    pub notices: Vec<ShownNotice>,
    next_notice_id: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            host_controls: false,
            connection: ConnectionStatus::Disconnected,
            phase: Phase::Waiting,
            players: Vec::new(),
            question: None,
            selected: None,
            answers_locked: false,
            tally: None,
            notices: Vec::new(),
            next_notice_id: 0,
        }
    }
}

impl ViewState {
    /// Add a notice and return the id used to dismiss it.
    pub fn push_notice(&mut self, notice: Notice) -> u64 {
        let id = self.next_notice_id;
        self.next_notice_id += 1;
        self.notices.push(ShownNotice { id, notice });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notices.retain(|n| n.id != id);
    }

    #[must_use]
    pub fn player_count_label(&self) -> String {
        match self.players.len() {
            1 => "1 player".to_owned(),
            n => format!("{n} players"),
        }
    }

    /// Whether the yes/no buttons accept input.
    #[must_use]
    pub fn answers_enabled(&self) -> bool {
        self.phase == Phase::Question && self.question.is_some() && !self.answers_locked
    }

    /// Whether the host's next-question button accepts input.
    #[must_use]
    pub fn next_enabled(&self) -> bool {
        self.host_controls && self.phase == Phase::Question && self.question.is_some()
    }

    /// Whether the host's start button is shown.
    #[must_use]
    pub fn start_visible(&self) -> bool {
        self.host_controls && self.phase == Phase::Waiting
    }
}

impl Renderer for ViewState {
    fn title(&mut self, title: &str) {
        title.clone_into(&mut self.title);
    }

    fn host_controls(&mut self, visible: bool) {
        self.host_controls = visible;
    }

    fn connection(&mut self, status: ConnectionStatus) {
        self.connection = status;
    }

    fn phase(&mut self, phase: Phase) {
        self.phase = phase;
        if phase == Phase::Over {
            self.answers_locked = true;
        }
    }

    fn roster(&mut self, players: &[RosterEntry]) {
        self.players = players.to_vec();
    }

    fn question(&mut self, question: &CurrentQuestion) {
        self.question = Some(question.clone());
        self.selected = None;
        self.answers_locked = false;
    }

    fn answer_selected(&mut self, answer: bool) {
        self.selected = Some(answer);
        self.answers_locked = true;
    }

    fn clear_tally(&mut self) {
        self.tally = None;
    }

    fn tally(&mut self, tally: &Tally) {
        self.tally = Some(tally.clone());
    }

    fn notice(&mut self, notice: Notice) {
        self.push_notice(notice);
    }
}

/// Live renderer backed by a signal. Notices dismiss themselves after `ttl`.
#[derive(Clone, Copy)]
pub struct SignalRenderer {
    view: RwSignal<ViewState>,
    ttl: Duration,
}

impl SignalRenderer {
    pub fn new(view: RwSignal<ViewState>, ttl: Duration) -> Self {
        Self { view, ttl }
    }
}

impl Renderer for SignalRenderer {
    fn title(&mut self, title: &str) {
        self.view.update(|v| Renderer::title(v, title));
    }

    fn host_controls(&mut self, visible: bool) {
        self.view.update(|v| Renderer::host_controls(v, visible));
    }

    fn connection(&mut self, status: ConnectionStatus) {
        self.view.update(|v| Renderer::connection(v, status));
    }

    fn phase(&mut self, phase: Phase) {
        self.view.update(|v| Renderer::phase(v, phase));
    }

    fn roster(&mut self, players: &[RosterEntry]) {
        self.view.update(|v| Renderer::roster(v, players));
    }

    fn question(&mut self, question: &CurrentQuestion) {
        self.view.update(|v| Renderer::question(v, question));
    }

    fn answer_selected(&mut self, answer: bool) {
        self.view.update(|v| Renderer::answer_selected(v, answer));
    }

    fn clear_tally(&mut self) {
        self.view.update(ViewState::clear_tally);
    }

    fn tally(&mut self, tally: &Tally) {
        self.view.update(|v| Renderer::tally(v, tally));
    }

    fn notice(&mut self, notice: Notice) {
        let Some(id) = self.view.try_update(|v| v.push_notice(notice)) else {
            return;
        };
        #[cfg(feature = "csr")]
        {
            let view = self.view;
            let ttl = self.ttl;
            leptos::task::spawn_local(async move {
                gloo_timers::future::sleep(ttl).await;
                view.try_update(|v| v.dismiss(id));
            });
        }
        #[cfg(not(feature = "csr"))]
        log::trace!("notice {id} stays until dismissed (ttl {:?})", self.ttl);
    }
}
