//! The view-sync controller.
//!
//! `ViewSync` is the single owner of session identity, local state, the
//! renderer and the outbound channel. Transports feed it inbound events in
//! delivery order; UI handlers call its action methods. It never blocks and
//! never retries.
//!
//! ERROR HANDLING
//! ==============
//! Inbound problems (unknown events, bad payloads, stale tallies) are logged
//! and dropped. Local precondition failures return [`ActionError`]; the ones a
//! player should see also produce a notice. Nothing rejected locally is ever
//! sent to the server.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::api::{GameInfo, game_title};
use crate::event::{ClientEvent, Question, RosterEntry, ServerEvent, WireId, decode_server_event};
use crate::launch::LaunchParams;
use crate::render::{Notice, Renderer};
use crate::state::{AnswerState, ConnectionStatus, GameState, Phase, Tally};

/// Outbound message sink. Sends are fire-and-forget.
pub trait Outbox {
    /// Queue `event` for delivery. Returns `false` when the channel is gone.
    fn send(&mut self, event: ClientEvent) -> bool;
}

impl Outbox for Vec<ClientEvent> {
    fn send(&mut self, event: ClientEvent) -> bool {
        self.push(event);
        true
    }
}

/// Local rejection of a user action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("only the host can {0}")]
    NotHost(&'static str),
    #[error("no active question")]
    NoActiveQuestion,
    #[error("answer already submitted for this question")]
    AlreadyAnswered,
    #[error("the game is over")]
    GameOver,
    #[error("not connected to the game server")]
    ChannelClosed,
}

/// Controller bridging one realtime channel and one renderer.
pub struct ViewSync<R, O> {
    session: LaunchParams,
    state: GameState,
    renderer: R,
    outbox: O,
}

impl<R: Renderer, O: Outbox> ViewSync<R, O> {
    /// Create the controller and render the role-dependent chrome.
    pub fn new(session: LaunchParams, mut renderer: R, outbox: O) -> Self {
        let state = GameState::default();
        renderer.host_controls(session.is_host);
        renderer.connection(state.connection);
        renderer.phase(state.phase);
        Self {
            session,
            state,
            renderer,
            outbox,
        }
    }

    pub fn session(&self) -> &LaunchParams {
        &self.session
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn outbox(&self) -> &O {
        &self.outbox
    }

    // =========================================================
    // Connection lifecycle
    // =========================================================

    /// The transport is opening a socket.
    pub fn on_connecting(&mut self) {
        self.set_connection(ConnectionStatus::Connecting);
    }

    /// The channel is up: announce it and join the game room.
    pub fn on_connected(&mut self) {
        self.set_connection(ConnectionStatus::Connected);
        self.renderer
            .notice(Notice::success("Connected to game server"));
        let join = ClientEvent::JoinGame {
            game_id: self.session.game_id.clone(),
            player_id: self.session.player_id.clone(),
        };
        if !self.outbox.send(join) {
            log::warn!("join_game dropped: outbound channel closed");
        }
    }

    /// The channel went away. Only a drop from a live connection is announced.
    pub fn on_disconnected(&mut self) {
        let was_connected = self.state.connection == ConnectionStatus::Connected;
        self.set_connection(ConnectionStatus::Disconnected);
        if was_connected {
            self.renderer
                .notice(Notice::warning("Disconnected from game server"));
        }
    }

    /// The server refused the namespace connect.
    pub fn on_refused(&mut self, message: &str) {
        log::warn!("connect refused: {message}");
        let message = if message.is_empty() {
            "Connection refused by game server"
        } else {
            message
        };
        self.renderer.notice(Notice::error(message));
    }

    fn set_connection(&mut self, status: ConnectionStatus) {
        self.state.connection = status;
        self.renderer.connection(status);
    }

    // =========================================================
    // Inbound
    // =========================================================

    /// Decode one wire event through the dispatch table and apply it.
    pub fn receive(&mut self, event: &wire::Event) {
        match decode_server_event(event) {
            Ok(Some(decoded)) => self.handle(decoded),
            Ok(None) => log::debug!("ignoring unhandled event `{}`", event.name),
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Apply one decoded server event.
    pub fn handle(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Roster(players) => self.replace_roster(players),
            ServerEvent::PlayerJoined { name, players } => {
                if let Some(name) = name {
                    let notice = Notice::info(format!("{name} joined the game"));
                    self.renderer.notice(notice);
                }
                if let Some(players) = players {
                    self.replace_roster(players);
                }
            }
            ServerEvent::PlayerLeft { name, players } => {
                if let Some(name) = name {
                    let notice = Notice::info(format!("{name} left the game"));
                    self.renderer.notice(notice);
                }
                if let Some(players) = players {
                    self.replace_roster(players);
                }
            }
            ServerEvent::GameStarted { question } => self.on_game_started(question),
            ServerEvent::NewQuestion {
                question,
                number,
                total,
            } => self.on_new_question(question, number, total),
            ServerEvent::AnswerSubmitted {
                question_id,
                answers,
            } => {
                if self.ignore_after_game_over("answer_submitted") {
                    return;
                }
                if !self.state.accepts_tally_for(question_id.as_ref()) {
                    log::debug!(
                        "discarding stale tally for question {:?}; current {:?}",
                        question_id,
                        self.state.current_question_id()
                    );
                    return;
                }
                let tally = Tally::from_answers(question_id, &answers);
                let tally = self.state.tally.insert(tally);
                self.renderer.tally(tally);
            }
            ServerEvent::GameOver => {
                if self.ignore_after_game_over("game_over") {
                    return;
                }
                self.state.phase = Phase::Over;
                self.renderer.phase(Phase::Over);
                self.renderer
                    .notice(Notice::info("Game over! You've gone through all the questions."));
            }
            ServerEvent::Error { message } => {
                let message = message.filter(|m| !m.trim().is_empty());
                let message = message.as_deref().unwrap_or("An error occurred");
                log::warn!("server error: {message}");
                self.renderer.notice(Notice::error(message));
            }
        }
    }

    fn replace_roster(&mut self, players: Vec<RosterEntry>) {
        self.state.roster = players;
        self.renderer.roster(&self.state.roster);
    }

    fn on_game_started(&mut self, question: Option<Question>) {
        if self.ignore_after_game_over("game_started") {
            return;
        }
        if let Some(question) = question {
            let total = self.state.total_questions;
            self.show_question(question, 1, total);
        } else {
            // The first question follows in its own `new_question` event.
            self.state.phase = Phase::Question;
            self.state.answer = AnswerState::default();
            self.state.tally = None;
            self.renderer.clear_tally();
            self.renderer.phase(Phase::Question);
        }
    }

    fn on_new_question(&mut self, question: Question, number: Option<u32>, total: Option<u32>) {
        if self.ignore_after_game_over("new_question") {
            return;
        }
        let number = number.unwrap_or_else(|| self.state.next_ordinal());
        if total.is_some() {
            self.state.total_questions = total;
        }
        let total = self.state.total_questions;
        self.show_question(question, number, total);
    }

    fn show_question(&mut self, question: Question, number: u32, total: Option<u32>) {
        self.renderer.clear_tally();
        self.renderer.phase(Phase::Question);
        let current = self.state.begin_question(question, number, total);
        self.renderer.question(current);
    }

    fn ignore_after_game_over(&self, event: &str) -> bool {
        if self.state.is_over() {
            log::debug!("ignoring `{event}` after game over");
            return true;
        }
        false
    }

    // =========================================================
    // HTTP collaborator results
    // =========================================================

    /// Apply the game record fetched from `GET /api/games/{id}`.
    pub fn apply_game_info(&mut self, info: GameInfo) {
        let title = game_title(info.game_modes.as_deref());
        self.renderer.title(&title);
        self.state.title = Some(title);
        self.replace_roster(info.players);
    }

    /// Record the question total from `GET /api/games/{id}/questions`.
    pub fn apply_question_count(&mut self, total: u32) {
        self.state.total_questions = Some(total);
    }

    /// Surface a failed HTTP call.
    pub fn report_error(&mut self, message: &str) {
        log::warn!("request failed: {message}");
        self.renderer.notice(Notice::error(message));
    }

    // =========================================================
    // Outbound actions
    // =========================================================

    /// Ask the server to start the game (host only).
    ///
    /// # Errors
    ///
    /// [`ActionError::NotHost`] (with a notice), [`ActionError::GameOver`], or
    /// [`ActionError::ChannelClosed`] (with a notice).
    pub fn start_game(&mut self) -> Result<(), ActionError> {
        if !self.session.is_host {
            self.renderer
                .notice(Notice::error("Only the host can start the game"));
            return Err(ActionError::NotHost("start the game"));
        }
        if self.state.is_over() {
            return Err(ActionError::GameOver);
        }
        let event = ClientEvent::StartGame {
            game_id: self.session.game_id.clone(),
            player_id: self.session.player_id.clone(),
        };
        self.send(event)
    }

    /// Submit the local player's answer for the current question.
    ///
    /// A second call before the next question is a silent no-op returning
    /// [`ActionError::AlreadyAnswered`].
    ///
    /// # Errors
    ///
    /// [`ActionError::GameOver`], [`ActionError::AlreadyAnswered`],
    /// [`ActionError::NoActiveQuestion`] (with a notice), or
    /// [`ActionError::ChannelClosed`] (with a notice, answer state untouched).
    pub fn submit_answer(&mut self, answer: bool) -> Result<(), ActionError> {
        if self.state.is_over() {
            return Err(ActionError::GameOver);
        }
        if self.state.answer.has_answered {
            return Err(ActionError::AlreadyAnswered);
        }
        let question_id = self.require_question_id()?;
        let event = ClientEvent::SubmitAnswer {
            game_id: self.session.game_id.clone(),
            player_id: self.session.player_id.clone(),
            question_id,
            answer,
        };
        self.send(event)?;
        self.state.answer.has_answered = true;
        self.state.answer.selected = Some(answer);
        self.renderer.answer_selected(answer);
        Ok(())
    }

    /// Ask the server for the next question (host only).
    ///
    /// # Errors
    ///
    /// [`ActionError::NotHost`] (with a notice), [`ActionError::GameOver`],
    /// [`ActionError::NoActiveQuestion`] (with a notice), or
    /// [`ActionError::ChannelClosed`] (with a notice).
    pub fn advance_question(&mut self) -> Result<(), ActionError> {
        if !self.session.is_host {
            self.renderer
                .notice(Notice::error("Only the host can move to the next question"));
            return Err(ActionError::NotHost("move to the next question"));
        }
        if self.state.is_over() {
            return Err(ActionError::GameOver);
        }
        let current_question_id = self.require_question_id()?;
        let event = ClientEvent::NextQuestion {
            game_id: self.session.game_id.clone(),
            player_id: self.session.player_id.clone(),
            current_question_id,
        };
        self.send(event)
    }

    fn require_question_id(&mut self) -> Result<WireId, ActionError> {
        let Some(id) = self.state.current_question_id().cloned() else {
            self.renderer.notice(Notice::error("No active question"));
            return Err(ActionError::NoActiveQuestion);
        };
        Ok(id)
    }

    fn send(&mut self, event: ClientEvent) -> Result<(), ActionError> {
        let name = event.name();
        if self.outbox.send(event) {
            log::debug!("sent `{name}`");
            Ok(())
        } else {
            log::warn!("`{name}` dropped: outbound channel closed");
            self.renderer
                .notice(Notice::warning("Not connected to game server"));
            Err(ActionError::ChannelClosed)
        }
    }
}
