//! Local state block owned by the controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every field is a projection of the most recent server event of its kind.
//! Slices are replaced wholesale, never diffed or merged, and nothing here is
//! derived beyond the question ordinal fallback.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use crate::event::{AnswerEntry, Question, RosterEntry, WireId};

/// Text every question is read with.
pub const QUESTION_PREFIX: &str = "Never have I ever ";

/// Realtime channel status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No open channel.
    #[default]
    Disconnected,
    /// Socket opening or Socket.IO handshake in flight.
    Connecting,
    /// Socket.IO namespace connect acknowledged.
    Connected,
}

/// Which top-level view is visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting room: roster and (for the host) the start button.
    #[default]
    Waiting,
    /// A question is on screen.
    Question,
    /// Terminal view. Absorbing.
    Over,
}

/// The question currently on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentQuestion {
    pub id: Option<WireId>,
    pub text: String,
    pub category: Option<String>,
    /// 1-based ordinal within the game.
    pub number: u32,
    /// Total number of questions, when the server or HTTP API told us.
    pub total: Option<u32>,
}

impl CurrentQuestion {
    pub(crate) fn from_question(question: Question, number: u32, total: Option<u32>) -> Self {
        Self {
            id: question.id,
            text: question.text,
            category: question.category,
            number,
            total,
        }
    }

    /// Question text as shown to players.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!("{QUESTION_PREFIX}{}", self.text)
    }

    /// Counter label, e.g. `"Question 3 of 30"`.
    #[must_use]
    pub fn counter_label(&self) -> String {
        match self.total {
            Some(total) => format!("Question {} of {total}", self.number),
            None => format!("Question {}", self.number),
        }
    }
}

/// Local answer state for the current question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnswerState {
    /// Set once the submit message was handed to the channel (optimistic).
    pub has_answered: bool,
    /// The choice the local player made, if any.
    pub selected: Option<bool>,
}

/// Answer tally for one question, already partitioned for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Question the server tagged the broadcast with, if any.
    pub question_id: Option<WireId>,
    /// Players who answered "I have".
    pub have: Vec<String>,
    /// Players who answered "I have not".
    pub have_not: Vec<String>,
}

impl Tally {
    /// Partition a broadcast into the two display groups, keeping server order.
    #[must_use]
    pub fn from_answers(question_id: Option<WireId>, answers: &[AnswerEntry]) -> Self {
        let mut tally = Self {
            question_id,
            ..Self::default()
        };
        for entry in answers {
            let group = if entry.answer {
                &mut tally.have
            } else {
                &mut tally.have_not
            };
            group.push(entry.player_name.clone());
        }
        tally
    }
}

/// Full local state block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameState {
    pub connection: ConnectionStatus,
    pub phase: Phase,
    /// Game title from the HTTP game record.
    pub title: Option<String>,
    pub roster: Vec<RosterEntry>,
    pub question: Option<CurrentQuestion>,
    pub answer: AnswerState,
    pub tally: Option<Tally>,
    /// Question total learned from the server or the questions endpoint.
    pub total_questions: Option<u32>,
}

impl GameState {
    /// Id of the question on screen, if the server sent one.
    #[must_use]
    pub fn current_question_id(&self) -> Option<&WireId> {
        self.question.as_ref().and_then(|q| q.id.as_ref())
    }

    /// Whether the terminal view has been reached.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Ordinal for a question pushed without `question_number`.
    #[must_use]
    pub fn next_ordinal(&self) -> u32 {
        self.question
            .as_ref()
            .map_or(1, |q| q.number.saturating_add(1))
    }

    /// Replace the current question and reset everything scoped to it.
    pub fn begin_question(
        &mut self,
        question: Question,
        number: u32,
        total: Option<u32>,
    ) -> &CurrentQuestion {
        self.phase = Phase::Question;
        self.answer = AnswerState::default();
        self.tally = None;
        let current = CurrentQuestion::from_question(question, number, total);
        self.question.insert(current)
    }

    /// Whether a tally broadcast tagged with `question_id` belongs to the
    /// question on screen. Untagged broadcasts are accepted.
    #[must_use]
    pub fn accepts_tally_for(&self, question_id: Option<&WireId>) -> bool {
        match question_id {
            None => true,
            Some(id) => self.current_question_id() == Some(id),
        }
    }
}
