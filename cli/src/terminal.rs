//! Line-oriented renderer for the terminal client.
//!
//! Regions cannot be redrawn in place on a plain terminal, so each update is
//! printed as a new block. An emptied tally prints nothing.

#[cfg(test)]
#[path = "terminal_test.rs"]
mod terminal_test;

use std::fmt::Display;
use std::io::Write;

use viewsync::event::RosterEntry;
use viewsync::state::{ConnectionStatus, CurrentQuestion, Phase, QUESTION_PREFIX, Tally};
use viewsync::{Notice, Renderer};

pub(crate) const HELP: &str = "\
commands:
  y, yes     I have
  n, no      I have not
  start      start the game (host)
  next       next question (host)
  help       show this list
  quit       leave the game";

pub(crate) struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }

    pub(crate) fn help(&mut self) {
        self.line(HELP);
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!("terminal write failed: {e}");
        }
    }
}

pub(crate) fn player_label(player: &RosterEntry) -> String {
    if player.is_host {
        format!("{} (host)", player.name)
    } else {
        player.name.clone()
    }
}

pub(crate) fn roster_line(players: &[RosterEntry]) -> String {
    if players.is_empty() {
        return "Players (0): nobody yet".to_owned();
    }
    let names = players
        .iter()
        .map(player_label)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Players ({}): {names}", players.len())
}

fn group_line(label: &str, names: &[String]) -> String {
    if names.is_empty() {
        format!("{label} (0): nobody yet")
    } else {
        format!("{label} ({}): {}", names.len(), names.join(", "))
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn title(&mut self, title: &str) {
        self.line(format_args!("=== {title} ==="));
    }

    fn host_controls(&mut self, visible: bool) {
        if visible {
            self.line("You are the host. Type `start` to begin and `next` to advance.");
        }
    }

    fn connection(&mut self, status: ConnectionStatus) {
        let label = match status {
            ConnectionStatus::Connecting => "connecting...",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
        };
        self.line(format_args!("[{label}]"));
    }

    fn phase(&mut self, phase: Phase) {
        match phase {
            Phase::Waiting => self.line("Waiting for the host to start the game..."),
            Phase::Question => {}
            Phase::Over => self.line("*** Game over. Thanks for playing! ***"),
        }
    }

    fn roster(&mut self, players: &[RosterEntry]) {
        self.line(roster_line(players));
    }

    fn question(&mut self, question: &CurrentQuestion) {
        let mut header = question.counter_label();
        if let Some(category) = &question.category {
            header.push_str(&format!(" [{category}]"));
        }
        self.line("");
        self.line(header);
        self.line(format_args!("{QUESTION_PREFIX}{}", question.text));
        self.line("Answer with `y` (I have) or `n` (I have not).");
    }

    fn answer_selected(&mut self, answer: bool) {
        let label = if answer { "I have" } else { "I have not" };
        self.line(format_args!("You answered: {label}"));
    }

    fn clear_tally(&mut self) {}

    fn tally(&mut self, tally: &Tally) {
        self.line(group_line("I have", &tally.have));
        self.line(group_line("I have not", &tally.have_not));
    }

    fn notice(&mut self, notice: Notice) {
        self.line(format_args!("[{}] {}", notice.kind.as_str(), notice.message));
    }
}
