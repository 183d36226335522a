//! Stdin command parsing and dispatch into the controller.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use viewsync::{ActionError, Outbox, Renderer, ViewSync};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Answer(bool),
    Start,
    Next,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// What the play loop should do after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Help,
    Quit,
}

pub(crate) fn parse_command(line: &str) -> Command {
    let normalized = line.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "" => Command::Empty,
        "y" | "yes" | "have" | "i have" => Command::Answer(true),
        "n" | "no" | "have not" | "i have not" => Command::Answer(false),
        "start" | "s" => Command::Start,
        "next" => Command::Next,
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.trim().to_owned()),
    }
}

/// Run one typed line against the controller. Rejected actions are already
/// surfaced as notices by the controller; they are only logged here.
pub(crate) fn handle_line<R: Renderer, O: Outbox>(view: &mut ViewSync<R, O>, line: &str) -> Flow {
    let (name, result): (&str, Result<(), ActionError>) = match parse_command(line) {
        Command::Answer(answer) => ("submit_answer", view.submit_answer(answer)),
        Command::Start => ("start_game", view.start_game()),
        Command::Next => ("next_question", view.advance_question()),
        Command::Help => return Flow::Help,
        Command::Quit => return Flow::Quit,
        Command::Empty => return Flow::Continue,
        Command::Unknown(text) => {
            tracing::debug!(%text, "unknown command");
            return Flow::Help;
        }
    };
    if let Err(e) = result {
        tracing::debug!(action = name, "rejected: {e}");
    }
    Flow::Continue
}
