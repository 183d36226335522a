//! Renderer capability the controller draws through.
//!
//! One method per view region. Implementations replace the region they are
//! handed; they never patch it incrementally and never read game state on
//! their own.

use crate::event::RosterEntry;
use crate::state::{ConnectionStatus, CurrentQuestion, Phase, Tally};

/// Severity of a transient notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NoticeKind {
    /// Stable lowercase name, used for CSS classes and log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A transient, dismissible message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }
}

/// View surface driven by [`crate::ViewSync`].
pub trait Renderer {
    /// Game title header.
    fn title(&mut self, title: &str);

    /// Show or hide host-only controls (start, next question).
    fn host_controls(&mut self, visible: bool);

    /// Connection indicator.
    fn connection(&mut self, status: ConnectionStatus);

    /// Switch the visible top-level view. `Phase::Over` also disables every
    /// input.
    fn phase(&mut self, phase: Phase);

    /// Rebuild the player list and count.
    fn roster(&mut self, players: &[RosterEntry]);

    /// Show a new question with answer controls enabled and unselected.
    fn question(&mut self, question: &CurrentQuestion);

    /// Mark the local choice and disable the answer controls.
    fn answer_selected(&mut self, answer: bool);

    /// Empty and hide the tally panel.
    fn clear_tally(&mut self);

    /// Render both tally groups and reveal the panel.
    fn tally(&mut self, tally: &Tally);

    /// Show a transient notice.
    fn notice(&mut self, notice: Notice);
}
