//! View-sync core for the "Never Have I Ever" party game client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The game server owns every rule: who hosts, which question comes next, when
//! the game ends and how answers are tallied. This crate is the thin client
//! side of that contract. It keeps a local projection of the latest server
//! events, pushes that projection through a [`render::Renderer`], and turns
//! user intent into fire-and-forget channel messages.
//!
//! The browser front end (`client`) and the terminal front end (`cli`) both
//! drive the same [`controller::ViewSync`]; they differ only in their renderer
//! and transport.
//!
//! DESIGN
//! ======
//! - `launch`: page/CLI launch parameters (game, player, host flag).
//! - `event`: typed inbound/outbound events and the inbound dispatch table.
//! - `state`: the local state block, replaced slice by slice per event.
//! - `render`: the renderer capability the controller depends on.
//! - `controller`: the single owner of state, renderer and outbox.
//! - `link`: Socket.IO session steps between raw packets and the controller.
//! - `config`: reconnect policy and notice lifetime.
//! - `api`: DTOs and paths for the HTTP collaborator endpoints.

pub mod api;
pub mod config;
pub mod controller;
pub mod event;
pub mod launch;
pub mod link;
pub mod render;
pub mod state;

pub use controller::{ActionError, Outbox, ViewSync};
pub use launch::{LaunchError, LaunchParams};
pub use render::{Notice, NoticeKind, Renderer};
