//! Networking modules for HTTP + Socket.IO websocket.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls to the game server and `socket` manages the
//! websocket lifecycle feeding the view-sync controller.

pub mod api;
pub mod socket;
