//! Page state modules.
//!
//! ARCHITECTURE
//! ============
//! `view` holds the render projection components read from; the controller
//! writes it through the `Renderer` trait and nothing else mutates it.

pub mod view;
