//! # client
//!
//! Leptos + WASM browser front end for the "Never Have I Ever" party game.
//!
//! The page is a thin view over the `viewsync` controller: components read a
//! single `ViewState` signal, UI handlers call controller actions, and the
//! websocket task in `net::socket` feeds inbound packets to the controller in
//! delivery order.
//!
//! Browser-only code (websocket, HTTP, timers) is gated behind the `csr`
//! feature so the pure view logic builds and tests natively.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: install panic/log hooks and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    leptos::mount::mount_to_body(app::App);
}
