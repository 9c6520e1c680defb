//! # till
//!
//! Session store and navigation guard for the point-of-sale / inventory
//! front-end, with a client-rendered Leptos UI on top.
//!
//! The guard (`router::guard`) is plain Rust over `state::session`; the
//! Leptos layer (`app`, `pages`, `router::adapter`) only feeds it locations,
//! gates route views on its decisions and follows its redirects.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod router;
pub mod state;
pub mod util;

/// Browser entry point: mount the app into `<body>`.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
