//! planboard-client
//!
//! The terminal planning board and the session library underneath it:
//! the socket link, subscription bookkeeping, demand actions and the
//! preference store. The binary in `main.rs` wires these into a
//! ratatui application.

pub mod app;
pub mod components;
pub mod config;
pub mod prefs;
pub mod session;
pub mod ui;
