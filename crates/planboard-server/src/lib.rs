//! planboard-server
//!
//! Multi-client WebSocket server for the planning board.
//!
//! One central task owns the plan model, chat history and subscription
//! sets; per-client tasks handle socket I/O. The handshake is
//! authenticated from the connect URL (see `planboard_protocol::auth`).

pub mod config;
pub mod model;
pub mod server;
pub mod types;

// these are internal modules, not re-exported
mod board_task;
mod client;
