//! planboard-protocol
//!
//! Wire contract for the planning board.
//!
//! Client → server: one path-style text command per frame
//! ([`command_codec`]). Server → client: one JSON envelope per frame
//! ([`envelope`]). The WebSocket handshake itself is authenticated by a
//! derived token in the connect URL ([`auth`]).

pub mod auth;
pub mod command_codec;
pub mod envelope;
pub mod error;

pub use auth::{login_token, session_url, verify_query, Login};
pub use command_codec::{encode_command, parse_command, MAX_FRAME_LEN, MAX_NAME_LEN};
pub use envelope::{decode_update, encode_update};
pub use error::{AuthError, ProtocolError};
