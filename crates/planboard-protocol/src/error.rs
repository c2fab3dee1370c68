//! Protocol-level errors.
//!
//! Decode failures end up logged and the frame dropped; nothing here is
//! fatal to a session.

use planboard_core::KeyError;
use thiserror::Error;

/// Failure to decode or build a wire frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Zero-length command frame.
    #[error("command frame is empty")]
    EmptyFrame,

    /// Command frame longer than [`crate::MAX_FRAME_LEN`].
    #[error("command frame is {len} bytes, limit {max}")]
    FrameTooLong { len: usize, max: usize },

    /// Commands are absolute paths.
    #[error("command `{0}` does not start with `/`")]
    MissingLeadingSlash(String),

    /// No handler for this path.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// A command that needs a name segment did not get one.
    #[error("command `{0}` is missing its name segment")]
    MissingName(&'static str),

    /// Unescaped entity name longer than [`crate::MAX_NAME_LEN`].
    #[error("entity name is {len} bytes, limit {max}")]
    NameTooLong { len: usize, max: usize },

    /// Name segment does not decode to UTF-8.
    #[error("name segment `{0}` does not decode to UTF-8")]
    BadEscape(String),

    /// The kind/name pair in the path is not a valid key.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Envelope is not the JSON shape the session understands.
    #[error("bad envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    /// Session URL construction failed.
    #[error("invalid session URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Why a WebSocket handshake was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Required query parameter absent from the connect URL.
    #[error("missing `{0}` query parameter")]
    MissingParam(&'static str),

    /// `time` did not parse as a unix timestamp.
    #[error("`time` is not a unix timestamp")]
    BadTimestamp,

    /// Presented token does not match the derived one.
    #[error("token mismatch for user `{0}`")]
    BadToken(String),

    /// The expiry in the URL (or a later re-check) has passed.
    #[error("session for user `{0}` has expired")]
    Expired(String),
}
