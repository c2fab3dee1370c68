//! JSON update envelopes.
//!
//! Each server push is one text frame holding one JSON object whose
//! `category` field names the payload. Decoding an unknown category is
//! not an error; it yields [`Update::Unknown`] so the session can log
//! it and move on. A frame that is not a JSON object with a `category`
//! string fails decode and gets dropped by the caller.

use planboard_core::Update;

use crate::error::ProtocolError;

pub fn encode_update(update: &Update) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(update)?)
}

pub fn decode_update(frame: &str) -> Result<Update, ProtocolError> {
    Ok(serde_json::from_str(frame)?)
}
