// crates/planboard-protocol/src/command_codec.rs

//! Path-style command codec.
//!
//! One command per text frame, formatted as an absolute path:
//!
//! - Catalog:
//!   `/get/` (everything) or `/get/<kind>/` (one section)
//!
//! - Plan and subscriptions:
//!   `/plan/<kind>/<name>`
//!   `/register/<kind>/<name>`
//!   `/unregister/<kind>/<name>`
//!
//! - Plan mutations:
//!   `/solve/erase/`
//!   `/solve/replan/forward/`  and  `/solve/replan/backward/`
//!   `/solve/demand/forward/<name>`  and  `/solve/demand/backward/<name>`
//!   `/solve/unplan/<name>`
//!
//! - Chat (the remainder is the raw message text, not a name segment):
//!   `/chat/<text>`
//!
//! - Diagnostics:
//!   `/status/`
//!
//! `<name>` segments are percent-encoded: anything outside
//! `A-Z a-z 0-9 - _ . ~` is escaped, so names containing `/`, `%` or
//! spaces survive the path grammar. Chat text is carried verbatim.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use planboard_core::{Command, EntityKey, EntityKind, KeyError, SolveCommand};

use crate::error::ProtocolError;

/// Longest accepted command frame, in bytes.
pub const MAX_FRAME_LEN: usize = 4096;

/// Longest accepted entity name, in bytes, after unescaping.
pub const MAX_NAME_LEN: usize = 300;

/// Escape set for name segments: everything but unreserved characters.
const NAME_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Format a command as its wire path.
pub fn encode_command(command: &Command) -> String {
    match command {
        Command::Get(None) => "/get/".to_string(),
        Command::Get(Some(kind)) => format!("/get/{}/", kind.as_str()),
        Command::Plan(key) => keyed_path("plan", key),
        Command::Register(key) => keyed_path("register", key),
        Command::Unregister(key) => keyed_path("unregister", key),
        Command::Solve(solve) => match solve {
            SolveCommand::Erase => "/solve/erase/".to_string(),
            SolveCommand::ReplanForward => "/solve/replan/forward/".to_string(),
            SolveCommand::ReplanBackward => "/solve/replan/backward/".to_string(),
            SolveCommand::DemandForward(name) => {
                format!("/solve/demand/forward/{}", escape(name))
            }
            SolveCommand::DemandBackward(name) => {
                format!("/solve/demand/backward/{}", escape(name))
            }
            SolveCommand::Unplan(name) => format!("/solve/unplan/{}", escape(name)),
        },
        Command::Chat(text) => format!("/chat/{text}"),
        Command::Status => "/status/".to_string(),
    }
}

/// Parse one wire path back into a command.
pub fn parse_command(frame: &str) -> Result<Command, ProtocolError> {
    if frame.is_empty() {
        return Err(ProtocolError::EmptyFrame);
    }
    if frame.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLong {
            len: frame.len(),
            max: MAX_FRAME_LEN,
        });
    }
    let rest = frame
        .strip_prefix('/')
        .ok_or_else(|| ProtocolError::MissingLeadingSlash(frame.to_string()))?;

    // Chat takes the raw remainder; it must never go through unescaping.
    if let Some(text) = rest.strip_prefix("chat/") {
        return Ok(Command::Chat(text.to_string()));
    }

    if let Some(rest) = rest.strip_prefix("get/") {
        if rest.is_empty() {
            return Ok(Command::Get(None));
        }
        let segment = rest.strip_suffix('/').unwrap_or(rest);
        let kind = EntityKind::parse(segment)
            .ok_or_else(|| ProtocolError::Key(KeyError::UnknownKind(segment.to_string())))?;
        return Ok(Command::Get(Some(kind)));
    }

    if let Some(rest) = rest.strip_prefix("plan/") {
        return Ok(Command::Plan(parse_key(rest, "/plan/")?));
    }
    if let Some(rest) = rest.strip_prefix("register/") {
        return Ok(Command::Register(parse_key(rest, "/register/")?));
    }
    if let Some(rest) = rest.strip_prefix("unregister/") {
        return Ok(Command::Unregister(parse_key(rest, "/unregister/")?));
    }
    if let Some(rest) = rest.strip_prefix("solve/") {
        return parse_solve(rest);
    }
    if rest == "status/" || rest == "status" {
        return Ok(Command::Status);
    }

    Err(ProtocolError::UnknownCommand(frame.to_string()))
}

// ---- Helpers ----

fn escape(name: &str) -> impl std::fmt::Display + '_ {
    utf8_percent_encode(name, NAME_ESCAPE)
}

fn keyed_path(verb: &str, key: &EntityKey) -> String {
    format!("/{verb}/{}/{}", key.kind, escape(&key.name))
}

fn unescape(segment: &str, command: &'static str) -> Result<String, ProtocolError> {
    if segment.is_empty() {
        return Err(ProtocolError::MissingName(command));
    }
    let name = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| ProtocolError::BadEscape(segment.to_string()))?
        .into_owned();
    if name.len() > MAX_NAME_LEN {
        return Err(ProtocolError::NameTooLong {
            len: name.len(),
            max: MAX_NAME_LEN,
        });
    }
    Ok(name)
}

fn parse_key(rest: &str, command: &'static str) -> Result<EntityKey, ProtocolError> {
    let (kind, name) = rest
        .split_once('/')
        .ok_or(ProtocolError::MissingName(command))?;
    let kind = EntityKind::parse(kind)
        .ok_or_else(|| ProtocolError::Key(KeyError::UnknownKind(kind.to_string())))?;
    Ok(EntityKey::new(kind, unescape(name, command)?))
}

fn parse_solve(rest: &str) -> Result<Command, ProtocolError> {
    let solve = if rest == "erase/" || rest == "erase" {
        SolveCommand::Erase
    } else if rest == "replan/forward/" || rest == "replan/forward" {
        SolveCommand::ReplanForward
    } else if rest == "replan/backward/" || rest == "replan/backward" {
        SolveCommand::ReplanBackward
    } else if let Some(name) = rest.strip_prefix("demand/forward/") {
        SolveCommand::DemandForward(unescape(name, "/solve/demand/forward/")?)
    } else if let Some(name) = rest.strip_prefix("demand/backward/") {
        SolveCommand::DemandBackward(unescape(name, "/solve/demand/backward/")?)
    } else if let Some(name) = rest.strip_prefix("unplan/") {
        SolveCommand::Unplan(unescape(name, "/solve/unplan/")?)
    } else {
        return Err(ProtocolError::UnknownCommand(format!("/solve/{rest}")));
    };
    Ok(Command::Solve(solve))
}
