//! Logical session messages.
//!
//! These are **transport-agnostic**:
//! - [`Command`]: what a client sends.
//! - [`Update`]: what the server pushes.
//!
//! The path codec for commands and the JSON envelope codec for updates
//! live in the `planboard-protocol` crate; this module is purely
//! logical, except that [`Update`] carries its serde shape because the
//! `category` tag *is* the dispatch contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::entity::{EntityKey, EntityKind};
use crate::plan::PlanUpdate;

/// A client-to-server request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Request the catalog, optionally narrowed to one kind.
    Get(Option<EntityKind>),

    /// Request one entity's current plan.
    Plan(EntityKey),

    /// Subscribe to future plan pushes for one entity.
    Register(EntityKey),

    /// Drop the subscription for one entity.
    Unregister(EntityKey),

    /// Ask the server to mutate the plan.
    Solve(SolveCommand),

    /// Send a chat line (raw text, no markup).
    Chat(String),

    /// Ask the server to log its session table. No reply.
    Status,
}

/// Plan mutations a client may request.
///
/// The bulk forms exist so a board acting on *all* demands can say so
/// in one frame instead of one frame per row.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveCommand {
    /// Unplan every demand.
    Erase,

    /// Replan every demand, forward from the horizon start.
    ReplanForward,

    /// Replan every demand, backward from each due date.
    ReplanBackward,

    /// Plan one demand forward.
    DemandForward(String),

    /// Plan one demand backward.
    DemandBackward(String),

    /// Unplan one demand.
    Unplan(String),
}

/// A server push, discriminated by the `category` field on the wire.
///
/// Unrecognized categories decode to [`Update::Unknown`]; the session
/// logs and ignores them, so the server side can grow new categories
/// without breaking old clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Update {
    /// Catalog listing; replaces whatever the client knew.
    Name(Catalog),

    /// Incremental plan data for some entities.
    Plan(PlanUpdate),

    /// Chat entries, oldest first.
    Chat { messages: Vec<ChatMessage> },

    /// Anything with a category this client does not understand.
    #[serde(other)]
    Unknown,
}

/// One chat line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub date: DateTime<Utc>,
    pub name: String,
    pub value: String,
}

impl ChatMessage {
    pub fn now(name: impl Into<String>, value: impl Into<String>) -> Self {
        ChatMessage {
            date: Utc::now(),
            name: name.into(),
            value: value.into(),
        }
    }
}
