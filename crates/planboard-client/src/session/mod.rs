//! Live-session plumbing: the socket link, the subscription registry
//! and the demand action rules.

pub mod actions;
pub mod connection;
pub mod registry;
pub mod render;

pub use actions::{
    demand_action_commands, plan_demands_backward, plan_demands_forward, unplan_demands,
};
pub use connection::{Connection, ConnectionState};
pub use registry::{Subscription, SubscriptionRegistry};
pub use render::{RenderAdapter, RenderHandle};

use planboard_core::Update;

/// What the session loop reports back to the application.
#[derive(Debug)]
pub enum SessionEvent {
    /// The dial succeeded; the link is open.
    Connected,
    /// One decoded update frame.
    Update(Update),
    /// The link is closed, after a failed dial or a lost session.
    Disconnected,
}
