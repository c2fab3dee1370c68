//! Catalog listings: the `category: "name"` payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// One demand row in the catalog, with the static attributes shown in
/// demand tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandInfo {
    pub name: String,
    pub item: String,
    pub customer: String,
    pub quantity: f64,
    pub due: DateTime<Utc>,
    pub priority: i32,
}

/// Entity listing pushed in reply to a catalog request.
///
/// A filtered request (`/get/<kind>/`) leaves the other sections empty,
/// and empty sections are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub demands: Vec<DemandInfo>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
            && self.operations.is_empty()
            && self.resources.is_empty()
            && self.buffers.is_empty()
            && self.demands.is_empty()
    }

    /// Names of one subscribable kind, in catalog order.
    pub fn names(&self, kind: EntityKind) -> Vec<&str> {
        match kind {
            EntityKind::Operation => self.operations.iter().map(String::as_str).collect(),
            EntityKind::Resource => self.resources.iter().map(String::as_str).collect(),
            EntityKind::Buffer => self.buffers.iter().map(String::as_str).collect(),
            EntityKind::Demand => self.demands.iter().map(|d| d.name.as_str()).collect(),
        }
    }

    /// Static attributes of one demand, if listed.
    pub fn demand(&self, name: &str) -> Option<&DemandInfo> {
        self.demands.iter().find(|d| d.name == name)
    }
}
