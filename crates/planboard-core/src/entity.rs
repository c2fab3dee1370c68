//! Entity identity: kinds and `<kind>/<name>` keys.

use std::fmt;
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::KeyError;

/// The four subscribable entity kinds on a planning board.
///
/// Items show up in catalog listings but are not subscribable and never
/// form keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Operation,
    Resource,
    Buffer,
    Demand,
}

impl EntityKind {
    /// All kinds, in the order catalog listings and pickers present them.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Operation,
        EntityKind::Resource,
        EntityKind::Buffer,
        EntityKind::Demand,
    ];

    /// The lowercase wire spelling, e.g. `"resource"`.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Operation => "operation",
            EntityKind::Resource => "resource",
            EntityKind::Buffer => "buffer",
            EntityKind::Demand => "demand",
        }
    }

    /// Parse the wire spelling (lowercase, exact).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "operation" => Some(EntityKind::Operation),
            "resource" => Some(EntityKind::Resource),
            "buffer" => Some(EntityKind::Buffer),
            "demand" => Some(EntityKind::Demand),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one board entity: kind plus case-sensitive name.
///
/// The canonical text form is `<kind>/<name>`, e.g. `resource/Paint line 1`.
/// Names may themselves contain `/`; only the first separator splits the
/// kind off.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub name: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        EntityKey {
            kind,
            name: name.into(),
        }
    }

    pub fn operation(name: impl Into<String>) -> Self {
        EntityKey::new(EntityKind::Operation, name)
    }

    pub fn resource(name: impl Into<String>) -> Self {
        EntityKey::new(EntityKind::Resource, name)
    }

    pub fn buffer(name: impl Into<String>) -> Self {
        EntityKey::new(EntityKind::Buffer, name)
    }

    pub fn demand(name: impl Into<String>) -> Self {
        EntityKey::new(EntityKind::Demand, name)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

impl FromStr for EntityKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, KeyError> {
        let (kind, name) = s
            .split_once('/')
            .ok_or_else(|| KeyError::MissingSeparator(s.to_string()))?;
        let kind = EntityKind::parse(kind).ok_or_else(|| KeyError::UnknownKind(kind.to_string()))?;
        if name.is_empty() {
            return Err(KeyError::EmptyName);
        }
        Ok(EntityKey::new(kind, name))
    }
}

// Keys travel (e.g. in persisted row lists) as their canonical text form,
// not as `{kind, name}` objects.

impl Serialize for EntityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
