//! Plan data: the `category: "plan"` payload.
//!
//! Each section is a list of per-entity rows matched by name. The
//! [`PlanUpdate::into_entries`] view turns a payload into
//! `(EntityKey, EntityPlan)` pairs so consumers never match rows by
//! position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityKey, EntityKind};

/// One planned execution window of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quantity: f64,
}

/// One loading interval on a resource.
///
/// Quantity can be negative for unloading entries; board rendering
/// skips those.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub quantity: f64,
}

/// One inventory movement on a buffer, with the running level and the
/// configured safety band after the movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowPoint {
    pub date: DateTime<Utc>,
    pub quantity: f64,
    pub onhand: f64,
    pub minimum: f64,
    pub maximum: f64,
}

/// Planned state of one demand: how much is covered and by which
/// delivery windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPlanDetail {
    pub due: DateTime<Utc>,
    pub quantity: f64,
    pub planned: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deliveries: Vec<OperationSpan>,
}

/// Plan rows for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationPlan {
    pub name: String,
    #[serde(default)]
    pub operationplans: Vec<OperationSpan>,
}

/// Plan rows for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePlan {
    pub name: String,
    #[serde(default)]
    pub loadplans: Vec<LoadSpan>,
}

/// Plan rows for one buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferPlan {
    pub name: String,
    #[serde(default)]
    pub flowplans: Vec<FlowPoint>,
}

/// Plan state for one demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPlan {
    pub name: String,
    #[serde(flatten)]
    pub detail: DemandPlanDetail,
}

/// Incremental plan data for some set of entities.
///
/// Sections absent on the wire deserialize as empty, and empty sections
/// are omitted when serializing, so a push for a single resource is one
/// small object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanUpdate {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationPlan>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourcePlan>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffers: Vec<BufferPlan>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub demands: Vec<DemandPlan>,
}

impl PlanUpdate {
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
            && self.resources.is_empty()
            && self.buffers.is_empty()
            && self.demands.is_empty()
    }

    /// Flatten into keyed entries, section order preserved.
    pub fn into_entries(self) -> Vec<(EntityKey, EntityPlan)> {
        let mut entries = Vec::with_capacity(
            self.operations.len() + self.resources.len() + self.buffers.len() + self.demands.len(),
        );
        for OperationPlan {
            name,
            operationplans,
        } in self.operations
        {
            entries.push((
                EntityKey::new(EntityKind::Operation, name),
                EntityPlan::Operation(operationplans),
            ));
        }
        for ResourcePlan { name, loadplans } in self.resources {
            entries.push((
                EntityKey::new(EntityKind::Resource, name),
                EntityPlan::Resource(loadplans),
            ));
        }
        for BufferPlan { name, flowplans } in self.buffers {
            entries.push((
                EntityKey::new(EntityKind::Buffer, name),
                EntityPlan::Buffer(flowplans),
            ));
        }
        for DemandPlan { name, detail } in self.demands {
            entries.push((
                EntityKey::new(EntityKind::Demand, name),
                EntityPlan::Demand(detail),
            ));
        }
        entries
    }
}

/// Plan payload for a single entity.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPlan {
    Operation(Vec<OperationSpan>),
    Resource(Vec<LoadSpan>),
    Buffer(Vec<FlowPoint>),
    Demand(DemandPlanDetail),
}

impl EntityPlan {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityPlan::Operation(_) => EntityKind::Operation,
            EntityPlan::Resource(_) => EntityKind::Resource,
            EntityPlan::Buffer(_) => EntityKind::Buffer,
            EntityPlan::Demand(_) => EntityKind::Demand,
        }
    }
}
