//! planboard-core
//!
//! Pure planning-board logic:
//! - entity identity (kinds, `<kind>/<name>` keys)
//! - catalog listings
//! - plan data (operation spans, load spans, flow points, demand deliveries)
//! - logical session messages (commands out, updates in)

pub mod catalog;
pub mod entity;
pub mod error;
pub mod messages;
pub mod plan;

pub use entity::{EntityKey, EntityKind};
pub use error::KeyError;

pub use catalog::{Catalog, DemandInfo};

pub use plan::{
    BufferPlan,
    DemandPlan,
    DemandPlanDetail,
    EntityPlan,
    FlowPoint,
    LoadSpan,
    OperationPlan,
    OperationSpan,
    PlanUpdate,
    ResourcePlan,
};

pub use messages::{ChatMessage, Command, SolveCommand, Update};
