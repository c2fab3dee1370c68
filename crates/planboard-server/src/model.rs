//! In-memory plan model.
//!
//! Holds the entities the board serves and their current plan state,
//! plus the placeholder plan mutations behind `/solve/`. There is no
//! scheduling algorithm here: planning a demand produces one delivery
//! window of its full quantity, offset by its lead time.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::Deserialize;

use planboard_core::{
    BufferPlan, Catalog, DemandInfo, DemandPlan, DemandPlanDetail, EntityKey, EntityKind,
    FlowPoint, LoadSpan, OperationPlan, OperationSpan, PlanUpdate, ResourcePlan, SolveCommand,
};

/// Which demands a solve touched, for the fan-out after it.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    /// A bulk solve: every demand counts as changed.
    AllDemands,

    /// A targeted solve; empty when the named demand was unknown.
    Demands(Vec<String>),
}

impl SolveOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, SolveOutcome::Demands(names) if names.is_empty())
    }
}

#[derive(Debug, Clone)]
struct DemandData {
    item: String,
    customer: String,
    quantity: f64,
    due: DateTime<Utc>,
    priority: i32,
    lead: Duration,
    deliveries: Vec<OperationSpan>,
}

impl DemandData {
    fn planned(&self) -> f64 {
        self.deliveries.iter().map(|d| d.quantity).sum()
    }

    fn plan_forward(&mut self, start: DateTime<Utc>) {
        self.deliveries = vec![OperationSpan {
            start,
            end: start + self.lead,
            quantity: self.quantity,
        }];
    }

    fn plan_backward(&mut self) {
        self.deliveries = vec![OperationSpan {
            start: self.due - self.lead,
            end: self.due,
            quantity: self.quantity,
        }];
    }
}

/// The board's world: entity tables plus current plan state.
#[derive(Debug, Clone)]
pub struct BoardModel {
    horizon_start: DateTime<Utc>,
    items: Vec<String>,
    operations: IndexMap<String, Vec<OperationSpan>>,
    resources: IndexMap<String, Vec<LoadSpan>>,
    buffers: IndexMap<String, Vec<FlowPoint>>,
    demands: IndexMap<String, DemandData>,
}

impl BoardModel {
    /// Small built-in model, used when no model file is configured.
    pub fn demo() -> Self {
        let start = Utc::now();
        let day = Duration::days(1);

        let mut operations = IndexMap::new();
        operations.insert(
            "Assemble widget".to_string(),
            vec![
                OperationSpan {
                    start,
                    end: start + day,
                    quantity: 10.0,
                },
                OperationSpan {
                    start: start + day * 2,
                    end: start + day * 3,
                    quantity: 5.0,
                },
            ],
        );
        operations.insert(
            "Paint widget".to_string(),
            vec![OperationSpan {
                start: start + day,
                end: start + day * 2,
                quantity: 10.0,
            }],
        );
        operations.insert("Pack gadget".to_string(), Vec::new());

        let mut resources = IndexMap::new();
        resources.insert(
            "Assembly line".to_string(),
            vec![LoadSpan {
                start,
                end: start + day,
                quantity: 1.0,
            }],
        );
        resources.insert(
            "Paint line 1".to_string(),
            vec![
                LoadSpan {
                    start: start + day,
                    end: start + day * 2,
                    quantity: 1.0,
                },
                // Unloading entry; boards skip negative loads when drawing.
                LoadSpan {
                    start: start + day * 2,
                    end: start + day * 3,
                    quantity: -1.0,
                },
            ],
        );
        resources.insert("Packing cell".to_string(), Vec::new());

        let mut buffers = IndexMap::new();
        buffers.insert(
            "widget @ factory".to_string(),
            vec![
                FlowPoint {
                    date: start,
                    quantity: 10.0,
                    onhand: 10.0,
                    minimum: 2.0,
                    maximum: 40.0,
                },
                FlowPoint {
                    date: start + day,
                    quantity: -4.0,
                    onhand: 6.0,
                    minimum: 2.0,
                    maximum: 40.0,
                },
            ],
        );
        buffers.insert(
            "paint @ factory".to_string(),
            vec![FlowPoint {
                date: start,
                quantity: 25.0,
                onhand: 25.0,
                minimum: 5.0,
                maximum: 50.0,
            }],
        );

        let mut demands = IndexMap::new();
        demands.insert(
            "D-100".to_string(),
            DemandData {
                item: "widget".to_string(),
                customer: "ACME".to_string(),
                quantity: 10.0,
                due: start + day * 10,
                priority: 1,
                lead: day * 2,
                deliveries: Vec::new(),
            },
        );
        demands.insert(
            "D-101".to_string(),
            DemandData {
                item: "widget".to_string(),
                customer: "Globex".to_string(),
                quantity: 5.0,
                due: start + day * 15,
                priority: 2,
                lead: day,
                deliveries: Vec::new(),
            },
        );
        demands.insert(
            "D-102".to_string(),
            DemandData {
                item: "gadget".to_string(),
                customer: "Initech".to_string(),
                quantity: 20.0,
                due: start + day * 20,
                priority: 3,
                lead: day * 3,
                deliveries: Vec::new(),
            },
        );

        BoardModel {
            horizon_start: start,
            items: vec!["widget".to_string(), "gadget".to_string()],
            operations,
            resources,
            buffers,
            demands,
        }
    }

    /// Load a model from a JSON file.
    pub fn from_file(path: &str) -> Result<Self> {
        let raw =
            std::fs::read_to_string(path).with_context(|| format!("reading model file {path}"))?;
        let file: ModelFile =
            serde_json::from_str(&raw).with_context(|| format!("parsing model file {path}"))?;
        Ok(file.into_model())
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        match key.kind {
            EntityKind::Operation => self.operations.contains_key(&key.name),
            EntityKind::Resource => self.resources.contains_key(&key.name),
            EntityKind::Buffer => self.buffers.contains_key(&key.name),
            EntityKind::Demand => self.demands.contains_key(&key.name),
        }
    }

    pub fn demand_names(&self) -> impl Iterator<Item = &str> {
        self.demands.keys().map(String::as_str)
    }

    /// Catalog listing, optionally narrowed to one kind. Items only
    /// appear in the unfiltered listing.
    pub fn catalog(&self, filter: Option<EntityKind>) -> Catalog {
        let mut catalog = Catalog::default();
        let all = filter.is_none();
        if all {
            catalog.items = self.items.clone();
        }
        if all || filter == Some(EntityKind::Operation) {
            catalog.operations = self.operations.keys().cloned().collect();
        }
        if all || filter == Some(EntityKind::Resource) {
            catalog.resources = self.resources.keys().cloned().collect();
        }
        if all || filter == Some(EntityKind::Buffer) {
            catalog.buffers = self.buffers.keys().cloned().collect();
        }
        if all || filter == Some(EntityKind::Demand) {
            catalog.demands = self
                .demands
                .iter()
                .map(|(name, d)| DemandInfo {
                    name: name.clone(),
                    item: d.item.clone(),
                    customer: d.customer.clone(),
                    quantity: d.quantity,
                    due: d.due,
                    priority: d.priority,
                })
                .collect();
        }
        catalog
    }

    /// Append one entity's plan rows to `update`. Returns false for an
    /// unknown key, leaving `update` untouched.
    pub fn append_plan(&self, key: &EntityKey, update: &mut PlanUpdate) -> bool {
        match key.kind {
            EntityKind::Operation => {
                let Some(plans) = self.operations.get(&key.name) else {
                    return false;
                };
                update.operations.push(OperationPlan {
                    name: key.name.clone(),
                    operationplans: plans.clone(),
                });
            }
            EntityKind::Resource => {
                let Some(loads) = self.resources.get(&key.name) else {
                    return false;
                };
                update.resources.push(ResourcePlan {
                    name: key.name.clone(),
                    loadplans: loads.clone(),
                });
            }
            EntityKind::Buffer => {
                let Some(flows) = self.buffers.get(&key.name) else {
                    return false;
                };
                update.buffers.push(BufferPlan {
                    name: key.name.clone(),
                    flowplans: flows.clone(),
                });
            }
            EntityKind::Demand => {
                let Some(demand) = self.demands.get(&key.name) else {
                    return false;
                };
                update.demands.push(DemandPlan {
                    name: key.name.clone(),
                    detail: DemandPlanDetail {
                        due: demand.due,
                        quantity: demand.quantity,
                        planned: demand.planned(),
                        deliveries: demand.deliveries.clone(),
                    },
                });
            }
        }
        true
    }

    /// Single-entity plan payload, for `/plan/<key>` requests.
    pub fn plan_for(&self, key: &EntityKey) -> Option<PlanUpdate> {
        let mut update = PlanUpdate::default();
        self.append_plan(key, &mut update).then_some(update)
    }

    /// Apply a plan mutation and report which demands it touched.
    pub fn solve(&mut self, solve: &SolveCommand) -> SolveOutcome {
        match solve {
            SolveCommand::Erase => {
                for demand in self.demands.values_mut() {
                    demand.deliveries.clear();
                }
                SolveOutcome::AllDemands
            }
            SolveCommand::ReplanForward => {
                let start = self.horizon_start;
                for demand in self.demands.values_mut() {
                    demand.plan_forward(start);
                }
                SolveOutcome::AllDemands
            }
            SolveCommand::ReplanBackward => {
                for demand in self.demands.values_mut() {
                    demand.plan_backward();
                }
                SolveOutcome::AllDemands
            }
            SolveCommand::DemandForward(name) => {
                let start = self.horizon_start;
                self.touch(name, |d| d.plan_forward(start))
            }
            SolveCommand::DemandBackward(name) => self.touch(name, DemandData::plan_backward),
            SolveCommand::Unplan(name) => self.touch(name, |d| d.deliveries.clear()),
        }
    }

    fn touch(&mut self, name: &str, apply: impl FnOnce(&mut DemandData)) -> SolveOutcome {
        match self.demands.get_mut(name) {
            Some(demand) => {
                apply(demand);
                SolveOutcome::Demands(vec![name.to_string()])
            }
            None => SolveOutcome::Demands(Vec::new()),
        }
    }
}

// ---- Model file format ----

#[derive(Debug, Deserialize)]
struct ModelFile {
    #[serde(default)]
    horizon_start: Option<DateTime<Utc>>,
    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    operations: Vec<OperationPlan>,
    #[serde(default)]
    resources: Vec<ResourcePlan>,
    #[serde(default)]
    buffers: Vec<BufferPlan>,
    #[serde(default)]
    demands: Vec<DemandSeed>,
}

#[derive(Debug, Deserialize)]
struct DemandSeed {
    name: String,
    item: String,
    customer: String,
    quantity: f64,
    due: DateTime<Utc>,
    #[serde(default)]
    priority: i32,
    #[serde(default = "default_lead_days")]
    lead_days: i64,
}

fn default_lead_days() -> i64 {
    1
}

impl ModelFile {
    fn into_model(self) -> BoardModel {
        let horizon_start = self.horizon_start.unwrap_or_else(Utc::now);
        BoardModel {
            horizon_start,
            items: self.items,
            operations: self
                .operations
                .into_iter()
                .map(|p| (p.name, p.operationplans))
                .collect(),
            resources: self
                .resources
                .into_iter()
                .map(|p| (p.name, p.loadplans))
                .collect(),
            buffers: self
                .buffers
                .into_iter()
                .map(|p| (p.name, p.flowplans))
                .collect(),
            demands: self
                .demands
                .into_iter()
                .map(|seed| {
                    let DemandSeed {
                        name,
                        item,
                        customer,
                        quantity,
                        due,
                        priority,
                        lead_days,
                    } = seed;
                    (
                        name,
                        DemandData {
                            item,
                            customer,
                            quantity,
                            due,
                            priority,
                            lead: Duration::days(lead_days),
                            deliveries: Vec::new(),
                        },
                    )
                })
                .collect(),
        }
    }
}
