// crates/planboard-core/tests/entity_and_plan.rs
use chrono::{DateTime, TimeZone, Utc};
use planboard_core::{
    Catalog, DemandInfo, DemandPlan, DemandPlanDetail, EntityKey, EntityKind, EntityPlan,
    KeyError, OperationPlan, OperationSpan, PlanUpdate, ResourcePlan,
};

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

#[test]
fn entity_keys_round_trip_through_text() {
    let key = EntityKey::resource("Paint line 1");
    assert_eq!(key.to_string(), "resource/Paint line 1");

    let parsed: EntityKey = "resource/Paint line 1".parse().expect("parse");
    assert_eq!(parsed, key);

    // Names may contain the separator; only the first one splits.
    let nested: EntityKey = "operation/Ship A/B".parse().expect("parse");
    assert_eq!(nested.kind, EntityKind::Operation);
    assert_eq!(nested.name, "Ship A/B");
}

#[test]
fn bad_keys_are_rejected() {
    assert!(matches!(
        "resource".parse::<EntityKey>(),
        Err(KeyError::MissingSeparator(_))
    ));
    assert!(matches!(
        "factory/M1".parse::<EntityKey>(),
        Err(KeyError::UnknownKind(_))
    ));
    assert!(matches!("demand/".parse::<EntityKey>(), Err(KeyError::EmptyName)));

    // Kind spellings are lowercase, case-sensitive.
    assert!("Resource/M1".parse::<EntityKey>().is_err());
}

#[test]
fn keys_serialize_as_plain_strings() {
    let key = EntityKey::buffer("paint @ factory");
    let json = serde_json::to_string(&key).expect("serialize");
    assert_eq!(json, "\"buffer/paint @ factory\"");

    let back: EntityKey = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, key);
}

#[test]
fn catalog_lists_names_per_kind() {
    let catalog = Catalog {
        items: vec!["widget".into()],
        operations: vec!["Assemble".into(), "Paint".into()],
        resources: vec!["M1".into()],
        buffers: vec![],
        demands: vec![DemandInfo {
            name: "D01".into(),
            item: "widget".into(),
            customer: "ACME".into(),
            quantity: 10.0,
            due: ts(20, 12),
            priority: 1,
        }],
    };

    assert_eq!(catalog.names(EntityKind::Operation), vec!["Assemble", "Paint"]);
    assert_eq!(catalog.names(EntityKind::Resource), vec!["M1"]);
    assert!(catalog.names(EntityKind::Buffer).is_empty());
    assert_eq!(catalog.names(EntityKind::Demand), vec!["D01"]);
    assert_eq!(catalog.demand("D01").expect("listed").customer, "ACME");
    assert!(catalog.demand("D99").is_none());
    assert!(!catalog.is_empty());
}

#[test]
fn plan_updates_flatten_to_keyed_entries() {
    let update = PlanUpdate {
        operations: vec![OperationPlan {
            name: "Assemble".into(),
            operationplans: vec![OperationSpan {
                start: ts(1, 8),
                end: ts(1, 16),
                quantity: 5.0,
            }],
        }],
        resources: vec![ResourcePlan {
            name: "M1".into(),
            loadplans: vec![],
        }],
        buffers: vec![],
        demands: vec![DemandPlan {
            name: "D01".into(),
            detail: DemandPlanDetail {
                due: ts(20, 12),
                quantity: 10.0,
                planned: 0.0,
                deliveries: vec![],
            },
        }],
    };

    let entries = update.into_entries();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0].0, EntityKey::operation("Assemble"));
    assert!(matches!(&entries[0].1, EntityPlan::Operation(spans) if spans.len() == 1));

    assert_eq!(entries[1].0, EntityKey::resource("M1"));
    assert_eq!(entries[1].1.kind(), EntityKind::Resource);

    assert_eq!(entries[2].0, EntityKey::demand("D01"));
    assert!(matches!(&entries[2].1, EntityPlan::Demand(d) if d.quantity == 10.0));
}

#[test]
fn empty_plan_sections_stay_off_the_wire() {
    let update = PlanUpdate {
        resources: vec![ResourcePlan {
            name: "M1".into(),
            loadplans: vec![],
        }],
        ..PlanUpdate::default()
    };

    let json = serde_json::to_value(&update).expect("serialize");
    let obj = json.as_object().expect("object");
    assert!(obj.contains_key("resources"));
    assert!(!obj.contains_key("operations"));
    assert!(!obj.contains_key("buffers"));
    assert!(!obj.contains_key("demands"));
}
